//! Dual-backend collection
//!
//! Every content collection is either MongoDB-backed (production) or a
//! `Vec` behind a `tokio::sync::RwLock` (dev mode and tests). Both
//! backends expose the same operations; callers pass a BSON filter for
//! the Mongo path and a predicate for the memory path where a lookup is
//! by anything other than the document id.

use bson::{doc, Document};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::db::mongo::{IntoIndexes, MongoCollection, MutMetadata};
use crate::types::RoostError;

/// Documents stored in a [`DualCollection`]
pub trait StoredDoc {
    /// Wire name of the newest-first sort field, if the collection has one
    const DATE_FIELD: Option<&'static str> = None;

    /// Stable document id used in routes
    fn doc_id(&self) -> &str;

    /// Value of [`Self::DATE_FIELD`] for in-memory sorting
    fn date_key(&self) -> &str {
        ""
    }
}

impl StoredDoc for crate::db::schemas::ProjectDoc {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

impl StoredDoc for crate::db::schemas::RatingDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::MessageDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::ApplicationDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::ProjectSubmissionDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::TestimonialSubmissionDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::VisitorDoc {
    const DATE_FIELD: Option<&'static str> = Some("visitTime");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.visit_time
    }
}

impl StoredDoc for crate::db::schemas::ConversationDoc {
    const DATE_FIELD: Option<&'static str> = Some("date");
    fn doc_id(&self) -> &str {
        &self.id
    }
    fn date_key(&self) -> &str {
        &self.date
    }
}

impl StoredDoc for crate::db::schemas::NotificationDoc {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

pub struct DualCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    mongo: Option<MongoCollection<T>>,
    memory: RwLock<Vec<T>>,
}

impl<T> DualCollection<T>
where
    T: StoredDoc
        + Clone
        + Serialize
        + DeserializeOwned
        + Unpin
        + Send
        + Sync
        + IntoIndexes
        + MutMetadata,
{
    pub fn with_mongo(collection: MongoCollection<T>) -> Self {
        Self {
            mongo: Some(collection),
            memory: RwLock::new(Vec::new()),
        }
    }

    pub fn memory_only() -> Self {
        Self {
            mongo: None,
            memory: RwLock::new(Vec::new()),
        }
    }

    pub async fn insert(&self, item: T) -> Result<(), RoostError> {
        match &self.mongo {
            Some(collection) => collection.insert_one(item).await,
            None => {
                self.memory.write().await.push(item);
                Ok(())
            }
        }
    }

    /// Every live document, in storage order
    pub async fn all(&self) -> Result<Vec<T>, RoostError> {
        match &self.mongo {
            Some(collection) => collection.find_many(doc! {}).await,
            None => Ok(self.memory.read().await.clone()),
        }
    }

    /// Every live document, newest first by the schema's date field
    pub async fn newest_first(&self, limit: Option<usize>) -> Result<Vec<T>, RoostError> {
        match T::DATE_FIELD {
            Some(field) => match &self.mongo {
                Some(collection) => {
                    collection
                        .find_sorted(doc! {}, doc! { field: -1 }, limit.map(|n| n as i64), None)
                        .await
                }
                None => {
                    let mut items = self.memory.read().await.clone();
                    items.sort_by(|a, b| b.date_key().cmp(a.date_key()));
                    if let Some(limit) = limit {
                        items.truncate(limit);
                    }
                    Ok(items)
                }
            },
            None => self.all().await,
        }
    }

    pub async fn find(&self, id: &str) -> Result<Option<T>, RoostError> {
        match &self.mongo {
            Some(collection) => collection.find_one(doc! { "id": id }).await,
            None => Ok(self
                .memory
                .read()
                .await
                .iter()
                .find(|item| item.doc_id() == id)
                .cloned()),
        }
    }

    /// First live document matching `filter` (Mongo) / `pred` (memory)
    pub async fn find_first(
        &self,
        filter: Document,
        pred: impl Fn(&T) -> bool,
    ) -> Result<Option<T>, RoostError> {
        match &self.mongo {
            Some(collection) => collection.find_one(filter).await,
            None => Ok(self.memory.read().await.iter().find(|i| pred(i)).cloned()),
        }
    }

    /// Every live document matching `filter` (Mongo) / `pred` (memory)
    pub async fn find_where(
        &self,
        filter: Document,
        pred: impl Fn(&T) -> bool,
    ) -> Result<Vec<T>, RoostError> {
        match &self.mongo {
            Some(collection) => collection.find_many(filter).await,
            None => Ok(self
                .memory
                .read()
                .await
                .iter()
                .filter(|i| pred(i))
                .cloned()
                .collect()),
        }
    }

    /// Read-modify-write replacement of one document by id.
    ///
    /// Returns the post-mutation document, or `None` when the id is
    /// unknown. Two concurrent callers race; the last commit wins.
    pub async fn update_with(
        &self,
        id: &str,
        f: impl FnOnce(&mut T),
    ) -> Result<Option<T>, RoostError> {
        match &self.mongo {
            Some(collection) => {
                let Some(mut item) = collection.find_one(doc! { "id": id }).await? else {
                    return Ok(None);
                };
                f(&mut item);
                item.mut_metadata().updated_at = Some(bson::DateTime::now());
                let replacement = bson::to_document(&item)?;
                collection
                    .update_one(doc! { "id": id }, doc! { "$set": replacement })
                    .await?;
                Ok(Some(item))
            }
            None => {
                let mut guard = self.memory.write().await;
                let Some(item) = guard.iter_mut().find(|i| i.doc_id() == id) else {
                    return Ok(None);
                };
                f(item);
                Ok(Some(item.clone()))
            }
        }
    }

    /// Apply a targeted patch to the first document matching the filter.
    ///
    /// The Mongo path runs `mongo_update` server-side; the memory path
    /// applies the equivalent closure. Returns whether a document matched.
    pub async fn patch_first(
        &self,
        filter: Document,
        pred: impl Fn(&T) -> bool,
        mongo_update: Document,
        apply: impl FnOnce(&mut T),
    ) -> Result<bool, RoostError> {
        match &self.mongo {
            Some(collection) => {
                let mut full_filter = filter;
                full_filter.insert("metadata.is_deleted", doc! { "$ne": true });
                let result = collection.update_one(full_filter, mongo_update).await?;
                Ok(result.matched_count > 0)
            }
            None => {
                let mut guard = self.memory.write().await;
                match guard.iter_mut().find(|i| pred(i)) {
                    Some(item) => {
                        apply(item);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// Soft-delete one document; returns whether it existed
    pub async fn remove(&self, id: &str) -> Result<bool, RoostError> {
        match &self.mongo {
            Some(collection) => {
                let result = collection.soft_delete(doc! { "id": id }).await?;
                Ok(result.modified_count > 0)
            }
            None => {
                let mut guard = self.memory.write().await;
                let before = guard.len();
                guard.retain(|item| item.doc_id() != id);
                Ok(guard.len() < before)
            }
        }
    }

    /// Soft-delete every document
    pub async fn clear(&self) -> Result<u64, RoostError> {
        match &self.mongo {
            Some(collection) => collection.soft_delete_many(doc! {}).await,
            None => {
                let mut guard = self.memory.write().await;
                let removed = guard.len() as u64;
                guard.clear();
                Ok(removed)
            }
        }
    }

    pub async fn count(&self) -> Result<u64, RoostError> {
        match &self.mongo {
            Some(collection) => collection.count(doc! {}).await,
            None => Ok(self.memory.read().await.len() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{MessageDoc, MessageInput};

    fn message(name: &str) -> MessageDoc {
        let input: MessageInput = serde_json::from_value(serde_json::json!({
            "name": name,
            "email": format!("{}@example.com", name),
            "message": "hello"
        }))
        .unwrap();
        input.into_doc()
    }

    #[tokio::test]
    async fn test_insert_find_remove() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        let doc = message("lina");
        let id = doc.id.clone();

        collection.insert(doc).await.unwrap();
        assert_eq!(collection.count().await.unwrap(), 1);
        assert!(collection.find(&id).await.unwrap().is_some());

        assert!(collection.remove(&id).await.unwrap());
        assert!(!collection.remove(&id).await.unwrap());
        assert_eq!(collection.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_newest_first_orders_by_date() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        let mut first = message("a");
        first.date = "2025-01-01T00:00:00.000Z".to_string();
        let mut second = message("b");
        second.date = "2025-06-01T00:00:00.000Z".to_string();

        collection.insert(first).await.unwrap();
        collection.insert(second).await.unwrap();

        let items = collection.newest_first(None).await.unwrap();
        assert_eq!(items[0].name, "b");
        assert_eq!(items[1].name, "a");

        let capped = collection.newest_first(Some(1)).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_replaces_in_place() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        let doc = message("omar");
        let id = doc.id.clone();
        collection.insert(doc).await.unwrap();

        let updated = collection
            .update_with(&id, |m| m.message = "edited".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.message, "edited");

        assert!(collection
            .update_with("missing", |_| {})
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_first_uses_predicate_in_memory() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        collection.insert(message("a")).await.unwrap();
        collection.insert(message("b")).await.unwrap();

        let found = collection
            .find_first(doc! { "name": "b" }, |m| m.name == "b")
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "b");
    }

    #[tokio::test]
    async fn test_patch_first_reports_match() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        collection.insert(message("a")).await.unwrap();

        let patched = collection
            .patch_first(
                doc! { "name": "a" },
                |m| m.name == "a",
                doc! { "$set": { "message": "patched" } },
                |m| m.message = "patched".to_string(),
            )
            .await
            .unwrap();
        assert!(patched);

        let missed = collection
            .patch_first(
                doc! { "name": "z" },
                |m| m.name == "z",
                doc! { "$set": { "message": "x" } },
                |m| m.message = "x".to_string(),
            )
            .await
            .unwrap();
        assert!(!missed);
    }

    #[tokio::test]
    async fn test_clear_empties_collection() {
        let collection = DualCollection::<MessageDoc>::memory_only();
        collection.insert(message("a")).await.unwrap();
        collection.insert(message("b")).await.unwrap();
        assert_eq!(collection.clear().await.unwrap(), 2);
        assert_eq!(collection.count().await.unwrap(), 0);
    }
}
