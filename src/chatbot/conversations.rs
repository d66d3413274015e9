//! Chatbot conversation log store
//!
//! Logging is best-effort from the chat endpoint; the admin side gets
//! paging, stats, search, a training-data export, a review patch and
//! deletion.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::content::collection::DualCollection;
use crate::db::mongo::MongoClient;
use crate::db::schemas::{ConversationDoc, ReviewPatch, CONVERSATION_COLLECTION};
use crate::types::RoostError;

/// Search results are capped at this many conversations
const SEARCH_CAP: usize = 50;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPage {
    pub conversations: Vec<ConversationDoc>,
    pub total: u64,
    pub page: usize,
    pub limit: usize,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    pub total_conversations: u64,
    pub average_response_time: f64,
    pub rated_conversations: u64,
    pub flagged_for_review: u64,
    pub useful_for_training: u64,
}

pub struct ConversationStore {
    conversations: DualCollection<ConversationDoc>,
}

impl ConversationStore {
    pub async fn with_mongo(client: &MongoClient) -> Result<Self, RoostError> {
        Ok(Self {
            conversations: DualCollection::with_mongo(
                client.collection(CONVERSATION_COLLECTION).await?,
            ),
        })
    }

    pub fn memory_only() -> Self {
        Self {
            conversations: DualCollection::memory_only(),
        }
    }

    /// Record one exchange; callers treat failures as non-fatal
    pub async fn log(&self, conversation: ConversationDoc) -> Result<(), RoostError> {
        self.conversations.insert(conversation).await
    }

    /// Newest-first page; `page` is 1-based
    pub async fn page(&self, page: usize, limit: usize) -> Result<ConversationPage, RoostError> {
        let page = page.max(1);
        let limit = limit.clamp(1, 200);

        let all = self.conversations.newest_first(None).await?;
        let total = all.len() as u64;
        let pages = total.div_ceil(limit as u64);
        let conversations = all
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(ConversationPage {
            conversations,
            total,
            page,
            limit,
            pages,
        })
    }

    pub async fn stats(&self) -> Result<ConversationStats, RoostError> {
        let all = self.conversations.all().await?;
        let total = all.len() as u64;
        let average = if all.is_empty() {
            0.0
        } else {
            all.iter().map(|c| c.response_time_ms as f64).sum::<f64>() / all.len() as f64
        };

        Ok(ConversationStats {
            total_conversations: total,
            average_response_time: average,
            rated_conversations: all.iter().filter(|c| c.rating.is_some()).count() as u64,
            flagged_for_review: all.iter().filter(|c| c.flagged_for_review).count() as u64,
            useful_for_training: all.iter().filter(|c| c.is_useful_for_training).count() as u64,
        })
    }

    /// Case-insensitive substring search over user and bot text
    pub async fn search(&self, query: &str) -> Result<Vec<ConversationDoc>, RoostError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<_> = self
            .conversations
            .newest_first(None)
            .await?
            .into_iter()
            .filter(|c| {
                c.user_message.to_lowercase().contains(&needle)
                    || c.bot_response.to_lowercase().contains(&needle)
            })
            .collect();
        matches.truncate(SEARCH_CAP);
        Ok(matches)
    }

    /// Training-flagged conversations as a JSON attachment body
    pub async fn export_training(&self) -> Result<JsonValue, RoostError> {
        let flagged: Vec<_> = self
            .conversations
            .all()
            .await?
            .into_iter()
            .filter(|c| c.is_useful_for_training)
            .collect();
        Ok(serde_json::to_value(flagged)?)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: ReviewPatch,
    ) -> Result<ConversationDoc, RoostError> {
        patch.validate().map_err(RoostError::Validation)?;

        let matched = self
            .conversations
            .patch_first(
                bson::doc! { "id": id },
                |c| c.id == id,
                patch.to_update(),
                |c| patch.apply_to(c),
            )
            .await?;
        if !matched {
            return Err(RoostError::NotFound(format!("conversation {}", id)));
        }
        self.conversations
            .find(id)
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("conversation {}", id)))
    }

    pub async fn delete(&self, id: &str) -> Result<(), RoostError> {
        if !self.conversations.remove(id).await? {
            return Err(RoostError::NotFound(format!("conversation {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convo(user: &str, bot: &str, ms: u64) -> ConversationDoc {
        ConversationDoc::new(
            user.to_string(),
            bot.to_string(),
            Some("s-1".to_string()),
            None,
            ms,
            None,
        )
    }

    #[tokio::test]
    async fn test_page_math() {
        let store = ConversationStore::memory_only();
        for i in 0..5 {
            store.log(convo(&format!("q{}", i), "a", 10)).await.unwrap();
        }

        let page = store.page(1, 2).await.unwrap();
        assert_eq!(page.conversations.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);

        let last = store.page(3, 2).await.unwrap();
        assert_eq!(last.conversations.len(), 1);

        let beyond = store.page(9, 2).await.unwrap();
        assert!(beyond.conversations.is_empty());
    }

    #[tokio::test]
    async fn test_stats_average_and_counters() {
        let store = ConversationStore::memory_only();
        store.log(convo("a", "b", 10)).await.unwrap();
        store.log(convo("c", "d", 30)).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_conversations, 2);
        assert!((stats.average_response_time - 20.0).abs() < 1e-9);
        assert_eq!(stats.rated_conversations, 0);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_covers_both_sides() {
        let store = ConversationStore::memory_only();
        store
            .log(convo("Where are the GAMES?", "On the projects page", 5))
            .await
            .unwrap();
        store.log(convo("hello", "hi there", 5)).await.unwrap();

        assert_eq!(store.search("games").await.unwrap().len(), 1);
        assert_eq!(store.search("PROJECTS").await.unwrap().len(), 1);
        assert!(store.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_only_training_flagged() {
        let store = ConversationStore::memory_only();
        store.log(convo("a", "b", 5)).await.unwrap();
        let flagged = convo("useful", "answer", 5);
        let id = flagged.id.clone();
        store.log(flagged).await.unwrap();

        let patch: ReviewPatch =
            serde_json::from_value(json!({ "isUsefulForTraining": true })).unwrap();
        store.update(&id, patch).await.unwrap();

        let export = store.export_training().await.unwrap();
        let items = export.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["userMessage"], "useful");
    }

    #[tokio::test]
    async fn test_update_rejects_bad_rating() {
        let store = ConversationStore::memory_only();
        let conversation = convo("a", "b", 5);
        let id = conversation.id.clone();
        store.log(conversation).await.unwrap();

        let patch: ReviewPatch = serde_json::from_value(json!({ "rating": 7 })).unwrap();
        assert!(matches!(
            store.update(&id, patch).await.unwrap_err(),
            RoostError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let store = ConversationStore::memory_only();
        assert!(matches!(
            store.delete("missing").await.unwrap_err(),
            RoostError::NotFound(_)
        ));
    }
}
