//! Live site banner store
//!
//! Banners are dashboard-managed and polled by the public site; they are
//! not part of any broadcast key.

use crate::content::collection::DualCollection;
use crate::db::mongo::MongoClient;
use crate::db::schemas::{
    NotificationDoc, NotificationInput, NotificationPatch, NOTIFICATION_COLLECTION,
};
use crate::types::{now_iso, RoostError};

pub struct NotificationStore {
    notifications: DualCollection<NotificationDoc>,
}

impl NotificationStore {
    pub async fn with_mongo(client: &MongoClient) -> Result<Self, RoostError> {
        Ok(Self {
            notifications: DualCollection::with_mongo(
                client.collection(NOTIFICATION_COLLECTION).await?,
            ),
        })
    }

    pub fn memory_only() -> Self {
        Self {
            notifications: DualCollection::memory_only(),
        }
    }

    pub async fn list(&self) -> Result<Vec<NotificationDoc>, RoostError> {
        self.notifications.all().await
    }

    /// Banners currently live: active flag set and now inside the window
    pub async fn active(&self) -> Result<Vec<NotificationDoc>, RoostError> {
        let now = now_iso();
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|n| n.is_live(&now))
            .collect())
    }

    pub async fn create(&self, input: NotificationInput) -> Result<NotificationDoc, RoostError> {
        input.validate().map_err(RoostError::Validation)?;
        let doc = input.into_doc();
        self.notifications.insert(doc.clone()).await?;
        Ok(doc)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: NotificationPatch,
    ) -> Result<NotificationDoc, RoostError> {
        let matched = self
            .notifications
            .patch_first(
                bson::doc! { "id": id },
                |n| n.id == id,
                patch.to_update(),
                |n| patch.apply_to(n),
            )
            .await?;
        if !matched {
            return Err(RoostError::NotFound(format!("notification {}", id)));
        }
        self.notifications
            .find(id)
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("notification {}", id)))
    }

    pub async fn delete(&self, id: &str) -> Result<(), RoostError> {
        if !self.notifications.remove(id).await? {
            return Err(RoostError::NotFound(format!("notification {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(message: &str, active: bool) -> NotificationInput {
        serde_json::from_value(json!({
            "message": message,
            "type": "announcement",
            "active": active
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_active_filters_inactive_banners() {
        let store = NotificationStore::memory_only();
        store.create(input("live one", true)).await.unwrap();
        store.create(input("draft", false)).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
        let active = store.active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "live one");
    }

    #[tokio::test]
    async fn test_active_honors_window() {
        let store = NotificationStore::memory_only();
        let expired: NotificationInput = serde_json::from_value(json!({
            "message": "old jam",
            "active": true,
            "endDate": "2020-01-01T00:00:00.000Z"
        }))
        .unwrap();
        store.create(expired).await.unwrap();
        assert!(store.active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_patch() {
        let store = NotificationStore::memory_only();
        let doc = store.create(input("patch incoming", false)).await.unwrap();

        let patch: NotificationPatch =
            serde_json::from_value(json!({ "active": true })).unwrap();
        let updated = store.update(&doc.id, patch).await.unwrap();
        assert!(updated.active);
        assert_eq!(updated.message, "patch incoming");

        let patch: NotificationPatch =
            serde_json::from_value(json!({ "active": true })).unwrap();
        assert!(store.update("missing", patch).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let store = NotificationStore::memory_only();
        assert!(matches!(
            store.create(input("   ", true)).await.unwrap_err(),
            RoostError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = NotificationStore::memory_only();
        let doc = store.create(input("bye", true)).await.unwrap();
        store.delete(&doc.id).await.unwrap();
        assert!(store.delete(&doc.id).await.is_err());
    }
}
