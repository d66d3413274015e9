//! Live site banner notifications
//!
//! The public site polls for active banners; the dashboard manages the full
//! list. A banner is live when `active` is set and the current time falls
//! inside its optional start/end window.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

pub const NOTIFICATION_COLLECTION: &str = "live_notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Announcement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDoc {
    pub id: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// ISO-8601 bounds; either side may be open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NotificationDoc {
    /// Whether the banner should show at `now` (ISO-8601)
    pub fn is_live(&self, now: &str) -> bool {
        if !self.active {
            return false;
        }
        if let Some(start) = &self.start_date {
            if start.as_str() > now {
                return false;
            }
        }
        if let Some(end) = &self.end_date {
            if end.as_str() < now {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInput {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl NotificationInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("message is required".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self) -> NotificationDoc {
        NotificationDoc {
            id: Uuid::new_v4().to_string(),
            message: self.message,
            kind: self.kind,
            link: self.link,
            active: self.active,
            start_date: self.start_date,
            end_date: self.end_date,
            metadata: Metadata::new(),
        }
    }
}

/// Dashboard edit; only present fields change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<NotificationKind>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl NotificationPatch {
    pub fn apply_to(&self, notification: &mut NotificationDoc) {
        if let Some(message) = &self.message {
            notification.message = message.clone();
        }
        if let Some(kind) = self.kind {
            notification.kind = kind;
        }
        if self.link.is_some() {
            notification.link = self.link.clone();
        }
        if let Some(active) = self.active {
            notification.active = active;
        }
        if self.start_date.is_some() {
            notification.start_date = self.start_date.clone();
        }
        if self.end_date.is_some() {
            notification.end_date = self.end_date.clone();
        }
        notification.metadata.touch();
    }

    pub fn to_update(&self) -> Document {
        let mut set = Document::new();
        if let Some(message) = &self.message {
            set.insert("message", message);
        }
        if let Some(kind) = self.kind {
            // enum serializes as its lowercase wire name
            if let Ok(bson::Bson::String(s)) = bson::to_bson(&kind) {
                set.insert("type", s);
            }
        }
        if let Some(link) = &self.link {
            set.insert("link", link);
        }
        if let Some(active) = self.active {
            set.insert("active", active);
        }
        if let Some(start) = &self.start_date {
            set.insert("startDate", start);
        }
        if let Some(end) = &self.end_date {
            set.insert("endDate", end);
        }
        set.insert("metadata.updated_at", bson::DateTime::now());
        doc! { "$set": set }
    }
}

impl IntoIndexes for NotificationDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "id": 1 },
                Some(IndexOptions::builder().unique(true).build()),
            ),
            (doc! { "active": 1 }, None),
        ]
    }
}

impl MutMetadata for NotificationDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn banner(active: bool, start: Option<&str>, end: Option<&str>) -> NotificationDoc {
        NotificationDoc {
            id: "n-1".to_string(),
            message: "Game jam this weekend".to_string(),
            kind: NotificationKind::Announcement,
            link: None,
            active,
            start_date: start.map(|s| s.to_string()),
            end_date: end.map(|s| s.to_string()),
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_is_live_window() {
        let now = "2025-06-15T12:00:00.000Z";

        assert!(banner(true, None, None).is_live(now));
        assert!(!banner(false, None, None).is_live(now));
        assert!(banner(true, Some("2025-06-01T00:00:00.000Z"), None).is_live(now));
        assert!(!banner(true, Some("2025-07-01T00:00:00.000Z"), None).is_live(now));
        assert!(banner(true, None, Some("2025-07-01T00:00:00.000Z")).is_live(now));
        assert!(!banner(true, None, Some("2025-06-01T00:00:00.000Z")).is_live(now));
        assert!(banner(
            true,
            Some("2025-06-01T00:00:00.000Z"),
            Some("2025-07-01T00:00:00.000Z")
        )
        .is_live(now));
    }

    #[test]
    fn test_kind_wire_format() {
        let input: NotificationInput = serde_json::from_value(json!({
            "message": "Patch 1.2 is out",
            "type": "success"
        }))
        .unwrap();
        assert_eq!(input.kind, NotificationKind::Success);

        let doc = input.into_doc();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "success");
    }

    #[test]
    fn test_input_defaults_inactive_info() {
        let input: NotificationInput =
            serde_json::from_value(json!({ "message": "hello" })).unwrap();
        assert_eq!(input.kind, NotificationKind::Info);
        assert!(!input.active);
    }

    #[test]
    fn test_patch_preserves_unset_fields() {
        let mut doc = banner(false, None, None);
        let patch: NotificationPatch =
            serde_json::from_value(json!({ "active": true })).unwrap();
        patch.apply_to(&mut doc);
        assert!(doc.active);
        assert_eq!(doc.message, "Game jam this weekend");
        assert_eq!(doc.kind, NotificationKind::Announcement);
    }
}
