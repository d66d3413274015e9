//! Visitor analytics records
//!
//! The tracking beacon sends a large browser fingerprint. Common fields are
//! extracted into typed columns; whatever else survives sanitization lands in
//! the `extra` bag so the dashboard can still inspect it. Records are
//! append-only apart from the single end-of-session patch.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::types::now_iso;

pub const VISITOR_COLLECTION: &str = "visitors";

/// Keys lifted out of the beacon payload into typed fields
const CORE_KEYS: &[&str] = &[
    "ip",
    "page",
    "referrer",
    "userAgent",
    "browser",
    "os",
    "deviceType",
    "screenResolution",
    "language",
    "country",
    "city",
    "sessionId",
    "sessionDuration",
    "scrollDepth",
    "isMobile",
    "utmSource",
    "utmMedium",
    "utmCampaign",
    "visitTime",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorDoc {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_resolution: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Server-assigned arrival time, ISO-8601
    pub visit_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_depth: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mobile: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,

    /// Sanitized remainder of the fingerprint payload
    #[serde(default)]
    pub extra: JsonValue,

    #[serde(default)]
    pub metadata: Metadata,
}

fn get_string(data: &JsonValue, key: &str) -> Option<String> {
    data.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn get_f64(data: &JsonValue, key: &str) -> Option<f64> {
    data.get(key).and_then(|v| v.as_f64())
}

/// Keep primitives, keep flat string/number arrays, stringify nested
/// objects, drop nulls and empty strings
fn sanitize(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_) => Some(value.clone()),
        JsonValue::Array(items) => {
            if items.iter().all(|i| i.is_string() || i.is_number()) {
                Some(value.clone())
            } else {
                None
            }
        }
        JsonValue::Object(_) => serde_json::to_string(value).ok().map(JsonValue::String),
    }
}

impl VisitorDoc {
    /// Build a record from the raw beacon payload
    ///
    /// `ip` comes from the connection, never from the payload, so a client
    /// cannot spoof it.
    pub fn from_payload(data: &JsonValue, ip: Option<String>) -> Self {
        let mut extra = Map::new();
        if let Some(obj) = data.as_object() {
            for (key, value) in obj {
                if CORE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                if let Some(clean) = sanitize(value) {
                    extra.insert(key.clone(), clean);
                }
            }
        }

        Self {
            id: Uuid::new_v4().to_string(),
            ip,
            page: get_string(data, "page"),
            referrer: get_string(data, "referrer"),
            user_agent: get_string(data, "userAgent"),
            browser: get_string(data, "browser"),
            os: get_string(data, "os"),
            device_type: get_string(data, "deviceType"),
            screen_resolution: get_string(data, "screenResolution"),
            language: get_string(data, "language"),
            country: get_string(data, "country"),
            city: get_string(data, "city"),
            session_id: get_string(data, "sessionId"),
            visit_time: now_iso(),
            session_duration: get_f64(data, "sessionDuration"),
            scroll_depth: get_f64(data, "scrollDepth"),
            is_mobile: data.get("isMobile").and_then(|v| v.as_bool()),
            utm_source: get_string(data, "utmSource"),
            utm_medium: get_string(data, "utmMedium"),
            utm_campaign: get_string(data, "utmCampaign"),
            extra: if extra.is_empty() {
                JsonValue::Null
            } else {
                JsonValue::Object(extra)
            },
            metadata: Metadata::new(),
        }
    }
}

/// End-of-session beacon, matched by sessionId
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub session_id: String,
    #[serde(default)]
    pub session_duration: Option<f64>,
    #[serde(default)]
    pub scroll_depth: Option<f64>,
    #[serde(default)]
    pub mouse_movements: Option<i64>,
    #[serde(default)]
    pub clicks: Option<i64>,
    #[serde(default)]
    pub touches: Option<i64>,
    #[serde(default)]
    pub key_presses: Option<i64>,
}

impl SessionPatch {
    /// Targeted `$set` for the Mongo backend
    pub fn to_update(&self) -> Document {
        let mut set = Document::new();
        if let Some(d) = self.session_duration {
            set.insert("sessionDuration", d);
        }
        if let Some(d) = self.scroll_depth {
            set.insert("scrollDepth", d);
        }
        if let Some(n) = self.mouse_movements {
            set.insert("extra.mouseMovements", n);
        }
        if let Some(n) = self.clicks {
            set.insert("extra.clicks", n);
        }
        if let Some(n) = self.touches {
            set.insert("extra.touches", n);
        }
        if let Some(n) = self.key_presses {
            set.insert("extra.keyPresses", n);
        }
        doc! { "$set": set }
    }

    /// In-place mutation for the memory backend
    pub fn apply_to(&self, visitor: &mut VisitorDoc) {
        if self.session_duration.is_some() {
            visitor.session_duration = self.session_duration;
        }
        if self.scroll_depth.is_some() {
            visitor.scroll_depth = self.scroll_depth;
        }

        let counters = [
            ("mouseMovements", self.mouse_movements),
            ("clicks", self.clicks),
            ("touches", self.touches),
            ("keyPresses", self.key_presses),
        ];
        if counters.iter().any(|(_, v)| v.is_some()) {
            if !visitor.extra.is_object() {
                visitor.extra = JsonValue::Object(Map::new());
            }
            if let Some(obj) = visitor.extra.as_object_mut() {
                for (key, value) in counters {
                    if let Some(n) = value {
                        obj.insert(key.to_string(), JsonValue::from(n));
                    }
                }
            }
        }
    }
}

impl IntoIndexes for VisitorDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (doc! { "sessionId": 1 }, None),
            (doc! { "visitTime": -1 }, None),
        ]
    }
}

impl MutMetadata for VisitorDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_extracts_core_fields() {
        let payload = json!({
            "page": "/projects",
            "browser": "Firefox",
            "deviceType": "desktop",
            "sessionId": "s-123",
            "ip": "8.8.8.8"
        });
        let doc = VisitorDoc::from_payload(&payload, Some("10.1.2.3".to_string()));

        assert_eq!(doc.page.as_deref(), Some("/projects"));
        assert_eq!(doc.browser.as_deref(), Some("Firefox"));
        assert_eq!(doc.session_id.as_deref(), Some("s-123"));
        // Connection IP wins over any payload value
        assert_eq!(doc.ip.as_deref(), Some("10.1.2.3"));
        assert!(!doc.visit_time.is_empty());
    }

    #[test]
    fn test_sanitizer_drops_junk_and_stringifies_objects() {
        let payload = json!({
            "page": "/",
            "emptyString": "",
            "nullField": null,
            "plugins": ["pdf", "flash"],
            "mixedArray": ["ok", {"bad": true}],
            "nested": {"a": 1},
            "cpuCores": 8
        });
        let doc = VisitorDoc::from_payload(&payload, None);
        let extra = doc.extra.as_object().unwrap();

        assert!(extra.get("emptyString").is_none());
        assert!(extra.get("nullField").is_none());
        assert!(extra.get("mixedArray").is_none());
        assert_eq!(extra["plugins"], json!(["pdf", "flash"]));
        assert_eq!(extra["cpuCores"], json!(8));
        assert_eq!(extra["nested"], json!("{\"a\":1}"));
    }

    #[test]
    fn test_empty_extra_serializes_null() {
        let doc = VisitorDoc::from_payload(&json!({"page": "/"}), None);
        assert!(doc.extra.is_null());
    }

    #[test]
    fn test_session_patch_applies_in_memory() {
        let mut doc = VisitorDoc::from_payload(&json!({"sessionId": "s-1"}), None);
        let patch: SessionPatch = serde_json::from_value(json!({
            "sessionId": "s-1",
            "sessionDuration": 42.5,
            "clicks": 7
        }))
        .unwrap();

        patch.apply_to(&mut doc);
        assert_eq!(doc.session_duration, Some(42.5));
        assert_eq!(doc.extra["clicks"], json!(7));
        assert!(doc.scroll_depth.is_none());
    }

    #[test]
    fn test_session_patch_mongo_update_paths() {
        let patch: SessionPatch = serde_json::from_value(json!({
            "sessionId": "s-1",
            "scrollDepth": 80,
            "keyPresses": 3
        }))
        .unwrap();

        let update = patch.to_update();
        let set = update.get_document("$set").unwrap();
        assert!(set.contains_key("scrollDepth"));
        assert!(set.contains_key("extra.keyPresses"));
        assert!(!set.contains_key("sessionDuration"));
    }
}
