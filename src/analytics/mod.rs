//! Visitor analytics sink
//!
//! Append-only page-view records plus the single end-of-session patch.
//! Tracking is fire-and-forget from the client; the store's caller
//! swallows failures so the beacon endpoint never fails a visitor.

use chrono::{Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::content::collection::DualCollection;
use crate::db::mongo::MongoClient;
use crate::db::schemas::{SessionPatch, VisitorDoc, VISITOR_COLLECTION};
use crate::types::RoostError;

/// Aggregate counts for the dashboard analytics page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    pub total_visitors: u64,
    pub unique_visitors: usize,
    pub top_countries: Vec<BucketCount>,
    pub device_breakdown: Vec<BucketCount>,
    pub browser_breakdown: Vec<BucketCount>,
    pub top_pages: Vec<BucketCount>,
}

/// One grouped count, `_id` matching the grouped field value
#[derive(Debug, Serialize, PartialEq)]
pub struct BucketCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

/// Live counters shown on the dashboard header
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    /// Visitors seen in the last five minutes
    pub current_visitors: u64,
    pub total_today: u64,
    pub total_visitors: u64,
}

pub struct VisitorStore {
    visitors: DualCollection<VisitorDoc>,
}

impl VisitorStore {
    pub async fn with_mongo(client: &MongoClient) -> Result<Self, RoostError> {
        Ok(Self {
            visitors: DualCollection::with_mongo(client.collection(VISITOR_COLLECTION).await?),
        })
    }

    pub fn memory_only() -> Self {
        Self {
            visitors: DualCollection::memory_only(),
        }
    }

    /// Store one sanitized beacon payload
    pub async fn track(&self, payload: &JsonValue, ip: Option<String>) -> Result<(), RoostError> {
        self.visitors
            .insert(VisitorDoc::from_payload(payload, ip))
            .await
    }

    /// Apply the end-of-session patch to the first record of the session
    pub async fn update_session(&self, patch: SessionPatch) -> Result<bool, RoostError> {
        let session_id = patch.session_id.clone();
        self.visitors
            .patch_first(
                bson::doc! { "sessionId": &session_id },
                |v| v.session_id.as_deref() == Some(session_id.as_str()),
                patch.to_update(),
                |v| patch.apply_to(v),
            )
            .await
    }

    /// Newest records first, capped
    pub async fn list(&self, limit: usize) -> Result<Vec<VisitorDoc>, RoostError> {
        self.visitors.newest_first(Some(limit)).await
    }

    pub async fn stats(&self) -> Result<VisitorStats, RoostError> {
        let all = self.visitors.all().await?;

        let mut ips: Vec<&str> = all.iter().filter_map(|v| v.ip.as_deref()).collect();
        ips.sort_unstable();
        ips.dedup();

        Ok(VisitorStats {
            total_visitors: all.len() as u64,
            unique_visitors: ips.len(),
            top_countries: top_buckets(&all, |v| v.country.as_deref(), Some(10)),
            device_breakdown: top_buckets(&all, |v| v.device_type.as_deref(), None),
            browser_breakdown: top_buckets(&all, |v| v.browser.as_deref(), None),
            top_pages: top_buckets(&all, |v| v.page.as_deref(), None),
        })
    }

    pub async fn live_stats(&self) -> Result<LiveStats, RoostError> {
        let all = self.visitors.all().await?;

        let now = Utc::now();
        let five_minutes_ago = (now - Duration::minutes(5)).to_rfc3339_opts(SecondsFormat::Millis, true);
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();

        // Fixed-width ISO strings compare chronologically
        let current = all
            .iter()
            .filter(|v| v.visit_time.as_str() >= five_minutes_ago.as_str())
            .count() as u64;
        let today = all
            .iter()
            .filter(|v| v.visit_time.as_str() >= midnight.as_str())
            .count() as u64;

        Ok(LiveStats {
            current_visitors: current,
            total_today: today,
            total_visitors: all.len() as u64,
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), RoostError> {
        if !self.visitors.remove(id).await? {
            return Err(RoostError::NotFound(format!("visitor {}", id)));
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<u64, RoostError> {
        self.visitors.clear().await
    }
}

fn top_buckets(
    visitors: &[VisitorDoc],
    key: impl Fn(&VisitorDoc) -> Option<&str>,
    limit: Option<usize>,
) -> Vec<BucketCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for visitor in visitors {
        if let Some(value) = key(visitor) {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut buckets: Vec<BucketCount> = counts
        .into_iter()
        .map(|(key, count)| BucketCount {
            key: key.to_string(),
            count,
        })
        .collect();
    // Alphabetical tie-break keeps the ordering stable
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
    if let Some(limit) = limit {
        buckets.truncate(limit);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn tracked(store: &VisitorStore, page: &str, browser: &str, ip: &str) {
        store
            .track(
                &json!({ "page": page, "browser": browser, "sessionId": format!("s-{}", ip) }),
                Some(ip.to_string()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stats_counts_and_buckets() {
        let store = VisitorStore::memory_only();
        tracked(&store, "/", "Firefox", "1.1.1.1").await;
        tracked(&store, "/", "Firefox", "1.1.1.1").await;
        tracked(&store, "/projects", "Chrome", "2.2.2.2").await;

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_visitors, 3);
        assert_eq!(stats.unique_visitors, 2);
        assert_eq!(stats.top_pages[0].key, "/");
        assert_eq!(stats.top_pages[0].count, 2);
        assert_eq!(stats.browser_breakdown[0].key, "Firefox");
    }

    #[tokio::test]
    async fn test_live_stats_sees_fresh_visits() {
        let store = VisitorStore::memory_only();
        tracked(&store, "/", "Firefox", "1.1.1.1").await;

        let live = store.live_stats().await.unwrap();
        assert_eq!(live.current_visitors, 1);
        assert_eq!(live.total_today, 1);
        assert_eq!(live.total_visitors, 1);
    }

    #[tokio::test]
    async fn test_update_session_patches_matching_record() {
        let store = VisitorStore::memory_only();
        tracked(&store, "/", "Firefox", "1.1.1.1").await;

        let patch: SessionPatch = serde_json::from_value(json!({
            "sessionId": "s-1.1.1.1",
            "sessionDuration": 33.0,
            "scrollDepth": 90.0
        }))
        .unwrap();
        assert!(store.update_session(patch).await.unwrap());

        let visitors = store.list(10).await.unwrap();
        assert_eq!(visitors[0].session_duration, Some(33.0));
        assert_eq!(visitors[0].scroll_depth, Some(90.0));

        let unmatched: SessionPatch = serde_json::from_value(json!({
            "sessionId": "nope",
            "sessionDuration": 1.0
        }))
        .unwrap();
        assert!(!store.update_session(unmatched).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_cap() {
        let store = VisitorStore::memory_only();
        for i in 0..5 {
            tracked(&store, "/", "Firefox", &format!("1.1.1.{}", i)).await;
        }
        assert_eq!(store.list(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = VisitorStore::memory_only();
        tracked(&store, "/", "Firefox", "1.1.1.1").await;
        tracked(&store, "/", "Chrome", "2.2.2.2").await;

        let id = store.list(10).await.unwrap()[0].id.clone();
        store.delete(&id).await.unwrap();
        assert!(store.delete(&id).await.is_err());

        assert_eq!(store.clear().await.unwrap(), 1);
        assert!(store.list(10).await.unwrap().is_empty());
    }
}
