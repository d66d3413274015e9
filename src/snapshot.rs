//! Aggregate snapshot for `GET /api/data`
//!
//! Spreads the site document's sections at the top level and attaches the
//! collection-backed lists. Reads are sequential; there is no snapshot
//! isolation across them.

use serde_json::{Map, Value as JsonValue};

use crate::content::{IntakeStore, ProjectStore};
use crate::site::store::SiteStore;
use crate::types::RoostError;

pub async fn assemble(
    site: &SiteStore,
    projects: &ProjectStore,
    intake: &IntakeStore,
) -> Result<JsonValue, RoostError> {
    let mut root = match site.sections().await? {
        JsonValue::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("sections".to_string(), other);
            map
        }
    };

    root.insert("projects".to_string(), projects.list_json().await?);
    root.insert("messages".to_string(), intake.messages_json().await?);
    root.insert("applications".to_string(), intake.applications_json().await?);
    root.insert(
        "projectSubmissions".to_string(),
        intake.project_submissions_json().await?,
    );
    root.insert(
        "testimonialSubmissions".to_string(),
        intake.pending_testimonials_json().await?,
    );

    Ok(JsonValue::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_snapshot_spreads_sections_and_lists() {
        let site = SiteStore::memory_only();
        site.bootstrap().await.unwrap();
        let projects = ProjectStore::memory_only();
        projects.bootstrap().await.unwrap();
        let intake = IntakeStore::memory_only();

        let snapshot = assemble(&site, &projects, &intake).await.unwrap();

        assert!(snapshot["home"]["hero"].is_object());
        assert!(snapshot.get("about").is_some());
        assert!(snapshot["projects"].as_array().is_some());
        assert!(!snapshot["projects"].as_array().unwrap().is_empty());
        assert_eq!(snapshot["messages"], json!([]));
        assert_eq!(snapshot["testimonialSubmissions"], json!([]));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_intake() {
        let site = SiteStore::memory_only();
        site.bootstrap().await.unwrap();
        let projects = ProjectStore::memory_only();
        let intake = IntakeStore::memory_only();

        let input = serde_json::from_value(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "hello there"
        }))
        .unwrap();
        intake.add_message(input).await.unwrap();

        let snapshot = assemble(&site, &projects, &intake).await.unwrap();
        assert_eq!(snapshot["messages"].as_array().unwrap().len(), 1);
        assert_eq!(snapshot["messages"][0]["name"], "Ada");
    }
}
