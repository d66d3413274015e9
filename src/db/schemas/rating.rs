//! Per-user rating records
//!
//! Each rating is stored individually so the per-project summary can be
//! audited or recomputed. One rating per (project, email) pair, enforced
//! both in the store and by a unique compound index.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::types::now_iso;

pub const RATING_COLLECTION: &str = "ratings";

fn default_approved() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDoc {
    pub id: String,
    pub project_id: String,
    pub user_name: String,
    pub user_email: String,
    /// Star value, 1 through 5
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<String>,
    #[serde(default = "default_approved")]
    pub approved: bool,
    /// ISO-8601 submission time
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Client payload for POST /api/projects/{id}/rate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub user_name: String,
    pub user_email: String,
    pub rating: u8,
}

impl RatingInput {
    /// Star values outside 1..=5 are rejected before any write
    pub fn validate(&self) -> Result<(), String> {
        if self.user_name.trim().is_empty() {
            return Err("userName is required".to_string());
        }
        if self.user_email.trim().is_empty() || !self.user_email.contains('@') {
            return Err("a valid userEmail is required".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self, project_id: &str, user_ip: Option<String>) -> RatingDoc {
        RatingDoc {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            user_name: self.user_name,
            user_email: self.user_email,
            rating: self.rating,
            user_ip,
            approved: true,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for RatingDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One live rating per reviewer per project; soft-deleted rows
            // leave the index so the reviewer can rate again
            (
                doc! { "projectId": 1, "userEmail": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "metadata.is_deleted": false })
                        .build(),
                ),
            ),
            (doc! { "projectId": 1 }, None),
        ]
    }
}

impl MutMetadata for RatingDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut input = RatingInput {
            user_name: "Rana".to_string(),
            user_email: "rana@example.com".to_string(),
            rating: 6,
        };
        assert!(input.validate().is_err());
        input.rating = 0;
        assert!(input.validate().is_err());
        input.rating = 5;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let input = RatingInput {
            user_name: "Rana".to_string(),
            user_email: "not-an-email".to_string(),
            rating: 4,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unique_index_skips_soft_deleted_rows() {
        let indices = RatingDoc::into_indices();
        let (keys, options) = &indices[0];
        assert_eq!(keys, &doc! { "projectId": 1, "userEmail": 1 });
        let options = options.as_ref().unwrap();
        assert_eq!(options.unique, Some(true));
        assert_eq!(
            options.partial_filter_expression,
            Some(doc! { "metadata.is_deleted": false })
        );
    }

    #[test]
    fn test_into_doc_defaults_approved() {
        let input = RatingInput {
            user_name: "Rana".to_string(),
            user_email: "rana@example.com".to_string(),
            rating: 4,
        };
        let doc = input.into_doc("p-1", Some("10.0.0.1".to_string()));
        assert!(doc.approved);
        assert_eq!(doc.project_id, "p-1");
        assert!(!doc.date.is_empty());
    }
}
