//! Project collection schema
//!
//! Projects carry a denormalized `ratings` summary that is recomputed on
//! every rating submission. Invariants: `count == sum(breakdown)` and
//! `average == total / count` whenever `count > 0`.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

pub const PROJECT_COLLECTION: &str = "projects";

/// A published game project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDoc {
    /// Stable project id used in routes and broadcasts
    pub id: String,

    pub title: String,

    /// Project category, e.g. "2D", "3D", "VR"
    #[serde(rename = "type")]
    pub project_type: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub technologies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default)]
    pub platforms: Vec<String>,

    #[serde(default)]
    pub gallery: Vec<String>,

    #[serde(default)]
    pub media_gallery: Vec<MediaItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,

    /// Denormalized rating summary, grows with submissions
    #[serde(default)]
    pub ratings: RatingsSummary,

    /// Standard metadata (soft delete, timestamps)
    #[serde(default)]
    pub metadata: Metadata,
}

/// Gallery entry for rich project media
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// "image" or "video"
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Client payload for creating or updating a project
///
/// The ratings summary is never client-writable; it is zeroed on create and
/// preserved on update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub media_gallery: Vec<MediaItem>,
    #[serde(default)]
    pub download_link: Option<String>,
    #[serde(default)]
    pub video_link: Option<String>,
}

impl ProjectInput {
    /// Build a fresh project with a zeroed ratings summary
    pub fn into_doc(self) -> ProjectDoc {
        ProjectDoc {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            project_type: self.project_type,
            tags: self.tags,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            cover_url: self.cover_url,
            features: self.features,
            technologies: self.technologies,
            release_date: self.release_date,
            platforms: self.platforms,
            gallery: self.gallery,
            media_gallery: self.media_gallery,
            download_link: self.download_link,
            video_link: self.video_link,
            ratings: RatingsSummary::default(),
            metadata: Metadata::new(),
        }
    }

    /// Overwrite an existing project's content, keeping id and ratings
    pub fn apply_to(self, existing: &mut ProjectDoc) {
        existing.title = self.title;
        existing.project_type = self.project_type;
        existing.tags = self.tags;
        existing.description = self.description;
        existing.thumbnail_url = self.thumbnail_url;
        existing.cover_url = self.cover_url;
        existing.features = self.features;
        existing.technologies = self.technologies;
        existing.release_date = self.release_date;
        existing.platforms = self.platforms;
        existing.gallery = self.gallery;
        existing.media_gallery = self.media_gallery;
        existing.download_link = self.download_link;
        existing.video_link = self.video_link;
        existing.metadata.touch();
    }
}

/// Denormalized rating aggregate stored on each project
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingsSummary {
    /// Sum of all submitted star values
    #[serde(default)]
    pub total: i64,
    /// Number of submitted ratings
    #[serde(default)]
    pub count: i64,
    /// total / count, 0.0 when count == 0
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub breakdown: RatingBreakdown,
}

/// Star-value histogram, keyed "1" through "5" on the wire
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RatingBreakdown {
    #[serde(rename = "1", default)]
    pub one: i64,
    #[serde(rename = "2", default)]
    pub two: i64,
    #[serde(rename = "3", default)]
    pub three: i64,
    #[serde(rename = "4", default)]
    pub four: i64,
    #[serde(rename = "5", default)]
    pub five: i64,
}

impl RatingBreakdown {
    fn slot(&mut self, stars: u8) -> Option<&mut i64> {
        match stars {
            1 => Some(&mut self.one),
            2 => Some(&mut self.two),
            3 => Some(&mut self.three),
            4 => Some(&mut self.four),
            5 => Some(&mut self.five),
            _ => None,
        }
    }

    /// Total number of ratings across all star values
    pub fn sum(&self) -> i64 {
        self.one + self.two + self.three + self.four + self.five
    }

    /// Sum of star values weighted by their counts
    pub fn weighted_sum(&self) -> i64 {
        self.one + 2 * self.two + 3 * self.three + 4 * self.four + 5 * self.five
    }
}

impl RatingsSummary {
    /// Fold one new rating into the summary
    pub fn apply(&mut self, stars: u8) {
        if let Some(slot) = self.breakdown.slot(stars) {
            *slot += 1;
            self.total += stars as i64;
            self.count += 1;
            self.average = self.total as f64 / self.count as f64;
        }
    }

    /// Remove one previously counted rating, clamping at zero
    pub fn revert(&mut self, stars: u8) {
        if let Some(slot) = self.breakdown.slot(stars) {
            if *slot > 0 {
                *slot -= 1;
            }
            self.total = (self.total - stars as i64).max(0);
            self.count = (self.count - 1).max(0);
            self.average = if self.count > 0 {
                self.total as f64 / self.count as f64
            } else {
                0.0
            };
        }
    }
}

impl IntoIndexes for ProjectDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

impl MutMetadata for ProjectDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_invariants() {
        let mut summary = RatingsSummary::default();
        for stars in [5u8, 3, 4, 4, 1] {
            summary.apply(stars);
            assert_eq!(summary.count, summary.breakdown.sum());
            assert_eq!(summary.total, summary.breakdown.weighted_sum());
            let expected = summary.breakdown.weighted_sum() as f64 / summary.count as f64;
            assert!((summary.average - expected).abs() < 1e-9);
            assert!(summary.average >= 1.0 && summary.average <= 5.0);
        }
        assert_eq!(summary.count, 5);
        assert_eq!(summary.total, 17);
    }

    #[test]
    fn test_revert_clamps_at_zero() {
        let mut summary = RatingsSummary::default();
        summary.apply(4);
        summary.revert(4);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0.0);

        // Reverting below zero must not underflow
        summary.revert(4);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.breakdown.four, 0);
    }

    #[test]
    fn test_out_of_range_stars_ignored() {
        let mut summary = RatingsSummary::default();
        summary.apply(0);
        summary.apply(6);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_breakdown_wire_keys() {
        let summary = RatingsSummary::default();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["breakdown"].get("1").is_some());
        assert!(json["breakdown"].get("5").is_some());
    }

    #[test]
    fn test_input_zeroes_ratings() {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "title": "Starfall",
            "type": "3D",
            "ratings": { "count": 99 }
        }))
        .unwrap();

        let doc = input.into_doc();
        assert_eq!(doc.ratings.count, 0);
        assert!(!doc.id.is_empty());
    }

    #[test]
    fn test_input_requires_title_and_type() {
        let missing_type = serde_json::json!({ "title": "Starfall" });
        assert!(serde_json::from_value::<ProjectInput>(missing_type).is_err());
    }
}
