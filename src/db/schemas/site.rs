//! Site content aggregate document
//!
//! The whole site configuration lives in a single document. Sections are
//! stored as one nested JSON tree and addressed per sub-path by the
//! section store, which re-reads before every write.

use bson::Document;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

pub const SITE_COLLECTION: &str = "site_content";

/// Singleton aggregate holding all non-collection site content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDocument {
    /// All site sections as one nested document
    pub sections: JsonValue,

    /// Standard metadata (soft delete, timestamps)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Default for SiteDocument {
    fn default() -> Self {
        Self {
            sections: JsonValue::Null,
            metadata: Metadata::default(),
        }
    }
}

impl SiteDocument {
    pub fn new(sections: JsonValue) -> Self {
        Self {
            sections,
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for SiteDocument {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Singleton document, nothing to index
        Vec::new()
    }
}

impl MutMetadata for SiteDocument {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_round_trip() {
        let doc = SiteDocument::new(serde_json::json!({
            "home": { "hero": { "title": "TechNest" } }
        }));

        let json = serde_json::to_string(&doc).unwrap();
        let back: SiteDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sections["home"]["hero"]["title"], "TechNest");
    }
}
