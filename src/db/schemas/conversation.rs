//! Chatbot conversation log
//!
//! Every exchange is recorded best-effort so the dashboard can review
//! answers, rate them and export the useful ones as training data. Logging
//! failures never surface to the chat user.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::types::now_iso;

pub const CONVERSATION_COLLECTION: &str = "chatbot_conversations";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDoc {
    pub id: String,
    pub user_message: String,
    pub bot_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Knowledge-base category that produced the answer, absent on fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_category: Option<String>,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Reviewer rating, 1 through 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
    #[serde(default)]
    pub is_useful_for_training: bool,
    #[serde(default)]
    pub flagged_for_review: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ConversationDoc {
    pub fn new(
        user_message: String,
        bot_response: String,
        session_id: Option<String>,
        matched_category: Option<String>,
        response_time_ms: u64,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_message,
            bot_response,
            session_id,
            matched_category,
            response_time_ms,
            ip_address,
            rating: None,
            user_feedback: None,
            is_useful_for_training: false,
            flagged_for_review: false,
            review_notes: None,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

/// Dashboard review update; only present fields change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub user_feedback: Option<String>,
    #[serde(default)]
    pub is_useful_for_training: Option<bool>,
    #[serde(default)]
    pub flagged_for_review: Option<bool>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

impl ReviewPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err("rating must be between 1 and 5".to_string());
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, conversation: &mut ConversationDoc) {
        if self.rating.is_some() {
            conversation.rating = self.rating;
        }
        if self.user_feedback.is_some() {
            conversation.user_feedback = self.user_feedback.clone();
        }
        if let Some(useful) = self.is_useful_for_training {
            conversation.is_useful_for_training = useful;
        }
        if let Some(flagged) = self.flagged_for_review {
            conversation.flagged_for_review = flagged;
        }
        if self.review_notes.is_some() {
            conversation.review_notes = self.review_notes.clone();
        }
        conversation.metadata.touch();
    }

    pub fn to_update(&self) -> Document {
        let mut set = Document::new();
        if let Some(rating) = self.rating {
            set.insert("rating", rating as i32);
        }
        if let Some(feedback) = &self.user_feedback {
            set.insert("userFeedback", feedback);
        }
        if let Some(useful) = self.is_useful_for_training {
            set.insert("isUsefulForTraining", useful);
        }
        if let Some(flagged) = self.flagged_for_review {
            set.insert("flaggedForReview", flagged);
        }
        if let Some(notes) = &self.review_notes {
            set.insert("reviewNotes", notes);
        }
        set.insert("metadata.updated_at", bson::DateTime::now());
        doc! { "$set": set }
    }
}

impl IntoIndexes for ConversationDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "id": 1 },
                Some(IndexOptions::builder().unique(true).build()),
            ),
            (doc! { "date": -1 }, None),
            (doc! { "sessionId": 1 }, None),
        ]
    }
}

impl MutMetadata for ConversationDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_conversation_defaults() {
        let convo = ConversationDoc::new(
            "what games do you make".to_string(),
            "We build 2D and 3D titles.".to_string(),
            Some("s-9".to_string()),
            Some("projects".to_string()),
            12,
            None,
        );
        assert!(!convo.is_useful_for_training);
        assert!(!convo.flagged_for_review);
        assert!(convo.rating.is_none());
        assert!(!convo.date.is_empty());
    }

    #[test]
    fn test_review_patch_partial_update() {
        let mut convo = ConversationDoc::new(
            "hi".to_string(),
            "hello".to_string(),
            None,
            None,
            5,
            None,
        );
        let patch: ReviewPatch = serde_json::from_value(json!({
            "rating": 4,
            "flaggedForReview": true
        }))
        .unwrap();
        assert!(patch.validate().is_ok());

        patch.apply_to(&mut convo);
        assert_eq!(convo.rating, Some(4));
        assert!(convo.flagged_for_review);
        assert!(!convo.is_useful_for_training);
        assert!(convo.user_feedback.is_none());
    }

    #[test]
    fn test_review_patch_rejects_bad_rating() {
        let patch: ReviewPatch = serde_json::from_value(json!({ "rating": 9 })).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_to_update_only_sets_present_fields() {
        let patch: ReviewPatch =
            serde_json::from_value(json!({ "isUsefulForTraining": true })).unwrap();
        let update = patch.to_update();
        let set = update.get_document("$set").unwrap();
        assert!(set.contains_key("isUsefulForTraining"));
        assert!(!set.contains_key("rating"));
        assert!(!set.contains_key("reviewNotes"));
    }
}
