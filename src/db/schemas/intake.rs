//! Visitor-submitted intake records
//!
//! Contact messages, join applications, project submissions and testimonial
//! submissions. These are write-heavy public endpoints, so each input struct
//! validates before anything is stored. Intake never broadcasts; only the
//! dashboard management routes do.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::types::now_iso;

pub const MESSAGE_COLLECTION: &str = "messages";
pub const APPLICATION_COLLECTION: &str = "applications";
pub const PROJECT_SUBMISSION_COLLECTION: &str = "project_submissions";
pub const TESTIMONIAL_SUBMISSION_COLLECTION: &str = "testimonial_submissions";

fn valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.contains('@')
}

/// Contact form message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl MessageInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !valid_email(&self.email) {
            return Err("a valid email is required".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("message is required".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self) -> MessageDoc {
        MessageDoc {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: self.email,
            message: self.message,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for MessageDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

impl MutMetadata for MessageDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Join-the-team application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Position title the applicant is applying for
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub name: String,
    pub email: String,
    pub position: String,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApplicationInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !valid_email(&self.email) {
            return Err("a valid email is required".to_string());
        }
        if self.position.trim().is_empty() {
            return Err("position is required".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self) -> ApplicationDoc {
        ApplicationDoc {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: self.email,
            position: self.position,
            portfolio: self.portfolio,
            message: self.message,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for ApplicationDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

impl MutMetadata for ApplicationDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Community project pitch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmissionDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmissionInput {
    pub name: String,
    pub email: String,
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ProjectSubmissionInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !valid_email(&self.email) {
            return Err("a valid email is required".to_string());
        }
        if self.project_name.trim().is_empty() {
            return Err("projectName is required".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self) -> ProjectSubmissionDoc {
        ProjectSubmissionDoc {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: self.email,
            project_name: self.project_name,
            description: self.description,
            links: self.links,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for ProjectSubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

impl MutMetadata for ProjectSubmissionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Visitor testimonial awaiting moderation
///
/// Submissions land unapproved; approval copies the entry into the site
/// aggregate's `testimonials` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSubmissionDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub rating: u8,
    pub testimonial: String,
    #[serde(default)]
    pub approved: bool,
    pub date: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSubmissionInput {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
    pub rating: u8,
    pub testimonial: String,
}

impl TestimonialSubmissionInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !valid_email(&self.email) {
            return Err("a valid email is required".to_string());
        }
        if self.role.trim().is_empty() {
            return Err("role is required".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        if self.testimonial.trim().is_empty() {
            return Err("testimonial is required".to_string());
        }
        Ok(())
    }

    pub fn into_doc(self) -> TestimonialSubmissionDoc {
        TestimonialSubmissionDoc {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: self.email,
            role: self.role,
            company: self.company,
            rating: self.rating,
            testimonial: self.testimonial,
            approved: false,
            date: now_iso(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for TestimonialSubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "id": 1 },
                Some(IndexOptions::builder().unique(true).build()),
            ),
            (doc! { "approved": 1 }, None),
        ]
    }
}

impl MutMetadata for TestimonialSubmissionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
