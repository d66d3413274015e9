//! Intake collections: contact messages, applications, project
//! submissions and testimonial submissions
//!
//! Public POSTs land here and never broadcast. The dashboard reads the
//! lists, deletes entries, and approves testimonial submissions into the
//! aggregate's curated `testimonials` section.

use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::content::collection::DualCollection;
use crate::db::mongo::MongoClient;
use crate::db::schemas::{
    ApplicationDoc, ApplicationInput, MessageDoc, MessageInput, ProjectSubmissionDoc,
    ProjectSubmissionInput, TestimonialSubmissionDoc, TestimonialSubmissionInput,
    APPLICATION_COLLECTION, MESSAGE_COLLECTION, PROJECT_SUBMISSION_COLLECTION,
    TESTIMONIAL_SUBMISSION_COLLECTION,
};
use crate::types::RoostError;

pub struct IntakeStore {
    messages: DualCollection<MessageDoc>,
    applications: DualCollection<ApplicationDoc>,
    project_submissions: DualCollection<ProjectSubmissionDoc>,
    testimonial_submissions: DualCollection<TestimonialSubmissionDoc>,
}

impl IntakeStore {
    pub async fn with_mongo(client: &MongoClient) -> Result<Self, RoostError> {
        Ok(Self {
            messages: DualCollection::with_mongo(client.collection(MESSAGE_COLLECTION).await?),
            applications: DualCollection::with_mongo(
                client.collection(APPLICATION_COLLECTION).await?,
            ),
            project_submissions: DualCollection::with_mongo(
                client.collection(PROJECT_SUBMISSION_COLLECTION).await?,
            ),
            testimonial_submissions: DualCollection::with_mongo(
                client.collection(TESTIMONIAL_SUBMISSION_COLLECTION).await?,
            ),
        })
    }

    pub fn memory_only() -> Self {
        Self {
            messages: DualCollection::memory_only(),
            applications: DualCollection::memory_only(),
            project_submissions: DualCollection::memory_only(),
            testimonial_submissions: DualCollection::memory_only(),
        }
    }

    // --- contact messages ---

    pub async fn add_message(&self, input: MessageInput) -> Result<MessageDoc, RoostError> {
        input.validate().map_err(RoostError::Validation)?;
        let doc = input.into_doc();
        self.messages.insert(doc.clone()).await?;
        Ok(doc)
    }

    pub async fn list_messages(&self) -> Result<Vec<MessageDoc>, RoostError> {
        self.messages.newest_first(None).await
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), RoostError> {
        if !self.messages.remove(id).await? {
            return Err(RoostError::NotFound(format!("message {}", id)));
        }
        Ok(())
    }

    pub async fn messages_json(&self) -> Result<JsonValue, RoostError> {
        Ok(serde_json::to_value(self.list_messages().await?)?)
    }

    // --- join applications ---

    pub async fn add_application(
        &self,
        input: ApplicationInput,
    ) -> Result<ApplicationDoc, RoostError> {
        input.validate().map_err(RoostError::Validation)?;
        let doc = input.into_doc();
        self.applications.insert(doc.clone()).await?;
        Ok(doc)
    }

    pub async fn list_applications(&self) -> Result<Vec<ApplicationDoc>, RoostError> {
        self.applications.newest_first(None).await
    }

    pub async fn delete_application(&self, id: &str) -> Result<(), RoostError> {
        if !self.applications.remove(id).await? {
            return Err(RoostError::NotFound(format!("application {}", id)));
        }
        Ok(())
    }

    pub async fn applications_json(&self) -> Result<JsonValue, RoostError> {
        Ok(serde_json::to_value(self.list_applications().await?)?)
    }

    // --- community project submissions ---

    pub async fn add_project_submission(
        &self,
        input: ProjectSubmissionInput,
    ) -> Result<ProjectSubmissionDoc, RoostError> {
        input.validate().map_err(RoostError::Validation)?;
        let doc = input.into_doc();
        self.project_submissions.insert(doc.clone()).await?;
        Ok(doc)
    }

    pub async fn list_project_submissions(
        &self,
    ) -> Result<Vec<ProjectSubmissionDoc>, RoostError> {
        self.project_submissions.newest_first(None).await
    }

    pub async fn delete_project_submission(&self, id: &str) -> Result<(), RoostError> {
        if !self.project_submissions.remove(id).await? {
            return Err(RoostError::NotFound(format!("project submission {}", id)));
        }
        Ok(())
    }

    pub async fn project_submissions_json(&self) -> Result<JsonValue, RoostError> {
        Ok(serde_json::to_value(self.list_project_submissions().await?)?)
    }

    // --- testimonial submissions ---

    pub async fn add_testimonial_submission(
        &self,
        input: TestimonialSubmissionInput,
    ) -> Result<TestimonialSubmissionDoc, RoostError> {
        input.validate().map_err(RoostError::Validation)?;
        let doc = input.into_doc();
        self.testimonial_submissions.insert(doc.clone()).await?;
        Ok(doc)
    }

    pub async fn list_testimonial_submissions(
        &self,
    ) -> Result<Vec<TestimonialSubmissionDoc>, RoostError> {
        self.testimonial_submissions.newest_first(None).await
    }

    /// Pending (unapproved) submissions for the dashboard moderation queue
    pub async fn pending_testimonials_json(&self) -> Result<JsonValue, RoostError> {
        let pending: Vec<_> = self
            .list_testimonial_submissions()
            .await?
            .into_iter()
            .filter(|s| !s.approved)
            .collect();
        Ok(serde_json::to_value(pending)?)
    }

    /// Mark a submission approved and return it together with the curated
    /// entry to append to the aggregate's `testimonials` section
    pub async fn approve_testimonial(
        &self,
        id: &str,
    ) -> Result<(TestimonialSubmissionDoc, JsonValue), RoostError> {
        let submission = self
            .testimonial_submissions
            .update_with(id, |s| s.approved = true)
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("testimonial submission {}", id)))?;

        let role = match &submission.company {
            Some(company) if !company.trim().is_empty() => {
                format!("{}, {}", submission.role, company)
            }
            _ => submission.role.clone(),
        };
        let entry = json!({
            "id": Uuid::new_v4().to_string(),
            "name": submission.name,
            "role": role,
            "image": format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                submission.name.replace(' ', "")
            ),
            "rating": submission.rating,
            "text": submission.testimonial,
        });

        Ok((submission, entry))
    }

    pub async fn delete_testimonial_submission(&self, id: &str) -> Result<(), RoostError> {
        if !self.testimonial_submissions.remove(id).await? {
            return Err(RoostError::NotFound(format!(
                "testimonial submission {}",
                id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn testimonial(name: &str, company: Option<&str>) -> TestimonialSubmissionInput {
        serde_json::from_value(json!({
            "name": name,
            "email": format!("{}@example.com", name),
            "role": "Player",
            "company": company,
            "rating": 5,
            "testimonial": "Loved it"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_message_intake_round_trip() {
        let store = IntakeStore::memory_only();
        let input: MessageInput = serde_json::from_value(json!({
            "name": "Lina",
            "email": "lina@example.com",
            "message": "hello"
        }))
        .unwrap();

        let doc = store.add_message(input).await.unwrap();
        assert_eq!(store.list_messages().await.unwrap().len(), 1);

        store.delete_message(&doc.id).await.unwrap();
        assert!(store.list_messages().await.unwrap().is_empty());
        assert!(store.delete_message(&doc.id).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_intake_rejected() {
        let store = IntakeStore::memory_only();
        let input: MessageInput = serde_json::from_value(json!({
            "name": "",
            "email": "lina@example.com",
            "message": "hello"
        }))
        .unwrap();
        assert!(matches!(
            store.add_message(input).await.unwrap_err(),
            RoostError::Validation(_)
        ));
        assert!(store.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_testimonial_builds_entry() {
        let store = IntakeStore::memory_only();
        let doc = store
            .add_testimonial_submission(testimonial("Emma", Some("Indie Hub")))
            .await
            .unwrap();
        assert!(!doc.approved);

        let (approved, entry) = store.approve_testimonial(&doc.id).await.unwrap();
        assert!(approved.approved);
        assert_eq!(entry["name"], "Emma");
        assert_eq!(entry["role"], "Player, Indie Hub");
        assert_eq!(entry["rating"], 5);
        assert!(entry["id"].is_string());
    }

    #[tokio::test]
    async fn test_approve_without_company_keeps_plain_role() {
        let store = IntakeStore::memory_only();
        let doc = store
            .add_testimonial_submission(testimonial("Sam", None))
            .await
            .unwrap();
        let (_, entry) = store.approve_testimonial(&doc.id).await.unwrap();
        assert_eq!(entry["role"], "Player");
    }

    #[tokio::test]
    async fn test_pending_excludes_approved() {
        let store = IntakeStore::memory_only();
        let a = store
            .add_testimonial_submission(testimonial("a", None))
            .await
            .unwrap();
        store
            .add_testimonial_submission(testimonial("b", None))
            .await
            .unwrap();

        store.approve_testimonial(&a.id).await.unwrap();
        let pending = store.pending_testimonials_json().await.unwrap();
        assert_eq!(pending.as_array().unwrap().len(), 1);
        assert_eq!(pending[0]["name"], "b");
    }

    #[tokio::test]
    async fn test_approve_unknown_id() {
        let store = IntakeStore::memory_only();
        assert!(matches!(
            store.approve_testimonial("missing").await.unwrap_err(),
            RoostError::NotFound(_)
        ));
    }
}
