//! Project collection store and rating submission
//!
//! Ratings are stored per user and folded into the owning project's
//! denormalized summary. One rating per (project, email): the store scans
//! before writing and the Mongo unique index backs it up. The recompute is
//! two sequential store operations with an accepted lost-update window
//! under concurrent raters of the same project.

use bson::doc;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::content::collection::DualCollection;
use crate::db::mongo::MongoClient;
use crate::db::schemas::{
    ProjectDoc, ProjectInput, RatingDoc, RatingInput, RatingsSummary, PROJECT_COLLECTION,
    RATING_COLLECTION,
};
use crate::site::defaults::default_projects;
use crate::types::RoostError;

pub struct ProjectStore {
    projects: DualCollection<ProjectDoc>,
    ratings: DualCollection<RatingDoc>,
}

impl ProjectStore {
    pub async fn with_mongo(client: &MongoClient) -> Result<Self, RoostError> {
        Ok(Self {
            projects: DualCollection::with_mongo(client.collection(PROJECT_COLLECTION).await?),
            ratings: DualCollection::with_mongo(client.collection(RATING_COLLECTION).await?),
        })
    }

    pub fn memory_only() -> Self {
        Self {
            projects: DualCollection::memory_only(),
            ratings: DualCollection::memory_only(),
        }
    }

    /// Seed the showcase projects when the collection is empty
    pub async fn bootstrap(&self) -> Result<bool, RoostError> {
        if self.projects.count().await? > 0 {
            return Ok(false);
        }
        for project in default_projects() {
            self.projects.insert(project).await?;
        }
        info!("Seeded default projects");
        Ok(true)
    }

    pub async fn list(&self) -> Result<Vec<ProjectDoc>, RoostError> {
        self.projects.all().await
    }

    /// Full project list as the JSON broadcast under the "projects" key
    pub async fn list_json(&self) -> Result<JsonValue, RoostError> {
        Ok(serde_json::to_value(self.list().await?)?)
    }

    pub async fn get(&self, id: &str) -> Result<ProjectDoc, RoostError> {
        self.projects
            .find(id)
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("project {}", id)))
    }

    pub async fn create(&self, input: ProjectInput) -> Result<ProjectDoc, RoostError> {
        let project = input.into_doc();
        self.projects.insert(project.clone()).await?;
        Ok(project)
    }

    /// Replace a project's content; the ratings summary is server-owned
    /// and survives the update untouched
    pub async fn update(&self, id: &str, input: ProjectInput) -> Result<ProjectDoc, RoostError> {
        self.projects
            .update_with(id, |project| input.apply_to(project))
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("project {}", id)))
    }

    pub async fn delete(&self, id: &str) -> Result<(), RoostError> {
        if !self.projects.remove(id).await? {
            return Err(RoostError::NotFound(format!("project {}", id)));
        }
        Ok(())
    }

    /// Submit one rating: store the row, fold it into the project summary,
    /// return the updated summary
    pub async fn rate(
        &self,
        project_id: &str,
        input: RatingInput,
        user_ip: Option<String>,
    ) -> Result<RatingsSummary, RoostError> {
        input.validate().map_err(RoostError::Validation)?;

        // Existence check before anything is written
        self.get(project_id).await?;

        let email = input.user_email.trim().to_lowercase();
        let duplicate = self
            .ratings
            .find_first(
                doc! { "projectId": project_id, "userEmail": &email },
                |r| r.project_id == project_id && r.user_email == email,
            )
            .await?;
        if duplicate.is_some() {
            return Err(RoostError::Validation(
                "You have already rated this project".to_string(),
            ));
        }

        let stars = input.rating;
        let mut rating = input.into_doc(project_id, user_ip);
        rating.user_email = email;
        self.ratings.insert(rating).await?;

        let updated = self
            .projects
            .update_with(project_id, |project| project.ratings.apply(stars))
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("project {}", project_id)))?;

        Ok(updated.ratings)
    }

    /// Summary plus the individual entries, newest first, for the dashboard
    pub async fn ratings_for(
        &self,
        project_id: &str,
    ) -> Result<(RatingsSummary, Vec<RatingDoc>), RoostError> {
        let project = self.get(project_id).await?;
        let mut entries = self
            .ratings
            .find_where(doc! { "projectId": project_id }, |r| {
                r.project_id == project_id
            })
            .await?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok((project.ratings, entries))
    }

    /// Admin removal of one rating; reverses the arithmetic on the owning
    /// project, clamped at zero
    pub async fn delete_rating(&self, rating_id: &str) -> Result<(), RoostError> {
        let rating = self
            .ratings
            .find(rating_id)
            .await?
            .ok_or_else(|| RoostError::NotFound(format!("rating {}", rating_id)))?;

        self.ratings.remove(rating_id).await?;
        self.projects
            .update_with(&rating.project_id, |project| {
                project.ratings.revert(rating.rating)
            })
            .await?;
        Ok(())
    }
}
