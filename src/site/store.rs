//! Site aggregate store
//!
//! Backed by MongoDB when available, by process memory in dev mode. All
//! mutations are read-modify-write over the whole aggregate with no
//! optimistic locking; concurrent writers race and the last write wins.
//! The memory backend applies each mutation under one write lock, and
//! rolls back if the mutation fails.

use bson::doc;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::RwLock;
use tracing::info;

use crate::db::mongo::MongoCollection;
use crate::db::schemas::SiteDocument;
use crate::site::defaults::default_sections;
use crate::site::sections::Section;
use crate::types::{now_iso, RoostError};

pub struct SiteStore {
    mongo: Option<MongoCollection<SiteDocument>>,
    memory: RwLock<JsonValue>,
}

/// Shallow-merge `patch`'s keys over `base`; non-object inputs are replaced
pub fn shallow_merge(base: &JsonValue, patch: &JsonValue) -> JsonValue {
    match (base.as_object(), patch.as_object()) {
        (Some(base), Some(patch)) => {
            let mut merged = base.clone();
            for (key, value) in patch {
                merged.insert(key.clone(), value.clone());
            }
            JsonValue::Object(merged)
        }
        _ => patch.clone(),
    }
}

impl SiteStore {
    pub fn with_mongo(collection: MongoCollection<SiteDocument>) -> Self {
        Self {
            mongo: Some(collection),
            memory: RwLock::new(JsonValue::Null),
        }
    }

    /// In-memory backend for dev mode without MongoDB
    pub fn memory_only() -> Self {
        Self {
            mongo: None,
            memory: RwLock::new(JsonValue::Null),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        if self.mongo.is_some() {
            "mongodb"
        } else {
            "memory"
        }
    }

    /// Seed default content when the store is empty. Safe to call on every
    /// start; an existing aggregate is left untouched.
    pub async fn bootstrap(&self) -> Result<bool, RoostError> {
        match &self.mongo {
            Some(collection) => {
                if collection.find_one(doc! {}).await?.is_some() {
                    return Ok(false);
                }
                collection
                    .insert_one(SiteDocument::new(default_sections()))
                    .await?;
                info!("Seeded default site content");
                Ok(true)
            }
            None => {
                let mut guard = self.memory.write().await;
                if !guard.is_null() {
                    return Ok(false);
                }
                *guard = default_sections();
                info!("Seeded default site content (memory)");
                Ok(true)
            }
        }
    }

    /// Full aggregate as stored
    pub async fn sections(&self) -> Result<JsonValue, RoostError> {
        match &self.mongo {
            Some(collection) => {
                let doc = collection.find_one(doc! {}).await?.ok_or_else(|| {
                    RoostError::Database("site content not initialized".to_string())
                })?;
                Ok(doc.sections)
            }
            None => {
                let guard = self.memory.read().await;
                if guard.is_null() {
                    return Err(RoostError::Database(
                        "site content not initialized".to_string(),
                    ));
                }
                Ok(guard.clone())
            }
        }
    }

    /// Read one top-level value ("blog", "seo", "chatbot", ...)
    pub async fn value(&self, top: &str) -> Result<JsonValue, RoostError> {
        Ok(self.sections().await?.get(top).cloned().unwrap_or(JsonValue::Null))
    }

    /// Apply a mutation to the aggregate and persist the result.
    ///
    /// The closure sees the current tree and returns the handler's result
    /// value; nothing is written when it errors.
    pub async fn modify<F, R>(&self, f: F) -> Result<R, RoostError>
    where
        F: FnOnce(&mut JsonValue) -> Result<R, RoostError>,
    {
        match &self.mongo {
            Some(collection) => {
                let doc = collection.find_one(doc! {}).await?.ok_or_else(|| {
                    RoostError::Database("site content not initialized".to_string())
                })?;
                let mut sections = doc.sections;
                let result = f(&mut sections)?;

                let bson_sections = bson::to_bson(&sections)
                    .map_err(|e| RoostError::Database(format!("Serialization error: {}", e)))?;
                collection
                    .update_one(
                        doc! {},
                        doc! { "$set": {
                            "sections": bson_sections,
                            "metadata.updated_at": bson::DateTime::now(),
                        }},
                    )
                    .await?;
                Ok(result)
            }
            None => {
                let mut guard = self.memory.write().await;
                if guard.is_null() {
                    return Err(RoostError::Database(
                        "site content not initialized".to_string(),
                    ));
                }
                let mut working = guard.clone();
                let result = f(&mut working)?;
                *guard = working;
                Ok(result)
            }
        }
    }

    /// Replace one section with an already-validated value, returning the
    /// stored value
    pub async fn replace_section(
        &self,
        section: Section,
        value: JsonValue,
    ) -> Result<JsonValue, RoostError> {
        let (top, sub) = section.segments();
        self.modify(move |sections| {
            let root = as_object(sections)?;
            match sub {
                Some(sub) => {
                    let parent = root
                        .entry(top.to_string())
                        .or_insert_with(|| JsonValue::Object(Map::new()));
                    let parent = as_object(parent)?;
                    parent.insert(sub.to_string(), value.clone());
                }
                None => {
                    root.insert(top.to_string(), value.clone());
                }
            }
            Ok(value)
        })
        .await
    }

    /// Read one section
    pub async fn section(&self, section: Section) -> Result<JsonValue, RoostError> {
        let (top, sub) = section.segments();
        let sections = self.sections().await?;
        let value = match sub {
            Some(sub) => sections.get(top).and_then(|t| t.get(sub)).cloned(),
            None => sections.get(top).cloned(),
        };
        Ok(value.unwrap_or(JsonValue::Null))
    }

    /// Replace one SEO page entry; returns (page entry, whole seo object)
    pub async fn update_seo_page(
        &self,
        page: &str,
        entry: JsonValue,
    ) -> Result<(JsonValue, JsonValue), RoostError> {
        let page = page.to_string();
        self.modify(move |sections| {
            let root = as_object(sections)?;
            let seo = root
                .entry("seo".to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            let seo_map = as_object(seo)?;
            if !seo_map.contains_key(&page) {
                return Err(RoostError::NotFound(format!("seo page {}", page)));
            }
            seo_map.insert(page.clone(), entry.clone());
            Ok((entry, seo.clone()))
        })
        .await
    }

    /// Append a blog post; returns (stored post, whole array)
    pub async fn blog_create(
        &self,
        post: JsonValue,
    ) -> Result<(JsonValue, JsonValue), RoostError> {
        self.modify(move |sections| {
            let blog = blog_array(sections)?;
            blog.push(post.clone());
            Ok((post, JsonValue::Array(blog.clone())))
        })
        .await
    }

    /// Replace a blog post in place; `None` when the id is unknown
    pub async fn blog_replace(
        &self,
        id: &str,
        post: JsonValue,
    ) -> Result<Option<(JsonValue, JsonValue)>, RoostError> {
        let id = id.to_string();
        self.modify(move |sections| {
            let blog = blog_array(sections)?;
            let Some(slot) = blog.iter_mut().find(|p| post_matches(p, &id)) else {
                return Ok(None);
            };
            *slot = post.clone();
            Ok(Some((post, JsonValue::Array(blog.clone()))))
        })
        .await
    }

    /// Remove a blog post; returns the post-deletion array
    pub async fn blog_delete(&self, id: &str) -> Result<JsonValue, RoostError> {
        let id = id.to_string();
        self.modify(move |sections| {
            let blog = blog_array(sections)?;
            blog.retain(|p| !post_matches(p, &id));
            Ok(JsonValue::Array(blog.clone()))
        })
        .await
    }

    pub async fn blog_get(&self, id: &str) -> Result<Option<JsonValue>, RoostError> {
        let blog = self.value("blog").await?;
        Ok(blog
            .as_array()
            .and_then(|posts| posts.iter().find(|p| post_matches(p, id)).cloned()))
    }

    /// Append an approved testimonial to the curated section; returns the
    /// post-mutation array
    pub async fn push_testimonial(&self, entry: JsonValue) -> Result<JsonValue, RoostError> {
        self.modify(move |sections| {
            let root = as_object(sections)?;
            let testimonials = root
                .entry("testimonials".to_string())
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            match testimonials.as_array_mut() {
                Some(list) => {
                    list.push(entry);
                    Ok(testimonials.clone())
                }
                None => Err(RoostError::Database(
                    "testimonials section is not an array".to_string(),
                )),
            }
        })
        .await
    }

    /// Whether the chatbot answers messages
    pub async fn chatbot_enabled(&self) -> Result<bool, RoostError> {
        let settings = self.value("chatbot").await?;
        Ok(settings
            .get("enabled")
            .and_then(|v| v.as_bool())
            .unwrap_or(true))
    }
}

fn as_object(value: &mut JsonValue) -> Result<&mut Map<String, JsonValue>, RoostError> {
    value
        .as_object_mut()
        .ok_or_else(|| RoostError::Database("aggregate node is not an object".to_string()))
}

fn blog_array(sections: &mut JsonValue) -> Result<&mut Vec<JsonValue>, RoostError> {
    let root = as_object(sections)?;
    let blog = root
        .entry("blog".to_string())
        .or_insert_with(|| JsonValue::Array(Vec::new()));
    blog.as_array_mut()
        .ok_or_else(|| RoostError::Database("blog section is not an array".to_string()))
}

fn post_matches(post: &JsonValue, id: &str) -> bool {
    match post.get("id") {
        Some(JsonValue::String(s)) => s == id,
        Some(JsonValue::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// Fresh blog posts get a millisecond-timestamp id like the dashboard
/// generates, and today's date
pub fn fill_blog_defaults(post: &mut JsonValue) {
    if let Some(obj) = post.as_object_mut() {
        if !obj.contains_key("id") {
            obj.insert(
                "id".to_string(),
                JsonValue::String(chrono::Utc::now().timestamp_millis().to_string()),
            );
        }
        let missing_date = !obj.contains_key("date");
        if missing_date {
            let date = now_iso().chars().take(10).collect::<String>();
            obj.insert("date".to_string(), JsonValue::String(date));
        }
    }
}
