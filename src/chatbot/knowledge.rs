//! Chatbot knowledge base
//!
//! A JSON file mapping categories to keyword lists and canned replies,
//! plus a `default` reply for messages that match nothing. Categories
//! live in a `BTreeMap` so tie-breaks between equal scores are stable.
//! A missing or malformed file degrades to the built-in base with a
//! warning; the chat endpoint never fails over it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Reply used when no category matches
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultReply {
    pub response: String,
}

/// One answerable topic
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBase {
    pub default: DefaultReply,
    #[serde(flatten)]
    pub categories: BTreeMap<String, Category>,
}

impl KnowledgeBase {
    /// Load from a JSON file, falling back to the built-in base
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(Path::new(path)) {
            Ok(raw) => match serde_json::from_str::<KnowledgeBase>(&raw) {
                Ok(kb) => {
                    info!(
                        "Loaded chatbot knowledge base from {} ({} categories)",
                        path,
                        kb.categories.len()
                    );
                    kb
                }
                Err(e) => {
                    warn!(
                        "Malformed knowledge base at {} ({}), using built-in",
                        path, e
                    );
                    Self::builtin()
                }
            },
            Err(e) => {
                warn!(
                    "Knowledge base file {} unreadable ({}), using built-in",
                    path, e
                );
                Self::builtin()
            }
        }
    }

    /// Minimal base compiled into the binary
    pub fn builtin() -> Self {
        let raw = include_str!("builtin_knowledge.json");
        serde_json::from_str(raw).expect("built-in knowledge base is valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let kb = KnowledgeBase::builtin();
        assert!(!kb.categories.is_empty());
        assert!(!kb.default.response.is_empty());
        for (name, category) in &kb.categories {
            assert!(!category.keywords.is_empty(), "category {} has no keywords", name);
            assert!(!category.response.is_empty());
        }
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let kb = KnowledgeBase::load("/nonexistent/kb.json");
        assert_eq!(
            kb.default.response,
            KnowledgeBase::builtin().default.response
        );
    }

    #[test]
    fn test_flattened_categories_exclude_default() {
        let kb: KnowledgeBase = serde_json::from_str(
            r#"{
                "default": { "response": "fallback" },
                "greetings": { "keywords": ["hi"], "response": "hello there" }
            }"#,
        )
        .unwrap();
        assert_eq!(kb.categories.len(), 1);
        assert!(kb.categories.contains_key("greetings"));
        assert_eq!(kb.default.response, "fallback");
    }
}
