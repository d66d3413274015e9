//! Keyword matcher
//!
//! Lowercases the message, counts contained keywords per category, and
//! answers with the best-scoring category's reply. Zero matches fall back
//! to the knowledge base's default reply. Ties go to the first category
//! at the maximum in key order.

use crate::chatbot::knowledge::KnowledgeBase;

/// Matcher outcome: the reply text plus the category that produced it
/// (`None` on fallback)
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub category: Option<String>,
}

/// Match a user message against the knowledge base
pub fn match_message(kb: &KnowledgeBase, message: &str) -> Reply {
    let normalized = message.to_lowercase();
    let normalized = normalized.trim();

    let mut best: Option<(&str, usize)> = None;
    for (name, category) in &kb.categories {
        let score = category
            .keywords
            .iter()
            .filter(|keyword| normalized.contains(keyword.to_lowercase().as_str()))
            .count();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((name, score));
        }
    }

    match best {
        Some((name, _)) => Reply {
            text: kb.categories[name].response.clone(),
            category: Some(name.to_string()),
        },
        None => Reply {
            text: kb.default.response.clone(),
            category: None,
        },
    }
}
