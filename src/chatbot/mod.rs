//! Keyword chatbot: knowledge base, matcher and conversation log

pub mod conversations;
pub mod knowledge;
pub mod matcher;

pub use conversations::{ConversationPage, ConversationStats, ConversationStore};
pub use knowledge::{Category, KnowledgeBase};
pub use matcher::{match_message, Reply};

/// Served when the chatbot toggle in site settings is off
pub const UNAVAILABLE_REPLY: &str =
    "The chat assistant is currently unavailable. Please reach us through the contact form.";

/// Served on any internal failure; chat always answers with HTTP 200
pub const APOLOGY_REPLY: &str =
    "Sorry, something went wrong on our side. Please try again in a moment or call us on 0798877440.";
