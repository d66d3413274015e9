//! Database schemas for Roost
//!
//! Defines MongoDB document structures for the site aggregate, projects,
//! ratings, intake records, visitors, chatbot conversations and live
//! notifications.

mod conversation;
mod intake;
mod metadata;
mod notification;
mod project;
mod rating;
mod site;
mod visitor;

pub use conversation::{ConversationDoc, ReviewPatch, CONVERSATION_COLLECTION};
pub use intake::{
    ApplicationDoc, ApplicationInput, MessageDoc, MessageInput, ProjectSubmissionDoc,
    ProjectSubmissionInput, TestimonialSubmissionDoc, TestimonialSubmissionInput,
    APPLICATION_COLLECTION, MESSAGE_COLLECTION, PROJECT_SUBMISSION_COLLECTION,
    TESTIMONIAL_SUBMISSION_COLLECTION,
};
pub use metadata::Metadata;
pub use notification::{
    NotificationDoc, NotificationInput, NotificationKind, NotificationPatch,
    NOTIFICATION_COLLECTION,
};
pub use project::{
    MediaItem, ProjectDoc, ProjectInput, RatingBreakdown, RatingsSummary, PROJECT_COLLECTION,
};
pub use rating::{RatingDoc, RatingInput, RATING_COLLECTION};
pub use site::{SiteDocument, SITE_COLLECTION};
pub use visitor::{SessionPatch, VisitorDoc, VISITOR_COLLECTION};
