//! Content collections: projects and ratings, intake records, banners

pub mod collection;
pub mod intake;
pub mod notifications;
pub mod projects;

pub use collection::{DualCollection, StoredDoc};
pub use intake::IntakeStore;
pub use notifications::NotificationStore;
pub use projects::ProjectStore;
