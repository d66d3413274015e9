//! Site aggregate: sections, defaults and the backing store

pub mod defaults;
pub mod sections;
pub mod store;

pub use sections::Section;
pub use store::SiteStore;
