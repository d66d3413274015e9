//! Roost - live content gateway for the TechNest studio site
//!
//! Roost serves the public site content as a single nested aggregate,
//! stores visitor intake (messages, applications, submissions), answers a
//! keyword chatbot, and pushes every content change to connected browser
//! tabs over WebSocket so open pages update without a refresh.
//!
//! ## Services
//!
//! - **Site aggregate**: nested sections with typed PUT mutators
//! - **Fanout**: broadcast channel fanning `{key, data}` frames to `/ws`
//! - **Content collections**: projects with ratings, intake, notifications
//! - **Chatbot**: keyword matcher over a JSON knowledge base, with a
//!   reviewed conversation log
//! - **Analytics**: visitor tracking sink with in-process stats

pub mod analytics;
pub mod chatbot;
pub mod config;
pub mod content;
pub mod db;
pub mod fanout;
pub mod projection;
pub mod routes;
pub mod server;
pub mod site;
pub mod snapshot;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, RoostError};
