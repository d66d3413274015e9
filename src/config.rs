//! Configuration for Roost
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Roost - live content gateway for the TechNest studio site
#[derive(Parser, Debug, Clone)]
#[command(name = "roost")]
#[command(about = "Content API, intake, and live fanout for the TechNest site")]
pub struct Args {
    /// Unique node identifier for this gateway instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "technest")]
    pub mongodb_db: String,

    /// Enable development mode (falls back to in-memory storage if MongoDB
    /// is unreachable instead of exiting)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Path to the chatbot knowledge base JSON file
    #[arg(long, env = "KNOWLEDGE_FILE", default_value = "chatbot-knowledge.json")]
    pub knowledge_file: String,

    /// Fanout broadcast channel capacity (per-subscriber backlog before lag)
    #[arg(long, env = "FANOUT_BUFFER", default_value = "100")]
    pub fanout_buffer: usize,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "1048576")]
    pub max_body_bytes: usize,

    /// Maximum number of visitor records returned by the listing endpoint
    #[arg(long, env = "VISITOR_LIST_CAP", default_value = "1000")]
    pub visitor_list_cap: usize,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fanout_buffer == 0 {
            return Err("FANOUT_BUFFER must be greater than zero".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than zero".to_string());
        }

        if self.visitor_list_cap == 0 {
            return Err("VISITOR_LIST_CAP must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["roost"])
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = base_args();
        assert!(args.validate().is_ok());
        assert_eq!(args.mongodb_db, "technest");
        assert_eq!(args.listen.port(), 5000);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let mut args = base_args();
        args.fanout_buffer = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_body_cap_rejected() {
        let mut args = base_args();
        args.max_body_bytes = 0;
        assert!(args.validate().is_err());
    }
}
