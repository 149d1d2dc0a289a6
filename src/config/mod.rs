//! Configuration module for the matchmaker backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::store::PersistencePolicy;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for the admin endpoints (admin is disabled when unset)
    pub admin_secret: Option<String>,
    /// Path to the JSON store file
    pub db_path: PathBuf,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// What to do when the store cannot be written
    pub persistence: PersistencePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_secret = env::var("MATCH_ADMIN_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let db_path = env::var("MATCH_DB_PATH")
            .unwrap_or_else(|_| "./data/database.json".to_string())
            .into();

        let upload_dir = env::var("MATCH_UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();

        let bind_addr = env::var("MATCH_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .expect("Invalid MATCH_BIND_ADDR format");

        let log_level = env::var("MATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("MATCH_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let persistence = env::var("MATCH_PERSISTENCE")
            .map(|raw| raw.parse::<PersistencePolicy>().expect("Invalid MATCH_PERSISTENCE value"))
            .unwrap_or_default();

        Self {
            admin_secret,
            db_path,
            upload_dir,
            bind_addr,
            log_level,
            log_format,
            persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("MATCH_ADMIN_SECRET");
        env::remove_var("MATCH_DB_PATH");
        env::remove_var("MATCH_UPLOAD_DIR");
        env::remove_var("MATCH_BIND_ADDR");
        env::remove_var("MATCH_LOG_LEVEL");
        env::remove_var("MATCH_LOG_FORMAT");
        env::remove_var("MATCH_PERSISTENCE");

        let config = Config::from_env();

        assert!(config.admin_secret.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/database.json"));
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.persistence, PersistencePolicy::FailOpen);
    }
}
