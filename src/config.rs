//! Runtime configuration
//!
//! Everything is read from environment variables so the server can be
//! launched by an MCP client without a config file.

use std::path::PathBuf;

use thiserror::Error;

use crate::similarity::DEFAULT_THRESHOLD;

pub const DATABASE_PATH_VAR: &str = "FITLOG_DATABASE_PATH";
pub const SIMILARITY_THRESHOLD_VAR: &str = "FITLOG_SIMILARITY_THRESHOLD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number between 0 and 1, got {value:?}")]
    InvalidThreshold { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub similarity_threshold: f64,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let similarity_threshold = match lookup(SIMILARITY_THRESHOLD_VAR) {
            Some(raw) => parse_threshold(&raw)?,
            None => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            database_path,
            similarity_threshold,
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => Err(ConfigError::InvalidThreshold {
            var: SIMILARITY_THRESHOLD_VAR,
            value: raw.to_string(),
        }),
    }
}

/// `<project>/data/fitlog.db`, resolved from the executable location
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("fitlog.db");
    path
}
