//! Build metadata
//!
//! `build.rs` stamps every compile with a counter and a UTC timestamp. They
//! show up in the startup banner and in the status tool.

use std::fmt;

use serde::Serialize;

use crate::config::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_stamp(
            option_env!("FITLOG_BUILD_NUMBER"),
            option_env!("FITLOG_BUILD_TIMESTAMP"),
        )
    }

    /// Missing or garbled stamps read as build 0, compiled "unknown"
    fn from_stamp(number: Option<&str>, timestamp: Option<&'static str>) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_number: number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: timestamp.filter(|t| !t.is_empty()).unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} (build {}, compiled {})",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr; stdout belongs to MCP
pub fn print_startup_banner(config: &Config) {
    eprintln!("===============================================");
    eprintln!("  FitLog food & exercise log");
    eprintln!("  {}", BuildInfo::current());
    eprintln!("  Database: {}", config.database_path.display());
    eprintln!("  Template match threshold: {:.2}", config.similarity_threshold);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_parsing() {
        let info = BuildInfo::from_stamp(Some("42"), Some("2026-10-19T08:00:00Z"));
        assert_eq!(info.build_number, 42);
        assert_eq!(info.build_timestamp, "2026-10-19T08:00:00Z");
        assert_eq!(info.name, "fitlog");

        let blank = BuildInfo::from_stamp(Some("12a"), Some(""));
        assert_eq!(blank.build_number, 0);
        assert_eq!(blank.build_timestamp, "unknown");
        assert_eq!(BuildInfo::from_stamp(None, None).build_number, 0);
    }

    #[test]
    fn test_display() {
        let info = BuildInfo::from_stamp(Some("7"), None);
        assert_eq!(
            info.to_string(),
            format!("fitlog v{} (build 7, compiled unknown)", VERSION)
        );
    }
}
