//! FitLog Tools module
//!
//! Tool implementations behind the MCP server. Each takes the database and
//! plain arguments and returns a serializable response or an error message.

pub mod charts;
pub mod custom_logs;
pub mod exercise;
pub mod food;
pub mod settings;
pub mod status;
pub mod summary;
pub mod templates;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::DATE_FORMAT;

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Parse an ISO `YYYY-MM-DD` date argument
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", date))
}

/// Parse an optional date, defaulting to today (local time)
pub fn date_or_today(date: Option<&str>) -> Result<NaiveDate, String> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Temporary on-disk database with migrations applied
#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, crate::db::Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = crate::db::Database::open_path(&dir.path().join("fitlog-test.db")).unwrap();
    (dir, db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2026-02-28 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("02/28/2026").is_err());
    }
}
