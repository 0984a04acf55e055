//! Custom log MCP Tools
//!
//! User-defined numeric logs (water, steps, sleep...).

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{normalize_log_name, CustomLogEntry, CustomLogType};
use super::parse_date;

/// Response for list_custom_log_types
#[derive(Debug, Serialize)]
pub struct ListLogTypesResponse {
    pub types: Vec<CustomLogType>,
    pub total: usize,
}

/// Response for list_custom_log_entries
#[derive(Debug, Serialize)]
pub struct ListLogEntriesResponse {
    pub log_type: CustomLogType,
    pub entries: Vec<CustomLogEntry>,
    pub total: usize,
    pub sum: f64,
}

fn find_type(db: &Database, name: &str) -> Result<CustomLogType, String> {
    db.with_conn(|conn| CustomLogType::get_by_name(conn, name))
        .map_err(|e| format!("Failed to get log type: {}", e))?
        .ok_or_else(|| format!("Custom log type not found: '{}'", name))
}

/// Create a custom log type; names are unique after normalization
pub fn create_custom_log_type(
    db: &Database,
    name: &str,
    unit: Option<&str>,
    notes: Option<&str>,
) -> Result<CustomLogType, String> {
    let normalized = normalize_log_name(name);
    if normalized.is_empty() {
        return Err("Log type name must contain letters or digits".to_string());
    }

    let existing = db
        .with_conn(|conn| CustomLogType::get_by_name(conn, &normalized))
        .map_err(|e| format!("Database error: {}", e))?;
    if existing.is_some() {
        return Err(format!("Custom log type already exists: '{}'", normalized));
    }

    let log_type = db
        .with_conn(|conn| CustomLogType::create(conn, &normalized, unit, notes))
        .map_err(|e| format!("Failed to create log type: {}", e))?;

    info!("Created custom log type {} '{}'", log_type.id, log_type.name);
    Ok(log_type)
}

/// All custom log types
pub fn list_custom_log_types(db: &Database) -> Result<ListLogTypesResponse, String> {
    let types = db
        .with_conn(CustomLogType::list)
        .map_err(|e| format!("Failed to list log types: {}", e))?;

    Ok(ListLogTypesResponse {
        total: types.len(),
        types,
    })
}

/// Record a value for a custom log type
pub fn log_custom_value(
    db: &Database,
    name: &str,
    date: &str,
    value: f64,
    notes: Option<&str>,
) -> Result<CustomLogEntry, String> {
    parse_date(date)?;
    if !value.is_finite() {
        return Err("Value must be a finite number".to_string());
    }
    let log_type = find_type(db, name)?;

    let entry = db
        .with_conn(|conn| CustomLogEntry::create(conn, log_type.id, date, value, notes))
        .map_err(|e| format!("Failed to log value: {}", e))?;

    info!("Logged {} = {} on {}", log_type.name, value, date);
    Ok(entry)
}

/// Entries of one log type within a date range
pub fn list_custom_log_entries(
    db: &Database,
    name: &str,
    start: &str,
    end: &str,
) -> Result<ListLogEntriesResponse, String> {
    if parse_date(start)? > parse_date(end)? {
        return Err(format!("Start date {} is after end date {}", start, end));
    }
    let log_type = find_type(db, name)?;

    let entries = db
        .with_conn(|conn| CustomLogEntry::list_for_type(conn, log_type.id, start, end))
        .map_err(|e| format!("Failed to list entries: {}", e))?;

    Ok(ListLogEntriesResponse {
        log_type,
        total: entries.len(),
        sum: entries.iter().map(|e| e.value).sum(),
        entries,
    })
}
