//! User-defined log types
//!
//! Arbitrary numeric daily measurements (water, steps, sleep hours...) that
//! show up in daily totals and charts as `custom:<name>`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomLogType {
    pub id: i64,
    pub name: String,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomLogEntry {
    pub id: i64,
    pub log_type_id: i64,
    pub date: String,
    pub value: f64,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Lowercase snake name used as the chart metric suffix
pub fn normalize_log_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl CustomLogType {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            unit: row.get("unit")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a log type; the name is normalized and must be unique
    pub fn create(conn: &Connection, name: &str, unit: Option<&str>, notes: Option<&str>) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO custom_log_types (name, unit, notes) VALUES (?1, ?2, ?3)",
            params![normalize_log_name(name), unit, notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_log_types WHERE id = ?1")?;
        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_log_types WHERE name = ?1")?;
        let result = stmt.query_row([normalize_log_name(name)], Self::from_row);
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_log_types ORDER BY name")?;
        let types = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }

    /// Deletes the type and, by cascade, its entries
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM custom_log_types WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

impl CustomLogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            log_type_id: row.get("log_type_id")?,
            date: row.get("date")?,
            value: row.get("value")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(
        conn: &Connection,
        log_type_id: i64,
        date: &str,
        value: f64,
        notes: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO custom_log_entries (log_type_id, date, value, notes) VALUES (?1, ?2, ?3, ?4)",
            params![log_type_id, date, value, notes],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM custom_log_entries WHERE id = ?1")?;
        let entry = stmt.query_row([id], Self::from_row)?;
        Ok(entry)
    }

    pub fn list_for_type(
        conn: &Connection,
        log_type_id: i64,
        start: &str,
        end: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM custom_log_entries
            WHERE log_type_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date, id
            "#
        )?;
        let entries = stmt
            .query_map(params![log_type_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Per-date, per-type sums in a range: (date, type name, total)
    pub fn totals_by_date_range(
        conn: &Connection,
        start: &str,
        end: &str,
    ) -> DbResult<Vec<(String, String, f64)>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT e.date, t.name, SUM(e.value)
            FROM custom_log_entries e
            JOIN custom_log_types t ON t.id = e.log_type_id
            WHERE e.date >= ?1 AND e.date <= ?2
            GROUP BY e.date, t.name
            ORDER BY e.date, t.name
            "#
        )?;
        let rows = stmt
            .query_map(params![start, end], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM custom_log_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
