//! Saved meals and routines
//!
//! A template is a named list of food items or exercise sets the user can
//! log again in one step. Each carries an item signature used to spot
//! duplicates before saving.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calories::ExerciseInput;
use crate::db::{DbError, DbResult};
use crate::similarity::{self, SavedText};
use super::Nutrition;

/// Timestamp format of `last_used_at`, matching SQLite's datetime('now')
pub const LAST_USED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Meal,
    Routine,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Meal => "meal",
            TemplateKind::Routine => "routine",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "meal" | "meals" => Some(TemplateKind::Meal),
            "routine" | "routines" | "workout" => Some(TemplateKind::Routine),
            _ => None,
        }
    }
}

/// One food in a saved meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealItem {
    pub description: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum TemplateItems {
    Meal(Vec<MealItem>),
    Routine(Vec<ExerciseInput>),
}

impl TemplateItems {
    pub fn kind(&self) -> TemplateKind {
        match self {
            TemplateItems::Meal(_) => TemplateKind::Meal,
            TemplateItems::Routine(_) => TemplateKind::Routine,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TemplateItems::Meal(items) => items.len(),
            TemplateItems::Routine(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Order-independent signature of the items
    pub fn signature(&self) -> String {
        match self {
            TemplateItems::Meal(items) => similarity::signature(
                items
                    .iter()
                    .map(|i| format!("{} {:.0}", i.description, i.nutrition.calories)),
            ),
            TemplateItems::Routine(items) => similarity::signature(items.iter().map(|s| {
                format!(
                    "{} {} {}x{} {} {:.0} {}",
                    s.exercise_key,
                    s.subtype.as_deref().unwrap_or(""),
                    s.sets,
                    s.reps,
                    s.weight,
                    s.duration_minutes.unwrap_or(0.0),
                    s.distance.unwrap_or(0.0),
                )
            })),
        }
    }

    fn items_json(&self) -> serde_json::Result<String> {
        match self {
            TemplateItems::Meal(items) => serde_json::to_string(items),
            TemplateItems::Routine(items) => serde_json::to_string(items),
        }
    }

    fn from_json(kind: TemplateKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            TemplateKind::Meal => TemplateItems::Meal(serde_json::from_str(json)?),
            TemplateKind::Routine => TemplateItems::Routine(serde_json::from_str(json)?),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub id: i64,
    pub name: String,
    /// Free text compared against new entries
    pub description: String,
    #[serde(flatten)]
    pub items: TemplateItems,
    pub signature: String,
    pub use_count: i64,
    pub last_used_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTemplateCreate {
    pub name: String,
    /// Defaults to the name when absent
    pub description: Option<String>,
    #[serde(flatten)]
    pub items: TemplateItems,
}

impl SavedText for SavedTemplate {
    fn text(&self) -> &str {
        &self.description
    }

    fn signature(&self) -> Option<&str> {
        Some(self.signature.as_str())
    }

    fn last_used_at(&self) -> Option<NaiveDateTime> {
        self.last_used_at
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, LAST_USED_FORMAT).ok())
    }
}

impl SavedTemplate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind_str: String = row.get("kind")?;
        let kind = TemplateKind::from_str(&kind_str).unwrap_or(TemplateKind::Meal);
        let items_json: String = row.get("items")?;
        let items = TemplateItems::from_json(kind, &items_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            items,
            signature: row.get("signature")?,
            use_count: row.get("use_count")?,
            last_used_at: row.get("last_used_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &SavedTemplateCreate) -> DbResult<Self> {
        let description = data
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| data.name.clone());
        let items_json = data.items.items_json().map_err(DbError::Json)?;

        conn.execute(
            r#"
            INSERT INTO saved_templates (kind, name, description, items, signature)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.items.kind().as_str(),
                data.name,
                description,
                items_json,
                data.items.signature(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM saved_templates WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Templates of a kind (or all), most recently used first
    pub fn list(conn: &Connection, kind: Option<TemplateKind>) -> DbResult<Vec<Self>> {
        let order = "ORDER BY last_used_at IS NULL, last_used_at DESC, name ASC";
        let templates = match kind {
            Some(kind) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT * FROM saved_templates WHERE kind = ?1 {}",
                    order
                ))?;
                let rows = stmt
                    .query_map([kind.as_str()], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!("SELECT * FROM saved_templates {}", order))?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(templates)
    }

    /// Record a use of the template at `at` (formatted with [`LAST_USED_FORMAT`])
    pub fn mark_used(conn: &Connection, id: i64, at: &str) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE saved_templates
            SET use_count = use_count + 1, last_used_at = ?1, updated_at = datetime('now')
            WHERE id = ?2
            "#,
            params![at, id],
        )?;
        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM saved_templates WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
