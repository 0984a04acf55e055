//! Logged exercise set
//!
//! One strength set group or cardio session. The calorie estimate is cached
//! on the row as low/high bounds (equal for exact estimates, NULL when the
//! estimator returned nothing).

use std::collections::BTreeMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calories::{CalorieEstimate, ExerciseInput};
use crate::db::DbResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: String,
    pub date: String,
    pub exercise_key: String,
    pub subtype: Option<String>,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub duration_minutes: Option<f64>,
    pub distance: Option<f64>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub estimated_calories: Option<CalorieEstimate>,
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetCreate {
    /// Client id; generated when absent
    pub id: Option<String>,
    pub date: String,
    /// Canonical key (see `calories::canonical_key`)
    pub exercise_key: String,
    pub subtype: Option<String>,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    pub duration_minutes: Option<f64>,
    pub distance: Option<f64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub logged_at: Option<String>,
}

impl ExerciseSetCreate {
    pub fn to_input(&self) -> ExerciseInput {
        ExerciseInput {
            exercise_key: self.exercise_key.clone(),
            subtype: self.subtype.clone(),
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            duration_minutes: self.duration_minutes,
            distance: self.distance,
            metadata: self.metadata.clone(),
        }
    }
}

fn estimate_bounds(estimate: Option<CalorieEstimate>) -> (Option<f64>, Option<f64>) {
    match estimate {
        Some(e) => (Some(e.low()), Some(e.high())),
        None => (None, None),
    }
}

impl ExerciseSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let metadata_json: Option<String> = row.get("metadata")?;
        let metadata = metadata_json
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            exercise_key: row.get("exercise_key")?,
            subtype: row.get("subtype")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            duration_minutes: row.get("duration_minutes")?,
            distance: row.get("distance")?,
            metadata,
            estimated_calories: CalorieEstimate::from_bounds(
                row.get("calories_low")?,
                row.get("calories_high")?,
            ),
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn to_input(&self) -> ExerciseInput {
        ExerciseInput {
            exercise_key: self.exercise_key.clone(),
            subtype: self.subtype.clone(),
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            duration_minutes: self.duration_minutes,
            distance: self.distance,
            metadata: self.metadata.clone(),
        }
    }

    /// Volume lifted: sets × reps × weight
    pub fn volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps) * self.weight
    }

    /// Insert a new set with its precomputed estimate
    pub fn create(
        conn: &Connection,
        data: &ExerciseSetCreate,
        estimate: Option<CalorieEstimate>,
    ) -> DbResult<Self> {
        let id = data
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let logged_at = data.logged_at.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });
        let metadata = if data.metadata.is_empty() {
            None
        } else {
            serde_json::to_string(&data.metadata).ok()
        };
        let (low, high) = estimate_bounds(estimate);

        conn.execute(
            r#"
            INSERT INTO exercise_sets (
                id, date, exercise_key, subtype, sets, reps, weight,
                duration_minutes, distance, metadata, calories_low, calories_high, logged_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                id,
                data.date,
                data.exercise_key,
                data.subtype,
                data.sets,
                data.reps,
                data.weight,
                data.duration_minutes,
                data.distance,
                metadata,
                low,
                high,
                logged_at,
            ],
        )?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercise_sets WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(set) => Ok(Some(set)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM exercise_sets WHERE date = ?1 ORDER BY logged_at, created_at"
        )?;
        let sets = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sets)
    }

    /// Sets with `start <= date <= end`, optionally for one exercise key
    pub fn list_by_date_range(
        conn: &Connection,
        start: &str,
        end: &str,
        exercise_key: Option<&str>,
    ) -> DbResult<Vec<Self>> {
        let sets = match exercise_key {
            Some(key) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT * FROM exercise_sets
                    WHERE date >= ?1 AND date <= ?2 AND exercise_key = ?3
                    ORDER BY date, logged_at
                    "#
                )?;
                let rows = stmt
                    .query_map(params![start, end, key], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM exercise_sets WHERE date >= ?1 AND date <= ?2 ORDER BY date, logged_at"
                )?;
                let rows = stmt
                    .query_map(params![start, end], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(sets)
    }

    /// Replace the cached calorie estimate
    pub fn set_estimate(
        conn: &Connection,
        id: &str,
        estimate: Option<CalorieEstimate>,
    ) -> DbResult<Option<Self>> {
        let (low, high) = estimate_bounds(estimate);
        conn.execute(
            r#"
            UPDATE exercise_sets
            SET calories_low = ?1, calories_high = ?2, updated_at = datetime('now')
            WHERE id = ?3
            "#,
            params![low, high, id],
        )?;
        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM exercise_sets WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    fn bench(date: &str) -> ExerciseSetCreate {
        ExerciseSetCreate {
            id: None,
            date: date.to_string(),
            exercise_key: "bench_press".to_string(),
            subtype: None,
            sets: 3,
            reps: 8,
            weight: 155.0,
            duration_minutes: None,
            distance: None,
            metadata: BTreeMap::new(),
            logged_at: None,
        }
    }

    #[test]
    fn test_create_round_trips_estimate() {
        let conn = test_connection();
        let estimate = Some(CalorieEstimate::Range { low: 20.5, high: 41.0 });
        let set = ExerciseSet::create(&conn, &bench("2026-04-01"), estimate).unwrap();
        assert_eq!(set.estimated_calories, estimate);
        assert_eq!(set.volume(), 3720.0);

        let cleared = ExerciseSet::set_estimate(&conn, &set.id, None).unwrap().unwrap();
        assert_eq!(cleared.estimated_calories, None);
    }

    #[test]
    fn test_metadata_stored_as_json() {
        let conn = test_connection();
        let mut data = bench("2026-04-01");
        data.exercise_key = "treadmill".to_string();
        data.metadata.insert("incline_percent".to_string(), serde_json::json!(4.5));
        let set = ExerciseSet::create(&conn, &data, None).unwrap();
        assert_eq!(set.metadata.get("incline_percent"), Some(&serde_json::json!(4.5)));
        assert_eq!(set.to_input().metadata.len(), 1);
    }

    #[test]
    fn test_list_by_key() {
        let conn = test_connection();
        ExerciseSet::create(&conn, &bench("2026-04-01"), None).unwrap();
        let mut squat = bench("2026-04-02");
        squat.exercise_key = "squat".to_string();
        ExerciseSet::create(&conn, &squat, None).unwrap();

        let all = ExerciseSet::list_by_date_range(&conn, "2026-04-01", "2026-04-30", None).unwrap();
        assert_eq!(all.len(), 2);
        let squats =
            ExerciseSet::list_by_date_range(&conn, "2026-04-01", "2026-04-30", Some("squat")).unwrap();
        assert_eq!(squats.len(), 1);
        assert_eq!(ExerciseSet::list_for_date(&conn, "2026-04-01").unwrap().len(), 1);
    }
}
