//! Exercise MCP Tools
//!
//! Tools for logging exercise sets. Every logged set carries a cached
//! calorie estimate computed from the user's settings at logging time;
//! `recalculate_estimates` refreshes them after settings change.

use serde::Serialize;
use tracing::{info, warn};

use crate::calories::{self, CalorieEstimate, ExerciseClass, ExerciseInput};
use crate::db::Database;
use crate::models::{ExerciseSet, ExerciseSetCreate, UserSettings};
use super::{parse_date, DeleteResponse};

// ============================================================================
// Response Structs
// ============================================================================

/// Response for log_exercise_set
#[derive(Debug, Serialize)]
pub struct LogExerciseResponse {
    #[serde(flatten)]
    pub set: ExerciseSet,
    pub exercise_class: ExerciseClass,
    /// Set when the estimate is missing or only a range
    pub estimate_note: Option<String>,
}

/// Response for list_exercise_for_day
#[derive(Debug, Serialize)]
pub struct ExerciseDayResponse {
    pub date: String,
    pub sets: Vec<ExerciseSet>,
    pub total: usize,
    pub total_volume: f64,
    pub estimated_calories: Option<CalorieEstimate>,
}

/// Response for estimate_exercise
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub exercise_key: String,
    pub known_exercise: bool,
    pub exercise_class: ExerciseClass,
    pub estimate: Option<CalorieEstimate>,
    pub body_weight_used: bool,
}

/// Response for recalculate_estimates
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub start: String,
    pub end: String,
    pub examined: usize,
    pub updated: usize,
}

/// One entry of the exercise catalog
#[derive(Debug, Serialize)]
pub struct CatalogExercise {
    pub key: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub exercise_class: ExerciseClass,
}

// ============================================================================
// Helpers
// ============================================================================

fn check_effort(input: &ExerciseInput) -> Result<(), String> {
    let values = [
        input.weight,
        input.duration_minutes.unwrap_or(0.0),
        input.distance.unwrap_or(0.0),
    ];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Weight, duration and distance must be finite and non-negative".to_string());
    }
    Ok(())
}

fn estimate_note(estimate: Option<CalorieEstimate>, has_body_weight: bool) -> Option<String> {
    match estimate {
        None => Some("No estimate: nothing measurable was logged".to_string()),
        Some(CalorieEstimate::Range { .. }) if !has_body_weight => Some(
            "Range estimate: set a body weight with set_settings for tighter numbers".to_string(),
        ),
        _ => None,
    }
}

fn load_settings(db: &Database) -> Result<UserSettings, String> {
    db.with_conn(UserSettings::get)
        .map_err(|e| format!("Failed to load settings: {}", e))
}

// ============================================================================
// Exercise Tool Functions
// ============================================================================

/// Log an exercise set and cache its calorie estimate
pub fn log_exercise_set(db: &Database, mut data: ExerciseSetCreate) -> Result<LogExerciseResponse, String> {
    parse_date(&data.date)?;
    data.exercise_key = calories::canonical_key(&data.exercise_key);
    if data.exercise_key.is_empty() {
        return Err("Exercise name must not be empty".to_string());
    }

    let input = data.to_input();
    check_effort(&input)?;

    let settings = load_settings(db)?;
    let estimate = calories::estimate(&input, &settings.estimator_settings());
    let note = estimate_note(estimate, settings.body_weight.is_some());
    if estimate.is_none() {
        warn!("No calorie estimate for {} on {}", data.exercise_key, data.date);
    }

    let set = db
        .with_conn(|conn| ExerciseSet::create(conn, &data, estimate))
        .map_err(|e| format!("Failed to log exercise: {}", e))?;

    info!(
        "Logged exercise {} on {}: {} {}x{} @ {}",
        set.id, set.date, set.exercise_key, set.sets, set.reps, set.weight
    );

    Ok(LogExerciseResponse {
        exercise_class: calories::classify(&input),
        set,
        estimate_note: note,
    })
}

/// Get an exercise set by ID
pub fn get_exercise_set(db: &Database, id: &str) -> Result<Option<ExerciseSet>, String> {
    db.with_conn(|conn| ExerciseSet::get_by_id(conn, id))
        .map_err(|e| format!("Failed to get exercise set: {}", e))
}

/// All exercise logged on a day with volume and calorie totals
pub fn list_exercise_for_day(db: &Database, date: &str) -> Result<ExerciseDayResponse, String> {
    parse_date(date)?;

    let sets = db
        .with_conn(|conn| ExerciseSet::list_for_date(conn, date))
        .map_err(|e| format!("Failed to list exercise: {}", e))?;

    Ok(ExerciseDayResponse {
        date: date.to_string(),
        total: sets.len(),
        total_volume: sets.iter().map(ExerciseSet::volume).sum(),
        estimated_calories: calories::sum_estimates(sets.iter().map(|s| s.estimated_calories)),
        sets,
    })
}

/// Delete an exercise set
pub fn delete_exercise_set(db: &Database, id: &str) -> Result<DeleteResponse, String> {
    let deleted = db
        .with_conn(|conn| ExerciseSet::delete(conn, id))
        .map_err(|e| format!("Failed to delete exercise set: {}", e))?;

    if !deleted {
        return Err(format!("Exercise set not found: {}", id));
    }

    info!("Deleted exercise set {}", id);
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

/// Estimate calories for an exercise without logging it
pub fn estimate_exercise(db: &Database, mut input: ExerciseInput) -> Result<EstimateResponse, String> {
    input.exercise_key = calories::canonical_key(&input.exercise_key);
    check_effort(&input)?;

    let settings = load_settings(db)?;
    let estimate = calories::estimate(&input, &settings.estimator_settings());

    Ok(EstimateResponse {
        known_exercise: calories::lookup(&input.exercise_key).is_some(),
        exercise_class: calories::classify(&input),
        estimate,
        body_weight_used: settings.body_weight.is_some(),
        exercise_key: input.exercise_key,
    })
}

/// Recompute cached estimates for sets in a date range with the current settings
pub fn recalculate_estimates(
    db: &Database,
    start: &str,
    end: &str,
    exercise_key: Option<&str>,
) -> Result<RecalculateResponse, String> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date > end_date {
        return Err(format!("Start date {} is after end date {}", start, end));
    }
    let key = exercise_key.map(calories::canonical_key);

    let settings = load_settings(db)?.estimator_settings();

    let (examined, updated) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let sets = ExerciseSet::list_by_date_range(&tx, start, end, key.as_deref())?;

            let mut updated = 0;
            for set in &sets {
                let estimate = calories::estimate(&set.to_input(), &settings);
                if estimate != set.estimated_calories {
                    ExerciseSet::set_estimate(&tx, &set.id, estimate)?;
                    updated += 1;
                }
            }

            tx.commit()?;
            Ok((sets.len(), updated))
        })
        .map_err(|e| format!("Failed to recalculate estimates: {}", e))?;

    info!(
        "Recalculated estimates {}..{}: {} of {} sets changed",
        start, end, updated, examined
    );

    Ok(RecalculateResponse {
        start: start.to_string(),
        end: end.to_string(),
        examined,
        updated,
    })
}

/// Known exercises with their aliases
pub fn list_exercise_catalog() -> Vec<CatalogExercise> {
    calories::entries()
        .iter()
        .map(|e| CatalogExercise {
            key: e.key,
            display_name: e.display_name,
            aliases: e.aliases,
            exercise_class: e.profile.class(),
        })
        .collect()
}
