//! FitLog Status Tool
//!
//! Runtime status of the service and the usage guides served to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Food and template logging guide for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# FitLog Logging Instructions

## Dates

All dates are ISO `YYYY-MM-DD`. Ask a calendar tool for today's date
instead of guessing it.

## Food

1. Before logging a meal the user eats often, call `suggest_template`
   with their description. If it returns a suggestion, offer to log it
   with `use_template` instead of entering every item again.
2. Otherwise call `log_food` once per item with the nutrition you have.
   Missing nutrients default to 0; values must not be negative.
3. `list_food_for_day` shows what was logged and the day's total.

## Exercise

1. `log_exercise_set` takes an exercise name ("bench press", "run",
   "push-ups"); it is normalized to a canonical key.
2. Strength work: sets, reps and weight (in the user's weight unit).
   Cardio: duration_minutes and/or distance (in the user's distance unit).
   Optional metadata such as `{"incline_percent": 4}` refines treadmill work.
3. Each set gets a calorie estimate. Without a body weight in settings the
   estimate is a low/high range; set one with `set_settings` and run
   `recalculate_estimates` to tighten earlier entries.
4. `estimate_exercise` previews an estimate without logging anything.

## Templates

- `save_template` stores a meal (food items) or routine (exercise sets).
  Saving the same items again returns the existing template
  (`created: false`).
- `use_template` logs every item on a date and bumps its use count.

## Custom logs

`create_custom_log_type` once (e.g. "water", unit "ml"), then
`log_custom_value` per measurement.
"#;

/// Chart DSL guide for AI assistants
pub const CHART_INSTRUCTIONS: &str = r#"
# FitLog Chart Instructions

`evaluate_chart` and `render_chart` take a JSON spec:

```json
{
  "metric": "protein",
  "groupBy": "week",
  "dateRange": {"lastDays": 90},
  "aggregation": "average",
  "chartType": "line"
}
```

| Field | Values | Default |
|-------|--------|---------|
| metric | calories, protein, carbs, fiber, sugar, fat, saturated_fat, sodium, cholesterol, calories_burned, net_calories, exercise_volume, exercise_sets, food_entries, custom:<log type> | required |
| groupBy | day, week (Monday start), month | day |
| dateRange | {"lastDays": 1-730}, {"start": "YYYY-MM-DD", "end": "YYYY-MM-DD"}, "week", "month", "quarter", "year" | required |
| aggregation | sum, count (days with data), average (per day with data) | sum |
| chartType | line, bar | line |

Any other field or value is rejected with an error naming it.

Every bucket in the range is returned, empty ones as 0. Long series only
label every Nth point (`labelMask`); the most recent point is always
labeled.

`render_chart` writes a PNG to `output_path` (default size 1000x500).
"#;

/// Runtime status of the FitLog service
#[derive(Debug, Clone, Serialize)]
pub struct FitLogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Matching threshold for template suggestions
    pub similarity_threshold: f64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    similarity_threshold: f64,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, similarity_threshold: f64) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            similarity_threshold,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> FitLogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FitLogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            similarity_threshold: self.similarity_threshold,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/fitlog.db"), 0.65);
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.similarity_threshold, 0.65);
    }
}
