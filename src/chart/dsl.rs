//! Chart DSL parsing
//!
//! A chart spec is a small JSON object:
//!
//! ```json
//! {"metric": "protein", "groupBy": "week", "dateRange": {"lastDays": 90},
//!  "aggregation": "average", "chartType": "bar"}
//! ```
//!
//! `metric` and `dateRange` are required. `groupBy` defaults to `day`,
//! `aggregation` to `sum` and `chartType` to `line`. Anything unrecognized is
//! rejected.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};
use crate::models::{normalize_log_name, DailyTotals, Nutrition, DATE_FORMAT};
use super::error::ChartError;

/// Longest range a chart may cover, in days
pub const MAX_RANGE_DAYS: i64 = 730;

const SPEC_FIELDS: [&str; 5] = ["metric", "groupBy", "dateRange", "aggregation", "chartType"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    /// One of [`Nutrition::FIELDS`]
    Nutrient(&'static str),
    CaloriesBurned,
    NetCalories,
    ExerciseVolume,
    ExerciseSets,
    FoodEntries,
    /// Custom log total, by normalized type name
    Custom(String),
}

impl Metric {
    pub fn parse(s: &str) -> Result<Self, ChartError> {
        let unknown = || ChartError::UnknownValue {
            field: "metric",
            value: s.to_string(),
        };

        if let Some(name) = s.strip_prefix("custom:") {
            let name = normalize_log_name(name);
            if name.is_empty() {
                return Err(unknown());
            }
            return Ok(Metric::Custom(name));
        }

        if let Some(field) = Nutrition::FIELDS.iter().find(|f| **f == s) {
            return Ok(Metric::Nutrient(*field));
        }

        match s {
            "calories_burned" => Ok(Metric::CaloriesBurned),
            "net_calories" => Ok(Metric::NetCalories),
            "exercise_volume" => Ok(Metric::ExerciseVolume),
            "exercise_sets" => Ok(Metric::ExerciseSets),
            "food_entries" => Ok(Metric::FoodEntries),
            _ => Err(unknown()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Metric::Nutrient(field) => field.to_string(),
            Metric::CaloriesBurned => "calories_burned".to_string(),
            Metric::NetCalories => "net_calories".to_string(),
            Metric::ExerciseVolume => "exercise_volume".to_string(),
            Metric::ExerciseSets => "exercise_sets".to_string(),
            Metric::FoodEntries => "food_entries".to_string(),
            Metric::Custom(name) => format!("custom:{}", name),
        }
    }

    /// Value of the metric for one day
    pub fn value(&self, totals: &DailyTotals) -> f64 {
        match self {
            Metric::Nutrient(field) => totals.nutrition.get(field).unwrap_or(0.0),
            Metric::CaloriesBurned => totals.calories_burned(),
            Metric::NetCalories => totals.net_calories(),
            Metric::ExerciseVolume => totals.exercise_volume,
            Metric::ExerciseSets => f64::from(totals.exercise_sets),
            Metric::FoodEntries => f64::from(totals.food_entries),
            Metric::Custom(name) => totals.custom.get(name).copied().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Day,
    Week,
    Month,
}

impl GroupBy {
    pub fn parse(s: &str) -> Result<Self, ChartError> {
        match s {
            "day" => Ok(GroupBy::Day),
            "week" => Ok(GroupBy::Week),
            "month" => Ok(GroupBy::Month),
            _ => Err(ChartError::UnknownValue {
                field: "groupBy",
                value: s.to_string(),
            }),
        }
    }

    /// First day of the bucket containing `date`; weeks start on Monday.
    ///
    /// `None` when that day falls before the first representable date.
    pub fn bucket_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            GroupBy::Day => Some(date),
            GroupBy::Week => date.checked_sub_signed(Duration::days(i64::from(
                date.weekday().num_days_from_monday(),
            ))),
            GroupBy::Month => date.with_day(1),
        }
    }

    /// First day of the bucket after the one starting at `start`.
    ///
    /// `None` past the last representable date.
    pub fn next_bucket(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            GroupBy::Day => start.succ_opt(),
            GroupBy::Week => start.checked_add_signed(Duration::days(7)),
            GroupBy::Month => {
                let (year, month) = if start.month() == 12 {
                    (start.year().checked_add(1)?, 1)
                } else {
                    (start.year(), start.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Count,
    Average,
}

impl Aggregation {
    pub fn parse(s: &str) -> Result<Self, ChartError> {
        match s {
            "sum" => Ok(Aggregation::Sum),
            "count" => Ok(Aggregation::Count),
            "average" | "avg" => Ok(Aggregation::Average),
            _ => Err(ChartError::UnknownValue {
                field: "aggregation",
                value: s.to_string(),
            }),
        }
    }

    /// Combine the daily values of one bucket
    pub fn apply(&self, values: &[f64]) -> f64 {
        let active = values.iter().filter(|v| **v != 0.0).count();
        match self {
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Count => active as f64,
            Aggregation::Average => {
                if active == 0 {
                    0.0
                } else {
                    values.iter().sum::<f64>() / active as f64
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
}

impl ChartType {
    pub fn parse(s: &str) -> Result<Self, ChartError> {
        match s {
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            _ => Err(ChartError::UnknownValue {
                field: "chartType",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRange {
    /// N days ending at the anchor date, inclusive
    LastDays(u32),
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn parse(value: &Value) -> Result<Self, ChartError> {
        match value {
            Value::String(preset) => match preset.as_str() {
                "week" => Ok(DateRange::LastDays(7)),
                "month" => Ok(DateRange::LastDays(30)),
                "quarter" => Ok(DateRange::LastDays(90)),
                "year" => Ok(DateRange::LastDays(365)),
                _ => Err(ChartError::UnknownValue {
                    field: "dateRange",
                    value: preset.clone(),
                }),
            },
            Value::Object(map) => Self::parse_object(map),
            _ => Err(ChartError::WrongType {
                field: "dateRange",
                expected: "a preset name or an object",
            }),
        }
    }

    fn parse_object(map: &Map<String, Value>) -> Result<Self, ChartError> {
        if let Some(key) = map
            .keys()
            .find(|k| !matches!(k.as_str(), "lastDays" | "start" | "end"))
        {
            return Err(ChartError::UnknownField(format!("dateRange.{}", key)));
        }

        if let Some(days) = map.get("lastDays") {
            if map.len() > 1 {
                return Err(ChartError::InvalidDateRange(
                    "lastDays cannot be combined with start/end".to_string(),
                ));
            }
            let days = days
                .as_u64()
                .filter(|d| (1..=MAX_RANGE_DAYS as u64).contains(d))
                .ok_or_else(|| {
                    ChartError::InvalidDateRange(format!(
                        "lastDays must be an integer from 1 to {}",
                        MAX_RANGE_DAYS
                    ))
                })?;
            return Ok(DateRange::LastDays(days as u32));
        }

        let start = parse_date(map.get("start"), "start")?;
        let end = parse_date(map.get("end"), "end")?;
        if start > end {
            return Err(ChartError::InvalidDateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
            return Err(ChartError::InvalidDateRange(format!(
                "range is longer than {} days",
                MAX_RANGE_DAYS
            )));
        }
        Ok(DateRange::Between { start, end })
    }

    /// Inclusive first and last day of the range
    pub fn resolve(&self, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate), ChartError> {
        match self {
            DateRange::LastDays(days) => anchor
                .checked_sub_signed(Duration::days(i64::from(*days) - 1))
                .map(|start| (start, anchor))
                .ok_or_else(|| {
                    ChartError::InvalidDateRange(format!(
                        "{} days before {} is out of range",
                        days, anchor
                    ))
                }),
            DateRange::Between { start, end } => Ok((*start, *end)),
        }
    }
}

fn parse_date(value: Option<&Value>, field: &str) -> Result<NaiveDate, ChartError> {
    let text = value
        .and_then(Value::as_str)
        .ok_or_else(|| ChartError::InvalidDateRange(format!("{} must be a YYYY-MM-DD string", field)))?;
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ChartError::InvalidDateRange(format!("{} is not a valid date: {}", field, text)))
}

fn string_field<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ChartError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ChartError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

/// A validated chart spec
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub metric: Metric,
    pub group_by: GroupBy,
    pub date_range: DateRange,
    pub aggregation: Aggregation,
    pub chart_type: ChartType,
}

impl ChartSpec {
    pub fn parse(value: &Value) -> Result<Self, ChartError> {
        let map = value.as_object().ok_or(ChartError::NotAnObject)?;

        if let Some(key) = map.keys().find(|k| !SPEC_FIELDS.contains(&k.as_str())) {
            return Err(ChartError::UnknownField(key.clone()));
        }

        let metric = string_field(map, "metric")?
            .ok_or(ChartError::MissingField("metric"))
            .and_then(Metric::parse)?;
        let group_by = string_field(map, "groupBy")?
            .map(GroupBy::parse)
            .transpose()?
            .unwrap_or(GroupBy::Day);
        let date_range = match map.get("dateRange") {
            None | Some(Value::Null) => return Err(ChartError::MissingField("dateRange")),
            Some(range) => DateRange::parse(range)?,
        };
        let aggregation = string_field(map, "aggregation")?
            .map(Aggregation::parse)
            .transpose()?
            .unwrap_or(Aggregation::Sum);
        let chart_type = string_field(map, "chartType")?
            .map(ChartType::parse)
            .transpose()?
            .unwrap_or(ChartType::Line);

        Ok(Self {
            metric,
            group_by,
            date_range,
            aggregation,
            chart_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_with_defaults() {
        let spec = ChartSpec::parse(&json!({"metric": "protein", "dateRange": "month"})).unwrap();
        assert_eq!(spec.metric, Metric::Nutrient("protein"));
        assert_eq!(spec.group_by, GroupBy::Day);
        assert_eq!(spec.date_range, DateRange::LastDays(30));
        assert_eq!(spec.aggregation, Aggregation::Sum);
        assert_eq!(spec.chart_type, ChartType::Line);
    }

    #[test]
    fn test_unknown_values_fail() {
        let err = ChartSpec::parse(&json!({
            "metric": "calories", "groupBy": "fortnight", "dateRange": "week"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ChartError::UnknownValue { field: "groupBy", value: "fortnight".to_string() }
        );

        assert!(matches!(
            ChartSpec::parse(&json!({"metric": "vibes", "dateRange": "week"})),
            Err(ChartError::UnknownValue { field: "metric", .. })
        ));
        assert!(matches!(
            ChartSpec::parse(&json!({"metric": "fat", "dateRange": "week", "colour": "red"})),
            Err(ChartError::UnknownField(f)) if f == "colour"
        ));
        assert!(matches!(
            ChartSpec::parse(&json!({"metric": "fat", "dateRange": "week", "groupBy": 7})),
            Err(ChartError::WrongType { field: "groupBy", .. })
        ));
        assert_eq!(ChartSpec::parse(&json!(["metric"])), Err(ChartError::NotAnObject));
        assert_eq!(
            ChartSpec::parse(&json!({"dateRange": "week"})),
            Err(ChartError::MissingField("metric"))
        );
    }

    #[test]
    fn test_date_ranges() {
        let anchor = date("2026-03-10");
        let last = DateRange::parse(&json!({"lastDays": 7})).unwrap();
        assert_eq!(last.resolve(anchor).unwrap(), (date("2026-03-04"), anchor));

        let between = DateRange::parse(&json!({"start": "2026-01-01", "end": "2026-01-31"})).unwrap();
        assert_eq!(between.resolve(anchor).unwrap(), (date("2026-01-01"), date("2026-01-31")));

        assert!(DateRange::parse(&json!({"lastDays": 0})).is_err());
        assert!(DateRange::parse(&json!({"lastDays": 731})).is_err());
        assert!(DateRange::parse(&json!({"lastDays": 7, "start": "2026-01-01"})).is_err());
        assert!(matches!(
            DateRange::parse(&json!({"start": "2026-02-01", "end": "2026-01-01"})),
            Err(ChartError::InvalidDateRange(_))
        ));
        assert!(DateRange::parse(&json!({"start": "yesterday", "end": "2026-01-01"})).is_err());
        assert!(DateRange::parse(&json!("decade")).is_err());
    }

    #[test]
    fn test_custom_metric_names() {
        assert_eq!(
            Metric::parse("custom:Water Intake").unwrap(),
            Metric::Custom("water_intake".to_string())
        );
        assert!(Metric::parse("custom:").is_err());
        assert_eq!(Metric::parse("custom:steps").unwrap().name(), "custom:steps");
    }

    #[test]
    fn test_buckets() {
        // 2026-03-12 is a Thursday
        assert_eq!(GroupBy::Week.bucket_start(date("2026-03-12")), Some(date("2026-03-09")));
        assert_eq!(GroupBy::Month.bucket_start(date("2026-03-12")), Some(date("2026-03-01")));
        assert_eq!(GroupBy::Month.next_bucket(date("2026-12-01")), Some(date("2027-01-01")));
        assert_eq!(GroupBy::Day.next_bucket(NaiveDate::MAX), None);
        assert!(DateRange::LastDays(30).resolve(NaiveDate::MIN).is_err());
    }

    #[test]
    fn test_aggregations() {
        let values = [100.0, 0.0, 50.0];
        assert_eq!(Aggregation::Sum.apply(&values), 150.0);
        assert_eq!(Aggregation::Count.apply(&values), 2.0);
        assert_eq!(Aggregation::Average.apply(&values), 75.0);
        assert_eq!(Aggregation::Average.apply(&[0.0, 0.0]), 0.0);
    }
}
