//! Chart evaluation
//!
//! Turns a chart spec and per-day totals into a plot-ready series. Pure:
//! the anchor date is supplied by the caller and nothing is read from the
//! store here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::DailyTotals;
use super::dsl::{Aggregation, ChartSpec, ChartType, GroupBy};
use super::error::ChartError;
use super::labels::label_mask;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// First day of the bucket
    pub date: NaiveDate,
    pub value: f64,
    /// Axis label, absent for thinned points
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub metric: String,
    pub group_by: GroupBy,
    pub aggregation: Aggregation,
    pub chart_type: ChartType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub points: Vec<ChartPoint>,
    pub label_mask: Vec<bool>,
}

pub struct ChartEvaluator {
    anchor: NaiveDate,
}

impl ChartEvaluator {
    /// `anchor` is "today" for relative date ranges
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Inclusive date range a spec covers, for loading totals
    pub fn range_for(&self, spec: &ChartSpec) -> Result<(NaiveDate, NaiveDate), ChartError> {
        spec.date_range.resolve(self.anchor)
    }

    /// Parse and evaluate a JSON chart spec
    pub fn evaluate(&self, dsl: &Value, totals: &[DailyTotals]) -> Result<ChartSeries, ChartError> {
        let spec = ChartSpec::parse(dsl)?;
        self.evaluate_spec(&spec, totals)
    }

    pub fn evaluate_spec(
        &self,
        spec: &ChartSpec,
        totals: &[DailyTotals],
    ) -> Result<ChartSeries, ChartError> {
        let (start, end) = self.range_for(spec)?;
        let out_of_range = || {
            ChartError::InvalidDateRange(format!(
                "{} to {} reaches past the supported calendar",
                start, end
            ))
        };

        // Duplicate dates are summed
        let mut by_date: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();
        for day in totals.iter().filter(|t| t.date >= start && t.date <= end) {
            by_date
                .entry(day.date)
                .and_modify(|existing| existing.merge(day))
                .or_insert_with(|| day.clone());
        }

        let mut points = Vec::new();
        let mut bucket = spec.group_by.bucket_start(start).ok_or_else(out_of_range)?;
        while bucket <= end {
            let next = spec.group_by.next_bucket(bucket).ok_or_else(out_of_range)?;
            let values: Vec<f64> = start
                .max(bucket)
                .iter_days()
                .take_while(|d| *d < next && *d <= end)
                .map(|d| by_date.get(&d).map(|t| spec.metric.value(t)).unwrap_or(0.0))
                .collect();

            points.push(ChartPoint {
                date: bucket,
                value: round2(spec.aggregation.apply(&values)),
                label: None,
            });
            bucket = next;
        }

        let mask = label_mask(points.len());
        for (point, labeled) in points.iter_mut().zip(&mask) {
            if *labeled {
                point.label = Some(format_label(spec.group_by, point.date));
            }
        }

        debug!(
            "Evaluated {} chart: {} points from {} to {}",
            spec.metric.name(),
            points.len(),
            start,
            end
        );

        Ok(ChartSeries {
            metric: spec.metric.name(),
            group_by: spec.group_by,
            aggregation: spec.aggregation,
            chart_type: spec.chart_type,
            start,
            end,
            points,
            label_mask: mask,
        })
    }
}

fn format_label(group_by: GroupBy, date: NaiveDate) -> String {
    match group_by {
        GroupBy::Day | GroupBy::Week => date.format("%m/%d").to_string(),
        GroupBy::Month => date.format("%b %Y").to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrition, DATE_FORMAT};
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn day(s: &str, calories: f64) -> DailyTotals {
        let mut totals = DailyTotals::empty(date(s));
        totals.nutrition = Nutrition { calories, ..Nutrition::zero() };
        totals.food_entries = 1;
        totals
    }

    #[test]
    fn test_seven_days_contiguous_and_labeled() {
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        let totals = vec![day("2026-03-05", 1800.0), day("2026-03-10", 2100.0)];
        let series = evaluator
            .evaluate(&json!({"metric": "calories", "dateRange": {"lastDays": 7}}), &totals)
            .unwrap();

        assert_eq!(series.points.len(), 7);
        assert_eq!(series.label_mask.len(), 7);
        assert_eq!(series.points[0].date, date("2026-03-04"));
        assert!(series
            .points
            .windows(2)
            .all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
        assert_eq!(series.points[1].value, 1800.0);
        assert_eq!(series.points[2].value, 0.0);
        assert_eq!(series.points[6].value, 2100.0);
        assert!(series.label_mask[6]);
        assert_eq!(series.points[6].label.as_deref(), Some("03/10"));
    }

    #[test]
    fn test_unknown_group_by_is_error() {
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        let result = evaluator.evaluate(
            &json!({"metric": "calories", "groupBy": "hour", "dateRange": "week"}),
            &[],
        );
        assert!(matches!(result, Err(ChartError::UnknownValue { field: "groupBy", .. })));
    }

    #[test]
    fn test_range_at_calendar_end_is_error() {
        let last = NaiveDate::MAX.format(DATE_FORMAT).to_string();
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        for group_by in ["day", "week", "month"] {
            let result = evaluator.evaluate(
                &json!({
                    "metric": "calories",
                    "groupBy": group_by,
                    "dateRange": {"start": last, "end": last}
                }),
                &[],
            );
            assert!(
                matches!(result, Err(ChartError::InvalidDateRange(_))),
                "groupBy {} gave {:?}",
                group_by,
                result
            );
        }

        let anchored = ChartEvaluator::new(NaiveDate::MAX)
            .evaluate(&json!({"metric": "calories", "dateRange": "week"}), &[]);
        assert!(matches!(anchored, Err(ChartError::InvalidDateRange(_))));
    }

    #[test]
    fn test_weekly_average_over_active_days() {
        // Monday 2026-03-02 through Sunday 2026-03-15
        let evaluator = ChartEvaluator::new(date("2026-03-15"));
        let totals = vec![
            day("2026-03-02", 2000.0),
            day("2026-03-04", 1000.0),
            day("2026-03-10", 1500.0),
        ];
        let series = evaluator
            .evaluate(
                &json!({
                    "metric": "calories",
                    "groupBy": "week",
                    "aggregation": "average",
                    "dateRange": {"start": "2026-03-02", "end": "2026-03-15"}
                }),
                &totals,
            )
            .unwrap();

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].date, date("2026-03-02"));
        assert_eq!(series.points[0].value, 1500.0);
        assert_eq!(series.points[1].value, 1500.0);
    }

    #[test]
    fn test_monthly_count_clips_to_range() {
        let evaluator = ChartEvaluator::new(date("2026-02-10"));
        let totals = vec![
            day("2026-01-05", 100.0),
            day("2026-01-20", 100.0),
            day("2026-02-01", 100.0),
            day("2026-02-11", 100.0),
        ];
        let series = evaluator
            .evaluate(
                &json!({
                    "metric": "food_entries",
                    "groupBy": "month",
                    "aggregation": "count",
                    "dateRange": {"start": "2026-01-10", "end": "2026-02-10"}
                }),
                &totals,
            )
            .unwrap();

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].date, date("2026-01-01"));
        assert_eq!(series.points[0].value, 1.0);
        assert_eq!(series.points[1].value, 1.0);
        assert_eq!(series.points[1].label.as_deref(), Some("Feb 2026"));
    }

    #[test]
    fn test_duplicate_dates_are_summed() {
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        let totals = vec![day("2026-03-10", 500.0), day("2026-03-10", 250.0)];
        let series = evaluator
            .evaluate(&json!({"metric": "calories", "dateRange": {"lastDays": 1}}), &totals)
            .unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, 750.0);
    }

    #[test]
    fn test_long_series_thinned() {
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        let series = evaluator
            .evaluate(&json!({"metric": "protein", "dateRange": "quarter"}), &[])
            .unwrap();
        assert_eq!(series.points.len(), 90);
        assert!(series.points[89].label.is_some());
        assert!(series.points[88].label.is_none());
        assert_eq!(series.end, date("2026-03-10"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let evaluator = ChartEvaluator::new(date("2026-03-10"));
        let series = evaluator
            .evaluate(&json!({"metric": "custom:water", "dateRange": "week", "chartType": "bar"}), &[])
            .unwrap();
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["labelMask"].as_array().unwrap().len(), 7);
        assert_eq!(value["chartType"], "bar");
        assert_eq!(value["points"][0]["date"], "2026-03-04");
    }
}
