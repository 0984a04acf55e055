//! Per-day aggregates
//!
//! Built from logged food, exercise and custom log entries; the input to the
//! chart evaluator.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{CustomLogEntry, ExerciseSet, FoodItem, Nutrition};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub nutrition: Nutrition,
    pub food_entries: u32,
    pub exercise_sets: u32,
    pub exercise_volume: f64,
    pub calories_burned_low: f64,
    pub calories_burned_high: f64,
    /// Custom log totals by type name
    #[serde(default)]
    pub custom: BTreeMap<String, f64>,
}

fn day_entry<'a>(
    days: &'a mut BTreeMap<NaiveDate, DailyTotals>,
    date: &str,
) -> Option<&'a mut DailyTotals> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    Some(days.entry(date).or_insert_with(|| DailyTotals::empty(date)))
}

impl DailyTotals {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            nutrition: Nutrition::zero(),
            food_entries: 0,
            exercise_sets: 0,
            exercise_volume: 0.0,
            calories_burned_low: 0.0,
            calories_burned_high: 0.0,
            custom: BTreeMap::new(),
        }
    }

    /// Midpoint of the burned-calorie bounds
    pub fn calories_burned(&self) -> f64 {
        (self.calories_burned_low + self.calories_burned_high) / 2.0
    }

    /// Calories eaten minus calories burned
    pub fn net_calories(&self) -> f64 {
        self.nutrition.calories - self.calories_burned()
    }

    /// Fold another record for the same day into this one
    pub fn merge(&mut self, other: &DailyTotals) {
        self.nutrition = self.nutrition + other.nutrition;
        self.food_entries += other.food_entries;
        self.exercise_sets += other.exercise_sets;
        self.exercise_volume += other.exercise_volume;
        self.calories_burned_low += other.calories_burned_low;
        self.calories_burned_high += other.calories_burned_high;
        for (name, value) in &other.custom {
            *self.custom.entry(name.clone()).or_insert(0.0) += value;
        }
    }

    /// Aggregate entries into one record per date that has any data, ascending.
    /// Rows whose date does not parse are skipped.
    pub fn aggregate(
        foods: &[FoodItem],
        sets: &[ExerciseSet],
        custom: &[(String, String, f64)],
    ) -> Vec<DailyTotals> {
        let mut days: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();

        for food in foods {
            if let Some(totals) = day_entry(&mut days, &food.date) {
                totals.nutrition = totals.nutrition + food.nutrition;
                totals.food_entries += 1;
            }
        }

        for set in sets {
            if let Some(totals) = day_entry(&mut days, &set.date) {
                totals.exercise_sets += 1;
                totals.exercise_volume += set.volume();
                if let Some(estimate) = set.estimated_calories {
                    totals.calories_burned_low += estimate.low();
                    totals.calories_burned_high += estimate.high();
                }
            }
        }

        for (date, name, value) in custom {
            if let Some(totals) = day_entry(&mut days, date) {
                *totals.custom.entry(name.clone()).or_insert(0.0) += value;
            }
        }

        days.into_values().collect()
    }

    /// Totals for every date in `start..=end` that has data
    pub fn load_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Self>> {
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();

        let foods = FoodItem::list_by_date_range(conn, &start, &end)?;
        let sets = ExerciseSet::list_by_date_range(conn, &start, &end, None)?;
        let custom = CustomLogEntry::totals_by_date_range(conn, &start, &end)?;

        Ok(Self::aggregate(&foods, &sets, &custom))
    }
}
