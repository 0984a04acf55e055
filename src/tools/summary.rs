//! Daily totals MCP Tool

use serde::Serialize;

use crate::db::Database;
use crate::models::{DailyTotals, Nutrition};
use super::parse_date;

/// Response for get_daily_totals
#[derive(Debug, Serialize)]
pub struct DailyTotalsResponse {
    pub start: String,
    pub end: String,
    /// Only days with logged data
    pub days: Vec<DailyTotals>,
    pub days_logged: usize,
    pub nutrition: Nutrition,
    pub calories_burned_low: f64,
    pub calories_burned_high: f64,
}

/// Per-day totals for a date range plus the range total
pub fn get_daily_totals(db: &Database, start: &str, end: &str) -> Result<DailyTotalsResponse, String> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date > end_date {
        return Err(format!("Start date {} is after end date {}", start, end));
    }

    let days = db
        .with_conn(|conn| DailyTotals::load_range(conn, start_date, end_date))
        .map_err(|e| format!("Failed to load totals: {}", e))?;

    Ok(DailyTotalsResponse {
        start: start.to_string(),
        end: end.to_string(),
        days_logged: days.len(),
        nutrition: days.iter().map(|d| d.nutrition).sum(),
        calories_burned_low: days.iter().map(|d| d.calories_burned_low).sum(),
        calories_burned_high: days.iter().map(|d| d.calories_burned_high).sum(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItemCreate, MealSlot};
    use crate::tools::{food, test_db};

    #[test]
    fn test_range_totals() {
        let (_dir, db) = test_db();
        for (date, calories) in [("2026-04-01", 600.0), ("2026-04-01", 400.0), ("2026-04-03", 900.0)] {
            food::log_food(&db, FoodItemCreate {
                id: None,
                date: date.to_string(),
                meal: MealSlot::Dinner,
                description: "pasta".to_string(),
                nutrition: Nutrition { calories, ..Nutrition::zero() },
                logged_at: None,
            })
            .unwrap();
        }

        let totals = get_daily_totals(&db, "2026-04-01", "2026-04-07").unwrap();
        assert_eq!(totals.days_logged, 2);
        assert_eq!(totals.nutrition.calories, 1900.0);
        assert_eq!(totals.days[0].food_entries, 2);
        assert!(get_daily_totals(&db, "2026-04-07", "2026-04-01").is_err());
    }
}
