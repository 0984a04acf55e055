//! Food MCP Tools
//!
//! Tools for logging and editing food items.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{FoodItem, FoodItemCreate, FoodItemUpdate, Nutrition};
use super::{parse_date, DeleteResponse};

/// Response for list_food_for_day
#[derive(Debug, Serialize)]
pub struct FoodDayResponse {
    pub date: String,
    pub items: Vec<FoodItem>,
    pub total: usize,
    pub nutrition: Nutrition,
}

/// Response for update_food
#[derive(Debug, Serialize)]
pub struct UpdateFoodResponse {
    pub success: bool,
    pub updated_at: String,
}

fn check_nutrition(nutrition: &Nutrition) -> Result<(), String> {
    if nutrition.has_invalid_values() {
        return Err("Nutrition values must be finite and non-negative".to_string());
    }
    Ok(())
}

/// Log a food item
pub fn log_food(db: &Database, data: FoodItemCreate) -> Result<FoodItem, String> {
    parse_date(&data.date)?;
    if data.description.trim().is_empty() {
        return Err("Description must not be empty".to_string());
    }
    check_nutrition(&data.nutrition)?;

    let item = db
        .with_conn(|conn| FoodItem::create(conn, &data))
        .map_err(|e| format!("Failed to log food: {}", e))?;

    info!(
        "Logged food {} on {}: {} ({} kcal)",
        item.id, item.date, item.description, item.nutrition.calories
    );
    Ok(item)
}

/// Get a food item by ID
pub fn get_food(db: &Database, id: &str) -> Result<Option<FoodItem>, String> {
    db.with_conn(|conn| FoodItem::get_by_id(conn, id))
        .map_err(|e| format!("Failed to get food item: {}", e))
}

/// All food logged on a day with its nutrition total
pub fn list_food_for_day(db: &Database, date: &str) -> Result<FoodDayResponse, String> {
    parse_date(date)?;

    let items = db
        .with_conn(|conn| FoodItem::list_for_date(conn, date))
        .map_err(|e| format!("Failed to list food: {}", e))?;
    let nutrition = items.iter().map(|i| i.nutrition).sum();

    Ok(FoodDayResponse {
        date: date.to_string(),
        total: items.len(),
        items,
        nutrition,
    })
}

/// Update a food item
pub fn update_food(db: &Database, id: &str, data: FoodItemUpdate) -> Result<UpdateFoodResponse, String> {
    if let Some(date) = &data.date {
        parse_date(date)?;
    }
    if let Some(description) = &data.description {
        if description.trim().is_empty() {
            return Err("Description must not be empty".to_string());
        }
    }
    let nutrients = [
        data.calories,
        data.protein,
        data.carbs,
        data.fiber,
        data.sugar,
        data.fat,
        data.saturated_fat,
        data.sodium,
        data.cholesterol,
    ];
    if nutrients.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Nutrition values must be finite and non-negative".to_string());
    }

    let item = db
        .with_conn(|conn| FoodItem::update(conn, id, &data))
        .map_err(|e| format!("Failed to update food item: {}", e))?
        .ok_or_else(|| format!("Food item not found: {}", id))?;

    info!("Updated food {}", item.id);
    Ok(UpdateFoodResponse {
        success: true,
        updated_at: item.updated_at,
    })
}

/// Delete a food item
pub fn delete_food(db: &Database, id: &str) -> Result<DeleteResponse, String> {
    let deleted = db
        .with_conn(|conn| FoodItem::delete(conn, id))
        .map_err(|e| format!("Failed to delete food item: {}", e))?;

    if !deleted {
        return Err(format!("Food item not found: {}", id));
    }

    info!("Deleted food {}", id);
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}
