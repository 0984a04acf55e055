//! Logged food item
//!
//! One food eaten on a day, with its nutrition. Ids are generated by the
//! client (UUID v4 when the caller does not supply one).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Nutrition;

/// Meal slot a food item was logged under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Unspecified,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
            MealSlot::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealSlot::Breakfast,
            "lunch" => MealSlot::Lunch,
            "dinner" | "supper" => MealSlot::Dinner,
            "snack" | "snacks" => MealSlot::Snack,
            _ => MealSlot::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub date: String,
    pub meal: MealSlot,
    pub description: String,
    pub nutrition: Nutrition,
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    /// Client id; generated when absent
    pub id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub meal: MealSlot,
    pub description: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub logged_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub date: Option<String>,
    pub meal: Option<MealSlot>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub sodium: Option<f64>,
    pub cholesterol: Option<f64>,
}

impl FoodItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal: MealSlot::from_str(row.get::<_, String>("meal")?.as_str()),
            description: row.get("description")?,
            nutrition: Nutrition {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fiber: row.get("fiber")?,
                sugar: row.get("sugar")?,
                fat: row.get("fat")?,
                saturated_fat: row.get("saturated_fat")?,
                sodium: row.get("sodium")?,
                cholesterol: row.get("cholesterol")?,
            },
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new food item
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        let id = data
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let logged_at = data.logged_at.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });
        let n = &data.nutrition;

        conn.execute(
            r#"
            INSERT INTO food_items (
                id, date, meal, description,
                calories, protein, carbs, fiber, sugar, fat, saturated_fat, sodium, cholesterol,
                logged_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                id,
                data.date,
                data.meal.as_str(),
                data.description,
                n.calories,
                n.protein,
                n.carbs,
                n.fiber,
                n.sugar,
                n.fat,
                n.saturated_fat,
                n.sodium,
                n.cholesterol,
                logged_at,
            ],
        )?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Food items logged on a date, in the order they were eaten
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE date = ?1 ORDER BY logged_at, created_at"
        )?;
        let items = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Food items with `start <= date <= end`
    pub fn list_by_date_range(conn: &Connection, start: &str, end: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE date >= ?1 AND date <= ?2 ORDER BY date, logged_at"
        )?;
        let items = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Update a food item; `None` if it does not exist
    pub fn update(conn: &Connection, id: &str, data: &FoodItemUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(date, "date");
        add_update!(description, "description");
        add_update!(calories, "calories");
        add_update!(protein, "protein");
        add_update!(carbs, "carbs");
        add_update!(fiber, "fiber");
        add_update!(sugar, "sugar");
        add_update!(fat, "fat");
        add_update!(saturated_fat, "saturated_fat");
        add_update!(sodium, "sodium");
        add_update!(cholesterol, "cholesterol");

        if let Some(meal) = data.meal {
            updates.push(format!("meal = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(meal.as_str()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE food_items SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id.to_string()));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Returns Ok(false) if the item did not exist
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
