//! Data models
//!
//! Rust structs representing database entities.

mod custom_log;
mod daily_totals;
mod exercise_set;
mod food_item;
mod nutrition;
mod saved_template;
mod user_settings;

pub use custom_log::{normalize_log_name, CustomLogEntry, CustomLogType};
pub use daily_totals::{DailyTotals, DATE_FORMAT};
pub use exercise_set::{ExerciseSet, ExerciseSetCreate};
pub use food_item::{FoodItem, FoodItemCreate, FoodItemUpdate, MealSlot};
pub use nutrition::Nutrition;
pub use saved_template::{
    MealItem, SavedTemplate, SavedTemplateCreate, TemplateItems, TemplateKind, LAST_USED_FORMAT,
};
pub use user_settings::{UserSettings, UserSettingsUpdate};
