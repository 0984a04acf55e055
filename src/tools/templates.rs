//! Saved meal and routine MCP Tools
//!
//! Save a group of food items or exercise sets under a name, find the saved
//! template closest to a new description, and log a template again in one
//! call.

use serde::Serialize;
use tracing::info;

use crate::calories;
use crate::db::Database;
use crate::models::{
    ExerciseSet, ExerciseSetCreate, FoodItem, FoodItemCreate, MealSlot, SavedTemplate,
    SavedTemplateCreate, TemplateItems, TemplateKind, LAST_USED_FORMAT,
};
use crate::similarity::SimilarityMatcher;
use super::{exercise, food, parse_date, DeleteResponse};

/// Response for save_template
#[derive(Debug, Serialize)]
pub struct SaveTemplateResponse {
    pub template: SavedTemplate,
    /// False when an identical template already existed and was returned instead
    pub created: bool,
}

/// A suggested template and how closely it matched
#[derive(Debug, Serialize)]
pub struct TemplateSuggestion {
    pub template: SavedTemplate,
    pub score: f64,
    pub exact_duplicate: bool,
}

/// Response for suggest_template
#[derive(Debug, Serialize)]
pub struct SuggestTemplateResponse {
    pub suggestion: Option<TemplateSuggestion>,
    pub threshold: f64,
    pub candidates: usize,
}

/// Response for list_templates
#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<SavedTemplate>,
    pub total: usize,
}

/// Response for use_template
#[derive(Debug, Serialize)]
pub struct UseTemplateResponse {
    pub template: SavedTemplate,
    pub food_items: Vec<FoodItem>,
    pub exercise_sets: Vec<ExerciseSet>,
}

fn validate(data: &mut SavedTemplateCreate) -> Result<(), String> {
    if data.name.trim().is_empty() {
        return Err("Template name must not be empty".to_string());
    }
    if data.items.is_empty() {
        return Err("Template must contain at least one item".to_string());
    }
    match &mut data.items {
        TemplateItems::Meal(items) => {
            if items.iter().any(|i| i.description.trim().is_empty()) {
                return Err("Every meal item needs a description".to_string());
            }
            if items.iter().any(|i| i.nutrition.has_invalid_values()) {
                return Err("Nutrition values must be finite and non-negative".to_string());
            }
        }
        TemplateItems::Routine(items) => {
            for item in items.iter_mut() {
                item.exercise_key = calories::canonical_key(&item.exercise_key);
                if item.exercise_key.is_empty() {
                    return Err("Every routine item needs an exercise name".to_string());
                }
            }
        }
    }
    Ok(())
}

fn list(db: &Database, kind: Option<TemplateKind>) -> Result<Vec<SavedTemplate>, String> {
    db.with_conn(|conn| SavedTemplate::list(conn, kind))
        .map_err(|e| format!("Failed to list templates: {}", e))
}

/// Save a meal or routine; an exact duplicate returns the existing template
pub fn save_template(db: &Database, mut data: SavedTemplateCreate) -> Result<SaveTemplateResponse, String> {
    validate(&mut data)?;

    let signature = data.items.signature();
    let existing = list(db, Some(data.items.kind()))?
        .into_iter()
        .find(|t| t.signature == signature);
    if let Some(template) = existing {
        info!("Template '{}' duplicates {}", data.name, template.id);
        return Ok(SaveTemplateResponse {
            template,
            created: false,
        });
    }

    let template = db
        .with_conn(|conn| SavedTemplate::create(conn, &data))
        .map_err(|e| format!("Failed to save template: {}", e))?;

    info!(
        "Saved {} template {} '{}' with {} items",
        template.items.kind().as_str(),
        template.id,
        template.name,
        template.items.len()
    );
    Ok(SaveTemplateResponse {
        template,
        created: true,
    })
}

/// Best saved template for a description, optionally also comparing item lists
pub fn suggest_template(
    db: &Database,
    matcher: &SimilarityMatcher,
    text: &str,
    kind: Option<TemplateKind>,
    items: Option<&TemplateItems>,
) -> Result<SuggestTemplateResponse, String> {
    let kind = kind.or_else(|| items.map(TemplateItems::kind));
    let templates = list(db, kind)?;
    let signature = items.map(TemplateItems::signature);

    let suggestion = matcher
        .best_match_with_signature(text, signature.as_deref(), &templates)
        .map(|m| TemplateSuggestion {
            template: m.entry.clone(),
            score: m.score,
            exact_duplicate: m.exact_duplicate,
        });

    Ok(SuggestTemplateResponse {
        suggestion,
        threshold: matcher.threshold(),
        candidates: templates.len(),
    })
}

/// Saved templates, most recently used first
pub fn list_templates(db: &Database, kind: Option<&str>) -> Result<ListTemplatesResponse, String> {
    let kind = kind
        .map(|k| {
            TemplateKind::from_str(k)
                .ok_or_else(|| format!("Invalid template kind: '{}'. Valid kinds: meal, routine", k))
        })
        .transpose()?;

    let templates = list(db, kind)?;
    Ok(ListTemplatesResponse {
        total: templates.len(),
        templates,
    })
}

/// Log every item of a template on a date and record the use
pub fn use_template(
    db: &Database,
    id: i64,
    date: &str,
    meal: Option<MealSlot>,
) -> Result<UseTemplateResponse, String> {
    parse_date(date)?;

    let template = db
        .with_conn(|conn| SavedTemplate::get_by_id(conn, id))
        .map_err(|e| format!("Failed to get template: {}", e))?
        .ok_or_else(|| format!("Template not found: {}", id))?;

    let mut food_items = Vec::new();
    let mut exercise_sets = Vec::new();

    match &template.items {
        TemplateItems::Meal(items) => {
            for item in items {
                food_items.push(food::log_food(db, FoodItemCreate {
                    id: None,
                    date: date.to_string(),
                    meal: meal.unwrap_or_default(),
                    description: item.description.clone(),
                    nutrition: item.nutrition,
                    logged_at: None,
                })?);
            }
        }
        TemplateItems::Routine(items) => {
            for item in items {
                let logged = exercise::log_exercise_set(db, ExerciseSetCreate {
                    id: None,
                    date: date.to_string(),
                    exercise_key: item.exercise_key.clone(),
                    subtype: item.subtype.clone(),
                    sets: item.sets,
                    reps: item.reps,
                    weight: item.weight,
                    duration_minutes: item.duration_minutes,
                    distance: item.distance,
                    metadata: item.metadata.clone(),
                    logged_at: None,
                })?;
                exercise_sets.push(logged.set);
            }
        }
    }

    let now = chrono::Utc::now().format(LAST_USED_FORMAT).to_string();
    let template = db
        .with_conn(|conn| SavedTemplate::mark_used(conn, id, &now))
        .map_err(|e| format!("Failed to update template: {}", e))?
        .ok_or_else(|| format!("Template not found: {}", id))?;

    info!(
        "Used template {} '{}' on {} (use #{})",
        template.id, template.name, date, template.use_count
    );

    Ok(UseTemplateResponse {
        template,
        food_items,
        exercise_sets,
    })
}

/// Delete a saved template
pub fn delete_template(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let deleted = db
        .with_conn(|conn| SavedTemplate::delete(conn, id))
        .map_err(|e| format!("Failed to delete template: {}", e))?;

    if !deleted {
        return Err(format!("Template not found: {}", id));
    }

    info!("Deleted template {}", id);
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calories::ExerciseInput;
    use crate::models::{MealItem, Nutrition};
    use crate::tools::test_db;

    fn item(description: &str, calories: f64) -> MealItem {
        MealItem {
            description: description.to_string(),
            nutrition: Nutrition { calories, ..Nutrition::zero() },
        }
    }

    fn breakfast() -> SavedTemplateCreate {
        SavedTemplateCreate {
            name: "Usual breakfast".to_string(),
            description: Some("scrambled eggs with toast and coffee".to_string()),
            items: TemplateItems::Meal(vec![item("Eggs", 140.0), item("Toast", 90.0)]),
        }
    }

    #[test]
    fn test_exact_duplicate_returns_existing() {
        let (_dir, db) = test_db();
        let first = save_template(&db, breakfast()).unwrap();
        assert!(first.created);

        let mut again = breakfast();
        again.name = "Breakfast copy".to_string();
        again.items = TemplateItems::Meal(vec![item("toast", 90.0), item("eggs", 140.0)]);
        let second = save_template(&db, again).unwrap();
        assert!(!second.created);
        assert_eq!(second.template.id, first.template.id);
        assert_eq!(list_templates(&db, None).unwrap().total, 1);
    }

    #[test]
    fn test_suggest_by_description() {
        let (_dir, db) = test_db();
        save_template(&db, breakfast()).unwrap();
        let matcher = SimilarityMatcher::default();

        let hit = suggest_template(&db, &matcher, "eggs and toast, coffee", None, None).unwrap();
        let suggestion = hit.suggestion.unwrap();
        assert!(suggestion.score >= matcher.threshold());
        assert!(!suggestion.exact_duplicate);

        let miss = suggest_template(&db, &matcher, "chicken curry", None, None).unwrap();
        assert!(miss.suggestion.is_none());
        assert_eq!(miss.candidates, 1);
    }

    #[test]
    fn test_suggest_exact_items() {
        let (_dir, db) = test_db();
        save_template(&db, breakfast()).unwrap();
        let items = TemplateItems::Meal(vec![item("Toast", 90.0), item("Eggs", 140.0)]);
        let hit = suggest_template(&db, &SimilarityMatcher::default(), "", None, Some(&items)).unwrap();
        let suggestion = hit.suggestion.unwrap();
        assert!(suggestion.exact_duplicate);
        assert_eq!(suggestion.score, 1.0);
    }

    #[test]
    fn test_use_meal_template_logs_items() {
        let (_dir, db) = test_db();
        let saved = save_template(&db, breakfast()).unwrap().template;

        let used = use_template(&db, saved.id, "2026-09-01", Some(MealSlot::Breakfast)).unwrap();
        assert_eq!(used.food_items.len(), 2);
        assert!(used.exercise_sets.is_empty());
        assert_eq!(used.template.use_count, 1);
        assert!(used.template.last_used_at.is_some());

        let day = food::list_food_for_day(&db, "2026-09-01").unwrap();
        assert_eq!(day.nutrition.calories, 230.0);
        assert!(day.items.iter().all(|i| i.meal == MealSlot::Breakfast));
    }

    #[test]
    fn test_use_routine_template_logs_sets() {
        let (_dir, db) = test_db();
        let routine = SavedTemplateCreate {
            name: "Leg day".to_string(),
            description: None,
            items: TemplateItems::Routine(vec![ExerciseInput {
                exercise_key: "Back Squat".to_string(),
                sets: 5,
                reps: 5,
                weight: 185.0,
                ..Default::default()
            }]),
        };
        let saved = save_template(&db, routine).unwrap().template;
        match &saved.items {
            TemplateItems::Routine(items) => assert_eq!(items[0].exercise_key, "squat"),
            _ => panic!("expected a routine"),
        }

        let used = use_template(&db, saved.id, "2026-09-02", None).unwrap();
        assert_eq!(used.exercise_sets.len(), 1);
        assert!(used.exercise_sets[0].estimated_calories.is_some());
        assert!(list_templates(&db, Some("routine")).unwrap().total == 1);
        assert!(list_templates(&db, Some("snacks")).is_err());
    }

    #[test]
    fn test_validation_and_delete() {
        let (_dir, db) = test_db();
        let mut empty = breakfast();
        empty.items = TemplateItems::Meal(Vec::new());
        assert!(save_template(&db, empty).is_err());

        assert!(use_template(&db, 99, "2026-09-01", None).is_err());
        let saved = save_template(&db, breakfast()).unwrap().template;
        assert!(delete_template(&db, saved.id).unwrap().success);
        assert!(delete_template(&db, saved.id).is_err());
    }
}
