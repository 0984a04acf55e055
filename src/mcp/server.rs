//! FitLog MCP Server Implementation
//!
//! Implements the MCP server with all FitLog tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::calories::ExerciseInput;
use crate::config::Config;
use crate::db::Database;
use crate::models::{
    ExerciseSetCreate, FoodItemCreate, FoodItemUpdate, MealItem, MealSlot, Nutrition,
    SavedTemplateCreate, TemplateItems, TemplateKind,
};
use crate::similarity::SimilarityMatcher;
use crate::tools::status::StatusTracker;
use crate::tools::{charts, custom_logs, exercise, food, settings, summary, templates};

/// FitLog MCP Service
#[derive(Clone)]
pub struct FitLogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    matcher: SimilarityMatcher,
    tool_router: ToolRouter<FitLogService>,
}

impl FitLogService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.similarity_threshold,
            ))),
            database,
            matcher: SimilarityMatcher::new(config.similarity_threshold),
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool response as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Shared Parameter Structs
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct NutritionParams {
    #[serde(default)]
    pub calories: f64,
    /// Grams
    #[serde(default)]
    pub protein: f64,
    /// Grams
    #[serde(default)]
    pub carbs: f64,
    /// Grams
    #[serde(default)]
    pub fiber: f64,
    /// Grams
    #[serde(default)]
    pub sugar: f64,
    /// Grams
    #[serde(default)]
    pub fat: f64,
    /// Grams
    #[serde(default)]
    pub saturated_fat: f64,
    /// Milligrams
    #[serde(default)]
    pub sodium: f64,
    /// Milligrams
    #[serde(default)]
    pub cholesterol: f64,
}

impl From<NutritionParams> for Nutrition {
    fn from(p: NutritionParams) -> Self {
        Nutrition {
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fiber: p.fiber,
            sugar: p.sugar,
            fat: p.fat,
            saturated_fat: p.saturated_fat,
            sodium: p.sodium,
            cholesterol: p.cholesterol,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExerciseEffortParams {
    /// Exercise name, e.g. "bench press", "run", "push-ups"
    pub exercise: String,
    /// Intensity or variation, e.g. "easy", "hiit", "incline"
    pub subtype: Option<String>,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    /// Resistance in the user's weight unit (0 for bodyweight/cardio)
    #[serde(default)]
    pub weight: f64,
    pub duration_minutes: Option<f64>,
    /// In the user's distance unit
    pub distance: Option<f64>,
    /// Extra measurements, e.g. {"incline_percent": 4}
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl From<ExerciseEffortParams> for ExerciseInput {
    fn from(p: ExerciseEffortParams) -> Self {
        ExerciseInput {
            exercise_key: p.exercise,
            subtype: p.subtype,
            sets: p.sets,
            reps: p.reps,
            weight: p.weight,
            duration_minutes: p.duration_minutes,
            distance: p.distance,
            metadata: p.metadata.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StringIdParams {
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TemplateIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// ISO date: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateRangeParams {
    /// ISO date: YYYY-MM-DD
    pub start_date: String,
    /// ISO date: YYYY-MM-DD, inclusive
    pub end_date: String,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Client id; a UUID is generated when omitted
    pub id: Option<String>,
    pub date: String,
    /// breakfast, lunch, dinner, snack (default: unspecified)
    pub meal: Option<String>,
    pub description: String,
    #[serde(flatten)]
    pub nutrition: NutritionParams,
    /// Timestamp the food was eaten (default: now)
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodParams {
    pub id: String,
    pub date: Option<String>,
    pub meal: Option<String>,
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

// ============================================================================
// Exercise Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogExerciseSetParams {
    /// Client id; a UUID is generated when omitted
    pub id: Option<String>,
    pub date: String,
    #[serde(flatten)]
    pub effort: ExerciseEffortParams,
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateEstimatesParams {
    pub start_date: String,
    pub end_date: String,
    /// Only recalculate this exercise
    pub exercise: Option<String>,
}

// ============================================================================
// Template Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TemplateFoodParam {
    pub description: String,
    #[serde(flatten)]
    pub nutrition: NutritionParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveTemplateParams {
    pub name: String,
    /// Free text used for suggestions (default: the name)
    pub description: Option<String>,
    /// Food items, for a saved meal
    pub food_items: Option<Vec<TemplateFoodParam>>,
    /// Exercise sets, for a saved routine
    pub exercises: Option<Vec<ExerciseEffortParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestTemplateParams {
    /// What the user said they ate or did
    pub description: String,
    /// meal or routine
    pub kind: Option<String>,
    /// Parsed food items, to detect an identical saved meal
    pub food_items: Option<Vec<TemplateFoodParam>>,
    /// Parsed exercise sets, to detect an identical saved routine
    pub exercises: Option<Vec<ExerciseEffortParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListTemplatesParams {
    /// meal or routine (default: both)
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UseTemplateParams {
    pub id: i64,
    pub date: String,
    /// Meal slot for logged food items
    pub meal: Option<String>,
}

fn template_items(
    food_items: Option<Vec<TemplateFoodParam>>,
    exercises: Option<Vec<ExerciseEffortParams>>,
) -> Result<Option<TemplateItems>, String> {
    match (food_items, exercises) {
        (Some(_), Some(_)) => Err("Give either food_items or exercises, not both".to_string()),
        (Some(items), None) => Ok(Some(TemplateItems::Meal(
            items
                .into_iter()
                .map(|i| MealItem {
                    description: i.description,
                    nutrition: i.nutrition.into(),
                })
                .collect(),
        ))),
        (None, Some(sets)) => Ok(Some(TemplateItems::Routine(
            sets.into_iter().map(ExerciseInput::from).collect(),
        ))),
        (None, None) => Ok(None),
    }
}

fn parse_kind(kind: Option<&str>) -> Result<Option<TemplateKind>, String> {
    kind.map(|k| {
        TemplateKind::from_str(k)
            .ok_or_else(|| format!("Invalid template kind: '{}'. Valid kinds: meal, routine", k))
    })
    .transpose()
}

// ============================================================================
// Custom Log / Settings / Chart Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateCustomLogTypeParams {
    pub name: String,
    /// e.g. "ml", "steps", "hours"
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogCustomValueParams {
    /// Log type name
    pub name: String,
    pub date: String,
    pub value: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCustomLogEntriesParams {
    /// Log type name
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetSettingsParams {
    /// Body weight in the weight unit
    pub body_weight: Option<f64>,
    /// Remove the stored body weight
    #[serde(default)]
    pub clear_body_weight: bool,
    /// lbs or kg
    pub weight_unit: Option<String>,
    /// miles or km
    pub distance_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EvaluateChartParams {
    /// Chart spec: {metric, groupBy, dateRange, aggregation, chartType}
    pub spec: serde_json::Value,
    /// Anchor for relative date ranges, YYYY-MM-DD (default: today)
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenderChartParams {
    /// Chart spec: {metric, groupBy, dateRange, aggregation, chartType}
    pub spec: serde_json::Value,
    /// Where to write the PNG
    pub output_path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Anchor for relative date ranges, YYYY-MM-DD (default: today)
    pub today: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FitLogService {
    // --- Status ---

    #[tool(description = "Get the current status of the FitLog service including build info, database status, and process information")]
    async fn fitlog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for logging food, exercise, templates and custom values. Call this when starting a logging session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    #[tool(description = "Get the chart spec reference (metrics, groupBy, dateRange, aggregation, chartType). Call this before building a chart.")]
    fn chart_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CHART_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CHART_INSTRUCTIONS)]))
    }

    // --- Food ---

    #[tool(description = "Log a food item eaten on a date with its nutrition")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodItemCreate {
            id: p.id,
            date: p.date,
            meal: p.meal.as_deref().map(MealSlot::from_str).unwrap_or_default(),
            description: p.description,
            nutrition: p.nutrition.into(),
            logged_at: p.logged_at,
        };
        let item = food::log_food(&self.database, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&item)
    }

    #[tool(description = "Get a logged food item by ID")]
    fn get_food(&self, Parameters(p): Parameters<StringIdParams>) -> Result<CallToolResult, McpError> {
        let item = food::get_food(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match item {
            Some(item) => json_result(&item),
            None => Err(McpError::invalid_params(format!("Food item not found: {}", p.id), None)),
        }
    }

    #[tool(description = "List food logged on a date with the day's nutrition total")]
    fn list_food_for_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = food::list_food_for_day(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a logged food item. Only provided fields are changed.")]
    fn update_food(&self, Parameters(p): Parameters<UpdateFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodItemUpdate {
            date: p.date,
            meal: p.meal.as_deref().map(MealSlot::from_str),
            description: p.description,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fiber: p.fiber,
            sugar: p.sugar,
            fat: p.fat,
            saturated_fat: p.saturated_fat,
            sodium: p.sodium,
            cholesterol: p.cholesterol,
        };
        let result = food::update_food(&self.database, &p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a logged food item")]
    fn delete_food(&self, Parameters(p): Parameters<StringIdParams>) -> Result<CallToolResult, McpError> {
        let result = food::delete_food(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Exercise ---

    #[tool(description = "Log an exercise set or cardio session. The calorie estimate is computed and stored with it.")]
    fn log_exercise_set(&self, Parameters(p): Parameters<LogExerciseSetParams>) -> Result<CallToolResult, McpError> {
        let input = ExerciseInput::from(p.effort);
        let data = ExerciseSetCreate {
            id: p.id,
            date: p.date,
            exercise_key: input.exercise_key,
            subtype: input.subtype,
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            duration_minutes: input.duration_minutes,
            distance: input.distance,
            metadata: input.metadata,
            logged_at: p.logged_at,
        };
        let result = exercise::log_exercise_set(&self.database, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a logged exercise set by ID")]
    fn get_exercise_set(&self, Parameters(p): Parameters<StringIdParams>) -> Result<CallToolResult, McpError> {
        let set = exercise::get_exercise_set(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match set {
            Some(set) => json_result(&set),
            None => Err(McpError::invalid_params(format!("Exercise set not found: {}", p.id), None)),
        }
    }

    #[tool(description = "List exercise logged on a date with total volume and calories burned")]
    fn list_exercise_for_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = exercise::list_exercise_for_day(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a logged exercise set")]
    fn delete_exercise_set(&self, Parameters(p): Parameters<StringIdParams>) -> Result<CallToolResult, McpError> {
        let result = exercise::delete_exercise_set(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Estimate calories for an exercise without logging it")]
    fn estimate_exercise(&self, Parameters(p): Parameters<ExerciseEffortParams>) -> Result<CallToolResult, McpError> {
        let result = exercise::estimate_exercise(&self.database, p.into())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Recompute stored calorie estimates for a date range with the current settings (e.g. after setting body weight)")]
    fn recalculate_estimates(&self, Parameters(p): Parameters<RecalculateEstimatesParams>) -> Result<CallToolResult, McpError> {
        let result = exercise::recalculate_estimates(
            &self.database,
            &p.start_date,
            &p.end_date,
            p.exercise.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List known exercises with their aliases and class (cardio or strength)")]
    fn list_exercise_catalog(&self) -> Result<CallToolResult, McpError> {
        json_result(&exercise::list_exercise_catalog())
    }

    // --- Templates ---

    #[tool(description = "Save a meal (food_items) or routine (exercises) as a template. Saving identical items again returns the existing template.")]
    fn save_template(&self, Parameters(p): Parameters<SaveTemplateParams>) -> Result<CallToolResult, McpError> {
        let items = template_items(p.food_items, p.exercises)
            .map_err(|e| McpError::invalid_params(e, None))?
            .ok_or_else(|| McpError::invalid_params("Give food_items or exercises", None))?;
        let data = SavedTemplateCreate {
            name: p.name,
            description: p.description,
            items,
        };
        let result = templates::save_template(&self.database, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Find the saved meal or routine most similar to a description. Returns no suggestion when nothing is close enough.")]
    fn suggest_template(&self, Parameters(p): Parameters<SuggestTemplateParams>) -> Result<CallToolResult, McpError> {
        let kind = parse_kind(p.kind.as_deref()).map_err(|e| McpError::invalid_params(e, None))?;
        let items = template_items(p.food_items, p.exercises)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let result = templates::suggest_template(
            &self.database,
            &self.matcher,
            &p.description,
            kind,
            items.as_ref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List saved templates, most recently used first")]
    fn list_templates(&self, Parameters(p): Parameters<ListTemplatesParams>) -> Result<CallToolResult, McpError> {
        let result = templates::list_templates(&self.database, p.kind.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log every item of a saved template on a date")]
    fn use_template(&self, Parameters(p): Parameters<UseTemplateParams>) -> Result<CallToolResult, McpError> {
        let meal = p.meal.as_deref().map(MealSlot::from_str);
        let result = templates::use_template(&self.database, p.id, &p.date, meal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a saved template")]
    fn delete_template(&self, Parameters(p): Parameters<TemplateIdParams>) -> Result<CallToolResult, McpError> {
        let result = templates::delete_template(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Custom Logs ---

    #[tool(description = "Create a custom numeric log type such as water, steps or sleep hours")]
    fn create_custom_log_type(&self, Parameters(p): Parameters<CreateCustomLogTypeParams>) -> Result<CallToolResult, McpError> {
        let result = custom_logs::create_custom_log_type(
            &self.database,
            &p.name,
            p.unit.as_deref(),
            p.notes.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List custom log types")]
    fn list_custom_log_types(&self) -> Result<CallToolResult, McpError> {
        let result = custom_logs::list_custom_log_types(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Record a value for a custom log type on a date")]
    fn log_custom_value(&self, Parameters(p): Parameters<LogCustomValueParams>) -> Result<CallToolResult, McpError> {
        let result = custom_logs::log_custom_value(
            &self.database,
            &p.name,
            &p.date,
            p.value,
            p.notes.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List values of a custom log type in a date range")]
    fn list_custom_log_entries(&self, Parameters(p): Parameters<ListCustomLogEntriesParams>) -> Result<CallToolResult, McpError> {
        let result = custom_logs::list_custom_log_entries(
            &self.database,
            &p.name,
            &p.start_date,
            &p.end_date,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Settings ---

    #[tool(description = "Get user settings: body weight, weight unit and distance unit")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update user settings. Body weight makes calorie estimates exact for cardio and tighter for strength.")]
    fn set_settings(&self, Parameters(p): Parameters<SetSettingsParams>) -> Result<CallToolResult, McpError> {
        let result = settings::set_settings(
            &self.database,
            p.body_weight,
            p.clear_body_weight,
            p.weight_unit.as_deref(),
            p.distance_unit.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Summary & Charts ---

    #[tool(description = "Get per-day nutrition, exercise and custom log totals for a date range")]
    fn get_daily_totals(&self, Parameters(p): Parameters<DateRangeParams>) -> Result<CallToolResult, McpError> {
        let result = summary::get_daily_totals(&self.database, &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Evaluate a chart spec into a series of {date, value, label} points. See chart_instructions for the spec format.")]
    fn evaluate_chart(&self, Parameters(p): Parameters<EvaluateChartParams>) -> Result<CallToolResult, McpError> {
        let result = charts::evaluate_chart(&self.database, &p.spec, p.today.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Evaluate a chart spec and save it as a PNG file")]
    fn render_chart(&self, Parameters(p): Parameters<RenderChartParams>) -> Result<CallToolResult, McpError> {
        let result = charts::render_chart(
            &self.database,
            &p.spec,
            &p.output_path,
            p.width,
            p.height,
            p.today.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FitLogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fitlog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitLog - food, exercise and custom metric logging. \
                 IMPORTANT: Call logging_instructions before logging and chart_instructions before charting. \
                 Food: log_food/get_food/list_food_for_day/update_food/delete_food. \
                 Exercise: log_exercise_set/get_exercise_set/list_exercise_for_day/delete_exercise_set, \
                 estimate_exercise, recalculate_estimates, list_exercise_catalog. \
                 Templates: suggest_template before logging a familiar meal or routine, \
                 save_template/list_templates/use_template/delete_template. \
                 Custom logs: create_custom_log_type/list_custom_log_types/log_custom_value/list_custom_log_entries. \
                 Settings: get_settings/set_settings. \
                 Summary & charts: get_daily_totals, evaluate_chart, render_chart."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_items_from_params() {
        let items = template_items(
            Some(vec![TemplateFoodParam {
                description: "Greek yogurt".to_string(),
                nutrition: NutritionParams { calories: 150.0, ..Default::default() },
            }]),
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(items.kind(), TemplateKind::Meal);

        assert!(template_items(Some(Vec::new()), Some(Vec::new())).is_err());
        assert!(template_items(None, None).unwrap().is_none());
    }

    #[test]
    fn test_log_food_params_accept_flat_nutrition() {
        let p: LogFoodParams = serde_json::from_value(serde_json::json!({
            "date": "2026-01-02",
            "description": "apple",
            "calories": 95,
            "fiber": 4.4
        }))
        .unwrap();
        let nutrition: Nutrition = p.nutrition.into();
        assert_eq!(nutrition.calories, 95.0);
        assert_eq!(nutrition.fiber, 4.4);
        assert_eq!(nutrition.protein, 0.0);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(Some("routine")).unwrap(), Some(TemplateKind::Routine));
        assert_eq!(parse_kind(None).unwrap(), None);
        assert!(parse_kind(Some("dessert")).is_err());
    }
}
