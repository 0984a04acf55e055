//! Settings MCP Tools

use tracing::info;

use crate::calories::{DistanceUnit, WeightUnit};
use crate::db::Database;
use crate::models::{UserSettings, UserSettingsUpdate};

/// Current user settings (defaults when never set)
pub fn get_settings(db: &Database) -> Result<UserSettings, String> {
    db.with_conn(UserSettings::get)
        .map_err(|e| format!("Failed to get settings: {}", e))
}

/// Update user settings; omitted fields keep their stored values
pub fn set_settings(
    db: &Database,
    body_weight: Option<f64>,
    clear_body_weight: bool,
    weight_unit: Option<&str>,
    distance_unit: Option<&str>,
) -> Result<UserSettings, String> {
    if let Some(w) = body_weight {
        if !w.is_finite() || w <= 0.0 {
            return Err(format!("Body weight must be a positive number, got {}", w));
        }
    }
    let weight_unit = weight_unit
        .map(|u| {
            WeightUnit::from_str(u)
                .ok_or_else(|| format!("Invalid weight unit: '{}'. Valid units: lbs, kg", u))
        })
        .transpose()?;
    let distance_unit = distance_unit
        .map(|u| {
            DistanceUnit::from_str(u)
                .ok_or_else(|| format!("Invalid distance unit: '{}'. Valid units: miles, km", u))
        })
        .transpose()?;

    let update = UserSettingsUpdate {
        body_weight,
        clear_body_weight,
        weight_unit,
        distance_unit,
    };
    let settings = db
        .with_conn(|conn| UserSettings::update(conn, &update))
        .map_err(|e| format!("Failed to update settings: {}", e))?;

    info!(
        "Settings updated: body weight {:?} {}, distance in {}",
        settings.body_weight,
        settings.weight_unit.as_str(),
        settings.distance_unit.as_str()
    );
    Ok(settings)
}
