//! User settings
//!
//! Single-row table holding body weight and preferred units.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calories::{DistanceUnit, EstimatorSettings, WeightUnit};
use crate::db::DbResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettings {
    /// Body weight in `weight_unit`
    pub body_weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub distance_unit: DistanceUnit,
    pub updated_at: Option<String>,
}

/// Partial update; `clear_body_weight` removes the stored weight
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettingsUpdate {
    pub body_weight: Option<f64>,
    #[serde(default)]
    pub clear_body_weight: bool,
    pub weight_unit: Option<WeightUnit>,
    pub distance_unit: Option<DistanceUnit>,
}

impl UserSettings {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let weight_unit: String = row.get("weight_unit")?;
        let distance_unit: String = row.get("distance_unit")?;
        Ok(Self {
            body_weight: row.get("body_weight")?,
            weight_unit: WeightUnit::from_str(&weight_unit).unwrap_or_default(),
            distance_unit: DistanceUnit::from_str(&distance_unit).unwrap_or_default(),
            updated_at: row.get("updated_at")?,
        })
    }

    /// Stored settings, or defaults when nothing has been saved yet
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM user_settings WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(settings) => Ok(settings),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge an update into the stored settings (upsert)
    pub fn update(conn: &Connection, data: &UserSettingsUpdate) -> DbResult<Self> {
        let current = Self::get(conn)?;
        let body_weight = if data.clear_body_weight {
            None
        } else {
            data.body_weight.or(current.body_weight)
        };
        let weight_unit = data.weight_unit.unwrap_or(current.weight_unit);
        let distance_unit = data.distance_unit.unwrap_or(current.distance_unit);

        conn.execute(
            r#"
            INSERT INTO user_settings (id, body_weight, weight_unit, distance_unit)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                body_weight = excluded.body_weight,
                weight_unit = excluded.weight_unit,
                distance_unit = excluded.distance_unit,
                updated_at = datetime('now')
            "#,
            params![body_weight, weight_unit.as_str(), distance_unit.as_str()],
        )?;

        Self::get(conn)
    }

    pub fn estimator_settings(&self) -> EstimatorSettings {
        EstimatorSettings {
            body_weight: self.body_weight,
            weight_unit: self.weight_unit,
            distance_unit: self.distance_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_defaults_when_empty() {
        let conn = test_connection();
        let settings = UserSettings::get(&conn).unwrap();
        assert_eq!(settings.body_weight, None);
        assert_eq!(settings.weight_unit, WeightUnit::Lbs);
        assert_eq!(settings.distance_unit, DistanceUnit::Miles);
    }

    #[test]
    fn test_partial_updates_merge() {
        let conn = test_connection();
        UserSettings::update(&conn, &UserSettingsUpdate {
            body_weight: Some(82.5),
            weight_unit: Some(WeightUnit::Kg),
            ..Default::default()
        })
        .unwrap();

        let settings = UserSettings::update(&conn, &UserSettingsUpdate {
            distance_unit: Some(DistanceUnit::Km),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.body_weight, Some(82.5));
        assert_eq!(settings.weight_unit, WeightUnit::Kg);
        assert_eq!(settings.distance_unit, DistanceUnit::Km);

        let cleared = UserSettings::update(&conn, &UserSettingsUpdate {
            clear_body_weight: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cleared.body_weight, None);
        assert_eq!(cleared.estimator_settings().weight_unit, WeightUnit::Kg);
    }
}
