//! Body weight and distance units

use serde::{Deserialize, Serialize};

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Miles per kilometer
pub const MILES_PER_KM: f64 = 0.621371;

/// Unit used for body weight and lifted weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Lbs),
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kg),
            _ => None,
        }
    }

    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Lbs => value * KG_PER_LB,
            WeightUnit::Kg => value,
        }
    }
}

/// Unit used for cardio distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Km,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Km => "km",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mi" | "mile" | "miles" => Some(DistanceUnit::Miles),
            "km" | "kms" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Some(DistanceUnit::Km)
            }
            _ => None,
        }
    }

    pub fn to_miles(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Miles => value,
            DistanceUnit::Km => value * MILES_PER_KM,
        }
    }
}
