//! Shared nutrition record
//!
//! Used by logged food items and daily totals.

use serde::{Deserialize, Serialize};

/// Nutritional values of one food item or a sum of several
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,      // grams
    #[serde(default)]
    pub carbs: f64,        // grams
    #[serde(default)]
    pub fiber: f64,        // grams
    #[serde(default)]
    pub sugar: f64,        // grams
    #[serde(default)]
    pub fat: f64,          // grams
    #[serde(default)]
    pub saturated_fat: f64, // grams
    #[serde(default)]
    pub sodium: f64,       // milligrams
    #[serde(default)]
    pub cholesterol: f64,  // milligrams
}

impl Nutrition {
    /// Field names, also used as chart metric names
    pub const FIELDS: [&'static str; 9] = [
        "calories",
        "protein",
        "carbs",
        "fiber",
        "sugar",
        "fat",
        "saturated_fat",
        "sodium",
        "cholesterol",
    ];

    pub fn zero() -> Self {
        Self::default()
    }

    /// Value of a field by name
    pub fn get(&self, field: &str) -> Option<f64> {
        let value = match field {
            "calories" => self.calories,
            "protein" => self.protein,
            "carbs" => self.carbs,
            "fiber" => self.fiber,
            "sugar" => self.sugar,
            "fat" => self.fat,
            "saturated_fat" => self.saturated_fat,
            "sodium" => self.sodium,
            "cholesterol" => self.cholesterol,
            _ => return None,
        };
        Some(value)
    }

    /// Scale every value by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.zip_with(&Self::zero(), |a, _| a * multiplier)
    }

    /// True when any value is negative or not finite
    pub fn has_invalid_values(&self) -> bool {
        Self::FIELDS
            .iter()
            .filter_map(|f| self.get(f))
            .any(|v| !v.is_finite() || v < 0.0)
    }

    fn zip_with(&self, other: &Nutrition, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            calories: f(self.calories, other.calories),
            protein: f(self.protein, other.protein),
            carbs: f(self.carbs, other.carbs),
            fiber: f(self.fiber, other.fiber),
            sugar: f(self.sugar, other.sugar),
            fat: f(self.fat, other.fat),
            saturated_fat: f(self.saturated_fat, other.saturated_fat),
            sodium: f(self.sodium, other.sodium),
            cholesterol: f(self.cholesterol, other.cholesterol),
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        self.zip_with(&other, |a, b| a + b)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Nutrition {
        Nutrition {
            calories: 200.0,
            protein: 10.0,
            carbs: 30.0,
            fiber: 4.0,
            sugar: 6.0,
            fat: 5.0,
            saturated_fat: 1.0,
            sodium: 150.0,
            cholesterol: 20.0,
        }
    }

    #[test]
    fn test_sum_and_scale() {
        let total: Nutrition = vec![sample(), sample() * 0.5].into_iter().sum();
        assert!((total.calories - 300.0).abs() < 1e-9);
        assert!((total.sodium - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_get_by_field_name() {
        let n = sample();
        for field in Nutrition::FIELDS {
            assert!(n.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(n.get("saturated_fat"), Some(1.0));
        assert_eq!(n.get("vitamin_c"), None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(!sample().has_invalid_values());
        let mut bad = sample();
        bad.fat = -1.0;
        assert!(bad.has_invalid_values());
        bad.fat = f64::NAN;
        assert!(bad.has_invalid_values());
    }
}
