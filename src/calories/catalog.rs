//! Exercise catalog
//!
//! Canonical exercise keys, their aliases and the constants the estimator
//! needs for each (MET values for cardio, bodyweight share for strength).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseClass {
    Cardio,
    Strength,
}

impl ExerciseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseClass::Cardio => "cardio",
            ExerciseClass::Strength => "strength",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseProfile {
    Cardio {
        /// MET at a moderate effort
        met: f64,
        /// Used to derive duration when only distance was logged
        typical_mph: f64,
        /// Derive MET from the walking/running speed table when speed is known
        speed_banded: bool,
    },
    Strength {
        /// Fraction of body mass moved on each rep, added to any external load
        bodyweight_share: f64,
    },
}

impl ExerciseProfile {
    pub fn class(&self) -> ExerciseClass {
        match self {
            ExerciseProfile::Cardio { .. } => ExerciseClass::Cardio,
            ExerciseProfile::Strength { .. } => ExerciseClass::Strength,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub profile: ExerciseProfile,
}

const fn cardio(
    key: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    met: f64,
    typical_mph: f64,
    speed_banded: bool,
) -> CatalogEntry {
    CatalogEntry {
        key,
        display_name,
        aliases,
        profile: ExerciseProfile::Cardio { met, typical_mph, speed_banded },
    }
}

const fn strength(
    key: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    bodyweight_share: f64,
) -> CatalogEntry {
    CatalogEntry {
        key,
        display_name,
        aliases,
        profile: ExerciseProfile::Strength { bodyweight_share },
    }
}

static CATALOG: &[CatalogEntry] = &[
    // Cardio
    cardio("walking", "Walking", &["walk"], 3.5, 3.0, true),
    cardio("running", "Running", &["run", "jog", "jogging"], 9.8, 6.0, true),
    cardio("treadmill", "Treadmill", &["tm"], 4.3, 3.5, true),
    cardio("hiking", "Hiking", &["hike"], 6.0, 2.5, false),
    cardio("cycling", "Cycling", &["bike", "biking", "cycle"], 7.5, 12.0, false),
    cardio("stationary_bike", "Stationary Bike", &["spin", "spinning", "exercise_bike"], 6.8, 12.0, false),
    cardio("rowing", "Rowing", &["row_machine", "erg", "rower"], 7.0, 8.0, false),
    cardio("swimming", "Swimming", &["swim", "laps"], 6.0, 1.8, false),
    cardio("elliptical", "Elliptical", &["cross_trainer"], 5.0, 5.0, false),
    cardio("jump_rope", "Jump Rope", &["skipping", "skip_rope"], 11.8, 5.0, false),
    // Strength, external load
    strength("bench_press", "Bench Press", &["bench"], 0.0),
    strength("overhead_press", "Overhead Press", &["ohp", "shoulder_press", "military_press"], 0.0),
    strength("barbell_row", "Barbell Row", &["bent_over_row", "row"], 0.0),
    strength("bicep_curl", "Bicep Curl", &["curl", "curls", "biceps_curl"], 0.0),
    strength("deadlift", "Deadlift", &["dl"], 0.4),
    strength("squat", "Squat", &["back_squat", "squats"], 0.7),
    strength("lunge", "Lunge", &["lunges"], 0.7),
    // Strength, bodyweight
    strength("push_up", "Push-Up", &["pushup", "pushups", "push_ups"], 0.65),
    strength("pull_up", "Pull-Up", &["pullup", "pullups", "pull_ups"], 1.0),
    strength("chin_up", "Chin-Up", &["chinup", "chinups", "chin_ups"], 1.0),
    strength("dip", "Dip", &["dips"], 0.95),
    strength("sit_up", "Sit-Up", &["situp", "situps", "sit_ups"], 0.3),
    strength("burpee", "Burpee", &["burpees"], 0.7),
    strength("plank", "Plank", &["planks"], 0.0),
];

/// Walking/running speed bands: (upper bound in mph, MET below that bound)
const SPEED_MET_BANDS: &[(f64, f64)] = &[
    (2.0, 2.0),
    (2.5, 2.5),
    (3.0, 3.0),
    (3.5, 3.5),
    (4.0, 4.3),
    (4.5, 5.0),
    (5.0, 6.0),
    (5.5, 8.3),
    (6.0, 9.0),
    (7.0, 9.8),
    (8.0, 10.5),
];
const TOP_SPEED_MET: f64 = 11.5;

/// MET for a walking/running speed
pub fn met_for_speed(speed_mph: f64) -> f64 {
    SPEED_MET_BANDS
        .iter()
        .find(|(upper, _)| speed_mph < *upper)
        .map(|(_, met)| *met)
        .unwrap_or(TOP_SPEED_MET)
}

/// Canonical form of a raw exercise key: lower snake case, aliases resolved
pub fn canonical_key(raw: &str) -> String {
    let snake = raw
        .trim()
        .to_lowercase()
        .replace('\'', "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    match lookup(&snake) {
        Some(entry) => entry.key.to_string(),
        None => snake,
    }
}

/// Find a catalog entry by key or alias (expects an already snake-cased key)
pub fn lookup(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG
        .iter()
        .find(|e| e.key == key || e.aliases.contains(&key))
}

/// All catalog entries
pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

/// Effort multiplier for a free-form subtype such as "easy" or "hiit"
pub fn intensity_multiplier(subtype: Option<&str>) -> f64 {
    let Some(subtype) = subtype else {
        return 1.0;
    };
    match subtype.trim().to_lowercase().as_str() {
        "light" | "easy" | "recovery" | "leisure" => 0.8,
        "vigorous" | "hard" | "intense" | "fast" | "tempo" => 1.25,
        "hiit" | "intervals" | "interval" | "sprint" | "sprints" => 1.3,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("Bench Press"), "bench_press");
        assert_eq!(canonical_key("bench"), "bench_press");
        assert_eq!(canonical_key("  Push-Ups "), "push_up");
        assert_eq!(canonical_key("jog"), "running");
        assert_eq!(canonical_key("Farmer's Carry"), "farmers_carry");
    }

    #[test]
    fn test_lookup() {
        let entry = lookup("ohp").unwrap();
        assert_eq!(entry.key, "overhead_press");
        assert_eq!(entry.profile.class(), ExerciseClass::Strength);
        assert!(lookup("underwater_basket_weaving").is_none());
    }

    #[test]
    fn test_catalog_keys_unique() {
        let mut names: Vec<&str> = entries()
            .iter()
            .flat_map(|e| std::iter::once(e.key).chain(e.aliases.iter().copied()))
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_met_for_speed() {
        assert_eq!(met_for_speed(1.5), 2.0);
        assert_eq!(met_for_speed(3.0), 3.5);
        assert_eq!(met_for_speed(6.5), 9.8);
        assert_eq!(met_for_speed(9.0), TOP_SPEED_MET);
    }

    #[test]
    fn test_speed_bands_non_decreasing() {
        let mut last = 0.0;
        for speed in 0..100 {
            let met = met_for_speed(speed as f64 / 10.0);
            assert!(met >= last);
            last = met;
        }
    }

    #[test]
    fn test_intensity_multiplier() {
        assert_eq!(intensity_multiplier(None), 1.0);
        assert_eq!(intensity_multiplier(Some("Easy")), 0.8);
        assert_eq!(intensity_multiplier(Some("HIIT")), 1.3);
        assert_eq!(intensity_multiplier(Some("incline")), 1.0);
    }
}
