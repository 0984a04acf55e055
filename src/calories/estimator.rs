//! Calorie-burn estimation
//!
//! Cardio: Calories = MET × body_kg × hours, exact when body weight is known.
//! Strength: mechanical work over muscular efficiency plus active time at a
//! moderate MET, always reported as a range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{self, ExerciseClass, ExerciseProfile};
use super::units::{DistanceUnit, WeightUnit};

/// Reference body mass bounds used when no body weight is configured
const REFERENCE_BODY_KG: (f64, f64) = (60.0, 90.0);

/// Generic moderate effort for exercises missing from the catalog
const DEFAULT_CARDIO_MET: f64 = 5.0;
const DEFAULT_TYPICAL_MPH: f64 = 4.0;

/// Muscular efficiency bounds for converting mechanical work to energy
const EFFICIENCY: (f64, f64) = (0.25, 0.15);
/// Average bar travel per rep in meters
const REP_DISPLACEMENT_M: f64 = 0.5;
const GRAVITY: f64 = 9.81;
const JOULES_PER_KCAL: f64 = 4184.0;

/// MET bounds for the time spent lifting
const STRENGTH_MET: (f64, f64) = (3.5, 6.0);
const SECONDS_PER_REP: f64 = 3.0;
/// Assumed work time for sets logged without reps or duration (holds)
const SECONDS_PER_UNTIMED_SET: f64 = 30.0;
/// Load floor, as a share of body mass, for exercises without a body share
const DEFAULT_BODYWEIGHT_SHARE: f64 = 0.65;

/// MET added per percent of incline
const MET_PER_INCLINE_PERCENT: f64 = 0.1;

/// A calorie estimate, exact or a low/high range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CalorieEstimate {
    Exact { value: f64 },
    Range { low: f64, high: f64 },
}

impl CalorieEstimate {
    pub fn low(&self) -> f64 {
        match self {
            CalorieEstimate::Exact { value } => *value,
            CalorieEstimate::Range { low, .. } => *low,
        }
    }

    pub fn high(&self) -> f64 {
        match self {
            CalorieEstimate::Exact { value } => *value,
            CalorieEstimate::Range { high, .. } => *high,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low() + self.high()) / 2.0
    }

    /// Rebuild from cached low/high columns
    pub fn from_bounds(low: Option<f64>, high: Option<f64>) -> Option<Self> {
        match (low, high) {
            (Some(l), Some(h)) if (l - h).abs() < f64::EPSILON => Some(CalorieEstimate::Exact { value: l }),
            (Some(l), Some(h)) => Some(CalorieEstimate::Range { low: l, high: h }),
            _ => None,
        }
    }

    fn add(self, other: CalorieEstimate) -> CalorieEstimate {
        match (self, other) {
            (CalorieEstimate::Exact { value: a }, CalorieEstimate::Exact { value: b }) => {
                CalorieEstimate::Exact { value: round1(a + b) }
            }
            (a, b) => CalorieEstimate::Range {
                low: round1(a.low() + b.low()),
                high: round1(a.high() + b.high()),
            },
        }
    }
}

/// Measured effort for one logged set or cardio session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseInput {
    pub exercise_key: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    /// Resistance in the user's weight unit, 0 for none
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// In the user's distance unit
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ExerciseInput {
    fn duration(&self) -> f64 {
        self.duration_minutes.unwrap_or(0.0)
    }

    fn distance(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }

    pub fn is_zero_effort(&self) -> bool {
        self.sets == 0 && self.reps == 0 && self.duration() == 0.0 && self.distance() == 0.0
    }

    fn is_valid(&self) -> bool {
        [self.weight, self.duration(), self.distance()]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Incline percent from metadata, if logged
    fn incline_percent(&self) -> f64 {
        ["incline_percent", "incline"]
            .iter()
            .filter_map(|k| self.metadata.get(*k))
            .find_map(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0)
    }
}

/// The parts of the user's settings the estimator reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    /// Body weight in `weight_unit`
    pub body_weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub distance_unit: DistanceUnit,
}

impl EstimatorSettings {
    fn body_kg(&self) -> Option<f64> {
        self.body_weight
            .filter(|w| w.is_finite() && *w > 0.0)
            .map(|w| self.weight_unit.to_kg(w))
    }

    /// (low, high) body mass, collapsed when the real value is known
    fn body_kg_bounds(&self) -> (f64, f64) {
        match self.body_kg() {
            Some(kg) => (kg, kg),
            None => REFERENCE_BODY_KG,
        }
    }
}

fn profile_for(input: &ExerciseInput) -> Option<ExerciseProfile> {
    catalog::lookup(&catalog::canonical_key(&input.exercise_key)).map(|e| e.profile)
}

/// Which estimation rule applies to the input
pub fn classify(input: &ExerciseInput) -> ExerciseClass {
    match profile_for(input) {
        Some(profile) => profile.class(),
        None if input.weight == 0.0 && (input.duration() > 0.0 || input.distance() > 0.0) => {
            ExerciseClass::Cardio
        }
        None => ExerciseClass::Strength,
    }
}

/// Estimate calories burned for one entry.
///
/// Returns `None` for zero-effort or invalid input.
pub fn estimate(input: &ExerciseInput, settings: &EstimatorSettings) -> Option<CalorieEstimate> {
    if input.is_zero_effort() || !input.is_valid() {
        return None;
    }

    let profile = profile_for(input);
    let has_cardio_measure = input.duration() > 0.0 || input.distance() > 0.0;

    let result = match (classify(input), profile) {
        (ExerciseClass::Cardio, _) if has_cardio_measure => {
            let (met, typical_mph, speed_banded) = match profile {
                Some(ExerciseProfile::Cardio { met, typical_mph, speed_banded }) => {
                    (met, typical_mph, speed_banded)
                }
                _ => (DEFAULT_CARDIO_MET, DEFAULT_TYPICAL_MPH, false),
            };
            estimate_cardio(input, settings, met, typical_mph, speed_banded)
        }
        (_, Some(ExerciseProfile::Strength { bodyweight_share })) => {
            estimate_strength(input, settings, bodyweight_share)
        }
        (_, None) if has_cardio_measure => {
            // Loaded, uncatalogued work never scores below the same effort unloaded
            let unloaded = estimate_cardio(
                input,
                settings,
                DEFAULT_CARDIO_MET,
                DEFAULT_TYPICAL_MPH,
                false,
            );
            floor_at(estimate_strength(input, settings, 0.0), unloaded)
        }
        _ => estimate_strength(input, settings, 0.0),
    };

    match result {
        Some(e) if e.high() > 0.0 => Some(e),
        _ => None,
    }
}

fn estimate_cardio(
    input: &ExerciseInput,
    settings: &EstimatorSettings,
    base_met: f64,
    typical_mph: f64,
    speed_banded: bool,
) -> Option<CalorieEstimate> {
    let distance_miles = settings.distance_unit.to_miles(input.distance());
    let logged_minutes = input.duration();

    let minutes = if logged_minutes > 0.0 {
        logged_minutes
    } else if typical_mph > 0.0 {
        distance_miles / typical_mph * 60.0
    } else {
        0.0
    };
    if minutes <= 0.0 {
        return None;
    }

    let mut met = base_met;
    if speed_banded && logged_minutes > 0.0 && distance_miles > 0.0 {
        met = catalog::met_for_speed(distance_miles / (logged_minutes / 60.0));
    }
    met = met * catalog::intensity_multiplier(input.subtype.as_deref())
        + input.incline_percent() * MET_PER_INCLINE_PERCENT;

    let hours = minutes / 60.0;

    match settings.body_kg() {
        Some(kg) => Some(CalorieEstimate::Exact { value: round1(met * kg * hours) }),
        None => {
            tracing::debug!(
                exercise_key = %input.exercise_key,
                "No body weight configured, estimating a reference range"
            );
            let (low_kg, high_kg) = REFERENCE_BODY_KG;
            Some(CalorieEstimate::Range {
                low: round1(met * low_kg * hours),
                high: round1(met * high_kg * hours),
            })
        }
    }
}

fn estimate_strength(
    input: &ExerciseInput,
    settings: &EstimatorSettings,
    bodyweight_share: f64,
) -> Option<CalorieEstimate> {
    let sets = if input.sets == 0 { 1 } else { input.sets };
    let total_reps = if input.reps > 0 { f64::from(sets) * f64::from(input.reps) } else { 0.0 };

    let active_seconds = if input.duration() > 0.0 {
        input.duration() * 60.0
    } else if total_reps > 0.0 {
        total_reps * SECONDS_PER_REP
    } else {
        f64::from(input.sets) * SECONDS_PER_UNTIMED_SET
    };
    let active_hours = active_seconds / 3600.0;

    let external_kg = settings.weight_unit.to_kg(input.weight);
    let (body_low, body_high) = settings.body_kg_bounds();
    let intensity = catalog::intensity_multiplier(input.subtype.as_deref());

    let bound = |body_kg: f64, efficiency: f64, met: f64| {
        let load_kg = if bodyweight_share > 0.0 {
            external_kg + bodyweight_share * body_kg
        } else {
            external_kg.max(DEFAULT_BODYWEIGHT_SHARE * body_kg)
        };
        let work_joules = total_reps * load_kg * GRAVITY * REP_DISPLACEMENT_M;
        let mechanical = work_joules / efficiency / JOULES_PER_KCAL;
        let metabolic = met * intensity * body_kg * active_hours;
        mechanical + metabolic
    };

    let low = bound(body_low, EFFICIENCY.0, STRENGTH_MET.0);
    let high = bound(body_high, EFFICIENCY.1, STRENGTH_MET.1);

    Some(CalorieEstimate::Range {
        low: round1(low),
        high: round1(high),
    })
}

/// Combine estimates for display totals, skipping empty results.
///
/// Stays exact only while every part is exact.
pub fn sum_estimates<I>(estimates: I) -> Option<CalorieEstimate>
where
    I: IntoIterator<Item = Option<CalorieEstimate>>,
{
    estimates
        .into_iter()
        .flatten()
        .filter(|e| e.high() > 0.0)
        .reduce(CalorieEstimate::add)
}

/// Raise both bounds of `estimate` to at least those of `floor`
fn floor_at(
    estimate: Option<CalorieEstimate>,
    floor: Option<CalorieEstimate>,
) -> Option<CalorieEstimate> {
    match (estimate, floor) {
        (Some(e), Some(f)) => Some(CalorieEstimate::Range {
            low: e.low().max(f.low()),
            high: e.high().max(f.high()),
        }),
        (e, None) => e,
        (None, f) => f,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(body_lbs: Option<f64>) -> EstimatorSettings {
        EstimatorSettings {
            body_weight: body_lbs,
            weight_unit: WeightUnit::Lbs,
            distance_unit: DistanceUnit::Miles,
        }
    }

    fn lift(key: &str, sets: u32, reps: u32, weight: f64) -> ExerciseInput {
        ExerciseInput {
            exercise_key: key.to_string(),
            sets,
            reps,
            weight,
            ..Default::default()
        }
    }

    fn cardio(key: &str, minutes: Option<f64>, miles: Option<f64>) -> ExerciseInput {
        ExerciseInput {
            exercise_key: key.to_string(),
            duration_minutes: minutes,
            distance: miles,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_effort_is_empty() {
        let zero = ExerciseInput {
            exercise_key: "bench_press".to_string(),
            weight: 135.0,
            duration_minutes: Some(0.0),
            distance: Some(0.0),
            ..Default::default()
        };
        assert!(zero.is_zero_effort());
        assert_eq!(estimate(&zero, &settings(Some(180.0))), None);
        assert_eq!(estimate(&zero, &settings(None)), None);
    }

    #[test]
    fn test_invalid_input_is_empty() {
        assert_eq!(estimate(&lift("squat", 3, 5, -10.0), &settings(Some(180.0))), None);
        assert_eq!(estimate(&cardio("running", Some(f64::NAN), None), &settings(Some(180.0))), None);
    }

    #[test]
    fn test_cardio_exact_with_body_weight() {
        // 30 min at 3.0 mph -> MET 3.5; 150 lbs = 68.0388 kg
        let input = cardio("walking", Some(30.0), Some(1.5));
        let result = estimate(&input, &settings(Some(150.0))).unwrap();
        assert_eq!(result, CalorieEstimate::Exact { value: 119.1 });
    }

    #[test]
    fn test_cardio_without_body_weight_is_range() {
        let input = cardio("cycling", Some(60.0), None);
        let result = estimate(&input, &settings(None)).unwrap();
        // MET 7.5 over 60-90 kg for one hour
        assert_eq!(result, CalorieEstimate::Range { low: 450.0, high: 675.0 });
    }

    #[test]
    fn test_cardio_distance_only_uses_typical_speed() {
        // 3 miles running at a typical 6 mph = 30 minutes at MET 9.8, 70 kg
        let input = cardio("running", None, Some(3.0));
        let s = EstimatorSettings {
            body_weight: Some(70.0),
            weight_unit: WeightUnit::Kg,
            distance_unit: DistanceUnit::Miles,
        };
        assert_eq!(estimate(&input, &s), Some(CalorieEstimate::Exact { value: 343.0 }));
    }

    #[test]
    fn test_incline_adds_met() {
        let flat = cardio("treadmill", Some(30.0), Some(1.5));
        let mut inclined = flat.clone();
        inclined
            .metadata
            .insert("incline_percent".to_string(), serde_json::json!(10.0));
        let s = settings(Some(150.0));
        let a = estimate(&flat, &s).unwrap().midpoint();
        let b = estimate(&inclined, &s).unwrap().midpoint();
        assert!(b > a);
    }

    #[test]
    fn test_unknown_exercise_classification() {
        assert_eq!(classify(&cardio("zumba", Some(45.0), None)), ExerciseClass::Cardio);
        assert_eq!(classify(&lift("landmine_press", 3, 10, 45.0)), ExerciseClass::Strength);
        assert_eq!(classify(&lift("plank", 3, 0, 0.0)), ExerciseClass::Strength);
        let generic = estimate(&cardio("zumba", Some(60.0), None), &settings(None)).unwrap();
        assert_eq!(generic, CalorieEstimate::Range { low: 300.0, high: 450.0 });
    }

    #[test]
    fn test_strength_is_range() {
        let result = estimate(&lift("bench_press", 3, 10, 135.0), &settings(Some(180.0))).unwrap();
        match result {
            CalorieEstimate::Range { low, high } => {
                assert!(low > 0.0);
                assert!(high > low);
            }
            other => panic!("expected range, got {:?}", other),
        }
    }

    #[test]
    fn test_strength_monotonic_in_resistance() {
        let s = settings(Some(180.0));
        let mut previous = CalorieEstimate::Range { low: 0.0, high: 0.0 };
        for weight in (0..=400).step_by(5) {
            let current = estimate(&lift("squat", 5, 5, weight as f64), &s).unwrap();
            assert!(current.low() >= previous.low());
            assert!(current.high() >= previous.high());
            previous = current;
        }
    }

    #[test]
    fn test_monotonic_in_body_weight() {
        let inputs = [
            lift("pull_up", 3, 8, 0.0),
            lift("deadlift", 1, 5, 315.0),
            cardio("running", Some(25.0), Some(2.5)),
        ];
        for input in &inputs {
            let mut previous = 0.0;
            for body in (100..=300).step_by(10) {
                let current = estimate(input, &settings(Some(body as f64))).unwrap();
                assert!(current.low() >= previous);
                previous = current.low();
            }
        }
    }

    #[test]
    fn test_bodyweight_exercise_without_weight_configured() {
        let result = estimate(&lift("push_up", 3, 20, 0.0), &settings(None)).unwrap();
        assert!(matches!(result, CalorieEstimate::Range { .. }));
        assert!(result.low() > 0.0);
    }

    #[test]
    fn test_uncatalogued_timed_work_monotonic_in_resistance() {
        for body in [Some(180.0), None] {
            let s = settings(body);
            let mut previous = (0.0, 0.0);
            for weight in (0..=100).step_by(5) {
                let input = ExerciseInput {
                    exercise_key: "zumba".to_string(),
                    sets: 3,
                    reps: 10,
                    weight: weight as f64,
                    duration_minutes: Some(10.0),
                    ..Default::default()
                };
                let current = estimate(&input, &s).unwrap();
                assert!(current.low() >= previous.0, "low dropped at {} lbs", weight);
                assert!(current.high() >= previous.1, "high dropped at {} lbs", weight);
                previous = (current.low(), current.high());
            }
        }
    }

    #[test]
    fn test_zero_resistance_uses_body_mass() {
        let s = settings(Some(180.0));
        let unloaded = estimate(&lift("landmine_press", 3, 10, 0.0), &s).unwrap();
        let metabolic_only = estimate(&lift("landmine_press", 3, 0, 0.0), &s);
        assert!(unloaded.low() > 0.0);
        assert!(metabolic_only.map_or(0.0, |e| e.low()) < unloaded.low());

        let light = estimate(&lift("landmine_press", 3, 10, 20.0), &s).unwrap();
        assert!(light.low() >= unloaded.low());
    }

    #[test]
    fn test_reps_without_sets_count_as_one_set() {
        let s = settings(Some(180.0));
        let a = estimate(&lift("bench_press", 0, 10, 135.0), &s);
        let b = estimate(&lift("bench_press", 1, 10, 135.0), &s);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sum_estimates() {
        let exact = |v| Some(CalorieEstimate::Exact { value: v });
        assert_eq!(sum_estimates([exact(100.0), None, exact(50.5)]), exact(150.5));

        let mixed = sum_estimates([
            exact(100.0),
            Some(CalorieEstimate::Range { low: 20.0, high: 40.0 }),
        ]);
        assert_eq!(mixed, Some(CalorieEstimate::Range { low: 120.0, high: 140.0 }));

        assert_eq!(sum_estimates(Vec::<Option<CalorieEstimate>>::new()), None);
        assert_eq!(sum_estimates([None, exact(0.0)]), None);
    }

    #[test]
    fn test_estimate_serialization() {
        let exact = serde_json::to_value(CalorieEstimate::Exact { value: 12.5 }).unwrap();
        assert_eq!(exact, serde_json::json!({"type": "exact", "value": 12.5}));
        let range = serde_json::to_value(CalorieEstimate::Range { low: 1.0, high: 2.0 }).unwrap();
        assert_eq!(range, serde_json::json!({"type": "range", "low": 1.0, "high": 2.0}));
    }

    #[test]
    fn test_from_bounds() {
        assert_eq!(
            CalorieEstimate::from_bounds(Some(10.0), Some(10.0)),
            Some(CalorieEstimate::Exact { value: 10.0 })
        );
        assert_eq!(
            CalorieEstimate::from_bounds(Some(10.0), Some(20.0)),
            Some(CalorieEstimate::Range { low: 10.0, high: 20.0 })
        );
        assert_eq!(CalorieEstimate::from_bounds(None, None), None);
    }
}
