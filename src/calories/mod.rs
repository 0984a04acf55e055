//! Calorie-burn estimation
//!
//! Rule table from exercise classification and measured effort to an exact
//! value or a low/high range.

pub mod catalog;
pub mod estimator;
pub mod units;

pub use catalog::{
    canonical_key, entries, intensity_multiplier, lookup, met_for_speed, CatalogEntry,
    ExerciseClass, ExerciseProfile,
};
pub use estimator::{classify, estimate, sum_estimates, CalorieEstimate, EstimatorSettings, ExerciseInput};
pub use units::{DistanceUnit, WeightUnit, KG_PER_LB, MILES_PER_KM};
