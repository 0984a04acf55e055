//! Chart DSL
//!
//! Parse a declarative chart spec, evaluate it over daily totals and
//! optionally render the result to PNG.

mod dsl;
mod error;
mod evaluator;
mod labels;
mod render;

pub use dsl::{Aggregation, ChartSpec, ChartType, DateRange, GroupBy, Metric, MAX_RANGE_DAYS};
pub use error::ChartError;
pub use evaluator::{ChartEvaluator, ChartPoint, ChartSeries};
pub use labels::{label_mask, label_stride};
pub use render::render_png;
