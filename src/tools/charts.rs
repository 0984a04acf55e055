//! Chart MCP Tools
//!
//! Evaluate a chart spec over stored daily totals, and render it to PNG.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::chart::{self, ChartEvaluator, ChartSeries, ChartSpec};
use crate::db::Database;
use crate::models::DailyTotals;
use super::date_or_today;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 500;

/// Response for render_chart
#[derive(Debug, Serialize)]
pub struct RenderChartResponse {
    pub success: bool,
    pub file_path: String,
    pub bytes: usize,
    pub points: usize,
    pub date_range: String,
}

/// Load the totals a spec needs and evaluate it
fn evaluate(db: &Database, dsl: &Value, anchor: NaiveDate) -> Result<ChartSeries, String> {
    let spec = ChartSpec::parse(dsl).map_err(|e| e.to_string())?;
    let evaluator = ChartEvaluator::new(anchor);
    let (start, end) = evaluator.range_for(&spec).map_err(|e| e.to_string())?;

    let totals = db
        .with_conn(|conn| DailyTotals::load_range(conn, start, end))
        .map_err(|e| format!("Failed to load totals: {}", e))?;

    evaluator.evaluate_spec(&spec, &totals).map_err(|e| e.to_string())
}

/// Evaluate a chart spec; relative ranges end at `today` (default: local date)
pub fn evaluate_chart(db: &Database, dsl: &Value, today: Option<&str>) -> Result<ChartSeries, String> {
    evaluate(db, dsl, date_or_today(today)?)
}

/// Evaluate a chart spec and write it as a PNG file
pub fn render_chart(
    db: &Database,
    dsl: &Value,
    output_path: &str,
    width: Option<u32>,
    height: Option<u32>,
    today: Option<&str>,
) -> Result<RenderChartResponse, String> {
    let series = evaluate(db, dsl, date_or_today(today)?)?;
    let png = chart::render_png(
        &series,
        width.unwrap_or(DEFAULT_WIDTH),
        height.unwrap_or(DEFAULT_HEIGHT),
    )
    .map_err(|e| e.to_string())?;

    let path = Path::new(output_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory: {}", e))?;
    }
    std::fs::write(path, &png).map_err(|e| format!("Failed to write chart: {}", e))?;

    info!(
        "Rendered {} chart ({} points) to {}",
        series.metric,
        series.points.len(),
        path.display()
    );

    Ok(RenderChartResponse {
        success: true,
        file_path: path.display().to_string(),
        bytes: png.len(),
        points: series.points.len(),
        date_range: format!("{} to {}", series.start, series.end),
    })
}
