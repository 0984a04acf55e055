//! PNG rendering of evaluated series (plotters)

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;

use super::dsl::ChartType;
use super::error::ChartError;
use super::evaluator::ChartSeries;

const MIN_SIDE: u32 = 100;
const MAX_SIDE: u32 = 4000;

const SERIES_COLOR: RGBColor = RGBColor(0, 112, 192);

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Draw the series as a line or bar chart and return PNG bytes
pub fn render_png(series: &ChartSeries, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    if series.points.is_empty() {
        return Err(ChartError::Render("No data to chart".to_string()));
    }
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(ChartError::Render(format!(
            "Chart size {}x{} is too small",
            width, height
        )));
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(ChartError::Render(format!(
            "Chart size {}x{} is larger than {}x{}",
            width, height, MAX_SIDE, MAX_SIDE
        )));
    }

    let n = series.points.len() as i32;
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let y_min = values.iter().copied().fold(0.0, f64::min);
    let mut y_max = values.iter().copied().fold(0.0, f64::max);
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let headroom = (y_max - y_min) * 0.1;

    let buffer_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| ChartError::Render(format!("Chart size {}x{} overflows", width, height)))?;
    let mut buffer = vec![0u8; buffer_len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&series.metric, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-1..n, y_min..(y_max + headroom))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_labels(series.points.len() + 2)
            .x_label_formatter(&|x| {
                usize::try_from(*x)
                    .ok()
                    .and_then(|i| series.points.get(i))
                    .and_then(|p| p.label.clone())
                    .unwrap_or_default()
            })
            .disable_x_mesh()
            .draw()
            .map_err(render_err)?;

        let points: Vec<(i32, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as i32, *v))
            .collect();

        match series.chart_type {
            ChartType::Line => {
                chart
                    .draw_series(LineSeries::new(points.clone(), SERIES_COLOR.stroke_width(2)))
                    .map_err(render_err)?;
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|(x, y)| Circle::new((*x, *y), 3, SERIES_COLOR.filled())),
                    )
                    .map_err(render_err)?;
            }
            ChartType::Bar => {
                chart
                    .draw_series(points.iter().map(|(x, y)| {
                        let mut bar = Rectangle::new([(*x, 0.0), (*x + 1, *y)], SERIES_COLOR.filled());
                        bar.set_margin(0, 0, 2, 2);
                        bar
                    }))
                    .map_err(render_err)?;
            }
        }

        root.present().map_err(render_err)?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("Failed to create image from buffer".to_string()))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(render_err)?;

    Ok(png_bytes)
}
