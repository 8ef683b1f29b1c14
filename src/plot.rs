//! Chart rendering: headless PNG output via plotters.
//!
//! Each renderer is a no-op when its data is empty; rendering-backend and
//! filesystem failures propagate as fatal. Existing files at the target
//! paths are overwritten unconditionally.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

pub const FILE_SPEED_HIST: &str = "speed_hist.png";
pub const FILE_TOP_MAKES: &str = "top_makes.png";

// 7x4 in and 8x4.5 in at 150 DPI.
const HIST_SIZE: (u32, u32) = (1050, 600);
const BARS_SIZE: (u32, u32) = (1200, 675);

const HIST_COLOR: RGBColor = RGBColor(0x33, 0x66, 0xcc);
const BAR_COLOR: RGBColor = RGBColor(0x33, 0xa0, 0x2c);

const N_BINS: usize = 20;

/// Histogram of non-missing pre-crash speeds: 20 equal-width bins with a
/// Gaussian-KDE density overlay scaled to the count axis.
pub fn speed_histogram(values: &[f64], path: &Path) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate range (all values equal): widen so the bins have area.
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let bin_width = (hi - lo) / N_BINS as f64;

    let mut bins = [0u64; N_BINS];
    for &v in values {
        let idx = (((v - lo) / bin_width) as usize).min(N_BINS - 1);
        bins[idx] += 1;
    }

    let density = density_curve(values, lo, hi, bin_width);
    let peak_count = bins.iter().copied().max().unwrap_or(0) as f64;
    let peak_density = density
        .iter()
        .map(|&(_, y)| y)
        .fold(0.0f64, f64::max);
    let y_max = (peak_count.max(peak_density) * 1.05).max(1.0);

    let root = BitMapBackend::new(path, HIST_SIZE).into_drawing_area();
    root.fill(&WHITE).context("filling histogram background")?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Pre-crash Speed (mph)", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(lo..hi, 0f64..y_max)
        .context("building histogram chart")?;

    chart
        .configure_mesh()
        .x_desc("Pre-crash speed (mph)")
        .y_desc("Count")
        .draw()
        .context("drawing histogram mesh")?;

    chart
        .draw_series(bins.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, count as f64)], HIST_COLOR.mix(0.7).filled())
        }))
        .context("drawing histogram bars")?;

    if !density.is_empty() {
        chart
            .draw_series(LineSeries::new(density, HIST_COLOR.stroke_width(2)))
            .context("drawing density overlay")?;
    }

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Gaussian KDE over `[lo, hi]` with Scott's-rule bandwidth, scaled by
/// `n * bin_width` so the curve overlays the count axis. Empty when the
/// bandwidth is degenerate (fewer than 2 values or zero spread).
fn density_curve(values: &[f64], lo: f64, hi: f64, bin_width: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = var.sqrt() * (n as f64).powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Vec::new();
    }

    let scale = n as f64 * bin_width;
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth * n as f64);
    const POINTS: usize = 200;
    (0..=POINTS)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / POINTS as f64;
            let density: f64 = values
                .iter()
                .map(|&v| (-((x - v) / bandwidth).powi(2) / 2.0).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

/// Horizontal bar chart of the top makes: count on x, make name on y,
/// most frequent make at the top.
pub fn top_makes_chart(makes: &[(String, u64)], path: &Path) -> Result<()> {
    if makes.is_empty() {
        return Ok(());
    }

    let n = makes.len();
    // Row 0 of the chart is the bottom; reverse so the top make draws first.
    let names: Vec<&str> = makes.iter().rev().map(|(m, _)| m.as_str()).collect();
    let x_max = makes.iter().map(|&(_, c)| c).max().unwrap_or(0) as f64 * 1.05;

    let root = BitMapBackend::new(path, BARS_SIZE).into_drawing_area();
    root.fill(&WHITE).context("filling bar chart background")?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top 10 Makes in ADS Crash Reports", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(160)
        .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())
        .context("building bar chart")?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Count")
        .y_desc("Make (top 10)")
        .y_labels(n)
        .y_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                names.get(*i).map(|s| s.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()
        .context("drawing bar chart mesh")?;

    chart
        .draw_series(makes.iter().rev().enumerate().map(|(i, &(_, count))| {
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (count as f64, SegmentValue::Exact(i + 1)),
                ],
                BAR_COLOR.filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))
        .context("drawing bars")?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
