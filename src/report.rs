//! Text report assembly: a fixed-structure document built from the summary.
//!
//! Pure formatting, no computation. The placeholder strings ("NA", "(none)",
//! "(sv_precrash_speed_mph not available)") are part of the contract with
//! the report's readers and must be emitted exactly when data is missing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{SpeedStats, Summary};
use crate::plot::{FILE_SPEED_HIST, FILE_TOP_MAKES};

/// Render the whole report. Sections appear in fixed order and the document
/// ends with a trailing newline.
pub fn render_report(summary: &Summary) -> String {
    let top_makes = if summary.top_makes.is_empty() {
        "(none)".to_string()
    } else {
        summary
            .top_makes
            .iter()
            .map(|(make, count)| format!("- {make}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let counts_by_year = if summary.counts_by_year.is_empty() {
        "(none)".to_string()
    } else {
        summary
            .counts_by_year
            .iter()
            .map(|(year, count)| format!("- {year}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let correlation = match summary.corr_speed_model_year {
        Some(r) => format!("sv_precrash_speed_mph vs model_year: {r:.4}"),
        None => "sv_precrash_speed_mph vs model_year: NA".to_string(),
    };

    let lines = [
        "# EDA Summary".to_string(),
        String::new(),
        format!(
            "Rows: {}  |  Columns: {}",
            summary.n_rows, summary.n_cols
        ),
        String::new(),
        "## Pre-crash Speed (mph) Stats".to_string(),
        fmt_speed_stats(summary.speed.as_ref()),
        String::new(),
        "## Top 10 Makes".to_string(),
        top_makes,
        String::new(),
        "## Counts by Year".to_string(),
        counts_by_year,
        String::new(),
        "## Correlation".to_string(),
        correlation,
        String::new(),
        "## Figures".to_string(),
        format!("- {FILE_SPEED_HIST}"),
        format!("- {FILE_TOP_MAKES}"),
        String::new(),
    ];
    lines.join("\n")
}

/// Write the rendered report to `path`, overwriting any previous run.
pub fn write_report(summary: &Summary, path: &Path) -> Result<()> {
    fs::write(path, render_report(summary))
        .with_context(|| format!("writing report to {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn fmt_speed_stats(stats: Option<&SpeedStats>) -> String {
    let Some(stats) = stats else {
        return "(sv_precrash_speed_mph not available)".to_string();
    };
    let std = stats
        .std
        .map(fmt_thousands)
        .unwrap_or_else(|| "NA".to_string());
    format!(
        "count={}, mean={}, median={}, std={}, min={}, max={}",
        stats.count,
        fmt_thousands(stats.mean),
        fmt_thousands(stats.median),
        std,
        fmt_thousands(stats.min),
        fmt_thousands(stats.max),
    )
}

/// Format with 2 decimals and a comma every three digits of the integer
/// part, like `12,345.68`.
fn fmt_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
