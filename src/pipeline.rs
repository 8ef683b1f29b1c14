//! The top-to-bottom analysis pipeline: load → normalize → aggregate →
//! render → report. Fully synchronous; any infrastructure failure aborts
//! the run, data-quality issues never do.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis;
use crate::data::loader::load_csv;
use crate::data::normalize::{normalize, COL_SPEED};
use crate::plot::{self, FILE_SPEED_HIST, FILE_TOP_MAKES};
use crate::report;

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub fig_dir: PathBuf,
    pub summary_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data/cleaned/SGO-ADS-crash-data-clean.csv"),
            fig_dir: PathBuf::from("notebooks/figures"),
            summary_path: PathBuf::from("notebooks/eda_summary.md"),
        }
    }
}

/// Run the whole analysis once. Outputs overwrite any previous run.
pub fn run(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.fig_dir)
        .with_context(|| format!("creating figure directory {}", config.fig_dir.display()))?;

    let mut dataset = load_csv(&config.data_path)?;
    normalize(&mut dataset);

    let summary = analysis::summarize(&dataset);
    log::info!(
        "aggregated: speed stats {}, {} makes, {} years, correlation {}",
        if summary.speed.is_some() { "ok" } else { "unavailable" },
        summary.top_makes.len(),
        summary.counts_by_year.len(),
        summary
            .corr_speed_model_year
            .map(|r| format!("{r:.4}"))
            .unwrap_or_else(|| "NA".to_string()),
    );

    let speeds = analysis::clean_numeric(&dataset, COL_SPEED);
    plot::speed_histogram(&speeds, &config.fig_dir.join(FILE_SPEED_HIST))?;
    plot::top_makes_chart(&summary.top_makes, &config.fig_dir.join(FILE_TOP_MAKES))?;

    report::write_report(&summary, &config.summary_path)?;
    Ok(())
}
