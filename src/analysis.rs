//! Descriptive statistics over the normalized crash-report dataset.
//!
//! Every aggregate is computed defensively: when its required column is
//! absent, or no valid values remain after dropping missing cells, the
//! aggregate is an explicit "unavailable" marker (`None` / empty), never an
//! error.

use std::collections::{BTreeMap, HashMap};

use crate::data::model::Dataset;
use crate::data::normalize::{COL_MAKE, COL_MODEL_YEAR, COL_SPEED, COL_YEAR};

/// Descriptive statistics for the pre-crash speed column.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; undefined for fewer than 2 values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Everything the reporter needs, computed in one pass over the dataset.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub speed: Option<SpeedStats>,
    /// Top-10 makes, descending by count (ties broken by first appearance).
    pub top_makes: Vec<(String, u64)>,
    /// Record counts keyed by report year, ascending.
    pub counts_by_year: BTreeMap<i64, u64>,
    /// Pearson correlation of pre-crash speed vs model year, when defined.
    pub corr_speed_model_year: Option<f64>,
}

/// Run all four aggregations. Each is independent and order-insensitive.
pub fn summarize(dataset: &Dataset) -> Summary {
    Summary {
        n_rows: dataset.n_rows(),
        n_cols: dataset.n_cols(),
        speed: speed_stats(dataset),
        top_makes: top_makes(dataset, 10),
        counts_by_year: counts_by_year(dataset),
        corr_speed_model_year: speed_model_year_correlation(dataset),
    }
}

/// Non-missing values of a numeric column, or empty when absent.
pub fn clean_numeric(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .numeric_column(column)
        .map(|col| col.into_iter().flatten().collect())
        .unwrap_or_default()
}

pub fn speed_stats(dataset: &Dataset) -> Option<SpeedStats> {
    let values = clean_numeric(dataset, COL_SPEED);
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (count - 1) as f64).sqrt())
    } else {
        None
    };
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(SpeedStats {
        count,
        mean,
        median: median(&values),
        std,
        min,
        max,
    })
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Frequency counts for the make column: drop missing cells, render every
/// remaining cell as text, trim whitespace, and keep the `limit` most
/// frequent. Ties are broken by first appearance in the data.
pub fn top_makes(dataset: &Dataset, limit: usize) -> Vec<(String, u64)> {
    if !dataset.has_column(COL_MAKE) {
        return Vec::new();
    }

    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
    let mut order = 0usize;
    for row in &dataset.rows {
        let Some(cell) = row.get(COL_MAKE) else {
            continue;
        };
        if cell.is_null() {
            continue;
        }
        // A NaN-valued cell is a missing value, same as Null.
        if cell.as_f64().is_some_and(f64::is_nan) {
            continue;
        }
        let make = cell.to_string().trim().to_string();
        let entry = counts.entry(make).or_insert((0, order));
        entry.0 += 1;
        order += 1;
    }

    let mut ranked: Vec<(String, u64, usize)> = counts
        .into_iter()
        .map(|(make, (count, first_seen))| (make, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(make, count, _)| (make, count))
        .collect()
}

/// Record counts per report year, ascending by year. Fractional year values
/// are truncated toward zero, matching an integer cast.
pub fn counts_by_year(dataset: &Dataset) -> BTreeMap<i64, u64> {
    let mut counts = BTreeMap::new();
    for year in clean_numeric(dataset, COL_YEAR) {
        *counts.entry(year as i64).or_insert(0) += 1;
    }
    counts
}

/// Pearson correlation between pre-crash speed and model year over
/// pairwise-complete rows. `None` when either column is absent, fewer than
/// two pairs remain, or the coefficient is not finite (zero variance).
pub fn speed_model_year_correlation(dataset: &Dataset) -> Option<f64> {
    let speeds = dataset.numeric_column(COL_SPEED)?;
    let model_years = dataset.numeric_column(COL_MODEL_YEAR)?;

    let pairs: Vec<(f64, f64)> = speeds
        .into_iter()
        .zip(model_years)
        .filter_map(|(s, m)| Some((s?, m?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then_some(r)
}
