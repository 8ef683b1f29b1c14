use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{CellValue, Dataset};

/// Infrastructure failures while loading the input file. These are fatal:
/// they propagate up through the pipeline and terminate the run. Data-shape
/// problems (bad cells, absent columns) never surface here; they become
/// `CellValue::Null` and are handled downstream.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {0}")]
    MissingFile(String),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// How every cell of one column is interpreted. Inferred per column, not
/// per cell: a column is numeric only when all of its non-missing cells
/// parse, otherwise the cells keep their original text verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnType {
    Integer,
    Float,
    Text,
}

/// Load a crash-report table from a CSV file.
///
/// The header row defines the column names; no schema is assumed. Each
/// column's type is inferred from its cells (missing and NaN tokens are
/// ignored during inference) and consistency is enforced later by the
/// normalizer.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(LoadError::MissingFile(path.display().to_string()).into());
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(LoadError::Csv)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(LoadError::Csv)
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(LoadError::Csv)
            .with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|col_idx| infer_column_type(records.iter().map(|r| r.get(col_idx).unwrap_or(""))))
        .collect();

    let rows: Vec<BTreeMap<String, CellValue>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .map(|(col_idx, col_name)| {
                    let raw = record.get(col_idx).unwrap_or("");
                    (col_name.clone(), parse_cell(raw, types[col_idx]))
                })
                .collect()
        })
        .collect();

    log::info!(
        "loaded {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );
    Ok(Dataset::new(headers, rows))
}

/// A cell that stands for "no data": empty/whitespace, or a NaN token
/// (`NaN`, `nan`, ...). These never become values in any column.
fn is_na_token(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return true;
    }
    trimmed.parse::<f64>().map(f64::is_nan).unwrap_or(false)
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut inferred = ColumnType::Integer;
    for cell in cells {
        let trimmed = cell.trim();
        if is_na_token(trimmed) {
            continue;
        }
        if inferred == ColumnType::Integer && trimmed.parse::<i64>().is_err() {
            inferred = ColumnType::Float;
        }
        if inferred == ColumnType::Float && trimmed.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }
    inferred
}

fn parse_cell(raw: &str, column_type: ColumnType) -> CellValue {
    let trimmed = raw.trim();
    if is_na_token(trimmed) {
        return CellValue::Null;
    }
    match column_type {
        ColumnType::Integer => trimmed
            .parse()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        ColumnType::Float => trimmed
            .parse()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnType::Text => CellValue::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn load(content: &str) -> Dataset {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, content);
        load_csv(&path).unwrap()
    }

    #[test]
    fn infers_column_types_from_all_cells() {
        assert_eq!(
            infer_column_type(["42", "7", ""].into_iter()),
            ColumnType::Integer
        );
        assert_eq!(
            infer_column_type(["42", "3.5"].into_iter()),
            ColumnType::Float
        );
        assert_eq!(
            infer_column_type(["42", "Ford"].into_iter()),
            ColumnType::Text
        );
        assert_eq!(infer_column_type(std::iter::empty()), ColumnType::Integer);
    }

    #[test]
    fn mixed_column_keeps_text_verbatim() {
        // One non-numeric cell makes the whole column text, so zero-padded
        // strings are not collapsed into numbers.
        let ds = load("make\nFord\n007\n");
        assert_eq!(
            ds.rows[1].get("make"),
            Some(&CellValue::String("007".into()))
        );
    }

    #[test]
    fn nan_tokens_load_as_null_in_any_column() {
        let ds = load("make,speed\nFord,10\nNaN,nan\n");
        assert_eq!(ds.rows[1].get("make"), Some(&CellValue::Null));
        assert_eq!(ds.rows[1].get("speed"), Some(&CellValue::Null));
        assert_eq!(ds.rows[0].get("speed"), Some(&CellValue::Integer(10)));
    }

    #[test]
    fn loads_headers_and_rows() {
        let ds = load("make,year\nFord,2020\nGM,\n");
        assert_eq!(ds.column_names, vec!["make", "year"]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.rows[0].get("year"), Some(&CellValue::Integer(2020)));
        assert_eq!(ds.rows[1].get("year"), Some(&CellValue::Null));
    }

    #[test]
    fn headers_only_is_empty_dataset() {
        let ds = load("make,year\n");
        assert_eq!(ds.n_rows(), 0);
        assert_eq!(ds.n_cols(), 2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err
            .downcast_ref::<LoadError>()
            .map(|e| matches!(e, LoadError::MissingFile(_)))
            .unwrap_or(false));
    }

    #[test]
    fn malformed_csv_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "a,b\n\"unterminated,1\n2,3\n");
        assert!(load_csv(&path).is_err());
    }
}
