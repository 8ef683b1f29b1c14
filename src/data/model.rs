use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in the dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. `Null` is the explicit missing-value
/// sentinel used everywhere instead of erroring on bad or absent data.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table: named columns × row-major records.
///
/// Loaded once, mutated in place by the normalizer (column renames, numeric
/// coercion), then read-only for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// One map per row: column_name → cell value. A column absent from a
    /// row's map is treated the same as `CellValue::Null`.
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl Dataset {
    /// Build a dataset from header names and parsed rows.
    pub fn new(column_names: Vec<String>, rows: Vec<BTreeMap<String, CellValue>>) -> Self {
        Dataset { column_names, rows }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.column_names.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Rename a column in place. No-op when `from` is absent or the names
    /// are equal. When `from` exists its cells move to `to` in every row.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if from == to || !self.has_column(from) {
            return;
        }
        for name in &mut self.column_names {
            if name == from {
                *name = to.to_string();
            }
        }
        for row in &mut self.rows {
            if let Some(val) = row.remove(from) {
                row.insert(to.to_string(), val);
            }
        }
    }

    /// Apply `f` to every cell of a column in place. No-op when absent.
    pub fn map_column<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&CellValue) -> CellValue,
    {
        if !self.has_column(name) {
            return;
        }
        for row in &mut self.rows {
            let mapped = f(row.get(name).unwrap_or(&CellValue::Null));
            row.insert(name.to_string(), mapped);
        }
    }

    /// The column as per-row `Option<f64>` (None for missing / non-numeric
    /// cells). Returns `None` when the column itself is absent.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(name).and_then(CellValue::as_f64))
                .collect(),
        )
    }

}
