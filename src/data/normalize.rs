use super::model::{CellValue, Dataset};

/// Canonical column names the aggregator and renderer depend on.
pub const COL_SPEED: &str = "sv_precrash_speed_mph";
pub const COL_MODEL_YEAR: &str = "model_year";
pub const COL_YEAR: &str = "year";
pub const COL_MAKE: &str = "make";

/// Known alternate spellings → canonical name. Renames are applied only when
/// the alternate is actually present; everything else is left untouched.
const RENAME_MAP: &[(&str, &str)] = &[
    ("sv precrash speed mph", COL_SPEED),
    ("sv_precrash_speed", COL_SPEED),
    ("vehicle_make", COL_MAKE),
    ("report_year", COL_YEAR),
];

/// Columns coerced to numeric after renaming.
const NUMERIC_COLUMNS: &[&str] = &[COL_SPEED, COL_MODEL_YEAR, COL_YEAR];

/// Standardize expected columns if present. Works defensively: only operates
/// on columns that exist, and numeric coercion turns unparseable cells into
/// `CellValue::Null` rather than erroring.
pub fn normalize(dataset: &mut Dataset) {
    for (alternate, canonical) in RENAME_MAP {
        dataset.rename_column(alternate, canonical);
    }

    for col in NUMERIC_COLUMNS {
        dataset.map_column(col, coerce_numeric);
    }
}

/// Lossy numeric cast: parse failures become `Null`, never an error.
/// NaN counts as missing so it drops out of the aggregates downstream.
fn coerce_numeric(value: &CellValue) -> CellValue {
    match value {
        CellValue::Integer(_) => value.clone(),
        CellValue::Float(f) if !f.is_nan() => value.clone(),
        CellValue::Float(_) => CellValue::Null,
        CellValue::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if !f.is_nan() => CellValue::Float(f),
            _ => CellValue::Null,
        },
        CellValue::Null => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(pairs: &[(&str, CellValue)]) -> BTreeMap<String, CellValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn renames_alternates_to_canonical() {
        let mut ds = Dataset::new(
            vec!["vehicle_make".into()],
            vec![row(&[("vehicle_make", CellValue::String("Ford".into()))])],
        );
        normalize(&mut ds);
        assert!(ds.has_column(COL_MAKE));
        assert!(!ds.has_column("vehicle_make"));
    }

    #[test]
    fn coerces_numeric_columns() {
        let mut ds = Dataset::new(
            vec![COL_SPEED.into()],
            vec![
                row(&[(COL_SPEED, CellValue::String("12.5".into()))]),
                row(&[(COL_SPEED, CellValue::String("unknown".into()))]),
                row(&[(COL_SPEED, CellValue::String("NaN".into()))]),
                row(&[(COL_SPEED, CellValue::Integer(30))]),
            ],
        );
        normalize(&mut ds);
        let speeds = ds.numeric_column(COL_SPEED).unwrap();
        assert_eq!(speeds, vec![Some(12.5), None, None, Some(30.0)]);
    }

    #[test]
    fn make_column_is_not_coerced() {
        let mut ds = Dataset::new(
            vec![COL_MAKE.into()],
            vec![row(&[(COL_MAKE, CellValue::String("Ford".into()))])],
        );
        normalize(&mut ds);
        assert_eq!(
            ds.rows[0].get(COL_MAKE),
            Some(&CellValue::String("Ford".into()))
        );
    }

    #[test]
    fn noop_on_absent_columns() {
        let mut ds = Dataset::new(vec!["other".into()], vec![]);
        normalize(&mut ds);
        assert_eq!(ds.column_names, vec!["other".to_string()]);
    }
}
