//! Header-keyed access to one snapshot row with typed, column-tagged casts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A cell that is present but cannot be cast to the type its column needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{column}: {reason}")]
pub struct CellError {
    pub column: String,
    pub reason: String,
}

impl CellError {
    pub fn new(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// One data row of a snapshot file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotRow {
    index: usize,
    cells: BTreeMap<String, String>,
}

impl SnapshotRow {
    pub fn new(index: usize, cells: BTreeMap<String, String>) -> Self {
        Self { index, cells }
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<'a>(index: usize, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            index,
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Zero-based position of the row in its file.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Trimmed cell content; blank cells read as absent.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First non-blank cell among `columns`.
    pub fn first_cell(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|column| self.cell(column))
    }

    pub fn text(&self, column: &str) -> Result<String, CellError> {
        self.cell(column)
            .map(str::to_string)
            .ok_or_else(|| CellError::new(column, "is required"))
    }

    pub fn optional_text(&self, column: &str) -> Option<String> {
        self.cell(column).map(str::to_string)
    }

    pub fn text_or(&self, column: &str, default: &str) -> String {
        self.cell(column).unwrap_or(default).to_string()
    }

    /// Cell text or `default`, truncated to `max_chars` characters.
    pub fn text_within(&self, column: &str, default: &str, max_chars: usize) -> String {
        truncate(self.cell(column).unwrap_or(default), max_chars)
    }

    pub fn number(&self, column: &str) -> Result<f64, CellError> {
        self.optional_number(column)?
            .ok_or_else(|| CellError::new(column, "is required"))
    }

    pub fn number_or(&self, column: &str, default: f64) -> Result<f64, CellError> {
        Ok(self.optional_number(column)?.unwrap_or(default))
    }

    pub fn optional_number(&self, column: &str) -> Result<Option<f64>, CellError> {
        self.cell(column)
            .map(|raw| parse_number(column, raw))
            .transpose()
    }

    pub fn integer(&self, column: &str) -> Result<i64, CellError> {
        self.optional_integer(column)?
            .ok_or_else(|| CellError::new(column, "is required"))
    }

    pub fn integer_or(&self, column: &str, default: i64) -> Result<i64, CellError> {
        Ok(self.optional_integer(column)?.unwrap_or(default))
    }

    /// Accepts whole numbers written as reals (`"20.0"`), as spreadsheet exports do.
    pub fn optional_integer(&self, column: &str) -> Result<Option<i64>, CellError> {
        self.cell(column)
            .map(|raw| {
                let value = parse_number(column, raw)?;
                if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
                    return Err(CellError::new(
                        column,
                        format!("expected a whole number, got {:?}", raw),
                    ));
                }
                Ok(value as i64)
            })
            .transpose()
    }

    /// A store id column; ids outside the `i32` key range are rejected.
    pub fn optional_id(&self, column: &str) -> Result<Option<i32>, CellError> {
        self.optional_integer(column)?
            .map(|id| i32::try_from(id).map_err(|_| CellError::new(column, "out of range")))
            .transpose()
    }

    pub fn optional_date(&self, column: &str) -> Result<Option<NaiveDate>, CellError> {
        self.cell(column)
            .map(|raw| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                    .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
                    .ok_or_else(|| {
                        CellError::new(column, format!("expected a date, got {:?}", raw))
                    })
            })
            .transpose()
    }

    pub fn optional_datetime(&self, column: &str) -> Result<Option<DateTime<Utc>>, CellError> {
        self.cell(column)
            .map(|raw| {
                parse_datetime(raw).ok_or_else(|| {
                    CellError::new(column, format!("expected a timestamp, got {:?}", raw))
                })
            })
            .transpose()
    }
}

fn parse_number(column: &str, raw: &str) -> Result<f64, CellError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CellError::new(
            column,
            format!("expected a number, got {:?}", raw),
        )),
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn row(pairs: &[(&'static str, &'static str)]) -> SnapshotRow {
        SnapshotRow::from_pairs(0, pairs.iter().copied())
    }

    #[test]
    fn blank_cells_read_as_absent() {
        let r = row(&[("status", "   "), ("capacity_tons", "")]);
        assert!(r.has_column("status"));
        assert_eq!(r.cell("status"), None);
        assert_eq!(r.number_or("capacity_tons", 2000.0).unwrap(), 2000.0);
    }

    #[test]
    fn number_errors_cite_column_and_value() {
        let r = row(&[("quantity", "abc")]);
        let err = r.number("quantity").unwrap_err();
        assert_eq!(err.to_string(), r#"quantity: expected a number, got "abc""#);
        assert_matches!(r.number_or("quantity", 1000.0), Err(_));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let r = row(&[("weight", "NaN"), ("distance_km", "inf")]);
        assert!(r.optional_number("weight").is_err());
        assert!(r.number("distance_km").is_err());
    }

    #[test]
    fn integers_accept_whole_reals_only() {
        let r = row(&[("total_wagons", "20.0"), ("customer_id", "1001.5")]);
        assert_eq!(r.integer_or("total_wagons", 0).unwrap(), 20);
        let err = r.optional_integer("customer_id").unwrap_err();
        assert_eq!(err.column, "customer_id");
    }

    #[test]
    fn dates_accept_common_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        for raw in ["2024-03-09", "09-03-2024", "09/03/2024", "2024-03-09 14:30:00"] {
            let r = row(&[("last_maintenance_date", raw)]);
            assert_eq!(
                r.optional_date("last_maintenance_date").unwrap(),
                Some(expected),
                "{raw}"
            );
        }
        let r = row(&[("last_maintenance_date", "soon")]);
        assert!(r.optional_date("last_maintenance_date").is_err());
    }

    #[test]
    fn datetimes_accept_rfc3339_and_plain_forms() {
        let r = row(&[("eta", "2024-03-09T10:00:00+05:30"), ("departure_time", "2024-03-09 04:30:00")]);
        let eta = r.optional_datetime("eta").unwrap().unwrap();
        let departure = r.optional_datetime("departure_time").unwrap().unwrap();
        assert_eq!(eta, departure);
    }

    #[test]
    fn text_within_truncates_by_characters() {
        let r = row(&[("unit", "metric tonnes (long form description)")]);
        assert_eq!(r.text_within("unit", "tons", 20), "metric tonnes (long ");
        assert_eq!(r.text_within("missing", "tons", 20), "tons");
    }

    #[test]
    fn text_or_keeps_the_whole_cell() {
        let long = "Finished Goods Yard, Bay 14, North Annex Covered Storage";
        let r = row(&[("storage_location", long)]);
        assert_eq!(r.text_or("storage_location", "Storage A"), long);
        assert_eq!(r.text_or("unit", "tons"), "tons");
    }

    #[test]
    fn ids_must_fit_the_key_range() {
        let r = row(&[("order_id", "42"), ("rake_id", "4294967297"), ("customer_id", "-2147483649")]);
        assert_eq!(r.optional_id("order_id").unwrap(), Some(42));
        assert_eq!(r.optional_id("missing").unwrap(), None);

        let err = r.optional_id("rake_id").unwrap_err();
        assert_eq!(err.to_string(), "rake_id: out of range");
        assert!(r.optional_id("customer_id").is_err());
    }

    #[test]
    fn first_cell_skips_blank_aliases() {
        let r = row(&[("status", ""), ("order_status", "dispatched")]);
        assert_eq!(r.first_cell(&["status", "order_status"]), Some("dispatched"));
    }
}
