//! Read-only access to the flat-file snapshots, one CSV per entity kind.

pub mod row;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::config::{AppConfig, SnapshotFiles};
use crate::errors::ServiceError;
use crate::models::{route, EntityKind};
pub use row::{CellError, SnapshotRow};

/// Source of raw snapshot rows for an entity kind, in file order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn read(&self, kind: EntityKind) -> Result<Vec<SnapshotRow>, ServiceError>;
}

/// Contents of one snapshot file as served by the browser endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotFile {
    pub file_name: String,
    pub record_count: usize,
    pub last_modified: Option<DateTime<Utc>>,
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Map<String, Value>>,
}

/// min/max/avg/sum over the non-blank cells of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sum: f64,
}

/// Per-column statistics of one snapshot file. A column is numeric when every
/// non-blank cell parses as a number; other columns get value counts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotSummary {
    pub file_name: String,
    pub record_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub numeric_statistics: BTreeMap<String, NumericSummary>,
    #[schema(value_type = Object)]
    pub categorical_counts: BTreeMap<String, BTreeMap<String, usize>>,
}

struct ParsedCsv {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

/// CSV snapshots under a directory, named per [`SnapshotFiles`].
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    dir: PathBuf,
    files: SnapshotFiles,
}

impl CsvSnapshotSource {
    pub fn new(dir: impl Into<PathBuf>, files: SnapshotFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.snapshot_dir.clone(), config.snapshot_files.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self, kind: EntityKind) -> &str {
        self.files.file_for(kind)
    }

    async fn load(&self, file_name: &str) -> Result<ParsedCsv, ServiceError> {
        let path = self.dir.join(file_name);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ServiceError::SnapshotNotFound(file_name.to_string()),
            _ => ServiceError::malformed(file_name, format!("unreadable: {}", e)),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::Headers)
            .from_reader(bytes.as_slice());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ServiceError::malformed(file_name, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ServiceError::malformed(file_name, "missing header row"));
        }

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::malformed(file_name, e.to_string()))?;

        debug!(file = file_name, rows = records.len(), "Parsed snapshot file");
        Ok(ParsedCsv { headers, records })
    }

    /// Names of the `.csv` files in the snapshot directory, sorted.
    pub async fn list_files(&self) -> Result<Vec<String>, ServiceError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                ServiceError::SnapshotNotFound(self.dir.display().to_string())
            }
            _ => ServiceError::InternalError(format!("failed to list snapshots: {}", e)),
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ServiceError::InternalError(format!("failed to list snapshots: {}", e)))?
        {
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Reads one snapshot file for display, keeping at most `limit` rows.
    #[instrument(skip(self))]
    pub async fn read_file(
        &self,
        file_name: &str,
        limit: Option<usize>,
    ) -> Result<SnapshotFile, ServiceError> {
        check_file_name(file_name)?;
        let parsed = self.load(file_name).await?;
        let last_modified = tokio::fs::metadata(self.dir.join(file_name))
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let data: Vec<Map<String, Value>> = parsed
            .records
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| {
                parsed
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        let cell = record.get(idx).unwrap_or("");
                        (header.clone(), display_cell(header, cell))
                    })
                    .collect()
            })
            .collect();

        Ok(SnapshotFile {
            file_name: file_name.to_string(),
            record_count: data.len(),
            last_modified,
            columns: parsed.headers,
            data,
        })
    }

    /// Summarizes every column of one snapshot file.
    #[instrument(skip(self))]
    pub async fn summarize(&self, file_name: &str) -> Result<SnapshotSummary, ServiceError> {
        check_file_name(file_name)?;
        let parsed = self.load(file_name).await?;

        let mut numeric_statistics = BTreeMap::new();
        let mut categorical_counts = BTreeMap::new();
        for (idx, header) in parsed.headers.iter().enumerate() {
            let cells: Vec<&str> = parsed
                .records
                .iter()
                .filter_map(|record| record.get(idx))
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();
            if cells.is_empty() {
                continue;
            }

            match numeric_values(&cells) {
                Some(values) => {
                    numeric_statistics.insert(header.clone(), summarize_numbers(&values));
                }
                None => {
                    let mut counts = BTreeMap::new();
                    for cell in cells {
                        *counts.entry(cell.to_string()).or_insert(0) += 1;
                    }
                    categorical_counts.insert(header.clone(), counts);
                }
            }
        }

        Ok(SnapshotSummary {
            file_name: file_name.to_string(),
            record_count: parsed.records.len(),
            column_count: parsed.headers.len(),
            columns: parsed.headers,
            numeric_statistics,
            categorical_counts,
        })
    }
}

fn check_file_name(file_name: &str) -> Result<(), ServiceError> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(ServiceError::BadRequest(format!(
            "invalid snapshot file name: {}",
            file_name
        )));
    }
    Ok(())
}

fn numeric_values(cells: &[&str]) -> Option<Vec<f64>> {
    cells
        .iter()
        .map(|cell| cell.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn summarize_numbers(values: &[f64]) -> NumericSummary {
    let sum: f64 = values.iter().sum();
    NumericSummary {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg: sum / values.len() as f64,
        sum,
    }
}

#[async_trait]
impl SnapshotSource for CsvSnapshotSource {
    #[instrument(skip(self))]
    async fn read(&self, kind: EntityKind) -> Result<Vec<SnapshotRow>, ServiceError> {
        let file_name = self.file_name(kind);
        let parsed = self.load(file_name).await?;

        if kind == EntityKind::Routes {
            let missing: Vec<&str> = route::REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|col| !parsed.headers.iter().any(|h| h == col))
                .collect();
            if !missing.is_empty() {
                return Err(ServiceError::malformed(
                    file_name,
                    format!("missing required column(s): {}", missing.join(", ")),
                ));
            }
        }

        Ok(parsed
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let cells: BTreeMap<String, String> = parsed
                    .headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, cell)| (header.clone(), cell.to_string()))
                    .collect();
                SnapshotRow::new(index, cells)
            })
            .collect())
    }
}

/// Presentation value of a cell: numbers and booleans typed, blanks null,
/// and `*date*` columns normalized to `YYYY-MM-DD` when they parse.
fn display_cell(header: &str, cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if header.to_ascii_lowercase().contains("date") {
        let single = SnapshotRow::from_pairs(0, [(header, trimmed)]);
        if let Ok(Some(date)) = single.optional_date(header) {
            return Value::String(date.format("%Y-%m-%d").to_string());
        }
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }

    Value::String(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn source_with(files: &[(&str, &str)]) -> (TempDir, CsvSnapshotSource) {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let source = CsvSnapshotSource::new(dir.path(), SnapshotFiles::default());
        (dir, source)
    }

    #[tokio::test]
    async fn rows_keep_file_order_and_trimmed_headers() {
        let (_dir, source) = source_with(&[(
            "production_inventory.csv",
            " product_name ,quantity\nHR Coil,300\nWire Rod,abc\n",
        )]);

        let rows = source.read(EntityKind::Inventory).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index(), 0);
        assert_eq!(rows[0].cell("product_name"), Some("HR Coil"));
        assert_eq!(rows[1].cell("quantity"), Some("abc"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, source) = source_with(&[]);
        assert_matches!(
            source.read(EntityKind::Orders).await,
            Err(ServiceError::SnapshotNotFound(name)) if name == "customer_orders.csv"
        );
    }

    #[tokio::test]
    async fn ragged_rows_are_malformed() {
        let (_dir, source) = source_with(&[(
            "rake_wagon_details.csv",
            "rake_number,status\nRK1,Available\nRK2\n",
        )]);
        assert_matches!(
            source.read(EntityKind::Rakes).await,
            Err(ServiceError::SnapshotMalformed { file, .. }) if file == "rake_wagon_details.csv"
        );
    }

    #[tokio::test]
    async fn routes_without_required_columns_are_malformed() {
        let (_dir, source) = source_with(&[(
            "route_transport_info_updated.csv",
            "origin,distance_km\nBokaro,300\n",
        )]);
        let err = source.read(EntityKind::Routes).await.unwrap_err();
        assert_matches!(&err, ServiceError::SnapshotMalformed { reason, .. } if reason.contains("destination"));
    }

    #[tokio::test]
    async fn browser_lists_csv_files_only() {
        let (_dir, source) = source_with(&[
            ("b.csv", "x\n1\n"),
            ("a.csv", "x\n1\n"),
            ("notes.txt", "ignore me"),
        ]);
        assert_eq!(source.list_files().await.unwrap(), vec!["a.csv", "b.csv"]);
    }

    #[tokio::test]
    async fn browser_applies_limit_and_types_cells() {
        let (_dir, source) = source_with(&[(
            "customer_orders.csv",
            "customer_name,quantity,preferred_dispatch_date,urgent\nA,10,15/01/2024,true\nB,2.5,,false\nC,1,,false\n",
        )]);

        let file = source
            .read_file("customer_orders.csv", Some(2))
            .await
            .unwrap();
        assert_eq!(file.record_count, 2);
        assert_eq!(file.columns.len(), 4);
        assert_eq!(file.data[0]["quantity"], Value::from(10));
        assert_eq!(file.data[0]["preferred_dispatch_date"], Value::from("2024-01-15"));
        assert_eq!(file.data[0]["urgent"], Value::Bool(true));
        assert_eq!(file.data[1]["preferred_dispatch_date"], Value::Null);
        assert!(file.last_modified.is_some());
    }

    #[tokio::test]
    async fn browser_rejects_path_traversal() {
        let (_dir, source) = source_with(&[]);
        for name in ["../secrets.csv", "nested/file.csv", "..\\x.csv"] {
            assert_matches!(
                source.read_file(name, None).await,
                Err(ServiceError::BadRequest(_))
            );
        }
    }

    #[tokio::test]
    async fn summary_splits_numeric_and_text_columns() {
        let (_dir, source) = source_with(&[(
            "rake_wagon_details.csv",
            "rake_number,status,capacity_tons,remarks\nRK1,Available,3800,\nRK2,Loading,4000,\nRK3,Available,3600.5,\n",
        )]);

        let summary = source.summarize("rake_wagon_details.csv").await.unwrap();
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.column_count, 4);

        let capacity = &summary.numeric_statistics["capacity_tons"];
        assert_eq!(capacity.min, 3600.5);
        assert_eq!(capacity.max, 4000.0);
        assert_eq!(capacity.sum, 11400.5);
        assert!((capacity.avg - 3800.1666).abs() < 1e-3);

        let statuses = &summary.categorical_counts["status"];
        assert_eq!(statuses["Available"], 2);
        assert_eq!(statuses["Loading"], 1);
        assert_eq!(summary.categorical_counts["rake_number"].len(), 3);
        assert!(!summary.numeric_statistics.contains_key("remarks"));
        assert!(!summary.categorical_counts.contains_key("remarks"));
    }

    #[tokio::test]
    async fn summary_treats_mixed_columns_as_text() {
        let (_dir, source) = source_with(&[("a.csv", "quantity\n10\nabout 20\n10\n")]);
        let summary = source.summarize("a.csv").await.unwrap();
        assert!(summary.numeric_statistics.is_empty());
        assert_eq!(summary.categorical_counts["quantity"]["10"], 2);

        assert_matches!(
            source.summarize("../a.csv").await,
            Err(ServiceError::BadRequest(_))
        );
        assert_matches!(
            source.summarize("missing.csv").await,
            Err(ServiceError::SnapshotNotFound(_))
        );
    }
}
