use dashmap::DashSet;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{EntityKind, Record};
use crate::repositories::RecordStore;
use crate::snapshot::SnapshotSource;

/// Seeding order: orders first so the dashboard has demand before supply.
pub const SEED_ORDER: [EntityKind; 4] = [
    EntityKind::Orders,
    EntityKind::Rakes,
    EntityKind::Inventory,
    EntityKind::Routes,
];

/// A snapshot row that was not inserted, and why.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RowFailure {
    /// Zero-based position of the row in the snapshot file
    pub row_index: usize,
    #[schema(example = "quantity: expected a number, got \"abc\"")]
    pub reason: String,
}

/// Outcome of ingesting one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IngestReport {
    pub kind: EntityKind,
    pub total_rows: usize,
    pub inserted: usize,
    pub skipped: usize,
    /// One entry per skipped row, ordered by row index
    pub errors: Vec<RowFailure>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Ingested { report: IngestReport },
    /// Skipped because the table already had rows
    AlreadyPopulated { existing: u64 },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeedEntry {
    pub kind: EntityKind,
    #[serde(flatten)]
    pub outcome: SeedOutcome,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeedReport {
    pub entries: Vec<SeedEntry>,
}

impl SeedReport {
    pub fn total_inserted(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match &entry.outcome {
                SeedOutcome::Ingested { report } => report.inserted,
                _ => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry.outcome, SeedOutcome::Failed { .. }))
    }
}

/// Releases a kind's in-flight slot when dropped.
struct InFlightGuard {
    kinds: Arc<DashSet<EntityKind>>,
    kind: EntityKind,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.kinds.remove(&self.kind);
    }
}

/// Loads snapshots into the record store row by row, in fixed-size batches.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn RecordStore>,
    snapshots: Arc<dyn SnapshotSource>,
    batch_size: usize,
    in_flight: Arc<DashSet<EntityKind>>,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn RecordStore>,
        snapshots: Arc<dyn SnapshotSource>,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            snapshots,
            batch_size: batch_size.max(1),
            in_flight: Arc::new(DashSet::new()),
        }
    }

    fn claim(&self, kind: EntityKind) -> Result<InFlightGuard, ServiceError> {
        if !self.in_flight.insert(kind) {
            return Err(ServiceError::Conflict(format!(
                "ingestion of {} is already in progress",
                kind
            )));
        }
        Ok(InFlightGuard {
            kinds: self.in_flight.clone(),
            kind,
        })
    }

    /// Ingests the snapshot for `kind`. Per-row problems are reported, not
    /// raised; only snapshot failures and a concurrent run for the same kind
    /// are errors.
    #[instrument(skip(self))]
    pub async fn ingest(&self, kind: EntityKind) -> Result<IngestReport, ServiceError> {
        let _guard = self.claim(kind)?;
        let rows = self.snapshots.read(kind).await?;
        let total_rows = rows.len();

        let mut errors = Vec::new();
        let mut valid: Vec<(usize, Record)> = Vec::with_capacity(total_rows);
        for row in &rows {
            match Record::from_snapshot_row(kind, row) {
                Ok(record) => valid.push((row.index(), record)),
                Err(err) => {
                    warn!(%kind, row = row.index(), error = %err, "Skipping invalid snapshot row");
                    errors.push(RowFailure {
                        row_index: row.index(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut inserted = 0;
        let mut pending = valid.into_iter().peekable();
        while pending.peek().is_some() {
            let (indices, batch): (Vec<usize>, Vec<Record>) =
                pending.by_ref().take(self.batch_size).unzip();

            match self.store.insert_batch(batch).await {
                Ok(outcomes) => {
                    for (row_index, outcome) in indices.into_iter().zip(outcomes) {
                        match outcome {
                            Ok(_) => inserted += 1,
                            Err(err) => errors.push(RowFailure {
                                row_index,
                                reason: err.to_string(),
                            }),
                        }
                    }
                }
                Err(err) => {
                    warn!(%kind, rows = indices.len(), error = %err, "Batch not committed");
                    errors.extend(indices.into_iter().map(|row_index| RowFailure {
                        row_index,
                        reason: format!("batch not committed: {}", err),
                    }));
                }
            }
        }

        errors.sort_by_key(|failure| failure.row_index);
        let skipped = total_rows - inserted;
        counter!("rake_dispatch.ingest.inserted", inserted as u64, "kind" => kind.to_string());
        counter!("rake_dispatch.ingest.skipped", skipped as u64, "kind" => kind.to_string());
        info!(%kind, total_rows, inserted, skipped, "Snapshot ingestion finished");

        Ok(IngestReport {
            kind,
            total_rows,
            inserted,
            skipped,
            errors,
        })
    }

    /// Ingests every kind in seeding order. A failure for one kind is recorded
    /// and the remaining kinds still run.
    #[instrument(skip(self))]
    pub async fn seed(&self, only_if_empty: bool) -> SeedReport {
        let mut entries = Vec::with_capacity(SEED_ORDER.len());

        for kind in SEED_ORDER {
            if only_if_empty {
                match self.store.count(kind).await {
                    Ok(0) => {}
                    Ok(existing) => {
                        info!(%kind, existing, "Table already populated, not seeding");
                        entries.push(SeedEntry {
                            kind,
                            outcome: SeedOutcome::AlreadyPopulated { existing },
                        });
                        continue;
                    }
                    Err(err) => {
                        entries.push(SeedEntry {
                            kind,
                            outcome: SeedOutcome::Failed {
                                error: err.to_string(),
                            },
                        });
                        continue;
                    }
                }
            }

            let operation = format!("seed {}", kind);
            let outcome = match crate::tracing::timed(&operation, self.ingest(kind)).await {
                Ok(report) => SeedOutcome::Ingested { report },
                Err(err) => SeedOutcome::Failed {
                    error: err.to_string(),
                },
            };
            entries.push(SeedEntry { kind, outcome });
        }

        SeedReport { entries }
    }
}
