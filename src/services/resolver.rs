use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{EntityKind, Record};
use crate::repositories::RecordStore;
use crate::services::synthesis::synthesize_all;
use crate::snapshot::SnapshotSource;

/// Which source satisfied a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Store,
    Snapshot,
}

/// Why a resolution fell back to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    StoreEmpty,
    StoreUnavailable,
}

/// Records of one kind with their provenance and synthesized dates.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Resolution {
    pub kind: EntityKind,
    pub source: Provenance,
    pub fallback_reason: Option<FallbackReason>,
    /// The reference instant the dates were derived from
    pub last_updated: DateTime<Utc>,
    pub record_count: usize,
    /// Snapshot rows that failed the per-kind cast and were left out
    pub dropped_rows: usize,
    pub records: Vec<Record>,
}

/// Serves each kind from the store, or from its snapshot when the store is
/// empty or unreachable.
#[derive(Clone)]
pub struct DataSourceResolver {
    store: Arc<dyn RecordStore>,
    snapshots: Arc<dyn SnapshotSource>,
}

impl DataSourceResolver {
    pub fn new(store: Arc<dyn RecordStore>, snapshots: Arc<dyn SnapshotSource>) -> Self {
        Self { store, snapshots }
    }

    pub async fn resolve(&self, kind: EntityKind) -> Result<Resolution, ServiceError> {
        self.resolve_at(kind, Utc::now()).await
    }

    /// Resolves `kind` with dates anchored to `reference`.
    #[instrument(skip(self))]
    pub async fn resolve_at(
        &self,
        kind: EntityKind,
        reference: DateTime<Utc>,
    ) -> Result<Resolution, ServiceError> {
        let (records, source, fallback_reason, dropped_rows) = match self.store.query(kind).await {
            Ok(records) if !records.is_empty() => (records, Provenance::Store, None, 0),
            Ok(_) => {
                info!(%kind, "Record store is empty, falling back to snapshot");
                let (records, dropped) = self.from_snapshot(kind).await?;
                (records, Provenance::Snapshot, Some(FallbackReason::StoreEmpty), dropped)
            }
            Err(err) => {
                warn!(%kind, error = %err, "Record store query failed, falling back to snapshot");
                let (records, dropped) = self.from_snapshot(kind).await?;
                (
                    records,
                    Provenance::Snapshot,
                    Some(FallbackReason::StoreUnavailable),
                    dropped,
                )
            }
        };

        match source {
            Provenance::Store => counter!("rake_dispatch.resolve.store", 1, "kind" => kind.to_string()),
            Provenance::Snapshot => {
                counter!("rake_dispatch.resolve.snapshot", 1, "kind" => kind.to_string())
            }
        }

        let records = synthesize_all(reference, records);
        info!(%kind, source = ?source, count = records.len(), "Resolved records");

        Ok(Resolution {
            kind,
            source,
            fallback_reason,
            last_updated: reference,
            record_count: records.len(),
            dropped_rows,
            records,
        })
    }

    async fn from_snapshot(&self, kind: EntityKind) -> Result<(Vec<Record>, usize), ServiceError> {
        let rows = self.snapshots.read(kind).await.map_err(|err| {
            warn!(%kind, error = %err, "Snapshot unavailable, no source can serve the request");
            counter!("rake_dispatch.resolve.unavailable", 1, "kind" => kind.to_string());
            ServiceError::DataUnavailable(kind)
        })?;

        let mut dropped = 0;
        let records = rows
            .iter()
            .filter_map(|row| match Record::from_snapshot_row(kind, row) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(%kind, row = row.index(), error = %err, "Dropping snapshot row");
                    dropped += 1;
                    None
                }
            })
            .collect();

        Ok((records, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderRecord, RakeRecord};
    use crate::repositories::record_store::MockRecordStore;
    use crate::snapshot::{MockSnapshotSource, SnapshotRow};
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    fn stored_rake(id: i32, status: &str) -> Record {
        let row = SnapshotRow::from_pairs(0, [("rake_number", "RK1"), ("status", status)]);
        let mut rake = RakeRecord::from_snapshot_row(&row).unwrap();
        rake.id = Some(id);
        Record::Rake(rake)
    }

    fn resolver(store: MockRecordStore, snapshots: MockSnapshotSource) -> DataSourceResolver {
        DataSourceResolver::new(Arc::new(store), Arc::new(snapshots))
    }

    #[tokio::test]
    async fn non_empty_store_wins_without_touching_snapshot() {
        let mut store = MockRecordStore::new();
        store
            .expect_query()
            .returning(|_| Ok(vec![stored_rake(1, "Available"), stored_rake(2, "Loading")]));
        let mut snapshots = MockSnapshotSource::new();
        snapshots.expect_read().times(0);

        let resolution = resolver(store, snapshots)
            .resolve_at(EntityKind::Rakes, reference())
            .await
            .unwrap();

        assert_eq!(resolution.source, Provenance::Store);
        assert_eq!(resolution.fallback_reason, None);
        assert_eq!(resolution.record_count, 2);
        assert_eq!(resolution.last_updated, reference());
        let Record::Rake(loading) = &resolution.records[1] else {
            panic!("expected a rake");
        };
        let today = reference().date_naive();
        assert_eq!(loading.departure_date, Some(today - Duration::days(9)));
    }

    #[tokio::test]
    async fn empty_store_falls_back_to_snapshot() {
        let mut store = MockRecordStore::new();
        store.expect_query().returning(|_| Ok(vec![]));
        let mut snapshots = MockSnapshotSource::new();
        snapshots
            .expect_read()
            .times(1)
            .returning(|_| Ok(vec![SnapshotRow::from_pairs(0, [("customer_name", "SAIL")])]));

        let resolution = resolver(store, snapshots)
            .resolve_at(EntityKind::Orders, reference())
            .await
            .unwrap();

        assert_eq!(resolution.source, Provenance::Snapshot);
        assert_eq!(resolution.fallback_reason, Some(FallbackReason::StoreEmpty));
        assert_matches!(&resolution.records[0], Record::Order(OrderRecord { customer_name, .. }) if customer_name == "SAIL");
    }

    #[tokio::test]
    async fn failing_store_falls_back_and_says_why() {
        let mut store = MockRecordStore::new();
        store
            .expect_query()
            .returning(|_| Err(ServiceError::StoreUnavailable("connection refused".into())));
        let mut snapshots = MockSnapshotSource::new();
        snapshots
            .expect_read()
            .returning(|_| Ok(vec![SnapshotRow::from_pairs(0, [("product_name", "Billets")])]));

        let resolution = resolver(store, snapshots)
            .resolve_at(EntityKind::Inventory, reference())
            .await
            .unwrap();

        assert_eq!(resolution.source, Provenance::Snapshot);
        assert_eq!(
            resolution.fallback_reason,
            Some(FallbackReason::StoreUnavailable)
        );
    }

    #[tokio::test]
    async fn both_sources_failing_is_data_unavailable() {
        let mut store = MockRecordStore::new();
        store
            .expect_query()
            .returning(|_| Err(ServiceError::StoreUnavailable("down".into())));
        let mut snapshots = MockSnapshotSource::new();
        snapshots
            .expect_read()
            .returning(|_| Err(ServiceError::SnapshotNotFound("rake_wagon_details.csv".into())));

        let err = resolver(store, snapshots)
            .resolve(EntityKind::Rakes)
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::DataUnavailable(EntityKind::Rakes));
        assert_eq!(err.to_string(), "data unavailable for rakes");
    }

    #[tokio::test]
    async fn uncastable_snapshot_rows_are_dropped_before_indexing() {
        let mut store = MockRecordStore::new();
        store.expect_query().returning(|_| Ok(vec![]));
        let mut snapshots = MockSnapshotSource::new();
        snapshots.expect_read().returning(|_| {
            Ok(vec![
                SnapshotRow::from_pairs(0, [("quantity", "abc")]),
                SnapshotRow::from_pairs(1, [("quantity", "40")]),
            ])
        });

        let resolution = resolver(store, snapshots)
            .resolve_at(EntityKind::Orders, reference())
            .await
            .unwrap();

        assert_eq!(resolution.dropped_rows, 1);
        assert_eq!(resolution.record_count, 1);
        let Record::Order(order) = &resolution.records[0] else {
            panic!("expected an order");
        };
        assert_eq!(order.preferred_dispatch_date, Some(reference().date_naive()));
    }
}
