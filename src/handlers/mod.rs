pub mod common;
pub mod dashboard;
pub mod data;
pub mod database;
pub mod orders;
pub mod routes;
pub mod snapshots;

use crate::{
    config::AppConfig,
    db::DbPool,
    repositories::{RecordStore, SeaOrmRecordStore},
    services::{
        dashboard::DashboardService, orders::OrderService, routes::RouteService,
        DataSourceResolver, IngestionPipeline,
    },
    snapshot::{CsvSnapshotSource, SnapshotSource},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn RecordStore>,
    pub snapshots: Arc<CsvSnapshotSource>,
    pub resolver: DataSourceResolver,
    pub ingestion: IngestionPipeline,
    pub orders: Arc<OrderService>,
    pub routes: Arc<RouteService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Wires the services over the store pool and the configured snapshot directory.
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(SeaOrmRecordStore::new(db_pool.clone()));
        let snapshots = Arc::new(CsvSnapshotSource::from_config(config));
        Self::with_sources(db_pool, store, snapshots, config.ingest_batch_size)
    }

    /// Builds the services over explicit sources.
    pub fn with_sources(
        db_pool: Arc<DbPool>,
        store: Arc<dyn RecordStore>,
        snapshots: Arc<CsvSnapshotSource>,
        ingest_batch_size: usize,
    ) -> Self {
        let snapshot_source: Arc<dyn SnapshotSource> = snapshots.clone();
        let resolver = DataSourceResolver::new(store.clone(), snapshot_source.clone());
        let ingestion =
            IngestionPipeline::new(store.clone(), snapshot_source, ingest_batch_size);
        let orders = Arc::new(OrderService::new(db_pool, store.clone()));

        Self {
            store,
            snapshots,
            orders,
            routes: Arc::new(RouteService::new(resolver.clone())),
            dashboard: Arc::new(DashboardService::new(resolver.clone())),
            resolver,
            ingestion,
        }
    }
}
