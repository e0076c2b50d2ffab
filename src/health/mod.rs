/*!
 * # Health Check Module
 *
 * Endpoints for monitoring the dispatch API:
 *
 * - Basic health check (`/health`) - process is up
 * - Readiness check (`/health/ready`) - record store and snapshot directory status
 * - Version (`/health/version`) - build information
 *
 * The API can still serve reads from snapshots when the store is down, so a
 * store outage with snapshots present reports `degraded`, not `down`.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: BTreeMap<String, HealthDetail>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db_pool: Arc<DatabaseConnection>,
    pub snapshot_dir: PathBuf,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(db_pool: Arc<DatabaseConnection>, snapshot_dir: PathBuf) -> Self {
        Self {
            db_pool,
            snapshot_dir,
            start_time: SystemTime::now(),
        }
    }

    /// Calculate system uptime
    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    }

    async fn store_detail(&self) -> HealthDetail {
        let (status, message) = match crate::db::check_connection(&self.db_pool).await {
            Ok(()) => (HealthStatus::Up, None),
            Err(e) => (HealthStatus::Down, Some(e.to_string())),
        };
        HealthDetail {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    async fn snapshot_detail(&self) -> HealthDetail {
        let (status, message) = match tokio::fs::metadata(&self.snapshot_dir).await {
            Ok(meta) if meta.is_dir() => (HealthStatus::Up, None),
            Ok(_) => (
                HealthStatus::Down,
                Some(format!("{} is not a directory", self.snapshot_dir.display())),
            ),
            Err(e) => (
                HealthStatus::Down,
                Some(format!("{}: {}", self.snapshot_dir.display(), e)),
            ),
        };
        HealthDetail {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Checks every component and derives the overall status.
    pub async fn check(&self) -> HealthInfo {
        let store = self.store_detail().await;
        let snapshots = self.snapshot_detail().await;

        let status = match (store.status, snapshots.status) {
            (HealthStatus::Up, HealthStatus::Up) => HealthStatus::Up,
            (HealthStatus::Down, HealthStatus::Down) => HealthStatus::Down,
            _ => HealthStatus::Degraded,
        };

        let mut details = BTreeMap::new();
        details.insert("record_store".to_string(), store);
        details.insert("snapshots".to_string(), snapshots);

        HealthInfo {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
            details,
        }
    }
}

fn status_code_for(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": HealthStatus::Up,
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": state.uptime(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    info!("Readiness check endpoint called");

    let health = state.check().await;
    if health.status != HealthStatus::Up {
        for (name, detail) in &health.details {
            if detail.status != HealthStatus::Up {
                warn!("Component {name} is not healthy: {:?}", detail.status);
            }
        }
    }

    (status_code_for(health.status), Json(health))
}

/// Creates router with health check endpoints, nestable under any outer state
pub fn health_routes_with_state<S>(db_pool: Arc<DatabaseConnection>, snapshot_dir: PathBuf) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let health_state = Arc::new(HealthState::new(db_pool, snapshot_dir));

    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/version", get(version_info))
        .with_state(health_state)
}
