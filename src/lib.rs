//! Rake Dispatch API Library
//!
//! Resilient data resolution for a rail-rake dispatch dashboard: reads fall
//! back from the record store to CSV snapshots, presentation dates are
//! re-derived on every read, and snapshots can be bulk-ingested into the store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod snapshot;
pub mod tracing;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Builds the state and its services from a connected pool.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    let data = Router::new()
        .route("/data/:kind", get(handlers::data::resolve_kind))
        .route("/ingest/:kind", post(handlers::data::ingest_kind));

    let database = Router::new()
        .route("/database/seed", post(handlers::database::seed_database))
        .route("/database/stats", get(handlers::database::database_stats));

    let snapshots = Router::new()
        .route("/snapshots", get(handlers::snapshots::list_snapshots))
        .route("/snapshots/:file_name", get(handlers::snapshots::read_snapshot))
        .route(
            "/snapshots/:file_name/summary",
            get(handlers::snapshots::summarize_snapshot),
        );

    let orders = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        );

    let routes = Router::new()
        .route("/routes", get(handlers::routes::list_routes))
        .route("/routes/lookup", get(handlers::routes::lookup_routes));

    let dashboard = Router::new()
        .route("/dashboard/metrics", get(handlers::dashboard::dashboard_metrics))
        .route("/dashboard/charts", get(handlers::dashboard::dashboard_charts));

    Router::new()
        .route("/status", get(api_status))
        .merge(data)
        .merge(database)
        .merge(snapshots)
        .merge(orders)
        .merge(routes)
        .merge(dashboard)
}

/// Full application router: health, the v1 API, Swagger UI, request ids and
/// HTTP tracing. CORS is applied by the binary.
pub fn build_router(state: AppState) -> Router {
    let health = health::health_routes_with_state(
        state.db.clone(),
        state.config.snapshot_dir.clone(),
    );

    Router::new()
        .nest("/health", health)
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn api_status() -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git": option_env!("GIT_HASH").unwrap_or("unknown"),
        "service": "rake-dispatch-api",
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}
