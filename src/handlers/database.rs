use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    errors::ServiceError, models::EntityKind, services::SeedReport, ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeedQuery {
    /// Only seed kinds whose table has no rows
    #[serde(default)]
    pub only_if_empty: bool,
}

/// Row counts per entity kind in the record store.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseStats {
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

/// Seed every kind from its snapshot
#[utoipa::path(
    post,
    path = "/api/v1/database/seed",
    summary = "Seed the record store",
    description = "Ingest orders, rakes, inventory and routes in that order. A failing kind is reported and the others still run.",
    params(SeedQuery),
    responses(
        (status = 200, description = "Seeding finished", body = ApiResponse<SeedReport>),
    ),
    tag = "database"
)]
pub async fn seed_database(
    State(state): State<AppState>,
    Query(query): Query<SeedQuery>,
) -> Result<Json<ApiResponse<SeedReport>>, ServiceError> {
    let report = state.services.ingestion.seed(query.only_if_empty).await;
    info!(
        inserted = report.total_inserted(),
        failures = report.has_failures(),
        "Seeding requested over HTTP finished"
    );
    Ok(Json(ApiResponse::success(report)))
}

/// Row counts per entity kind
#[utoipa::path(
    get,
    path = "/api/v1/database/stats",
    summary = "Record store statistics",
    responses(
        (status = 200, description = "Counts retrieved", body = ApiResponse<DatabaseStats>),
        (status = 503, description = "Record store unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "database"
)]
pub async fn database_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DatabaseStats>>, ServiceError> {
    let mut counts = BTreeMap::new();
    for kind in EntityKind::iter() {
        counts.insert(kind.to_string(), state.services.store.count(kind).await?);
    }
    let total = counts.values().sum();
    Ok(Json(ApiResponse::success(DatabaseStats { counts, total })))
}
