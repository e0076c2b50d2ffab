use axum::{
    extract::{Path, State},
    Json,
};

use super::common::parse_kind;
use crate::{
    errors::ServiceError,
    services::{IngestReport, Resolution},
    ApiResponse, AppState,
};

/// Resolve one entity kind from the store, falling back to its snapshot
#[utoipa::path(
    get,
    path = "/api/v1/data/{kind}",
    summary = "Resolve records",
    description = "Serve every record of a kind from the record store, or from its snapshot when the store is empty or unreachable. Dates are re-derived on every read.",
    params(
        ("kind" = String, Path, description = "Entity kind: orders, rakes, inventory or routes"),
    ),
    responses(
        (status = 200, description = "Records resolved", body = ApiResponse<Resolution>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Unknown entity kind", body = crate::errors::ErrorResponse),
        (status = 503, description = "Neither source could serve the kind", body = crate::errors::ErrorResponse),
    ),
    tag = "data"
)]
pub async fn resolve_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<Resolution>>, ServiceError> {
    let kind = parse_kind(&kind)?;
    let resolution = state.services.resolver.resolve(kind).await?;
    Ok(Json(ApiResponse::success(resolution)))
}

/// Ingest one snapshot into the record store
#[utoipa::path(
    post,
    path = "/api/v1/ingest/{kind}",
    summary = "Ingest snapshot",
    description = "Load a kind's snapshot into the record store. Rows that fail validation or insertion are skipped and reported; the rest are committed in batches.",
    params(
        ("kind" = String, Path, description = "Entity kind: orders, rakes, inventory or routes"),
    ),
    responses(
        (status = 200, description = "Ingestion finished", body = ApiResponse<IngestReport>),
        (status = 400, description = "Unknown entity kind", body = crate::errors::ErrorResponse),
        (status = 404, description = "Snapshot file not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Ingestion of this kind already running", body = crate::errors::ErrorResponse),
        (status = 422, description = "Snapshot file malformed", body = crate::errors::ErrorResponse),
    ),
    tag = "data"
)]
pub async fn ingest_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<IngestReport>>, ServiceError> {
    let kind = parse_kind(&kind)?;
    let report = state.services.ingestion.ingest(kind).await?;
    Ok(Json(ApiResponse::success(report)))
}
