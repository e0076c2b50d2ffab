use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    snapshot::{SnapshotFile, SnapshotSummary},
    ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotQuery {
    /// Maximum number of rows to return
    pub limit: Option<usize>,
}

/// List snapshot files
#[utoipa::path(
    get,
    path = "/api/v1/snapshots",
    summary = "List snapshot files",
    responses(
        (status = 200, description = "Snapshot file names", body = ApiResponse<Vec<String>>),
        (status = 404, description = "Snapshot directory missing", body = crate::errors::ErrorResponse),
    ),
    tag = "snapshots"
)]
pub async fn list_snapshots(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ServiceError> {
    let files = state.services.snapshots.list_files().await?;
    Ok(Json(ApiResponse::success(files)))
}

/// Read one snapshot file
#[utoipa::path(
    get,
    path = "/api/v1/snapshots/{file_name}",
    summary = "Read a snapshot file",
    params(
        ("file_name" = String, Path, description = "Snapshot file name, e.g. customer_orders.csv"),
        SnapshotQuery,
    ),
    responses(
        (status = 200, description = "File contents", body = ApiResponse<SnapshotFile>),
        (status = 400, description = "Invalid file name", body = crate::errors::ErrorResponse),
        (status = 404, description = "File not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "File malformed", body = crate::errors::ErrorResponse),
    ),
    tag = "snapshots"
)]
pub async fn read_snapshot(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<ApiResponse<SnapshotFile>>, ServiceError> {
    let file = state
        .services
        .snapshots
        .read_file(&file_name, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(file)))
}

/// Summarize one snapshot file
#[utoipa::path(
    get,
    path = "/api/v1/snapshots/{file_name}/summary",
    summary = "Column statistics of a snapshot file",
    params(
        ("file_name" = String, Path, description = "Snapshot file name, e.g. rake_wagon_details.csv"),
    ),
    responses(
        (status = 200, description = "Numeric statistics and value counts", body = ApiResponse<SnapshotSummary>),
        (status = 400, description = "Invalid file name", body = crate::errors::ErrorResponse),
        (status = 404, description = "File not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "File malformed", body = crate::errors::ErrorResponse),
    ),
    tag = "snapshots"
)]
pub async fn summarize_snapshot(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<ApiResponse<SnapshotSummary>>, ServiceError> {
    let summary = state.services.snapshots.summarize(&file_name).await?;
    Ok(Json(ApiResponse::success(summary)))
}
