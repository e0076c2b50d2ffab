use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    services::dashboard::{DashboardCharts, MetricItem},
    ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// Fixes the random variance so the series are reproducible
    pub seed: Option<u64>,
}

/// Key dashboard metrics
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/metrics",
    summary = "Dashboard metrics",
    responses(
        (status = 200, description = "Headline metrics", body = ApiResponse<Vec<MetricItem>>),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_metrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MetricItem>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.services.dashboard.metrics().await,
    )))
}

/// Dashboard chart series
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/charts",
    summary = "Dashboard charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart series for the last seven days", body = ApiResponse<DashboardCharts>),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_charts(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<DashboardCharts>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.services.dashboard.charts(query.seed).await,
    )))
}
