use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    errors::ServiceError,
    models::RouteRecord,
    services::{routes::RouteLookup, Provenance},
    ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoutesResponse {
    pub source: Provenance,
    pub routes: Vec<RouteRecord>,
}

impl From<RouteLookup> for RoutesResponse {
    fn from(lookup: RouteLookup) -> Self {
        Self {
            source: lookup.source,
            routes: lookup.routes,
        }
    }
}

/// List all routes
#[utoipa::path(
    get,
    path = "/api/v1/routes",
    summary = "List routes",
    responses(
        (status = 200, description = "Routes", body = ApiResponse<RoutesResponse>),
        (status = 503, description = "Route data unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "routes"
)]
pub async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RoutesResponse>>, ServiceError> {
    let lookup = state.services.routes.all().await?;
    Ok(Json(ApiResponse::success(lookup.into())))
}

/// Look up routes by origin, destination, or both
#[utoipa::path(
    get,
    path = "/api/v1/routes/lookup",
    summary = "Look up routes",
    description = "With both origin and destination, returns the single matching route (404 when absent). With one of them, returns every route from that origin or to that destination.",
    params(RouteQuery),
    responses(
        (status = 200, description = "Matching routes", body = ApiResponse<Vec<RouteRecord>>),
        (status = 400, description = "Neither origin nor destination given", body = crate::errors::ErrorResponse),
        (status = 404, description = "No route for the pair", body = crate::errors::ErrorResponse),
    ),
    tag = "routes"
)]
pub async fn lookup_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<ApiResponse<Vec<RouteRecord>>>, ServiceError> {
    let routes = state.services.routes.as_ref();
    let found = match (query.origin.as_deref(), query.destination.as_deref()) {
        (Some(origin), Some(destination)) => vec![routes.by_pair(origin, destination).await?],
        (Some(origin), None) => routes.by_origin(origin).await?.routes,
        (None, Some(destination)) => routes.by_destination(destination).await?.routes,
        (None, None) => {
            return Err(ServiceError::BadRequest(
                "origin or destination is required".to_string(),
            ))
        }
    };
    Ok(Json(ApiResponse::success(found)))
}
