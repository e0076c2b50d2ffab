use axum::{http::StatusCode, Json};
use serde::Serialize;
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::{errors::ServiceError, models::EntityKind, ApiResponse};

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Parses an entity kind path segment, listing the accepted tags on failure.
pub fn parse_kind(raw: &str) -> Result<EntityKind, ServiceError> {
    EntityKind::from_str(raw.trim()).map_err(|_| {
        let accepted: Vec<String> = EntityKind::iter().map(|k| k.to_string()).collect();
        ServiceError::BadRequest(format!(
            "unknown entity kind '{}', expected one of: {}",
            raw,
            accepted.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn kinds_parse_from_path_segments() {
        assert_eq!(parse_kind("routes").unwrap(), EntityKind::Routes);
        let err = parse_kind("wagons").unwrap_err();
        assert_matches!(&err, ServiceError::BadRequest(msg) if msg.contains("orders, rakes, inventory, routes"));
    }
}
