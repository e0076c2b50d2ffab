use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::route_transport;
use crate::snapshot::row::{CellError, SnapshotRow};

/// Columns a route snapshot must carry; routes have no fallback values.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "origin",
    "destination",
    "distance_km",
    "transit_time_days",
    "preferred_route",
    "track_capacity_wagons_per_day",
    "railway_zone",
];

/// Transport facts for one (origin, destination) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRecord {
    pub id: Option<i32>,
    #[schema(example = "Bokaro")]
    pub origin: String,
    #[schema(example = "Kolkata Port")]
    pub destination: String,
    pub distance_km: f64,
    pub transit_time_days: i32,
    pub preferred_route: String,
    pub alternate_route: Option<String>,
    pub track_capacity_wagons_per_day: i32,
    pub route_constraints: Option<String>,
    pub expected_delays_days: Option<i32>,
    pub railway_zone: String,
}

impl RouteRecord {
    pub fn from_snapshot_row(row: &SnapshotRow) -> Result<Self, CellError> {
        let distance_km = row.number("distance_km")?;
        if distance_km <= 0.0 {
            return Err(CellError::new("distance_km", "must be greater than zero"));
        }
        let transit_time_days = positive_i32(row, "transit_time_days")?;
        let track_capacity = positive_i32(row, "track_capacity_wagons_per_day")?;
        let expected_delays_days = match row.optional_integer("expected_delays_days")? {
            Some(days) if !(0..=i32::MAX as i64).contains(&days) => {
                return Err(CellError::new(
                    "expected_delays_days",
                    "must not be negative",
                ))
            }
            other => other.map(|days| days as i32),
        };

        Ok(Self {
            id: None,
            origin: row.text("origin")?,
            destination: row.text("destination")?,
            distance_km,
            transit_time_days,
            preferred_route: row.text("preferred_route")?,
            alternate_route: row.optional_text("alternate_route"),
            track_capacity_wagons_per_day: track_capacity,
            route_constraints: row.optional_text("route_constraints"),
            expected_delays_days,
            railway_zone: row.text("railway_zone")?,
        })
    }

    pub fn into_active_model(self) -> route_transport::ActiveModel {
        route_transport::ActiveModel {
            id: NotSet,
            origin: Set(self.origin),
            destination: Set(self.destination),
            distance_km: Set(self.distance_km),
            transit_time_days: Set(self.transit_time_days),
            preferred_route: Set(self.preferred_route),
            alternate_route: Set(self.alternate_route),
            track_capacity_wagons_per_day: Set(self.track_capacity_wagons_per_day),
            route_constraints: Set(self.route_constraints),
            expected_delays_days: Set(self.expected_delays_days),
            railway_zone: Set(self.railway_zone),
        }
    }
}

fn positive_i32(row: &SnapshotRow, column: &str) -> Result<i32, CellError> {
    let value = row.integer(column)?;
    if value <= 0 || value > i32::MAX as i64 {
        return Err(CellError::new(column, "must be greater than zero"));
    }
    Ok(value as i32)
}

impl From<route_transport::Model> for RouteRecord {
    fn from(model: route_transport::Model) -> Self {
        Self {
            id: Some(model.id),
            origin: model.origin,
            destination: model.destination,
            distance_km: model.distance_km,
            transit_time_days: model.transit_time_days,
            preferred_route: model.preferred_route,
            alternate_route: model.alternate_route,
            track_capacity_wagons_per_day: model.track_capacity_wagons_per_day,
            route_constraints: model.route_constraints,
            expected_delays_days: model.expected_delays_days,
            railway_zone: model.railway_zone,
        }
    }
}
