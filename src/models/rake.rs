use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Priority, RakeStatus};
use crate::entities::rake;
use crate::snapshot::row::{CellError, SnapshotRow};

const NAME_LIMIT: usize = 100;

/// A rake (train set) with its current movement state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RakeRecord {
    pub id: Option<i32>,
    #[schema(example = "RK1001")]
    pub rake_number: String,
    pub origin_plant: String,
    pub destination: String,
    #[schema(value_type = String, example = "In Transit")]
    pub status: RakeStatus,
    pub capacity_tons: f64,
    pub total_wagons: i32,
    #[schema(value_type = String, example = "normal")]
    pub priority: Priority,
    pub current_location: Option<String>,
    /// Percentage in [0, 100]
    pub transit_progress: f64,
    pub departure_time: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub freight_type: Option<String>,
    pub weight: Option<f64>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub expected_arrival_date: Option<NaiveDate>,
}

impl RakeRecord {
    pub fn from_snapshot_row(row: &SnapshotRow) -> Result<Self, CellError> {
        // An absent column gets a positional number; a blank cell in a present one is an error.
        let rake_number = if row.has_column("rake_number") {
            row.text("rake_number")
                .map_err(|_| CellError::new("rake_number", "must not be blank"))?
        } else {
            format!("RK{}", 1000 + row.index())
        };

        let capacity_tons = row.number_or("capacity_tons", 2000.0)?;
        if capacity_tons < 0.0 {
            return Err(CellError::new("capacity_tons", "must not be negative"));
        }
        let total_wagons = row.integer_or("total_wagons", 20)?;
        if !(0..=i32::MAX as i64).contains(&total_wagons) {
            return Err(CellError::new("total_wagons", "must not be negative"));
        }
        let transit_progress = row.number_or("transit_progress", 0.0)?;
        if !(0.0..=100.0).contains(&transit_progress) {
            return Err(CellError::new(
                "transit_progress",
                "must be between 0 and 100",
            ));
        }

        Ok(Self {
            id: row.optional_id("rake_id")?,
            rake_number,
            origin_plant: row.text_within("origin_plant", "Plant A", NAME_LIMIT),
            destination: row.text_within("destination", "Location B", NAME_LIMIT),
            status: row.cell("status").map(RakeStatus::parse).unwrap_or_default(),
            capacity_tons,
            total_wagons: total_wagons as i32,
            priority: row.cell("priority").map(Priority::parse).unwrap_or_default(),
            current_location: Some(row.text_within("current_location", "At Plant", NAME_LIMIT)),
            transit_progress,
            departure_time: row.optional_datetime("departure_time")?,
            eta: row.optional_datetime("eta")?,
            arrival_time: row.optional_datetime("arrival_time")?,
            freight_type: row.optional_text("freight_type"),
            weight: row.optional_number("weight")?,
            last_maintenance_date: row.optional_date("last_maintenance_date")?,
            departure_date: None,
            expected_arrival_date: None,
        })
    }

    pub fn into_active_model(self, now: DateTime<Utc>) -> rake::ActiveModel {
        rake::ActiveModel {
            id: NotSet,
            rake_number: Set(self.rake_number),
            origin_plant: Set(self.origin_plant),
            destination: Set(self.destination),
            status: Set(self.status.into()),
            capacity_tons: Set(self.capacity_tons),
            total_wagons: Set(self.total_wagons),
            priority: Set(self.priority.into()),
            current_location: Set(self.current_location),
            transit_progress: Set(self.transit_progress),
            departure_time: Set(self.departure_time),
            eta: Set(self.eta),
            arrival_time: Set(self.arrival_time),
            last_maintenance_date: Set(self.last_maintenance_date),
            freight_type: Set(self.freight_type),
            weight: Set(self.weight),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl From<rake::Model> for RakeRecord {
    fn from(model: rake::Model) -> Self {
        Self {
            id: Some(model.id),
            rake_number: model.rake_number,
            origin_plant: model.origin_plant,
            destination: model.destination,
            status: model.status.into(),
            capacity_tons: model.capacity_tons,
            total_wagons: model.total_wagons,
            priority: model.priority.into(),
            current_location: model.current_location,
            transit_progress: model.transit_progress,
            departure_time: model.departure_time,
            eta: model.eta,
            arrival_time: model.arrival_time,
            freight_type: model.freight_type,
            weight: model.weight,
            last_maintenance_date: model.last_maintenance_date,
            departure_date: None,
            expected_arrival_date: None,
        }
    }
}
