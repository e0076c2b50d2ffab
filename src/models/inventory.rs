use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::inventory_item;
use crate::snapshot::row::{CellError, SnapshotRow};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryRecord {
    pub id: Option<i32>,
    pub plant_location: String,
    pub product_name: String,
    pub material_grade: String,
    pub quantity: f64,
    pub unit: String,
    pub storage_location: String,
    pub production_rate: Option<f64>,
    pub next_production_date: Option<DateTime<Utc>>,
    pub production_schedule_date: Option<NaiveDate>,
}

impl InventoryRecord {
    pub fn from_snapshot_row(row: &SnapshotRow) -> Result<Self, CellError> {
        let quantity = row.number_or("quantity", 1000.0)?;
        if quantity < 0.0 {
            return Err(CellError::new("quantity", "must not be negative"));
        }
        let production_rate = row.optional_number("production_rate")?;
        if production_rate.is_some_and(|rate| rate < 0.0) {
            return Err(CellError::new("production_rate", "must not be negative"));
        }

        Ok(Self {
            id: None,
            plant_location: row.text_or("plant_location", "Plant A"),
            product_name: row.text_or("product_name", "Steel Product"),
            material_grade: row.text_or("material_grade", "Grade A"),
            quantity,
            unit: row.text_or("unit", "tons"),
            storage_location: row.text_or("storage_location", "Storage A"),
            production_rate,
            next_production_date: row.optional_datetime("next_production_date")?,
            production_schedule_date: None,
        })
    }

    pub fn into_active_model(self, now: DateTime<Utc>) -> inventory_item::ActiveModel {
        inventory_item::ActiveModel {
            id: NotSet,
            plant_location: Set(self.plant_location),
            product_name: Set(self.product_name),
            material_grade: Set(self.material_grade),
            quantity: Set(self.quantity),
            unit: Set(self.unit),
            storage_location: Set(self.storage_location),
            production_rate: Set(self.production_rate),
            next_production_date: Set(self.next_production_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl From<inventory_item::Model> for InventoryRecord {
    fn from(model: inventory_item::Model) -> Self {
        Self {
            id: Some(model.id),
            plant_location: model.plant_location,
            product_name: model.product_name,
            material_grade: model.material_grade,
            quantity: model.quantity,
            unit: model.unit,
            storage_location: model.storage_location,
            production_rate: model.production_rate,
            next_production_date: model.next_production_date,
            production_schedule_date: None,
        }
    }
}
