use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{OrderStatus, Priority};
use crate::entities::order;
use crate::snapshot::row::{CellError, SnapshotRow};

const NAME_LIMIT: usize = 100;
const UNIT_LIMIT: usize = 20;

/// A customer order as served by the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecord {
    /// Store id; absent for snapshot rows without an `order_id` column
    pub id: Option<i32>,
    #[schema(example = "Tata Motors")]
    pub customer_name: String,
    pub customer_id: Option<i64>,
    #[schema(example = "HR Coil")]
    pub material: String,
    /// Quantity in `unit`, always positive
    pub quantity: f64,
    pub unit: String,
    #[schema(value_type = String, example = "pending")]
    pub status: OrderStatus,
    #[schema(value_type = String, example = "normal")]
    pub priority: Priority,
    pub origin_plant: String,
    pub destination: String,
    pub rate_per_ton: Option<f64>,
    pub rake_id: Option<i32>,
    pub preferred_dispatch_date: Option<NaiveDate>,
    pub latest_delivery_date: Option<NaiveDate>,
}

impl OrderRecord {
    pub fn from_snapshot_row(row: &SnapshotRow) -> Result<Self, CellError> {
        let quantity = row.number_or("quantity", 500.0)?;
        if quantity <= 0.0 {
            return Err(CellError::new("quantity", "must be greater than zero"));
        }

        let rate_per_ton = row.optional_number("rate_per_ton")?;
        if rate_per_ton.is_some_and(|rate| rate <= 0.0) {
            return Err(CellError::new("rate_per_ton", "must be greater than zero"));
        }

        let material = row
            .first_cell(&["material", "product_name"])
            .unwrap_or("Steel")
            .chars()
            .take(NAME_LIMIT)
            .collect();

        Ok(Self {
            id: row.optional_id("order_id")?,
            customer_name: row.text_within("customer_name", "Customer A", NAME_LIMIT),
            customer_id: row.optional_integer("customer_id")?,
            material,
            quantity,
            unit: row.text_within("unit", "tons", UNIT_LIMIT),
            status: row
                .first_cell(&["status", "order_status"])
                .map(OrderStatus::parse)
                .unwrap_or_default(),
            priority: row.cell("priority").map(Priority::parse).unwrap_or_default(),
            origin_plant: row.text_within("origin_plant", "Plant A", NAME_LIMIT),
            destination: row.text_within("destination", "Location A", NAME_LIMIT),
            rate_per_ton,
            rake_id: row.optional_id("rake_id")?,
            preferred_dispatch_date: None,
            latest_delivery_date: None,
        })
    }

    pub fn into_active_model(self, now: DateTime<Utc>) -> order::ActiveModel {
        order::ActiveModel {
            id: NotSet,
            customer_name: Set(self.customer_name),
            customer_id: Set(self.customer_id),
            material: Set(self.material),
            quantity: Set(self.quantity),
            unit: Set(self.unit),
            status: Set(self.status.into()),
            priority: Set(self.priority.into()),
            origin_plant: Set(self.origin_plant),
            destination: Set(self.destination),
            rate_per_ton: Set(self.rate_per_ton),
            rake_id: Set(self.rake_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl From<order::Model> for OrderRecord {
    fn from(model: order::Model) -> Self {
        Self {
            id: Some(model.id),
            customer_name: model.customer_name,
            customer_id: model.customer_id,
            material: model.material,
            quantity: model.quantity,
            unit: model.unit,
            status: model.status.into(),
            priority: model.priority.into(),
            origin_plant: model.origin_plant,
            destination: model.destination,
            rate_per_ton: model.rate_per_ton,
            rake_id: model.rake_id,
            preferred_dispatch_date: None,
            latest_delivery_date: None,
        }
    }
}
