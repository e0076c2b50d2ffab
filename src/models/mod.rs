//! Typed records for the four dispatch entity kinds.

pub mod inventory;
pub mod order;
pub mod rake;
pub mod route;
pub mod status;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

pub use inventory::InventoryRecord;
pub use order::OrderRecord;
pub use rake::RakeRecord;
pub use route::RouteRecord;
pub use status::{OrderStatus, Priority, RakeStatus};

use crate::snapshot::row::{CellError, SnapshotRow};

/// The entity kinds served by the resolver, in seeding order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Orders,
    Rakes,
    Inventory,
    Routes,
}

/// One record of any kind.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Record {
    Order(OrderRecord),
    Rake(RakeRecord),
    Inventory(InventoryRecord),
    Route(RouteRecord),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Order(_) => EntityKind::Orders,
            Record::Rake(_) => EntityKind::Rakes,
            Record::Inventory(_) => EntityKind::Inventory,
            Record::Route(_) => EntityKind::Routes,
        }
    }

    /// Store id, when the record has one.
    pub fn id(&self) -> Option<i32> {
        match self {
            Record::Order(r) => r.id,
            Record::Rake(r) => r.id,
            Record::Inventory(r) => r.id,
            Record::Route(r) => r.id,
        }
    }

    /// Casts a snapshot row with the schema of `kind`.
    pub fn from_snapshot_row(kind: EntityKind, row: &SnapshotRow) -> Result<Self, CellError> {
        Ok(match kind {
            EntityKind::Orders => Record::Order(OrderRecord::from_snapshot_row(row)?),
            EntityKind::Rakes => Record::Rake(RakeRecord::from_snapshot_row(row)?),
            EntityKind::Inventory => Record::Inventory(InventoryRecord::from_snapshot_row(row)?),
            EntityKind::Routes => Record::Route(RouteRecord::from_snapshot_row(row)?),
        })
    }
}

impl From<OrderRecord> for Record {
    fn from(record: OrderRecord) -> Self {
        Record::Order(record)
    }
}

impl From<RakeRecord> for Record {
    fn from(record: RakeRecord) -> Self {
        Record::Rake(record)
    }
}

impl From<InventoryRecord> for Record {
    fn from(record: InventoryRecord) -> Self {
        Record::Inventory(record)
    }
}

impl From<RouteRecord> for Record {
    fn from(record: RouteRecord) -> Self {
        Record::Route(record)
    }
}
