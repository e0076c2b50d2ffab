//! sea-orm entities for the four dispatch tables.

pub mod inventory_item;
pub mod order;
pub mod rake;
pub mod route_transport;
