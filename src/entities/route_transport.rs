use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route_transport_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub origin: String,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
