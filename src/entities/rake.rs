use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rakes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub rake_number: String,
    pub origin_plant: String,
    pub destination: String,
    pub status: String,
    pub capacity_tons: f64,
    pub total_wagons: i32,
    pub priority: String,
    pub current_location: Option<String>,
    pub transit_progress: f64,
    pub departure_time: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub freight_type: Option<String>,
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
