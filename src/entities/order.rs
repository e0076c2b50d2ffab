use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_name: String,
    pub customer_id: Option<i64>,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub status: String,
    pub priority: String,
    pub origin_plant: String,
    pub destination: String,
    pub rate_per_ton: Option<f64>,
    pub rake_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rake::Entity",
        from = "Column::RakeId",
        to = "super::rake::Column::Id",
        on_delete = "SetNull"
    )]
    Rake,
}

impl Related<super::rake::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rake.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
