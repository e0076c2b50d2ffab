pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_rakes_table;
mod m20250301_000002_create_orders_table;
mod m20250301_000003_create_inventory_items_table;
mod m20250301_000004_create_route_transport_info_table;
mod m20250301_000005_add_dispatch_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_rakes_table::Migration),
            Box::new(m20250301_000002_create_orders_table::Migration),
            Box::new(m20250301_000003_create_inventory_items_table::Migration),
            Box::new(m20250301_000004_create_route_transport_info_table::Migration),
            Box::new(m20250301_000005_add_dispatch_indexes::Migration),
        ]
    }
}
