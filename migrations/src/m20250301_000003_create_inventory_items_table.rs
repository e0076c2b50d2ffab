use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryItems::PlantLocation).string().not_null())
                    .col(ColumnDef::new(InventoryItems::ProductName).string().not_null())
                    .col(ColumnDef::new(InventoryItems::MaterialGrade).string().not_null())
                    .col(ColumnDef::new(InventoryItems::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(InventoryItems::Unit)
                            .string()
                            .not_null()
                            .default("tons"),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::StorageLocation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryItems::ProductionRate).double().null())
                    .col(
                        ColumnDef::new(InventoryItems::NextProductionDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InventoryItems {
    Table,
    Id,
    PlantLocation,
    ProductName,
    MaterialGrade,
    Quantity,
    Unit,
    StorageLocation,
    ProductionRate,
    NextProductionDate,
    CreatedAt,
    UpdatedAt,
}
