use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_rakes_table::Rakes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerName).string_len(100).not_null())
                    .col(ColumnDef::new(Orders::CustomerId).big_integer().null())
                    .col(ColumnDef::new(Orders::Material).string_len(100).not_null())
                    .col(ColumnDef::new(Orders::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(Orders::Unit)
                            .string_len(20)
                            .not_null()
                            .default("tons"),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(50)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::Priority)
                            .string_len(20)
                            .not_null()
                            .default("normal"),
                    )
                    .col(
                        ColumnDef::new(Orders::OriginPlant)
                            .string_len(100)
                            .not_null()
                            .default("Plant A"),
                    )
                    .col(ColumnDef::new(Orders::Destination).string_len(100).not_null())
                    .col(ColumnDef::new(Orders::RatePerTon).double().null())
                    .col(ColumnDef::new(Orders::RakeId).integer().null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_rake_id")
                            .from(Orders::Table, Orders::RakeId)
                            .to(Rakes::Table, Rakes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    CustomerName,
    CustomerId,
    Material,
    Quantity,
    Unit,
    Status,
    Priority,
    OriginPlant,
    Destination,
    RatePerTon,
    RakeId,
    CreatedAt,
    UpdatedAt,
}
