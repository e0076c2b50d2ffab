use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rakes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rakes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rakes::RakeNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Rakes::OriginPlant).string_len(100).not_null())
                    .col(ColumnDef::new(Rakes::Destination).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Rakes::Status)
                            .string_len(50)
                            .not_null()
                            .default("Available"),
                    )
                    .col(
                        ColumnDef::new(Rakes::CapacityTons)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Rakes::TotalWagons)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rakes::Priority)
                            .string_len(20)
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(Rakes::CurrentLocation).string_len(100).null())
                    .col(
                        ColumnDef::new(Rakes::TransitProgress)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Rakes::DepartureTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Rakes::Eta).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Rakes::ArrivalTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Rakes::LastMaintenanceDate).date().null())
                    .col(ColumnDef::new(Rakes::FreightType).string_len(100).null())
                    .col(ColumnDef::new(Rakes::Weight).double().null())
                    .col(
                        ColumnDef::new(Rakes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rakes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rakes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Rakes {
    Table,
    Id,
    RakeNumber,
    OriginPlant,
    Destination,
    Status,
    CapacityTons,
    TotalWagons,
    Priority,
    CurrentLocation,
    TransitProgress,
    DepartureTime,
    Eta,
    ArrivalTime,
    LastMaintenanceDate,
    FreightType,
    Weight,
    CreatedAt,
    UpdatedAt,
}
