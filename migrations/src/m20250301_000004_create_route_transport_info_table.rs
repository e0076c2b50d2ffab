use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RouteTransportInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RouteTransportInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RouteTransportInfo::Origin).string().not_null())
                    .col(
                        ColumnDef::new(RouteTransportInfo::Destination)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::DistanceKm)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::TransitTimeDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::PreferredRoute)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::AlternateRoute)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::TrackCapacityWagonsPerDay)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::RouteConstraints)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::ExpectedDelaysDays)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RouteTransportInfo::RailwayZone)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RouteTransportInfo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RouteTransportInfo {
    Table,
    Id,
    Origin,
    Destination,
    DistanceKm,
    TransitTimeDays,
    PreferredRoute,
    AlternateRoute,
    TrackCapacityWagonsPerDay,
    RouteConstraints,
    ExpectedDelaysDays,
    RailwayZone,
}
