use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_orders_table::Orders;
use super::m20250301_000004_create_route_transport_info_table::RouteTransportInfo;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Route identity is the (origin, destination) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_route_transport_origin_destination")
                    .table(RouteTransportInfo::Table)
                    .col(RouteTransportInfo::Origin)
                    .col(RouteTransportInfo::Destination)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status_priority")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .col(Orders::Priority)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_rake_id")
                    .table(Orders::Table)
                    .col(Orders::RakeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_rake_id")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_status_priority")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_route_transport_origin_destination")
                    .table(RouteTransportInfo::Table)
                    .to_owned(),
            )
            .await
    }
}
