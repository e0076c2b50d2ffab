use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rake Dispatch API",
        version = "0.2.1",
        description = r#"
# Rail-Rake Dispatch API

Backs the dispatch dashboard for orders, rakes, inventory and routes.

## Resilient reads

`GET /data/{kind}` serves from the record store, or from the kind's CSV
snapshot when the store is empty or unreachable. Every response says which:

```json
{ "source": "snapshot", "fallback_reason": "store_empty", "last_updated": "2025-03-10T09:00:00Z" }
```

Dispatch windows, ETAs and maintenance dates are re-derived relative to the
time of the read and are never stored.

## Ingestion

`POST /ingest/{kind}` and `POST /database/seed` load snapshots into the store.
Bad rows are skipped and reported with their row index and reason.

## Error Handling

Errors share one format:

```json
{
  "error": "Service Unavailable",
  "message": "data unavailable for rakes",
  "timestamp": "2025-03-10T09:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "data", description = "Resolved reads and snapshot ingestion"),
        (name = "database", description = "Seeding and store statistics"),
        (name = "snapshots", description = "Snapshot file browser"),
        (name = "orders", description = "Order management"),
        (name = "routes", description = "Route lookup"),
        (name = "dashboard", description = "Dashboard metrics and charts")
    ),
    paths(
        crate::handlers::data::resolve_kind,
        crate::handlers::data::ingest_kind,

        crate::handlers::database::seed_database,
        crate::handlers::database::database_stats,

        crate::handlers::snapshots::list_snapshots,
        crate::handlers::snapshots::read_snapshot,
        crate::handlers::snapshots::summarize_snapshot,

        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,

        crate::handlers::routes::list_routes,
        crate::handlers::routes::lookup_routes,

        crate::handlers::dashboard::dashboard_metrics,
        crate::handlers::dashboard::dashboard_charts,
    ),
    components(
        schemas(
            // Records
            crate::models::EntityKind,
            crate::models::Record,
            crate::models::OrderRecord,
            crate::models::RakeRecord,
            crate::models::InventoryRecord,
            crate::models::RouteRecord,

            // Resolution and ingestion
            crate::services::Resolution,
            crate::services::Provenance,
            crate::services::FallbackReason,
            crate::services::IngestReport,
            crate::services::RowFailure,
            crate::services::SeedReport,
            crate::services::ingestion::SeedEntry,
            crate::services::ingestion::SeedOutcome,
            crate::snapshot::SnapshotFile,
            crate::snapshot::SnapshotSummary,
            crate::snapshot::NumericSummary,
            crate::handlers::database::DatabaseStats,

            // Orders and routes
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderRequest,
            crate::handlers::routes::RoutesResponse,

            // Dashboard
            crate::services::dashboard::MetricItem,
            crate::services::dashboard::MetricValue,
            crate::services::dashboard::Trend,
            crate::services::dashboard::DashboardCharts,
            crate::services::dashboard::ChartData,
            crate::services::dashboard::ChartDataset,
            crate::services::dashboard::ChartColor,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
