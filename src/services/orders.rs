use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::order;
use crate::errors::ServiceError;
use crate::models::{EntityKind, OrderRecord, OrderStatus, Priority, Record};
use crate::repositories::RecordStore;

const DEFAULT_LIMIT: u64 = 100;
const MAX_LIMIT: u64 = 1000;

fn default_unit() -> String {
    "tons".to_string()
}

fn default_origin_plant() -> String {
    "Plant A".to_string()
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100, message = "Customer name is required"))]
    #[schema(example = "Tata Motors")]
    pub customer_name: String,
    pub customer_id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "Material is required"))]
    #[schema(example = "HR Coil")]
    pub material: String,
    #[schema(example = 1200.0)]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[serde(default)]
    #[schema(value_type = String, example = "pending")]
    pub status: OrderStatus,
    #[serde(default)]
    #[schema(value_type = String, example = "high")]
    pub priority: Priority,
    #[serde(default = "default_origin_plant")]
    #[validate(length(min = 1, max = 100))]
    pub origin_plant: String,
    #[validate(length(min = 1, max = 100, message = "Destination is required"))]
    pub destination: String,
    pub rate_per_ton: Option<f64>,
    pub rake_id: Option<i32>,
}

/// Partial update; absent fields are left alone. `rake_id: null` unassigns.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: Option<String>,
    pub customer_id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub material: Option<String>,
    pub quantity: Option<f64>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<OrderStatus>,
    #[schema(value_type = Option<String>)]
    pub priority: Option<Priority>,
    #[validate(length(min = 1, max = 100))]
    pub origin_plant: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub destination: Option<String>,
    pub rate_per_ton: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub rake_id: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

fn ensure_positive(field: &str, value: f64) -> Result<(), ServiceError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ServiceError::ValidationError(format!(
            "{}: must be greater than zero",
            field
        )));
    }
    Ok(())
}

fn into_order(record: Record) -> Result<OrderRecord, ServiceError> {
    match record {
        Record::Order(order) => Ok(order),
        other => Err(ServiceError::InternalError(format!(
            "expected an order, store returned a {} record",
            other.kind()
        ))),
    }
}

/// Order management. Writes go through the [`RecordStore`]; filtered listing
/// reads the order table directly.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    store: Arc<dyn RecordStore>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, store: Arc<dyn RecordStore>) -> Self {
        Self { db, store }
    }

    async fn ensure_rake_exists(&self, rake_id: i32) -> Result<(), ServiceError> {
        if self.store.find(EntityKind::Rakes, rake_id).await?.is_none() {
            return Err(ServiceError::BadRequest(format!(
                "rake {} does not exist",
                rake_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderRecord, ServiceError> {
        request.validate()?;
        ensure_positive("quantity", request.quantity)?;
        if let Some(rate) = request.rate_per_ton {
            ensure_positive("rate_per_ton", rate)?;
        }
        if let Some(rake_id) = request.rake_id {
            self.ensure_rake_exists(rake_id).await?;
        }

        let record = OrderRecord {
            id: None,
            customer_name: request.customer_name,
            customer_id: request.customer_id,
            material: request.material,
            quantity: request.quantity,
            unit: request.unit,
            status: request.status,
            priority: request.priority,
            origin_plant: request.origin_plant,
            destination: request.destination,
            rate_per_ton: request.rate_per_ton,
            rake_id: request.rake_id,
            preferred_dispatch_date: None,
            latest_delivery_date: None,
        };
        let id = self.store.insert(Record::Order(record.clone())).await?;

        info!(order_id = id, "Order created");
        Ok(OrderRecord {
            id: Some(id),
            ..record
        })
    }

    pub async fn get(&self, id: i32) -> Result<OrderRecord, ServiceError> {
        match self.store.find(EntityKind::Orders, id).await? {
            Some(record) => into_order(record),
            None => Err(ServiceError::NotFound(format!("order {} not found", id))),
        }
    }

    /// Orders by ascending id, optionally filtered by status and priority.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<OrderRecord>, ServiceError> {
        let mut query = order::Entity::find();
        if let Some(status) = filter.status.as_deref() {
            query = query.filter(order::Column::Status.eq(String::from(OrderStatus::parse(status))));
        }
        if let Some(priority) = filter.priority.as_deref() {
            query = query.filter(order::Column::Priority.eq(String::from(Priority::parse(priority))));
        }

        let orders = query
            .order_by_asc(order::Column::Id)
            .offset(filter.skip.unwrap_or(0))
            .limit(filter.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT))
            .all(&*self.db)
            .await
            .map_err(ServiceError::store_unavailable)?;

        Ok(orders.into_iter().map(OrderRecord::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateOrderRequest,
    ) -> Result<OrderRecord, ServiceError> {
        request.validate()?;
        if let Some(quantity) = request.quantity {
            ensure_positive("quantity", quantity)?;
        }
        if let Some(rate) = request.rate_per_ton {
            ensure_positive("rate_per_ton", rate)?;
        }
        if let Some(Some(rake_id)) = request.rake_id {
            self.ensure_rake_exists(rake_id).await?;
        }

        let mut order = self.get(id).await?;
        if let Some(value) = request.customer_name {
            order.customer_name = value;
        }
        if let Some(value) = request.customer_id {
            order.customer_id = Some(value);
        }
        if let Some(value) = request.material {
            order.material = value;
        }
        if let Some(value) = request.quantity {
            order.quantity = value;
        }
        if let Some(value) = request.unit {
            order.unit = value;
        }
        if let Some(value) = request.status {
            order.status = value;
        }
        if let Some(value) = request.priority {
            order.priority = value;
        }
        if let Some(value) = request.origin_plant {
            order.origin_plant = value;
        }
        if let Some(value) = request.destination {
            order.destination = value;
        }
        if let Some(value) = request.rate_per_ton {
            order.rate_per_ton = Some(value);
        }
        if let Some(value) = request.rake_id {
            order.rake_id = value;
        }

        let updated = into_order(self.store.update(Record::Order(order)).await?)?;
        info!(order_id = id, status = %updated.status, "Order updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.store
            .delete(EntityKind::Orders, id)
            .await
            .map_err(|err| match err {
                ServiceError::NotFound(_) => {
                    ServiceError::NotFound(format!("order {} not found", id))
                }
                other => other,
            })?;
        info!(order_id = id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RakeRecord;
    use crate::repositories::record_store::MockRecordStore;
    use crate::repositories::SeaOrmRecordStore;
    use crate::snapshot::SnapshotRow;
    use assert_matches::assert_matches;

    async fn service() -> OrderService {
        let db = db().await;
        let store = Arc::new(SeaOrmRecordStore::new(db.clone()));
        OrderService::new(db, store)
    }

    async fn db() -> Arc<DatabaseConnection> {
        let db = crate::db::establish_connection_with_config(&crate::db::DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        crate::db::run_migrations(&db).await.unwrap();
        Arc::new(db)
    }

    fn request(customer: &str, priority: &str) -> CreateOrderRequest {
        serde_json::from_value(serde_json::json!({
            "customer_name": customer,
            "material": "HR Coil",
            "quantity": 1200.0,
            "destination": "Pune",
            "priority": priority,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_fills_defaults_and_get_reads_back() {
        let service = service().await;
        let created = service.create(request("Tata Motors", "high")).await.unwrap();

        assert_eq!(created.unit, "tons");
        assert_eq!(created.origin_plant, "Plant A");
        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.priority, Priority::High);

        let id = created.id.unwrap();
        assert_eq!(service.get(id).await.unwrap(), created);
        assert_matches!(service.get(id + 1).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_bad_quantity_and_unknown_rake() {
        let service = service().await;

        let mut bad = request("SAIL", "normal");
        bad.quantity = 0.0;
        assert_matches!(service.create(bad).await, Err(ServiceError::ValidationError(_)));

        let mut orphan = request("SAIL", "normal");
        orphan.rake_id = Some(99);
        assert_matches!(service.create(orphan).await, Err(ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn list_filters_and_pages() {
        let service = service().await;
        for (customer, priority) in [("A", "high"), ("B", "low"), ("C", "HIGH")] {
            service.create(request(customer, priority)).await.unwrap();
        }

        let high = service
            .list(OrderFilter {
                priority: Some("high".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = high.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);

        let page = service
            .list(OrderFilter {
                skip: Some(1),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].customer_name, "B");
    }

    #[tokio::test]
    async fn update_assigns_and_unassigns_rakes() {
        let db = db().await;
        let store = Arc::new(SeaOrmRecordStore::new(db.clone()));
        let rake = RakeRecord::from_snapshot_row(&SnapshotRow::from_pairs(0, [("rake_number", "RK7")]))
            .unwrap();
        let rake_id = store.insert(Record::Rake(rake)).await.unwrap();

        let service = OrderService::new(db, store);
        let id = service.create(request("JSW", "normal")).await.unwrap().id.unwrap();

        let assign: UpdateOrderRequest =
            serde_json::from_value(serde_json::json!({ "rake_id": rake_id, "status": "dispatched" }))
                .unwrap();
        let updated = service.update(id, assign).await.unwrap();
        assert_eq!(updated.rake_id, Some(rake_id));
        assert_eq!(updated.status, OrderStatus::Dispatched);

        let untouched: UpdateOrderRequest =
            serde_json::from_value(serde_json::json!({ "priority": "urgent" })).unwrap();
        assert_eq!(
            service.update(id, untouched).await.unwrap().rake_id,
            Some(rake_id)
        );

        let unassign: UpdateOrderRequest =
            serde_json::from_value(serde_json::json!({ "rake_id": null })).unwrap();
        assert_eq!(service.update(id, unassign).await.unwrap().rake_id, None);
    }

    #[tokio::test]
    async fn delete_is_explicit_and_reports_missing_orders() {
        let service = service().await;
        let id = service.create(request("Essar", "low")).await.unwrap().id.unwrap();

        service.delete(id).await.unwrap();
        assert_matches!(service.delete(id).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_reports_an_unreachable_store_as_unavailable() {
        let mut store = MockRecordStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(ServiceError::StoreUnavailable("connection refused".into())));

        let service = OrderService::new(db().await, Arc::new(store));
        let err = service.create(request("SAIL", "normal")).await.unwrap_err();
        assert_matches!(err, ServiceError::StoreUnavailable(_));
        assert_eq!(err.status_code(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn update_and_delete_go_through_the_store() {
        let mut store = MockRecordStore::new();
        store.expect_find().returning(|_, id| {
            Ok(Some(Record::Order(OrderRecord {
                id: Some(id),
                ..request_record()
            })))
        });
        store
            .expect_update()
            .times(1)
            .withf(|record| matches!(record, Record::Order(o) if o.quantity == 900.0))
            .returning(Ok);
        store
            .expect_delete()
            .times(1)
            .returning(|_, _| Err(ServiceError::NotFound("orders record 5 not found".into())));

        let service = OrderService::new(db().await, Arc::new(store));
        let patch: UpdateOrderRequest =
            serde_json::from_value(serde_json::json!({ "quantity": 900.0 })).unwrap();
        let updated = service.update(5, patch).await.unwrap();
        assert_eq!(updated.id, Some(5));
        assert_eq!(updated.customer_name, "Essar");

        let err = service.delete(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: order 5 not found");
    }

    fn request_record() -> OrderRecord {
        OrderRecord::from_snapshot_row(&SnapshotRow::from_pairs(0, [("customer_name", "Essar")]))
            .unwrap()
    }
}
