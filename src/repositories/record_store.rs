use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{BaseRepository, Repository};
use crate::entities::{inventory_item, order, rake, route_transport};
use crate::errors::ServiceError;
use crate::models::{EntityKind, Record};

/// Uniform access to the relational store for every kind. The only writer of
/// store-backed records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of `kind`, ordered by ascending id.
    async fn query(&self, kind: EntityKind) -> Result<Vec<Record>, ServiceError>;

    async fn insert(&self, record: Record) -> Result<i32, ServiceError>;

    /// Inserts `records` in one transaction with a savepoint per row, so a
    /// rejected row rolls back alone. Returns one outcome per input row.
    async fn insert_batch(
        &self,
        records: Vec<Record>,
    ) -> Result<Vec<Result<i32, ServiceError>>, ServiceError>;

    async fn count(&self, kind: EntityKind) -> Result<u64, ServiceError>;

    async fn find(&self, kind: EntityKind, id: i32) -> Result<Option<Record>, ServiceError>;

    /// Overwrites the stored row carrying `record`'s id and returns it as stored.
    async fn update(&self, record: Record) -> Result<Record, ServiceError>;

    async fn delete(&self, kind: EntityKind, id: i32) -> Result<(), ServiceError>;
}

/// [`RecordStore`] over a sea-orm connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmRecordStore {
    base: BaseRepository,
}

impl SeaOrmRecordStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

/// Connection-level failures mean the store is gone; anything else is about the row.
fn classify_insert_error(err: DbErr) -> ServiceError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => ServiceError::store_unavailable(err),
        other => ServiceError::InsertRejected(other.to_string()),
    }
}

fn classify_write_error(kind: EntityKind, id: i32, err: DbErr) -> ServiceError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            ServiceError::NotFound(format!("{} record {} not found", kind, id))
        }
        other => classify_insert_error(other),
    }
}

async fn update_with<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    record: Record,
    now: DateTime<Utc>,
) -> Result<Record, DbErr> {
    let updated = match record {
        Record::Order(r) => {
            let mut model = r.into_active_model(now);
            model.id = Set(id);
            model.created_at = NotSet;
            Record::Order(model.update(conn).await?.into())
        }
        Record::Rake(r) => {
            let mut model = r.into_active_model(now);
            model.id = Set(id);
            model.created_at = NotSet;
            Record::Rake(model.update(conn).await?.into())
        }
        Record::Inventory(r) => {
            let mut model = r.into_active_model(now);
            model.id = Set(id);
            model.created_at = NotSet;
            Record::Inventory(model.update(conn).await?.into())
        }
        Record::Route(r) => {
            let mut model = r.into_active_model();
            model.id = Set(id);
            Record::Route(model.update(conn).await?.into())
        }
    };
    Ok(updated)
}

async fn insert_with<C: ConnectionTrait>(
    conn: &C,
    record: Record,
    now: DateTime<Utc>,
) -> Result<i32, DbErr> {
    let id = match record {
        Record::Order(r) => r.into_active_model(now).insert(conn).await?.id,
        Record::Rake(r) => r.into_active_model(now).insert(conn).await?.id,
        Record::Inventory(r) => r.into_active_model(now).insert(conn).await?.id,
        Record::Route(r) => r.into_active_model().insert(conn).await?.id,
    };
    Ok(id)
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    #[instrument(skip(self))]
    async fn query(&self, kind: EntityKind) -> Result<Vec<Record>, ServiceError> {
        let db = self.base.get_db();
        let records: Vec<Record> = match kind {
            EntityKind::Orders => order::Entity::find()
                .order_by_asc(order::Column::Id)
                .all(db)
                .await
                .map(|rows| rows.into_iter().map(|m| Record::Order(m.into())).collect::<Vec<_>>()),
            EntityKind::Rakes => rake::Entity::find()
                .order_by_asc(rake::Column::Id)
                .all(db)
                .await
                .map(|rows| rows.into_iter().map(|m| Record::Rake(m.into())).collect::<Vec<_>>()),
            EntityKind::Inventory => inventory_item::Entity::find()
                .order_by_asc(inventory_item::Column::Id)
                .all(db)
                .await
                .map(|rows| rows.into_iter().map(|m| Record::Inventory(m.into())).collect::<Vec<_>>()),
            EntityKind::Routes => route_transport::Entity::find()
                .order_by_asc(route_transport::Column::Id)
                .all(db)
                .await
                .map(|rows| rows.into_iter().map(|m| Record::Route(m.into())).collect::<Vec<_>>()),
        }
        .map_err(ServiceError::store_unavailable)?;

        debug!(%kind, count = records.len(), "Queried record store");
        Ok(records)
    }

    #[instrument(skip(self, record), fields(kind = %record.kind()))]
    async fn insert(&self, record: Record) -> Result<i32, ServiceError> {
        insert_with(self.base.get_db(), record, Utc::now())
            .await
            .map_err(classify_insert_error)
    }

    #[instrument(skip(self, records), fields(rows = records.len()))]
    async fn insert_batch(
        &self,
        records: Vec<Record>,
    ) -> Result<Vec<Result<i32, ServiceError>>, ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::store_unavailable)?;
        let now = Utc::now();
        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            let savepoint = txn.begin().await.map_err(ServiceError::store_unavailable)?;
            match insert_with(&savepoint, record, now).await {
                Ok(id) => {
                    savepoint
                        .commit()
                        .await
                        .map_err(ServiceError::store_unavailable)?;
                    outcomes.push(Ok(id));
                }
                Err(err) => {
                    warn!(error = %err, "Row rejected by store");
                    savepoint
                        .rollback()
                        .await
                        .map_err(ServiceError::store_unavailable)?;
                    outcomes.push(Err(classify_insert_error(err)));
                }
            }
        }

        txn.commit().await.map_err(ServiceError::store_unavailable)?;
        Ok(outcomes)
    }

    async fn count(&self, kind: EntityKind) -> Result<u64, ServiceError> {
        let db = self.base.get_db();
        match kind {
            EntityKind::Orders => order::Entity::find().count(db).await,
            EntityKind::Rakes => rake::Entity::find().count(db).await,
            EntityKind::Inventory => inventory_item::Entity::find().count(db).await,
            EntityKind::Routes => route_transport::Entity::find().count(db).await,
        }
        .map_err(ServiceError::store_unavailable)
    }

    async fn find(&self, kind: EntityKind, id: i32) -> Result<Option<Record>, ServiceError> {
        let db = self.base.get_db();
        match kind {
            EntityKind::Orders => order::Entity::find_by_id(id)
                .one(db)
                .await
                .map(|m| m.map(|m| Record::Order(m.into()))),
            EntityKind::Rakes => rake::Entity::find_by_id(id)
                .one(db)
                .await
                .map(|m| m.map(|m| Record::Rake(m.into()))),
            EntityKind::Inventory => inventory_item::Entity::find_by_id(id)
                .one(db)
                .await
                .map(|m| m.map(|m| Record::Inventory(m.into()))),
            EntityKind::Routes => route_transport::Entity::find_by_id(id)
                .one(db)
                .await
                .map(|m| m.map(|m| Record::Route(m.into()))),
        }
        .map_err(ServiceError::store_unavailable)
    }

    #[instrument(skip(self, record), fields(kind = %record.kind(), id = ?record.id()))]
    async fn update(&self, record: Record) -> Result<Record, ServiceError> {
        let kind = record.kind();
        let id = record.id().ok_or_else(|| {
            ServiceError::BadRequest(format!("{} record has no id to update", kind))
        })?;
        update_with(self.base.get_db(), id, record, Utc::now())
            .await
            .map_err(|err| classify_write_error(kind, id, err))
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: EntityKind, id: i32) -> Result<(), ServiceError> {
        let db = self.base.get_db();
        let result = match kind {
            EntityKind::Orders => order::Entity::delete_by_id(id).exec(db).await,
            EntityKind::Rakes => rake::Entity::delete_by_id(id).exec(db).await,
            EntityKind::Inventory => inventory_item::Entity::delete_by_id(id).exec(db).await,
            EntityKind::Routes => route_transport::Entity::delete_by_id(id).exec(db).await,
        }
        .map_err(|err| classify_write_error(kind, id, err))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("{} record {} not found", kind, id)));
        }
        Ok(())
    }
}
