//! PostgreSQL entity store
//!
//! One generic adapter serves every [`PgMapped`] entity. Each operation is a
//! single statement, so per-operation atomicity comes from PostgreSQL itself
//! and no transaction spans more than one call.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use core_kernel::{AccessError, AccessResult, EntityId, EntityStore, PageDescriptor, StoreProbe};

use crate::error::DatabaseError;
use crate::mapping::PgMapped;
use crate::sql;

/// PostgreSQL-backed implementation of [`EntityStore`]
pub struct PgEntityStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PgEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: PgMapped> PgEntityStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn access_error<E: PgMapped>(error: sqlx::Error) -> AccessError {
    let descriptor = E::descriptor();
    DatabaseError::from(error).into_access_error(descriptor.name, descriptor.relation.map(|r| r.field))
}

#[async_trait]
impl<E: PgMapped> StoreProbe for PgEntityStore<E> {
    async fn ping(&self) -> AccessResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccessError::unavailable(DatabaseError::from(e).to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl<E: PgMapped> EntityStore<E> for PgEntityStore<E> {
    #[instrument(skip(self, entity), fields(entity = E::descriptor().name))]
    async fn insert(&self, entity: &E) -> AccessResult<E> {
        let mut query = sql::insert_query(E::descriptor(), entity.column_values(), entity.relation_key());
        let row = query
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(access_error::<E>)?;
        let saved = E::from_row(&row, true).map_err(access_error::<E>)?;
        debug!(id = %saved.id(), "Inserted row");
        Ok(saved)
    }

    #[instrument(skip(self, entity), fields(entity = E::descriptor().name, id = %entity.id()))]
    async fn replace(&self, entity: &E) -> AccessResult<Option<E>> {
        let mut query = sql::update_query(
            E::descriptor(),
            entity.id(),
            entity.column_values(),
            entity.relation_key(),
        );
        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(access_error::<E>)?;
        row.map(|row| E::from_row(&row, true))
            .transpose()
            .map_err(access_error::<E>)
    }

    #[instrument(skip(self), fields(entity = E::descriptor().name))]
    async fn find(&self, id: EntityId, include_relation: bool) -> AccessResult<Option<E>> {
        let mut query = sql::find_query(E::descriptor(), id, include_relation);
        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(access_error::<E>)?;
        row.map(|row| E::from_row(&row, include_relation))
            .transpose()
            .map_err(access_error::<E>)
    }

    #[instrument(skip(self), fields(entity = E::descriptor().name))]
    async fn delete(&self, id: EntityId) -> AccessResult<u64> {
        let mut query = sql::delete_query(E::descriptor(), id);
        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(access_error::<E>)?;
        Ok(result.rows_affected())
    }

    #[instrument(
        skip(self, descriptor),
        fields(entity = E::descriptor().name, page = descriptor.page(), size = descriptor.size())
    )]
    async fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
        include_relation: bool,
    ) -> AccessResult<(Vec<E>, u64)> {
        let mut query = sql::page_query(E::descriptor(), descriptor, include_relation);
        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(access_error::<E>)?;

        let total: i64 = match rows.first() {
            Some(row) => row
                .try_get(sql::TOTAL_COUNT_COLUMN)
                .map_err(access_error::<E>)?,
            None => {
                // Past the last page the window count has no row to ride on
                let mut count = sql::count_query(E::descriptor());
                count
                    .build_query_scalar::<i64>()
                    .fetch_one(&self.pool)
                    .await
                    .map_err(access_error::<E>)?
            }
        };

        let content = rows
            .iter()
            .map(|row| E::from_row(row, include_relation))
            .collect::<Result<Vec<_>, _>>()
            .map_err(access_error::<E>)?;

        debug!(rows = content.len(), total, "Fetched page");
        Ok((content, u64::try_from(total).unwrap_or_default()))
    }
}
