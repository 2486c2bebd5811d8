//! In-memory entity store
//!
//! Identities come from a sequence starting at 1 and foreign keys must point
//! at a known related entity. Pages follow PostgreSQL's NULL placement (last
//! ascending, first descending) and break ties by identity. Text compares
//! bytewise, not by database collation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    AccessError, AccessResult, ColumnValue, Entity, EntityId, EntityStore, PageDescriptor,
    Related, SortDirection, SortKey, SortOrder, StoreProbe,
};

struct MemoryState<E: Entity> {
    rows: BTreeMap<EntityId, E>,
    related: HashMap<ColumnValue, E::Related>,
    next_id: i64,
}

impl<E: Entity> Default for MemoryState<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            related: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> MemoryState<E> {
    /// Fails when the foreign key names an unknown related entity
    fn check_reference(&self, entity: &E) -> AccessResult<()> {
        let descriptor = E::descriptor();
        let (Some(relation), Some(key)) = (descriptor.relation, entity.relation_key()) else {
            return Ok(());
        };
        if key.is_null() || self.related.contains_key(&key) {
            return Ok(());
        }
        Err(AccessError::UnknownReference {
            entity: descriptor.name,
            relation: relation.field,
            message: format!("{} with {} '{}' does not exist", relation.related_table, relation.related_key, key),
        })
    }

    /// Replaces the key-only reference with the full related entity
    fn resolve(&self, mut entity: E) -> E {
        let resolved = entity
            .relation()
            .map(Related::key)
            .and_then(|key| self.related.get(&key).cloned());
        if resolved.is_some() {
            entity.set_relation(resolved);
        }
        entity
    }

    fn render(&self, entity: &E, include_relation: bool) -> E {
        if include_relation {
            self.resolve(entity.clone())
        } else {
            entity.clone().detached()
        }
    }
}

/// In-memory implementation of [`EntityStore`] for tests and local runs
pub struct InMemoryEntityStore<E: Entity> {
    state: Arc<RwLock<MemoryState<E>>>,
}

impl<E: Entity> Clone for InMemoryEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
        }
    }
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the related entities foreign keys may point at
    pub async fn with_related(related: impl IntoIterator<Item = E::Related>) -> Self {
        let store = Self::new();
        for item in related {
            store.add_related(item).await;
        }
        store
    }

    pub async fn add_related(&self, related: E::Related) {
        self.state.write().await.related.insert(related.key(), related);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn compare(
    orders: &[SortOrder],
    (left_id, left): &(EntityId, Vec<ColumnValue>),
    (right_id, right): &(EntityId, Vec<ColumnValue>),
) -> Ordering {
    for order in orders {
        let ordering = match order.key {
            SortKey::Identity => left_id.cmp(right_id),
            SortKey::Column(index) => left[index].cmp_nulls_last(&right[index]),
        };
        let ordering = match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl<E: Entity> StoreProbe for InMemoryEntityStore<E> {
    async fn ping(&self) -> AccessResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn insert(&self, entity: &E) -> AccessResult<E> {
        let mut state = self.state.write().await;
        state.check_reference(entity)?;

        let id = EntityId::new(state.next_id);
        state.next_id += 1;

        let mut row = entity.clone().detached();
        row.set_id(id);
        state.rows.insert(id, row.clone());
        debug!(entity = E::descriptor().name, %id, "Inserted row");
        Ok(state.resolve(row))
    }

    async fn replace(&self, entity: &E) -> AccessResult<Option<E>> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&entity.id()) {
            return Ok(None);
        }
        state.check_reference(entity)?;

        let row = entity.clone().detached();
        state.rows.insert(row.id(), row.clone());
        Ok(Some(state.resolve(row)))
    }

    async fn find(&self, id: EntityId, include_relation: bool) -> AccessResult<Option<E>> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).map(|row| state.render(row, include_relation)))
    }

    async fn delete(&self, id: EntityId) -> AccessResult<u64> {
        let removed = self.state.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
        include_relation: bool,
    ) -> AccessResult<(Vec<E>, u64)> {
        let state = self.state.read().await;
        let orders = descriptor.effective_sort();

        let mut keyed: Vec<((EntityId, Vec<ColumnValue>), &E)> = state
            .rows
            .values()
            .map(|row| ((row.id(), row.column_values()), row))
            .collect();
        keyed.sort_by(|(left, _), (right, _)| compare(&orders, left, right));

        let total = keyed.len() as u64;
        let offset = usize::try_from(descriptor.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(descriptor.limit()).unwrap_or(usize::MAX);
        let content = keyed
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, row)| state.render(row, include_relation))
            .collect();

        Ok((content, total))
    }
}
