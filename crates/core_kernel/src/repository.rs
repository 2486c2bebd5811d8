//! Generic entity repository
//!
//! One repository type serves every entity that implements [`Entity`]. It
//! enforces the identity preconditions of each operation and hands detached
//! entities to the store:
//!
//! - **insert** requires an unset identity and never cascades into the
//!   related entity; only its key is written.
//! - **update** requires an identity and replaces the whole record, so an
//!   empty relation always clears the foreign key.
//! - **get** resolves the relation in the same round trip.
//! - **delete** is idempotent.

use std::sync::Arc;

use tracing::debug;

use crate::entity::Entity;
use crate::error::{AccessError, AccessResult};
use crate::identifiers::EntityId;
use crate::pager::Pager;
use crate::ports::EntityStore;

/// CRUD access to one entity type
pub struct EntityRepository<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
}

impl<E: Entity> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store }
    }

    /// A pager over the same store
    pub fn pager(&self) -> Pager<E> {
        Pager::new(Arc::clone(&self.store))
    }

    /// Inserts a new entity
    ///
    /// # Errors
    ///
    /// * `AlreadyExists` - the entity already carries an identity
    /// * `UnknownReference` - the related entity does not exist
    pub async fn insert(&self, entity: E) -> AccessResult<E> {
        let descriptor = E::descriptor();
        if entity.id().is_set() {
            return Err(AccessError::AlreadyExists {
                entity: descriptor.name,
                id: entity.id(),
            });
        }

        let detached = entity.detached();
        let persisted = self.store.insert(&detached).await?;
        debug!(entity = descriptor.name, id = %persisted.id(), "Inserted entity");
        Ok(persisted)
    }

    /// Replaces a stored entity, writing the relation even when it is empty
    ///
    /// # Errors
    ///
    /// * `MissingIdentity` - the entity has no identity
    /// * `NotFound` - no row has the entity's identity
    /// * `UnknownReference` - the related entity does not exist
    pub async fn update(&self, entity: E) -> AccessResult<E> {
        let descriptor = E::descriptor();
        let id = entity.id();
        if !id.is_set() {
            return Err(AccessError::MissingIdentity {
                entity: descriptor.name,
            });
        }

        let detached = entity.detached();
        let persisted = self
            .store
            .replace(&detached)
            .await?
            .ok_or(AccessError::NotFound {
                entity: descriptor.name,
                id,
            })?;
        debug!(entity = descriptor.name, %id, "Updated entity");
        Ok(persisted)
    }

    /// Loads an entity with its relation resolved
    pub async fn get(&self, id: EntityId) -> AccessResult<E> {
        self.store
            .find(id, true)
            .await?
            .ok_or(AccessError::NotFound {
                entity: E::descriptor().name,
                id,
            })
    }

    /// Deletes by identity; deleting an absent identity succeeds
    pub async fn delete(&self, id: EntityId) -> AccessResult<()> {
        let removed = self.store.delete(id).await?;
        if removed == 0 {
            debug!(entity = E::descriptor().name, %id, "Delete of absent entity ignored");
        }
        Ok(())
    }
}
