//! Store port
//!
//! The repository and pager talk to the durable store only through
//! [`EntityStore`]. Each method is a single request/response unit; the
//! adapter provides per-operation atomicity and nothing more.
//!
//! ```text
//!   EntityRepository / Pager
//!              │
//!              ▼
//!      EntityStore<E> (port)
//!        ▲            ▲
//!        │            │
//!  PgEntityStore  InMemoryEntityStore
//! ```

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::AccessResult;
use crate::identifiers::EntityId;
use crate::paging::PageDescriptor;

/// Connectivity check for a store
#[async_trait]
pub trait StoreProbe: Send + Sync + 'static {
    /// Succeeds when the store answers a trivial request
    async fn ping(&self) -> AccessResult<()>;
}

/// Persistence operations for one entity type
///
/// Entities handed to `insert` and `replace` are already detached: their
/// relation carries the foreign key only. Returned entities have the
/// relation resolved when `include_relation` is requested (always for
/// `insert` and `replace`).
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// Inserts a row and returns it with its store-assigned identity
    async fn insert(&self, entity: &E) -> AccessResult<E>;

    /// Overwrites every scalar and foreign-key column of the row with the
    /// entity's identity; `None` when no such row exists
    async fn replace(&self, entity: &E) -> AccessResult<Option<E>>;

    async fn find(&self, id: EntityId, include_relation: bool) -> AccessResult<Option<E>>;

    /// Removes the row, returning the number of rows deleted
    async fn delete(&self, id: EntityId) -> AccessResult<u64>;

    /// Returns the requested slice and the total row count
    async fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
        include_relation: bool,
    ) -> AccessResult<(Vec<E>, u64)>;
}
