//! Paged queries

use std::sync::Arc;

use tracing::debug;

use crate::entity::Entity;
use crate::error::AccessResult;
use crate::paging::{Page, PageDescriptor};
use crate::ports::EntityStore;

/// Runs page descriptors against a store
pub struct Pager<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
}

impl<E: Entity> Clone for Pager<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: Entity> Pager<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store }
    }

    /// Returns one page ordered by the requested sort with identity as the
    /// final tiebreak. A page past the end is empty but keeps its totals.
    pub async fn query(&self, descriptor: &PageDescriptor, include_relation: bool) -> AccessResult<Page<E>> {
        let (content, total) = self.store.fetch_page(descriptor, include_relation).await?;
        debug!(
            entity = E::descriptor().name,
            page = descriptor.page(),
            size = descriptor.size(),
            returned = content.len(),
            total,
            "Fetched page"
        );
        Ok(Page::new(content, descriptor, total))
    }
}
