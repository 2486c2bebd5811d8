//! Infrastructure Database Layer
//!
//! This crate provides the store adapters behind the access layer's
//! [`core_kernel::EntityStore`] port:
//!
//! - [`PgEntityStore`] runs on PostgreSQL through SQLx, generating every
//!   statement from the entity's descriptor
//! - [`InMemoryEntityStore`] keeps rows in process memory with the same
//!   observable behaviour, for tests and local runs
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use core_kernel::EntityRepository;
//! use domain_region::Region;
//! use infra_db::{create_pool, DatabaseConfig, PgEntityStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/regions")).await?;
//! let repository = EntityRepository::<Region>::new(Arc::new(PgEntityStore::new(pool)));
//! ```

pub mod pool;
pub mod error;
pub mod sql;
pub mod mapping;
pub mod stores;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, DatabaseConfig};
pub use error::DatabaseError;
pub use mapping::PgMapped;
pub use stores::{InMemoryEntityStore, PgEntityStore};
