//! Entity store adapters

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEntityStore;
pub use postgres::PgEntityStore;
