//! Request handlers

pub mod entity;
pub mod health;

pub use entity::{entity_routes, ApiEntity, EntityState};
