//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! region scaffold test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for regions and users
//! - `builders`: Builder patterns for test data construction
//! - `database`: Database test helpers and container management
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use generators::*;
