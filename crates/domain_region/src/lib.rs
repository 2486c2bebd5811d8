//! Region Domain
//!
//! A region has a store-assigned identity, an optional name and an optional
//! reference to the user that owns it. The reference is a nullable foreign
//! key: writing a region without a user clears the link.
//!
//! # Examples
//!
//! ```rust
//! use domain_region::{Region, UserRef};
//!
//! let region = Region::new("AAAAAAAAAA").with_user(UserRef::new("user-1"));
//! assert!(!region.id.is_set());
//!
//! // Unsaved regions never compare equal, not even to themselves
//! assert_ne!(region, region.clone());
//! ```

pub mod region;
pub mod user;

pub use region::{Region, REGION_DESCRIPTOR, REGION_NAME_MAX_LENGTH};
pub use user::{UserId, UserRef};
