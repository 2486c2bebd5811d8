//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for regions and users. These fixtures
//! are designed to be consistent and predictable for unit tests.

use domain_region::{Region, UserRef};
use serde_json::{json, Value};

/// Fixture for region names
pub struct StringFixtures;

impl StringFixtures {
    /// Name used when creating a region
    pub fn default_region_name() -> &'static str {
        "AAAAAAAAAA"
    }

    /// Name used when updating a region
    pub fn updated_region_name() -> &'static str {
        "BBBBBBBBBB"
    }
}

/// Fixture for users a region may belong to
pub struct UserFixtures;

impl UserFixtures {
    pub fn alice() -> UserRef {
        UserRef::new("user-1").with_login("alice")
    }

    pub fn bob() -> UserRef {
        UserRef::new("user-2").with_login("bob")
    }

    /// A user id that is never seeded
    pub fn unknown() -> UserRef {
        UserRef::new("user-404")
    }

    /// Every seeded user
    pub fn all() -> Vec<UserRef> {
        vec![Self::alice(), Self::bob()]
    }
}

/// Fixture for regions
pub struct RegionFixtures;

impl RegionFixtures {
    /// An unsaved region with the default name and no user
    pub fn new_region() -> Region {
        Region::new(StringFixtures::default_region_name())
    }

    /// An unsaved region owned by [`UserFixtures::alice`]
    pub fn owned_region() -> Region {
        Self::new_region().with_user(UserRef::new(UserFixtures::alice().id.as_str()))
    }

    /// Request body for creating the default region
    pub fn create_body() -> Value {
        json!({ "regionName": StringFixtures::default_region_name() })
    }

    /// Request body for replacing region `id` with the updated name
    pub fn update_body(id: i64) -> Value {
        json!({ "id": id, "regionName": StringFixtures::updated_region_name() })
    }
}
