//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::EntityId;
use domain_region::{Region, UserRef};
use serde_json::{json, Value};

use crate::fixtures::StringFixtures;

/// Builder for constructing test regions
pub struct RegionBuilder {
    id: EntityId,
    region_name: Option<String>,
    user: Option<UserRef>,
}

impl Default for RegionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionBuilder {
    /// Creates a new unsaved region with the default name and no user
    pub fn new() -> Self {
        Self {
            id: EntityId::UNSET,
            region_name: Some(StringFixtures::default_region_name().to_string()),
            user: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = EntityId::new(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.region_name = Some(name.into());
        self
    }

    /// Leaves the name NULL
    pub fn without_name(mut self) -> Self {
        self.region_name = None;
        self
    }

    /// Links the region to a user by id only
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user = Some(UserRef::new(user_id));
        self
    }

    pub fn build(self) -> Region {
        Region {
            id: self.id,
            region_name: self.region_name,
            user: self.user,
        }
    }

    /// JSON request body for the region
    pub fn build_json(self) -> Value {
        let region = self.build();
        let mut body = json!({ "regionName": region.region_name });
        if region.id.is_set() {
            body["id"] = json!(region.id.value());
        }
        if let Some(user) = region.user {
            body["user"] = json!({ "id": user.id.as_str() });
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let region = RegionBuilder::new().build();
        assert!(!region.id.is_set());
        assert_eq!(region.region_name.as_deref(), Some("AAAAAAAAAA"));
        assert!(region.user.is_none());
    }

    #[test]
    fn test_build_json() {
        let body = RegionBuilder::new().with_id(7).with_user_id("user-1").build_json();
        assert_eq!(
            body,
            json!({ "id": 7, "regionName": "AAAAAAAAAA", "user": { "id": "user-1" } })
        );
    }
}
