//! Tests for the region entity

use core_kernel::{Entity, EntityId};
use domain_region::{Region, UserRef, REGION_DESCRIPTOR};

// ============================================================================
// Equality
// ============================================================================

mod equality_tests {
    use super::*;

    #[test]
    fn test_same_identity_is_equal() {
        let region1 = Region::default().with_id(1);
        let region2 = Region::default().with_id(region1.id);
        assert_eq!(region1, region2);
    }

    #[test]
    fn test_different_identity_is_not_equal() {
        let region1 = Region::default().with_id(1);
        let region2 = Region::default().with_id(2);
        assert_ne!(region1, region2);
    }

    #[test]
    fn test_unset_identity_is_never_equal() {
        let unsaved = Region::default();
        let saved = Region::default().with_id(2);
        assert_ne!(unsaved, saved);
        assert_ne!(saved, unsaved);
        assert_ne!(unsaved, Region::default());
    }

    #[test]
    fn test_equality_ignores_attributes() {
        let region1 = Region::new("North").with_id(5);
        let region2 = Region::new("South").with_id(5).with_user(UserRef::new("u"));
        assert_eq!(region1, region2);
    }
}

// ============================================================================
// JSON representation
// ============================================================================

mod serde_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case() {
        let region = Region::new("AAAAAAAAAA")
            .with_id(3)
            .with_user(UserRef::new("user-1").with_login("alice"));

        let value = serde_json::to_value(&region).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "regionName": "AAAAAAAAAA",
                "user": { "id": "user-1", "login": "alice" }
            })
        );
    }

    #[test]
    fn test_missing_id_means_unset() {
        let region: Region = serde_json::from_value(json!({ "regionName": "AAAAAAAAAA" })).unwrap();
        assert_eq!(region.id, EntityId::UNSET);
        assert!(region.user.is_none());
    }

    #[test]
    fn test_null_id_means_unset() {
        let region: Region =
            serde_json::from_value(json!({ "id": null, "regionName": "AAAAAAAAAA" })).unwrap();
        assert_eq!(region.id, EntityId::UNSET);
    }

    #[test]
    fn test_null_and_absent_user_are_the_same() {
        let absent: Region = serde_json::from_value(json!({ "id": 1 })).unwrap();
        let null: Region = serde_json::from_value(json!({ "id": 1, "user": null })).unwrap();
        assert_eq!(absent.relation_key(), null.relation_key());
        assert!(absent.user.is_none() && null.user.is_none());
    }

    #[test]
    fn test_user_with_id_only() {
        let region: Region = serde_json::from_value(json!({ "user": { "id": "user-2" } })).unwrap();
        assert_eq!(region.user, Some(UserRef::new("user-2")));
    }
}

// ============================================================================
// Descriptor
// ============================================================================

mod descriptor_tests {
    use super::*;
    use core_kernel::SortKey;

    #[test]
    fn test_descriptor_layout() {
        assert_eq!(Region::descriptor().name, "region");
        assert_eq!(REGION_DESCRIPTOR.table, "region");

        let relation = REGION_DESCRIPTOR.relation.unwrap();
        assert_eq!(relation.column, "user_id");
        assert_eq!(relation.related_table, "jhi_user");
    }

    #[test]
    fn test_sortable_fields() {
        assert_eq!(REGION_DESCRIPTOR.sort_key("regionName"), Some(SortKey::Column(0)));
        assert_eq!(REGION_DESCRIPTOR.sort_key("id"), Some(SortKey::Identity));
        assert_eq!(REGION_DESCRIPTOR.sort_key("user"), None);
    }

    #[test]
    fn test_detached_keeps_user_key_only() {
        let region = Region::new("North").with_user(UserRef::new("user-1").with_login("alice"));
        let detached = region.detached();
        assert_eq!(detached.user, Some(UserRef::new("user-1")));
        assert_eq!(detached.region_name.as_deref(), Some("North"));
    }
}
