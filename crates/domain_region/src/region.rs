//! The Region entity

use std::fmt;

use core_kernel::{
    ColumnDescriptor, ColumnKind, ColumnValue, Entity, EntityDescriptor, EntityId,
    RelationDescriptor,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::user::UserRef;

/// Maximum length of a region name (column width)
pub const REGION_NAME_MAX_LENGTH: u64 = 255;

static USER_COLUMNS: [ColumnDescriptor; 1] = [ColumnDescriptor::text("login", "login")];

static REGION_COLUMNS: [ColumnDescriptor; 1] = [ColumnDescriptor::text("regionName", "region_name")];

/// Table layout of `region` and its link to `jhi_user`
pub static REGION_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "region",
    table: "region",
    id_column: "id",
    columns: &REGION_COLUMNS,
    relation: Some(RelationDescriptor {
        field: "user",
        column: "user_id",
        related_table: "jhi_user",
        related_key: "id",
        key_kind: ColumnKind::Text,
        related_columns: &USER_COLUMNS,
    }),
};

/// A region, optionally owned by a user
///
/// Two regions are equal only when both have been persisted and carry the
/// same identity; unsaved regions are never equal to anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub region_name: Option<String>,
    /// `null` and absent both mean "no user"
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Region {
    pub fn new(region_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNSET,
            region_name: Some(region_name.into()),
            user: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_set() && other.id.is_set() && self.id == other.id
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region{{ID='{}', RegionName='{}'}}",
            self.id,
            self.region_name.as_deref().unwrap_or("")
        )
    }
}

impl Entity for Region {
    type Related = UserRef;

    fn descriptor() -> &'static EntityDescriptor {
        &REGION_DESCRIPTOR
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn column_values(&self) -> Vec<ColumnValue> {
        vec![ColumnValue::Text(self.region_name.clone())]
    }

    fn relation(&self) -> Option<&UserRef> {
        self.user.as_ref()
    }

    fn set_relation(&mut self, related: Option<UserRef>) {
        self.user = related;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let region = Region::new("AAAAAAAAAA").with_id(1);
        assert_eq!(region.to_string(), "Region{ID='1', RegionName='AAAAAAAAAA'}");
    }

    #[test]
    fn test_column_values_follow_descriptor() {
        let region = Region::new("North");
        assert_eq!(region.column_values().len(), REGION_DESCRIPTOR.columns.len());
        assert_eq!(region.column_values()[0], ColumnValue::Text(Some("North".to_string())));
    }

    #[test]
    fn test_relation_key_is_null_without_user() {
        assert_eq!(Region::new("North").relation_key(), Some(ColumnValue::Text(None)));
    }

    #[test]
    fn test_name_length_validated() {
        assert!(Region::new("A".repeat(REGION_NAME_MAX_LENGTH as usize)).validate().is_ok());
        assert!(Region::new("A".repeat(REGION_NAME_MAX_LENGTH as usize + 1)).validate().is_err());
    }
}
