//! User references
//!
//! Users are managed by the identity system; regions only point at them.

use core_kernel::{ColumnValue, Related};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user account (string keyed, as issued by the identity store)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A user as seen from a region
///
/// Only `id` matters when writing; `login` is filled in when the relation is
/// resolved on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            login: None,
        }
    }

    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }
}

impl Related for UserRef {
    fn key(&self) -> ColumnValue {
        ColumnValue::Text(Some(self.id.as_str().to_string()))
    }

    fn from_key(key: ColumnValue) -> Option<Self> {
        match key {
            ColumnValue::Text(Some(id)) => Some(UserRef::new(id)),
            _ => None,
        }
    }
}
