//! Error kinds produced by the entity-access layer
//!
//! Every failure of the parser, repository or pager is returned as an
//! [`AccessError`]. The boundary translates each [`ErrorKind`] to a fixed
//! HTTP-style status; nothing in this layer retries.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::identifiers::EntityId;

/// Result type for entity-access operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Failures of the entity-access layer
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    #[error("Unknown sort field '{field}' for {entity}")]
    UnknownSortField {
        entity: &'static str,
        field: String,
    },

    #[error("A new {entity} cannot already have an ID ({id})")]
    AlreadyExists {
        entity: &'static str,
        id: EntityId,
    },

    #[error("Invalid id: a {entity} must have an ID to be updated")]
    MissingIdentity {
        entity: &'static str,
    },

    #[error("{entity} with id '{id}' not found")]
    NotFound {
        entity: &'static str,
        id: EntityId,
    },

    #[error("{entity} references a missing {relation}: {message}")]
    UnknownReference {
        entity: &'static str,
        relation: &'static str,
        message: String,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidPage,
    InvalidPageSize,
    UnknownSortField,
    #[serde(rename = "id_exists")]
    AlreadyExists,
    #[serde(rename = "id_null")]
    MissingIdentity,
    NotFound,
    UnknownReference,
    StoreUnavailable,
    #[serde(rename = "store_error")]
    Store,
}

impl ErrorKind {
    /// Fixed HTTP status for this kind
    pub const fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidPage
            | ErrorKind::InvalidPageSize
            | ErrorKind::UnknownSortField
            | ErrorKind::AlreadyExists
            | ErrorKind::MissingIdentity
            | ErrorKind::UnknownReference => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::StoreUnavailable => 503,
            ErrorKind::Store => 500,
        }
    }

    /// Stable snake_case name used in error payloads
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPage => "invalid_page",
            ErrorKind::InvalidPageSize => "invalid_page_size",
            ErrorKind::UnknownSortField => "unknown_sort_field",
            ErrorKind::AlreadyExists => "id_exists",
            ErrorKind::MissingIdentity => "id_null",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnknownReference => "unknown_reference",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Store => "store_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AccessError {
    pub fn invalid_page(message: impl Into<String>) -> Self {
        AccessError::InvalidPage(message.into())
    }

    pub fn invalid_page_size(message: impl Into<String>) -> Self {
        AccessError::InvalidPageSize(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        AccessError::StoreUnavailable(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        AccessError::Store(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::InvalidPage(_) => ErrorKind::InvalidPage,
            AccessError::InvalidPageSize(_) => ErrorKind::InvalidPageSize,
            AccessError::UnknownSortField { .. } => ErrorKind::UnknownSortField,
            AccessError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AccessError::MissingIdentity { .. } => ErrorKind::MissingIdentity,
            AccessError::NotFound { .. } => ErrorKind::NotFound,
            AccessError::UnknownReference { .. } => ErrorKind::UnknownReference,
            AccessError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            AccessError::Store(_) => ErrorKind::Store,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_kind_matches_name() {
        for kind in [
            ErrorKind::InvalidPage,
            ErrorKind::UnknownSortField,
            ErrorKind::AlreadyExists,
            ErrorKind::MissingIdentity,
            ErrorKind::UnknownReference,
            ErrorKind::Store,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_already_exists_message() {
        let error = AccessError::AlreadyExists {
            entity: "region",
            id: EntityId::new(3),
        };
        assert_eq!(error.to_string(), "A new region cannot already have an ID (3)");
        assert_eq!(error.kind().http_status(), 400);
    }
}
