//! Operation outcomes
//!
//! The assembler turns repository results into [`Outcome`] values that carry
//! everything the boundary needs to answer: the entity or page, an
//! HTTP-style status, the alert for mutating operations and pagination
//! metadata for listings. Errors never escape as `Err`; `NotFound` becomes
//! [`Outcome::Absent`] and every other kind a [`Failure`].

use std::fmt;

use serde::Serialize;

use crate::entity::Entity;
use crate::error::{AccessError, AccessResult, ErrorKind};
use crate::identifiers::EntityId;
use crate::paging::Page;

/// Which mutation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Created,
    Updated,
    Deleted,
}

impl AlertAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Created => "created",
            AlertAction::Updated => "updated",
            AlertAction::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(entity, id, action)` triple emitted after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationAlert {
    pub entity_name: &'static str,
    pub id: EntityId,
    pub action: AlertAction,
}

impl OperationAlert {
    pub fn new(entity_name: &'static str, id: EntityId, action: AlertAction) -> Self {
        Self { entity_name, id, action }
    }

    /// Alert key under an application prefix, e.g. `app.region.created`
    pub fn key(&self, application: &str) -> String {
        format!("{}.{}.{}", application, self.entity_name, self.action)
    }
}

/// Totals describing where a page sits in its result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub page: u64,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> From<&Page<T>> for PaginationMetadata {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page(),
            size: page.size(),
            total_elements: page.total_elements(),
            total_pages: page.total_pages(),
        }
    }
}

/// Structured failure payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(rename = "error")]
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AccessError> for Failure {
    fn from(error: &AccessError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Result of one entity operation, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<E> {
    Created { entity: E, alert: OperationAlert },
    Updated { entity: E, alert: OperationAlert },
    Deleted { alert: OperationAlert },
    Found(E),
    Listed { content: Vec<E>, pagination: PaginationMetadata },
    Absent,
    Failed(Failure),
}

impl<E> Outcome<E> {
    /// HTTP-style status of the outcome
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Created { .. } => 201,
            Outcome::Updated { .. } | Outcome::Deleted { .. } | Outcome::Found(_) | Outcome::Listed { .. } => 200,
            Outcome::Absent => 404,
            Outcome::Failed(failure) => failure.kind.http_status(),
        }
    }

    pub fn alert(&self) -> Option<&OperationAlert> {
        match self {
            Outcome::Created { alert, .. } | Outcome::Updated { alert, .. } | Outcome::Deleted { alert } => Some(alert),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() < 400
    }
}

/// Builds outcomes for entity type `E`
#[derive(Debug)]
pub struct ResponseAssembler<E> {
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E> Clone for ResponseAssembler<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ResponseAssembler<E> {}

impl<E> Default for ResponseAssembler<E> {
    fn default() -> Self {
        Self {
            _entity: std::marker::PhantomData,
        }
    }
}

impl<E: Entity> ResponseAssembler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self, result: AccessResult<E>) -> Outcome<E> {
        match result {
            Ok(entity) => Outcome::Created {
                alert: Self::alert(&entity, AlertAction::Created),
                entity,
            },
            Err(error) => Self::failed(&error),
        }
    }

    pub fn updated(&self, result: AccessResult<E>) -> Outcome<E> {
        match result {
            Ok(entity) => Outcome::Updated {
                alert: Self::alert(&entity, AlertAction::Updated),
                entity,
            },
            Err(error) => Self::failed(&error),
        }
    }

    /// A delete of an absent identity is still a successful delete
    pub fn deleted(&self, id: EntityId, result: AccessResult<()>) -> Outcome<E> {
        match result {
            Ok(()) => Outcome::Deleted {
                alert: OperationAlert::new(E::descriptor().name, id, AlertAction::Deleted),
            },
            Err(error) => Self::failed(&error),
        }
    }

    pub fn found(&self, result: AccessResult<E>) -> Outcome<E> {
        match result {
            Ok(entity) => Outcome::Found(entity),
            Err(error) => Self::failed(&error),
        }
    }

    pub fn listed(&self, result: AccessResult<Page<E>>) -> Outcome<E> {
        match result {
            Ok(page) => {
                let pagination = PaginationMetadata::from(&page);
                Outcome::Listed {
                    content: page.into_content(),
                    pagination,
                }
            }
            Err(error) => Self::failed(&error),
        }
    }

    fn alert(entity: &E, action: AlertAction) -> OperationAlert {
        OperationAlert::new(E::descriptor().name, entity.id(), action)
    }

    fn failed(error: &AccessError) -> Outcome<E> {
        if error.is_not_found() {
            Outcome::Absent
        } else {
            Outcome::Failed(Failure::from(error))
        }
    }
}
