//! Core Kernel - the generic paginated entity-access layer
//!
//! This crate holds everything that is independent of a particular entity
//! or store:
//! - Identities and error kinds
//! - Entity descriptors driving generic persistence
//! - The page request parser, page descriptors and pages
//! - The store port, the generic repository and the pager
//! - The response assembler producing operation outcomes

pub mod identifiers;
pub mod error;
pub mod entity;
pub mod paging;
pub mod ports;
pub mod repository;
pub mod pager;
pub mod outcome;

pub use identifiers::EntityId;
pub use error::{AccessError, AccessResult, ErrorKind};
pub use entity::{
    ColumnDescriptor, ColumnKind, ColumnValue, Entity, EntityDescriptor, Related,
    RelationDescriptor, SortKey,
};
pub use paging::{
    Page, PageDescriptor, PageRequestParser, SortDirection, SortOrder, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use ports::{EntityStore, StoreProbe};
pub use repository::EntityRepository;
pub use pager::Pager;
pub use outcome::{AlertAction, Failure, OperationAlert, Outcome, PaginationMetadata, ResponseAssembler};
