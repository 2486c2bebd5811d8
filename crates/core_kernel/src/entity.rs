//! Entity descriptors
//!
//! The access layer is written once and driven by static metadata: an
//! [`EntityDescriptor`] names the table, identity column, scalar columns and
//! the optional single-valued relation of an entity type. Store adapters
//! generate their queries from it and the page parser resolves sort fields
//! against it.
//!
//! ```rust,ignore
//! static REGION: EntityDescriptor = EntityDescriptor {
//!     name: "region",
//!     table: "region",
//!     id_column: "id",
//!     columns: &[ColumnDescriptor::text("regionName", "region_name")],
//!     relation: Some(RelationDescriptor { field: "user", column: "user_id", .. }),
//! };
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::identifiers::EntityId;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    BigInt,
    Text,
}

/// A nullable column value bound into or read out of the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    BigInt(Option<i64>),
    Text(Option<String>),
}

impl ColumnValue {
    /// A typed SQL NULL
    pub fn null(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::BigInt => ColumnValue::BigInt(None),
            ColumnKind::Text => ColumnValue::Text(None),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValue::BigInt(_) => ColumnKind::BigInt,
            ColumnValue::Text(_) => ColumnKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::BigInt(None) | ColumnValue::Text(None))
    }

    /// Ascending order with NULLs sorting after every value, as PostgreSQL
    /// orders them by default
    pub fn cmp_nulls_last(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ColumnValue::BigInt(a), ColumnValue::BigInt(b)) => cmp_option(a, b),
            (ColumnValue::Text(a), ColumnValue::Text(b)) => cmp_option(a, b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            ColumnValue::BigInt(_) => 0,
            ColumnValue::Text(_) => 1,
        }
    }
}

fn cmp_option<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::BigInt(Some(v)) => write!(f, "{}", v),
            ColumnValue::Text(Some(v)) => f.write_str(v),
            _ => f.write_str("null"),
        }
    }
}

/// A scalar column and the API field it is exposed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub field: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub const fn text(field: &'static str, column: &'static str) -> Self {
        Self { field, column, kind: ColumnKind::Text }
    }

    pub const fn bigint(field: &'static str, column: &'static str) -> Self {
        Self { field, column, kind: ColumnKind::BigInt }
    }

    /// True when `name` is either the API field name or the column name
    pub fn answers_to(&self, name: &str) -> bool {
        self.field.eq_ignore_ascii_case(name) || self.column.eq_ignore_ascii_case(name)
    }
}

/// An optional to-one reference stored as a nullable foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    /// API field holding the related object
    pub field: &'static str,
    /// Foreign-key column on the owning table
    pub column: &'static str,
    pub related_table: &'static str,
    pub related_key: &'static str,
    pub key_kind: ColumnKind,
    /// Columns of the related table resolved eagerly on reads
    pub related_columns: &'static [ColumnDescriptor],
}

/// Static description of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Lower-case entity name used in alerts and error messages
    pub name: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    /// Scalar columns, in the order [`Entity::column_values`] returns them
    pub columns: &'static [ColumnDescriptor],
    pub relation: Option<RelationDescriptor>,
}

/// Sort key resolved against a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Identity,
    /// Index into [`EntityDescriptor::columns`]
    Column(usize),
}

impl EntityDescriptor {
    /// Resolves a sortable field by API or column name
    pub fn sort_key(&self, name: &str) -> Option<SortKey> {
        if name.eq_ignore_ascii_case("id") || name.eq_ignore_ascii_case(self.id_column) {
            return Some(SortKey::Identity);
        }
        self.columns
            .iter()
            .position(|c| c.answers_to(name))
            .map(SortKey::Column)
    }

    /// Column name backing a sort key
    pub fn column_for(&self, key: SortKey) -> &'static str {
        match key {
            SortKey::Identity => self.id_column,
            SortKey::Column(index) => self.columns[index].column,
        }
    }

    /// API field name backing a sort key
    pub fn field_for(&self, key: SortKey) -> &'static str {
        match key {
            SortKey::Identity => "id",
            SortKey::Column(index) => self.columns[index].field,
        }
    }
}

/// Reference type held by an entity's single-valued relation
pub trait Related: Clone + fmt::Debug + Send + Sync + 'static {
    /// Foreign-key value identifying the related entity
    fn key(&self) -> ColumnValue;

    /// A reference that carries the key and nothing else
    fn from_key(key: ColumnValue) -> Option<Self>;
}

/// An entity type managed by the generic repository
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Related: Related;

    fn descriptor() -> &'static EntityDescriptor;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Scalar values in descriptor column order
    fn column_values(&self) -> Vec<ColumnValue>;

    fn relation(&self) -> Option<&Self::Related>;

    fn set_relation(&mut self, related: Option<Self::Related>);

    /// Foreign-key value to write, a typed NULL when the relation is empty
    fn relation_key(&self) -> Option<ColumnValue> {
        let relation = Self::descriptor().relation?;
        Some(
            self.relation()
                .map(Related::key)
                .unwrap_or_else(|| ColumnValue::null(relation.key_kind)),
        )
    }

    /// Drops everything from the related object except its key
    fn detached(mut self) -> Self {
        let reference = self
            .relation()
            .map(Related::key)
            .and_then(<Self::Related as Related>::from_key);
        self.set_relation(reference);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "widget",
        table: "widget",
        id_column: "id",
        columns: &[
            ColumnDescriptor::text("widgetName", "widget_name"),
            ColumnDescriptor::bigint("weight", "weight"),
        ],
        relation: None,
    };

    #[test]
    fn test_sort_key_resolution() {
        assert_eq!(DESCRIPTOR.sort_key("id"), Some(SortKey::Identity));
        assert_eq!(DESCRIPTOR.sort_key("widgetName"), Some(SortKey::Column(0)));
        assert_eq!(DESCRIPTOR.sort_key("widget_name"), Some(SortKey::Column(0)));
        assert_eq!(DESCRIPTOR.sort_key("WEIGHT"), Some(SortKey::Column(1)));
        assert_eq!(DESCRIPTOR.sort_key("colour"), None);
    }

    #[test]
    fn test_column_and_field_lookup() {
        assert_eq!(DESCRIPTOR.column_for(SortKey::Column(0)), "widget_name");
        assert_eq!(DESCRIPTOR.field_for(SortKey::Column(0)), "widgetName");
        assert_eq!(DESCRIPTOR.column_for(SortKey::Identity), "id");
    }

    #[test]
    fn test_nulls_sort_last() {
        let some = ColumnValue::Text(Some("a".to_string()));
        let none = ColumnValue::Text(None);
        assert_eq!(some.cmp_nulls_last(&none), Ordering::Less);
        assert_eq!(none.cmp_nulls_last(&some), Ordering::Greater);
        assert_eq!(none.cmp_nulls_last(&none), Ordering::Equal);
        assert_eq!(
            ColumnValue::BigInt(Some(2)).cmp_nulls_last(&ColumnValue::BigInt(Some(10))),
            Ordering::Less
        );
    }

    #[test]
    fn test_typed_null() {
        assert_eq!(ColumnValue::null(ColumnKind::Text), ColumnValue::Text(None));
        assert!(ColumnValue::null(ColumnKind::BigInt).is_null());
        assert!(!ColumnValue::BigInt(Some(0)).is_null());
    }
}
