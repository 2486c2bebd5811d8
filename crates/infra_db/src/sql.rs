//! SQL generation from entity descriptors
//!
//! Every statement is assembled with [`QueryBuilder`] from the static
//! identifiers in an [`EntityDescriptor`]; request data only ever reaches
//! the database as bind parameters. Reads alias the owning table as `e` and
//! the related table as `r`, and related columns come back as
//! `<relation field>__<column>` so they cannot clash with owning columns.
//!
//! Inserts and updates are wrapped in a CTE that joins the written row back
//! to its related entity, so the caller gets the resolved entity from the
//! same statement.

use core_kernel::{ColumnDescriptor, ColumnValue, EntityDescriptor, EntityId, PageDescriptor, RelationDescriptor};
use sqlx::{Postgres, QueryBuilder};

/// Column holding the window count in page queries
pub const TOTAL_COUNT_COLUMN: &str = "total_count";

const ENTITY_ALIAS: &str = "e";
const RELATED_ALIAS: &str = "r";
const WRITTEN_CTE: &str = "written";

/// Result column name of an eagerly loaded related column
pub fn related_alias(relation: &RelationDescriptor, column: &ColumnDescriptor) -> String {
    format!("{}__{}", relation.field, column.column)
}

fn bind_value(builder: &mut QueryBuilder<'static, Postgres>, value: ColumnValue) {
    match value {
        ColumnValue::BigInt(v) => builder.push_bind(v),
        ColumnValue::Text(v) => builder.push_bind(v),
    };
}

fn push_select(builder: &mut QueryBuilder<'static, Postgres>, entity: &EntityDescriptor, include_relation: bool) {
    builder.push(format!("SELECT {}.{}", ENTITY_ALIAS, entity.id_column));
    for column in entity.columns {
        builder.push(format!(", {}.{}", ENTITY_ALIAS, column.column));
    }
    if let Some(relation) = entity.relation {
        builder.push(format!(", {}.{}", ENTITY_ALIAS, relation.column));
        if include_relation {
            for column in relation.related_columns {
                builder.push(format!(
                    ", {}.{} AS {}",
                    RELATED_ALIAS,
                    column.column,
                    related_alias(&relation, column)
                ));
            }
        }
    }
}

fn push_from(builder: &mut QueryBuilder<'static, Postgres>, entity: &EntityDescriptor, source: &str, include_relation: bool) {
    builder.push(format!(" FROM {} {}", source, ENTITY_ALIAS));
    if let (Some(relation), true) = (entity.relation, include_relation) {
        builder.push(format!(
            " LEFT JOIN {} {} ON {}.{} = {}.{}",
            relation.related_table,
            RELATED_ALIAS,
            RELATED_ALIAS,
            relation.related_key,
            ENTITY_ALIAS,
            relation.column
        ));
    }
}

/// Scalar columns followed by the foreign-key column, paired with values
fn written_columns(
    entity: &EntityDescriptor,
    values: Vec<ColumnValue>,
    relation_key: Option<ColumnValue>,
) -> Vec<(&'static str, ColumnValue)> {
    let mut columns: Vec<(&'static str, ColumnValue)> = entity
        .columns
        .iter()
        .map(|c| c.column)
        .zip(values)
        .collect();
    if let (Some(relation), Some(key)) = (entity.relation, relation_key) {
        columns.push((relation.column, key));
    }
    columns
}

/// `SELECT` of one entity by identity
pub fn find_query(entity: &EntityDescriptor, id: EntityId, include_relation: bool) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");
    push_select(&mut builder, entity, include_relation);
    push_from(&mut builder, entity, entity.table, include_relation);
    builder.push(format!(" WHERE {}.{} = ", ENTITY_ALIAS, entity.id_column));
    builder.push_bind(id.value());
    builder
}

/// `INSERT` of every scalar column and the foreign key, returning the
/// resolved row
pub fn insert_query(
    entity: &EntityDescriptor,
    values: Vec<ColumnValue>,
    relation_key: Option<ColumnValue>,
) -> QueryBuilder<'static, Postgres> {
    let columns = written_columns(entity, values, relation_key);
    let mut builder = QueryBuilder::new(format!("WITH {} AS (INSERT INTO {}", WRITTEN_CTE, entity.table));

    if columns.is_empty() {
        builder.push(" DEFAULT VALUES");
    } else {
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        builder.push(format!(" ({}) VALUES (", names.join(", ")));
        for (index, (_, value)) in columns.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            bind_value(&mut builder, value);
        }
        builder.push(")");
    }

    builder.push(" RETURNING *) ");
    push_select(&mut builder, entity, true);
    push_from(&mut builder, entity, WRITTEN_CTE, true);
    builder
}

/// Full-record `UPDATE`: every scalar column and the foreign key are
/// assigned, NULLs included
pub fn update_query(
    entity: &EntityDescriptor,
    id: EntityId,
    values: Vec<ColumnValue>,
    relation_key: Option<ColumnValue>,
) -> QueryBuilder<'static, Postgres> {
    let columns = written_columns(entity, values, relation_key);
    let mut builder = QueryBuilder::new(format!("WITH {} AS (UPDATE {} SET ", WRITTEN_CTE, entity.table));

    if columns.is_empty() {
        builder.push(format!("{0} = {0}", entity.id_column));
    } else {
        for (index, (name, value)) in columns.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            builder.push(format!("{} = ", name));
            bind_value(&mut builder, value);
        }
    }

    builder.push(format!(" WHERE {} = ", entity.id_column));
    builder.push_bind(id.value());
    builder.push(" RETURNING *) ");
    push_select(&mut builder, entity, true);
    push_from(&mut builder, entity, WRITTEN_CTE, true);
    builder
}

pub fn delete_query(entity: &EntityDescriptor, id: EntityId) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {} WHERE {} = ", entity.table, entity.id_column));
    builder.push_bind(id.value());
    builder
}

/// One page in requested order with identity as the final tiebreak, each
/// row carrying the unpaged total as a window count
pub fn page_query(entity: &EntityDescriptor, page: &PageDescriptor, include_relation: bool) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");
    push_select(&mut builder, entity, include_relation);
    builder.push(format!(", COUNT(*) OVER () AS {}", TOTAL_COUNT_COLUMN));
    push_from(&mut builder, entity, entity.table, include_relation);

    let orders: Vec<String> = page
        .effective_sort()
        .iter()
        .map(|order| {
            format!(
                "{}.{} {}",
                ENTITY_ALIAS,
                entity.column_for(order.key),
                order.direction.as_sql()
            )
        })
        .collect();
    builder.push(format!(" ORDER BY {}", orders.join(", ")));

    builder.push(" LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());
    builder
}

/// Total row count, used when a page comes back empty
pub fn count_query(entity: &EntityDescriptor) -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", entity.table))
}
