//! Row mapping
//!
//! Decoding of rows produced by the queries in [`crate::sql`]. The column
//! names follow the entity descriptor; eagerly loaded related columns use
//! [`crate::sql::related_alias`].

use core_kernel::{Entity, EntityId};
use domain_region::{Region, UserRef, REGION_DESCRIPTOR};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::sql::related_alias;

/// An entity that can be decoded from a PostgreSQL row
pub trait PgMapped: Entity {
    /// Builds the entity from a row; related columns are read only when
    /// `include_relation` is set and the foreign key is not NULL
    fn from_row(row: &PgRow, include_relation: bool) -> Result<Self, sqlx::Error>;
}

impl PgMapped for Region {
    fn from_row(row: &PgRow, include_relation: bool) -> Result<Self, sqlx::Error> {
        let descriptor = &REGION_DESCRIPTOR;
        let id: i64 = row.try_get(descriptor.id_column)?;
        let region_name: Option<String> = row.try_get(descriptor.columns[0].column)?;

        let user = match descriptor.relation {
            Some(relation) => {
                let user_id: Option<String> = row.try_get(relation.column)?;
                match user_id {
                    Some(user_id) if include_relation => {
                        let login: Option<String> =
                            row.try_get(related_alias(&relation, &relation.related_columns[0]).as_str())?;
                        let user = UserRef::new(user_id);
                        Some(match login {
                            Some(login) => user.with_login(login),
                            None => user,
                        })
                    }
                    Some(user_id) => Some(UserRef::new(user_id)),
                    None => None,
                }
            }
            None => None,
        };

        Ok(Region {
            id: EntityId::new(id),
            region_name,
            user,
        })
    }
}
