//! # conquery
//!
//! Convention-driven query compilation: a plain struct whose field names
//! encode filter intent is compiled into parameterized SQL plus a positional
//! argument list.
//!
//! ## Features
//!
//! - **Naming convention**: `score_lt` means `score < ?`, `id_in` means
//!   `id IN (?, ...)`, `memo_null` means `memo IS NULL`
//! - **Two equivalent compilation paths**: a reflective [`WhereCompiler`] and a
//!   generated, fully unrolled `static_conditions` routine
//! - **OR groups and subqueries**: nested query objects become `( .. OR .. )`
//!   groups or correlated `SELECT`s
//! - **Entity CRUD**: [`DataAccess`] composes cached per-entity SQL skeletons
//!   with compiled conditions
//!
//! ```ignore
//! use conquery::prelude::*;
//!
//! #[derive(Debug, Entity, FromRow)]
//! pub struct UserEntity {
//!     pub id: i64,
//!     pub score: Option<i32>,
//!     pub memo: Option<String>,
//! }
//!
//! #[derive(Default, QueryObject)]
//! pub struct UserQuery {
//!     pub page: PageQuery,
//!     pub score_lt: Option<i32>,
//!     pub memo_null: bool,
//! }
//!
//! let conn = SqliteConnection::open_in_memory()?;
//! let dao = DataAccess::<UserEntity>::new();
//! let low = dao
//!     .page(&conn, &UserQuery { score_lt: Some(80), ..Default::default() })
//!     .await?;
//! ```

// Lets the derives' `::conquery::..` paths resolve inside this crate's own tests.
extern crate self as conquery;

pub mod access;
pub mod client;
pub mod condition;
pub mod entity;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod query;
pub mod row;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use access::{DataAccess, PageList};
pub use client::{Connection, ExecResult};
pub use condition::Conditions;
pub use entity::{Entity, EntityMetadata, ID_COLUMN, decode_id, default_table_name};
pub use error::{OrmError, OrmResult};
pub use ident::validate_ident;
pub use query::{
    Field, FieldValue, NoFilter, PageQuery, QueryObject, SortDirection, SortKey, WhereCompiler,
    build_where_clause,
};
pub use row::{FromRow, Row};
pub use value::{FromValue, ToValue, Value, ValueError};

pub use conquery_convention::{
    Arity, FieldConvention, Operator, OperatorEntry, OperatorRegistry, RegistryError,
    SubquerySpec,
};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;

#[cfg(feature = "derive")]
pub use conquery_derive::{Entity, FromRow, QueryObject};
