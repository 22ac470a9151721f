//! Convenient imports for typical `conquery` usage.
//!
//! ```ignore
//! use conquery::prelude::*;
//! ```

pub use crate::{
    Conditions, Connection, DataAccess, Entity, FromRow, OrmError, OrmResult, PageList, PageQuery,
    QueryObject, Value, build_where_clause,
};

#[cfg(feature = "sqlite")]
pub use crate::SqliteConnection;
