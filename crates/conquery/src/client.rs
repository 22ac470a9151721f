//! Connection abstraction consumed by the data access layer.

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Key generated by an INSERT, when the store reports one.
    pub last_insert_id: Option<i64>,
}

/// A store that runs `?`-placeholder SQL.
///
/// Implementations prepare, run and release the statement (and any row
/// cursor) inside each call; nothing is retained between calls. Pooling and
/// transactions belong to the implementation, not to this crate.
pub trait Connection: Send + Sync {
    /// Run a statement and collect every row.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Run a statement for its effect.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, args)
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql, args)
    }
}
