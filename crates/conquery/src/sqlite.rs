//! rusqlite-backed [`Connection`].

use crate::client::{Connection, ExecResult};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{ToSql, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// A single SQLite connection behind a mutex.
///
/// Statements run synchronously inside the returned future; each call
/// prepares, steps and finalizes its own statement.
///
/// The rusqlite call and the mutex wait both block the executor thread that
/// polls the future, and concurrent callers are serialized. This suits tests
/// and small embedded databases; under a multi-threaded runtime with slow
/// statements, wrap calls in `tokio::task::spawn_blocking` or use a pool.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteConnection {
    pub fn open_in_memory() -> OrmResult<Self> {
        Ok(Self::from_connection(rusqlite::Connection::open_in_memory()?))
    }

    pub fn open(path: impl AsRef<Path>) -> OrmResult<Self> {
        Ok(Self::from_connection(rusqlite::Connection::open(path)?))
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run several `;`-separated statements without arguments (schema setup).
    pub fn execute_batch(&self, sql: &str) -> OrmResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn lock(&self) -> OrmResult<MutexGuard<'_, rusqlite::Connection>> {
        self.conn
            .lock()
            .map_err(|_| OrmError::connection("sqlite connection mutex poisoned"))
    }

    fn query_sync(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut rows = stmt.query(params_from_iter(args.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(from_value_ref(row.get_ref(idx)?));
            }
            out.push(Row::new(Arc::clone(&columns), values));
        }
        Ok(out)
    }

    fn execute_sync(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        let conn = self.lock()?;
        let rows_affected = conn.execute(sql, params_from_iter(args.iter()))?;
        let last_insert_id = is_insert(sql).then(|| conn.last_insert_rowid());
        Ok(ExecResult {
            rows_affected: rows_affected as u64,
            last_insert_id,
        })
    }
}

impl Connection for SqliteConnection {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        async move { self.query_sync(sql, args) }
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        async move { self.execute_sync(sql, args) }
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("insert"))
}

fn from_value_ref(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
            Value::Int(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_values_and_reports_insert_ids() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, a TEXT, b REAL, c BLOB, d INTEGER)")
            .unwrap();

        let res = conn
            .execute(
                "INSERT INTO t (a, b, c, d) VALUES (?, ?, ?, ?)",
                &[
                    Value::from("x"),
                    Value::Float(1.5),
                    Value::Blob(vec![1, 2]),
                    Value::Bool(true),
                ],
            )
            .await
            .unwrap();
        assert_eq!(res, ExecResult { rows_affected: 1, last_insert_id: Some(1) });

        let rows = conn.query("SELECT id, a, b, c, d FROM t", &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns(), ["id", "a", "b", "c", "d"]);
        assert_eq!(
            rows[0].values(),
            [
                Value::Int(1),
                Value::from("x"),
                Value::Float(1.5),
                Value::Blob(vec![1, 2]),
                Value::Int(1)
            ]
        );

        let res = conn
            .execute("UPDATE t SET a = ? WHERE id = ?", &[Value::Null, Value::Int(1)])
            .await
            .unwrap();
        assert_eq!(res.last_insert_id, None);
    }

    #[tokio::test]
    async fn driver_errors_surface_as_connection_errors() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        let err = conn.query("SELECT * FROM missing", &[]).await.unwrap_err();
        assert!(err.is_connection(), "{err}");
    }

    #[test]
    fn insert_detection() {
        assert!(is_insert("  insert into t values (1)"));
        assert!(!is_insert("UPDATE t SET a = 1"));
        assert!(!is_insert("ins"));
    }
}
