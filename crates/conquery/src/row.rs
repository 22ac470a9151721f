//! Row mapping traits and utilities

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// One result row, with values in the order the statement selected them.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    fn column_name(&self, idx: usize) -> String {
        self.columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("#{idx}"))
    }

    /// Decode the value at position `idx`.
    pub fn try_get<T: FromValue>(&self, idx: usize) -> OrmResult<T> {
        let value = self.values.get(idx).ok_or_else(|| {
            OrmError::decode(
                self.column_name(idx),
                format!("row has {} columns", self.values.len()),
            )
        })?;
        T::from_value(value).map_err(|e| OrmError::decode(self.column_name(idx), e.to_string()))
    }

    /// Decode the value of the column called `name`.
    pub fn try_get_column<T: FromValue>(&self, name: &str) -> OrmResult<T> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| OrmError::decode(name, "no such column"))?;
        self.try_get(idx)
    }
}

/// Trait for converting a result row into a Rust type.
///
/// Entities decode positionally: slot `i` of the row holds the entity's
/// `i`-th declared column.
///
/// # Example
///
/// ```ignore
/// use conquery::{FromRow, OrmResult, Row};
///
/// struct User {
///     id: i64,
///     memo: Option<String>,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> OrmResult<Self> {
///         Ok(User {
///             id: row.try_get(0)?,
///             memo: row.try_get(1)?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a result row into Self.
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for i64 {
    fn from_row(row: &Row) -> OrmResult<Self> {
        row.try_get(0)
    }
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        let columns: Arc<[String]> = vec!["id".to_string(), "memo".to_string()].into();
        Row::new(columns, vec![Value::Int(3), Value::Null])
    }

    #[test]
    fn positional_and_named_access() {
        let row = row();
        assert_eq!(row.try_get::<i64>(0).unwrap(), 3);
        assert_eq!(row.try_get::<Option<String>>(1).unwrap(), None);
        assert_eq!(row.try_get_column::<i64>("id").unwrap(), 3);
    }

    #[test]
    fn decode_errors_name_the_column() {
        let row = row();
        let err = row.try_get::<String>(0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Decode error on column 'id': expected text, got integer"
        );
        assert!(matches!(row.try_get::<i64>(5), Err(OrmError::Decode { .. })));
        assert!(matches!(
            row.try_get_column::<i64>("score"),
            Err(OrmError::Decode { .. })
        ));
    }
}
