//! Entity metadata: per-type SQL skeletons built once and cached.

use crate::condition::Conditions;
use crate::error::{OrmError, OrmResult};
use crate::query::PageQuery;
use crate::row::FromRow;
use crate::value::{FromValue, Value};
use conquery_convention::placeholders;

/// Name of the primary key column, always the first column.
pub const ID_COLUMN: &str = "id";

/// A record type mapped to one table row, keyed by its first field `id`.
///
/// Implemented by `#[derive(Entity)]`, which also caches
/// [`metadata`](Entity::metadata) in a per-type `OnceLock`.
pub trait Entity: FromRow + Send + Sync + 'static {
    /// Rust type name.
    const TYPE_NAME: &'static str;
    /// Explicit table name; otherwise derived from [`TYPE_NAME`](Entity::TYPE_NAME).
    const TABLE_NAME: Option<&'static str> = None;
    /// Column names in declaration order, `id` first.
    const COLUMNS: &'static [&'static str];
    /// Field names in declaration order, `id` first.
    const FIELDS: &'static [&'static str];

    fn metadata() -> &'static EntityMetadata;

    /// Primary key value.
    fn id(&self) -> Value;

    /// Write a generated key back into the `id` field.
    fn set_id(&mut self, id: i64) -> OrmResult<()>;

    /// Non-key column values in declaration order.
    fn values(&self) -> Vec<Value>;

    /// Non-key column values; `None` marks a field that was not supplied.
    fn patch_values(&self) -> Vec<Option<Value>>;
}

/// `UserEntity` -> `User`.
pub fn default_table_name(type_name: &str) -> &str {
    match type_name.strip_suffix("Entity") {
        Some(base) if !base.is_empty() => base,
        _ => type_name,
    }
}

/// Decode a generated key into an entity's `id` field type.
pub fn decode_id<T: FromValue>(id: i64) -> OrmResult<T> {
    T::from_value(&Value::Int(id)).map_err(|e| OrmError::decode(ID_COLUMN, e.to_string()))
}

/// Immutable SQL skeletons for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    table: String,
    columns: Vec<String>,
    fields: Vec<String>,
    column_list: String,
    placeholder_group: String,
    select_sql: String,
    select_by_id_sql: String,
    count_sql: String,
    insert_sql: String,
    update_sql: String,
    delete_sql: String,
    delete_by_id_sql: String,
}

impl EntityMetadata {
    /// Build the skeletons from an entity's declared layout.
    ///
    /// `columns` and `fields` are parallel and start with `id`; the derive
    /// enforces both at compile time. A pure function of its inputs, so racing
    /// first uses build identical values.
    pub fn build(
        type_name: &str,
        table_name: Option<&str>,
        columns: &[&str],
        fields: &[&str],
    ) -> Self {
        debug_assert_eq!(columns.first(), Some(&ID_COLUMN));
        debug_assert!(columns.len() > 1, "entity needs a column besides id");
        debug_assert_eq!(columns.len(), fields.len());

        let table = table_name
            .unwrap_or_else(|| default_table_name(type_name))
            .to_string();
        let non_key = columns.get(1..).unwrap_or_default();
        let column_list = columns.join(", ");
        let placeholder_group = format!("({})", placeholders(non_key.len()));
        let set_list: Vec<String> = non_key.iter().map(|c| format!("{c} = ?")).collect();

        let meta = Self {
            select_sql: format!("SELECT {column_list} FROM {table}"),
            select_by_id_sql: format!("SELECT {column_list} FROM {table} WHERE {ID_COLUMN} = ?"),
            count_sql: format!("SELECT count(0) FROM {table}"),
            insert_sql: format!(
                "INSERT INTO {table} ({}) VALUES {placeholder_group}",
                non_key.join(", ")
            ),
            update_sql: format!(
                "UPDATE {table} SET {} WHERE {ID_COLUMN} = ?",
                set_list.join(", ")
            ),
            delete_sql: format!("DELETE FROM {table}"),
            delete_by_id_sql: format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?"),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            column_list,
            placeholder_group,
            table,
        };
        tracing::debug!(
            target: "conquery.sql",
            entity = type_name,
            table = %meta.table,
            insert = %meta.insert_sql,
            update = %meta.update_sql,
            select = %meta.select_sql,
            "built entity metadata"
        );
        meta
    }

    /// Build from an [`Entity`] implementation's constants.
    pub fn of<E: Entity>() -> Self {
        Self::build(E::TYPE_NAME, E::TABLE_NAME, E::COLUMNS, E::FIELDS)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// All columns, `id` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn non_key_columns(&self) -> &[String] {
        self.columns.get(1..).unwrap_or_default()
    }

    pub fn non_key_fields(&self) -> &[String] {
        self.fields.get(1..).unwrap_or_default()
    }

    pub fn column_list(&self) -> &str {
        &self.column_list
    }

    pub fn select_sql(&self) -> &str {
        &self.select_sql
    }

    pub fn select_by_id_sql(&self) -> &str {
        &self.select_by_id_sql
    }

    pub fn update_sql(&self) -> &str {
        &self.update_sql
    }

    pub fn delete_by_id_sql(&self) -> &str {
        &self.delete_by_id_sql
    }

    /// INSERT for `rows` entities: the single-row template widened with one
    /// placeholder group per extra row.
    pub fn insert_sql(&self, rows: usize) -> String {
        let mut sql = self.insert_sql.clone();
        for _ in 1..rows {
            sql.push_str(", ");
            sql.push_str(&self.placeholder_group);
        }
        sql
    }

    /// SELECT with WHERE clause, ordering and paging.
    pub fn build_select(&self, conditions: &Conditions, page: &PageQuery) -> OrmResult<String> {
        let mut sql = self.select_sql.clone();
        sql.push_str(&conditions.where_clause());
        sql.push_str(&page.to_sql()?);
        Ok(sql)
    }

    /// COUNT with WHERE clause only.
    pub fn build_count(&self, conditions: &Conditions) -> String {
        format!("{}{}", self.count_sql, conditions.where_clause())
    }

    pub fn build_delete(&self, conditions: &Conditions) -> String {
        format!("{}{}", self.delete_sql, conditions.where_clause())
    }

    /// `UPDATE t SET a = ?, ...` over the supplied columns only, with their
    /// arguments. The caller appends the filter.
    pub fn build_patch(&self, values: Vec<Option<Value>>) -> OrmResult<(String, Vec<Value>)> {
        let mut sets = Vec::new();
        let mut args = Vec::new();
        for (column, value) in self.non_key_columns().iter().zip(values) {
            if let Some(value) = value {
                sets.push(format!("{column} = ?"));
                args.push(value);
            }
        }
        if sets.is_empty() {
            return Err(OrmError::validation(format!(
                "patch on {} has no supplied fields",
                self.table
            )));
        }
        Ok((format!("UPDATE {} SET {}", self.table, sets.join(", ")), args))
    }
}
