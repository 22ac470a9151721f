//! Generic CRUD over an [`Entity`] type.

use crate::client::Connection;
use crate::entity::{Entity, EntityMetadata, ID_COLUMN};
use crate::error::{OrmError, OrmResult};
use crate::query::QueryObject;
use crate::value::Value;
use serde::Serialize;
use std::marker::PhantomData;

/// One page of entities plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageList<E> {
    pub list: Vec<E>,
    pub total: i64,
}

/// Data access object for entity type `E`.
///
/// Every operation composes the cached [`EntityMetadata`] templates with a
/// query object's compiled conditions and runs the result on the supplied
/// connection. Errors from the connection are returned unchanged.
///
/// # Example
///
/// ```ignore
/// let dao = DataAccess::<UserEntity>::new();
/// let users = dao.query(&conn, &UserQuery { score_lt: Some(80), ..Default::default() }).await?;
/// ```
pub struct DataAccess<E: Entity> {
    meta: &'static EntityMetadata,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for DataAccess<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for DataAccess<E> {}

impl<E: Entity> Default for DataAccess<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> std::fmt::Debug for DataAccess<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataAccess")
            .field("entity", &E::TYPE_NAME)
            .field("table", &self.meta.table())
            .finish()
    }
}

impl<E: Entity> DataAccess<E> {
    pub fn new() -> Self {
        Self {
            meta: E::metadata(),
            _entity: PhantomData,
        }
    }

    pub fn metadata(&self) -> &'static EntityMetadata {
        self.meta
    }

    async fn fetch<C: Connection + ?Sized>(
        &self,
        conn: &C,
        sql: &str,
        args: &[Value],
    ) -> OrmResult<Vec<E>> {
        log_sql(sql, args);
        let rows = conn.query(sql, args).await?;
        rows.iter().map(E::from_row).collect()
    }

    async fn exec<C: Connection + ?Sized>(
        &self,
        conn: &C,
        sql: &str,
        args: &[Value],
    ) -> OrmResult<u64> {
        log_sql(sql, args);
        Ok(conn.execute(sql, args).await?.rows_affected)
    }

    /// Entity with key `id`; `Ok(None)` when no row matches.
    pub async fn get<C, I>(&self, conn: &C, id: I) -> OrmResult<Option<E>>
    where
        C: Connection + ?Sized,
        I: Into<Value>,
    {
        let args = [id.into()];
        let rows = self.fetch(conn, self.meta.select_by_id_sql(), &args).await?;
        Ok(rows.into_iter().next())
    }

    /// Entities matching `query`, ordered and paged per its [`PageQuery`](crate::PageQuery).
    pub async fn query<C, Q>(&self, conn: &C, query: &Q) -> OrmResult<Vec<E>>
    where
        C: Connection + ?Sized,
        Q: QueryObject + ?Sized,
    {
        let conditions = query.build_conditions();
        let sql = self.meta.build_select(&conditions, &query.page_query())?;
        self.fetch(conn, &sql, conditions.args()).await
    }

    /// Number of rows matching `query`, ignoring paging.
    pub async fn count<C, Q>(&self, conn: &C, query: &Q) -> OrmResult<i64>
    where
        C: Connection + ?Sized,
        Q: QueryObject + ?Sized,
    {
        let conditions = query.build_conditions();
        let sql = self.meta.build_count(&conditions);
        log_sql(&sql, conditions.args());
        let rows = conn.query(&sql, conditions.args()).await?;
        match rows.first() {
            Some(row) => row.try_get(0),
            None => Err(OrmError::Other(format!("count on {} returned no row", self.meta.table()))),
        }
    }

    /// `query` followed by `count`; a failed `query` skips the `count`.
    pub async fn page<C, Q>(&self, conn: &C, query: &Q) -> OrmResult<PageList<E>>
    where
        C: Connection + ?Sized,
        Q: QueryObject + ?Sized,
    {
        let list = self.query(conn, query).await?;
        let total = self.count(conn, query).await?;
        Ok(PageList { list, total })
    }

    /// Insert `entity` and write the generated key back into it.
    pub async fn create<C: Connection + ?Sized>(&self, conn: &C, entity: &mut E) -> OrmResult<i64> {
        let sql = self.meta.insert_sql(1);
        let args = entity.values();
        log_sql(&sql, &args);
        let res = conn.execute(&sql, &args).await?;
        let id = res
            .last_insert_id
            .ok_or_else(|| OrmError::connection("insert did not report a generated key"))?;
        entity.set_id(id)?;
        Ok(id)
    }

    /// Insert all `entities` with one widened statement. Empty input issues
    /// no statement.
    pub async fn create_multi<C: Connection + ?Sized>(
        &self,
        conn: &C,
        entities: &[E],
    ) -> OrmResult<u64> {
        if entities.is_empty() {
            return Ok(0);
        }
        let sql = self.meta.insert_sql(entities.len());
        let args: Vec<Value> = entities.iter().flat_map(Entity::values).collect();
        self.exec(conn, &sql, &args).await
    }

    /// Overwrite every non-key column of the row keyed by `entity.id()`.
    pub async fn update<C: Connection + ?Sized>(&self, conn: &C, entity: &E) -> OrmResult<u64> {
        let mut args = entity.values();
        args.push(entity.id());
        self.exec(conn, self.meta.update_sql(), &args).await
    }

    /// Update only the supplied (non-`None`) fields of the row keyed by `entity.id()`.
    pub async fn patch<C: Connection + ?Sized>(&self, conn: &C, entity: &E) -> OrmResult<u64> {
        let (mut sql, mut args) = self.meta.build_patch(entity.patch_values())?;
        sql.push_str(&format!(" WHERE {ID_COLUMN} = ?"));
        args.push(entity.id());
        self.exec(conn, &sql, &args).await
    }

    /// Update the supplied fields of every row matching `query`.
    pub async fn patch_by_query<C, Q>(&self, conn: &C, entity: &E, query: &Q) -> OrmResult<u64>
    where
        C: Connection + ?Sized,
        Q: QueryObject + ?Sized,
    {
        let (mut sql, mut args) = self.meta.build_patch(entity.patch_values())?;
        let (clause, where_args) = query.build_conditions().into_where();
        sql.push_str(&clause);
        args.extend(where_args);
        self.exec(conn, &sql, &args).await
    }

    pub async fn delete<C, I>(&self, conn: &C, id: I) -> OrmResult<u64>
    where
        C: Connection + ?Sized,
        I: Into<Value>,
    {
        self.exec(conn, self.meta.delete_by_id_sql(), &[id.into()]).await
    }

    /// Delete every row matching `query`; an empty query deletes all rows.
    pub async fn delete_by_query<C, Q>(&self, conn: &C, query: &Q) -> OrmResult<u64>
    where
        C: Connection + ?Sized,
        Q: QueryObject + ?Sized,
    {
        let conditions = query.build_conditions();
        let sql = self.meta.build_delete(&conditions);
        self.exec(conn, &sql, conditions.args()).await
    }
}

fn log_sql(sql: &str, args: &[Value]) {
    tracing::debug!(
        target: "conquery.sql",
        param_count = args.len(),
        sql = %sql,
        args = ?args,
    );
}
