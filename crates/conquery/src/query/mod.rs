//! Query objects: structs whose fields are filter predicates.
//!
//! A query object describes itself as an ordered list of [`Field`]
//! descriptors. The reflective [`WhereCompiler`] walks those descriptors and
//! resolves each name through the operator convention at call time; the
//! generated `static_conditions` routine produces the same output with every
//! branch unrolled.
//!
//! # Example
//!
//! ```ignore
//! use conquery::{PageQuery, QueryObject};
//!
//! #[derive(QueryObject, Default)]
//! pub struct UserQuery {
//!     pub page: PageQuery,
//!     pub id_in: Option<Vec<i64>>,
//!     pub score_lt: Option<i32>,
//!     pub memo_null: bool,
//!     pub memo_like: Option<String>,
//! }
//!
//! let q = UserQuery { score_lt: Some(80), ..Default::default() };
//! let (clause, args) = conquery::build_where_clause(&q);
//! assert_eq!(clause, " WHERE score < ?");
//! ```

mod compiler;
mod page;

pub use compiler::{WhereCompiler, build_where_clause};
pub use page::{PageQuery, SortDirection, SortKey};

use crate::condition::Conditions;
use crate::value::Value;
use conquery_convention::SubquerySpec;

/// A struct whose fields are filter predicates.
///
/// Implemented by `#[derive(QueryObject)]`. The trait is object safe so OR
/// groups and subqueries can hold any nested query type.
pub trait QueryObject {
    /// Field descriptors in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Pagination and ordering request.
    fn page_query(&self) -> PageQuery {
        PageQuery::default()
    }

    /// Compile this object's conditions.
    ///
    /// The default walks [`fields`](QueryObject::fields) reflectively; the
    /// derive overrides it with the generated `static_conditions` routine.
    fn build_conditions(&self) -> Conditions {
        WhereCompiler::default().compile(self)
    }
}

impl<T: QueryObject + ?Sized> QueryObject for &T {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn page_query(&self) -> PageQuery {
        (**self).page_query()
    }

    fn build_conditions(&self) -> Conditions {
        (**self).build_conditions()
    }
}

impl<T: QueryObject + ?Sized> QueryObject for Box<T> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn page_query(&self) -> PageQuery {
        (**self).page_query()
    }

    fn build_conditions(&self) -> Conditions {
        (**self).build_conditions()
    }
}

/// Matches every row; useful for `count`/`delete_by_query` over a whole table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl QueryObject for NoFilter {
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }
}

/// One predicate field of a query object.
#[derive(Clone)]
pub struct Field<'a> {
    /// Declared field name; its suffix selects the operator.
    pub name: &'static str,
    /// Explicit column tag, replacing the column derived from `name`.
    pub column: Option<&'static str>,
    pub value: FieldValue<'a>,
}

/// Runtime value of a predicate field. `None`, `false` and empty lists are
/// "not applied".
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// `bool` / `Option<bool>` trigger.
    Flag(bool),
    /// Single optional value.
    Scalar(Option<Value>),
    /// Optional collection; each element binds one placeholder.
    List(Option<Vec<Value>>),
    /// Nested OR subgroup.
    Or(Option<&'a dyn QueryObject>),
    /// Nested subquery filtered by another query object.
    Subquery(SubquerySpec, Option<&'a dyn QueryObject>),
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            FieldValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            FieldValue::List(v) => f.debug_tuple("List").field(v).finish(),
            FieldValue::Or(g) => f.debug_tuple("Or").field(&g.is_some()).finish(),
            FieldValue::Subquery(spec, q) => f
                .debug_tuple("Subquery")
                .field(spec)
                .field(&q.is_some())
                .finish(),
        }
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("value", &self.value)
            .finish()
    }
}

impl<'a> Field<'a> {
    pub fn flag(name: &'static str, on: bool) -> Self {
        Self::new(name, FieldValue::Flag(on))
    }

    pub fn scalar(name: &'static str, value: Option<Value>) -> Self {
        Self::new(name, FieldValue::Scalar(value))
    }

    pub fn list(name: &'static str, values: Option<Vec<Value>>) -> Self {
        Self::new(name, FieldValue::List(values))
    }

    pub fn or_group(name: &'static str, group: Option<&'a dyn QueryObject>) -> Self {
        Self::new(name, FieldValue::Or(group))
    }

    pub fn subquery(
        name: &'static str,
        spec: SubquerySpec,
        inner: Option<&'a dyn QueryObject>,
    ) -> Self {
        Self::new(name, FieldValue::Subquery(spec, inner))
    }

    fn new(name: &'static str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            column: None,
            value,
        }
    }

    /// Override the column derived from the field name.
    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }
}
