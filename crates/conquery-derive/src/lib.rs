//! Derive macros for conquery
//!
//! Provides `#[derive(QueryObject)]`, `#[derive(Entity)]` and `#[derive(FromRow)]`.

use conquery_codegen::{Generator, expand_query_object};
use conquery_convention::OperatorRegistry;
use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;
mod from_row;

/// Derive `QueryObject` for a struct of filter fields.
///
/// # Example
///
/// ```ignore
/// use conquery::{PageQuery, QueryObject};
///
/// #[derive(Default, QueryObject)]
/// pub struct UserQuery {
///     pub page: PageQuery,
///     pub id_in: Option<Vec<i64>>,
///     pub score_lt: Option<i32>,
///     pub memo_null: bool,
///     pub account_or: Option<AccountOr>,
///     #[orm(subquery(select = "avg(score)", from = "t_user"))]
///     pub score_gt_avg: Option<Box<UserQuery>>,
/// }
/// ```
///
/// # Generated
///
/// - `QueryObject::fields()` descriptors for the reflective compiler
/// - `QueryObject::page_query()` when a `PageQuery` field exists
/// - `fn static_conditions(&self) -> Conditions`, a fully unrolled equivalent
///   of the reflective compiler, used by `build_conditions`
///
/// # Attributes
///
/// - `#[orm(external)]` - `static_conditions` comes from a `conquery gen` file
/// - `#[orm(reflective)]` - keep the reflective compiler for `build_conditions`
/// - `#[orm(column = "name")]` - Replace the column derived from the field name
/// - `#[orm(or)]` - Treat a nested query field as an OR group (implied by `_or`)
/// - `#[orm(subquery(select = "..", from = "..", correlate = ".."))]` - Nested query
/// - `#[orm(page)]` - Pagination field (implied by type `PageQuery`)
/// - `#[orm(skip)]` - Not a filter
#[proc_macro_derive(QueryObject, attributes(orm))]
pub fn derive_query_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_query_object(&input, &Generator::new(&OperatorRegistry::SQL))
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Entity` for a record type whose first field is `id`.
///
/// # Example
///
/// ```ignore
/// use conquery::{Entity, FromRow};
///
/// #[derive(Entity, FromRow)]
/// struct UserEntity {
///     id: i64,
///     score: Option<i32>,
///     memo: Option<String>,
/// }
/// // table "User"
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: type name without `Entity`)
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` for a struct, decoding fields positionally in
/// declaration order.
///
/// # Example
///
/// ```ignore
/// use conquery::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     email: Option<String>,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
