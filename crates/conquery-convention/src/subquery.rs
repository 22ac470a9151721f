//! Correlated subquery rendering.
//!
//! A subquery field compares a column against a nested `SELECT` whose WHERE
//! clause is compiled from another query object. How the nested query relates
//! to the outer row is configured explicitly on the field rather than inferred.

use crate::operator::Operator;
use crate::registry::FieldConvention;

/// Subquery configuration attached to a query-object field.
///
/// ```ignore
/// #[orm(subquery(select = "avg(score)", from = "t_user"))]
/// score_gt_avg: Option<Box<UserQuery>>,
/// // score > (SELECT avg(score) FROM t_user WHERE ...)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubquerySpec {
    /// Selected expression of the nested query.
    pub select: &'static str,
    /// Source table of the nested query.
    pub from: &'static str,
    /// Optional join predicate placed first in the nested WHERE clause.
    pub correlate: Option<&'static str>,
}

impl SubquerySpec {
    pub const fn new(select: &'static str, from: &'static str) -> Self {
        Self {
            select,
            from,
            correlate: None,
        }
    }

    pub const fn correlate(mut self, on: &'static str) -> Self {
        self.correlate = Some(on);
        self
    }

    /// Condition text up to (not including) the nested WHERE clause.
    pub fn head(&self, conv: &FieldConvention) -> String {
        subquery_head(conv, self.select, self.from)
    }
}

/// Condition text preceding the nested WHERE clause.
///
/// - scalar operators: `score > (SELECT avg(score) FROM t_user`
/// - `In` / `NotIn`: `id IN (SELECT user_id FROM t_order`
/// - `NotNull`: `EXISTS (SELECT 1 FROM t_order`
/// - `Null`: `NOT EXISTS (SELECT 1 FROM t_order`
///
/// The caller closes the parenthesis after appending the nested WHERE clause.
pub fn subquery_head(conv: &FieldConvention, select: &str, from: &str) -> String {
    match conv.operator {
        Operator::NotNull => format!("EXISTS (SELECT {select} FROM {from}"),
        Operator::Null => format!("NOT EXISTS (SELECT {select} FROM {from}"),
        _ => format!("{} (SELECT {select} FROM {from}", conv.head()),
    }
}
