//! # conquery-convention
//!
//! The naming convention shared by the runtime where-clause compiler and the
//! static code generator: a field name's suffix selects a comparison operator,
//! and the remainder is the column.
//!
//! | suffix | operator | SQL |
//! |---|---|---|
//! | *(none)* / `_eq` | `Eq` | `= ?` |
//! | `_ne` | `Ne` | `<> ?` |
//! | `_not` | `Not` | `!= ?` |
//! | `_gt` `_ge` `_lt` `_le` | comparisons | `> ?` ... |
//! | `_like` | `Like` | `LIKE ?` |
//! | `_null` / `_not_null` | `Null` / `NotNull` | `IS NULL` / `IS NOT NULL` |
//! | `_in` / `_not_in` | `In` / `NotIn` | `IN (?, ...)` |
//!
//! Both compilation paths go through the same [`OperatorRegistry`], so a name
//! always resolves to the same fragment no matter which path compiled it.

mod operator;
mod registry;
mod subquery;

pub use operator::{Arity, Operator, placeholders};
pub use registry::{
    FieldConvention, OperatorEntry, OperatorRegistry, RegistryError, list_fragment,
};
pub use subquery::{SubquerySpec, subquery_head};

/// Suffix marking a nested query object as an OR subgroup.
pub const OR_GROUP_SUFFIX: &str = "_or";

/// Whether a field name marks an OR subgroup (`account_or`).
pub fn is_or_group(name: &str) -> bool {
    name.strip_suffix(OR_GROUP_SUFFIX)
        .is_some_and(|base| !base.is_empty())
}
