//! Per-backend operator tables and suffix resolution.

use crate::operator::{Arity, Operator, placeholders};
use thiserror::Error;

/// One row of an operator table: which operator, and how the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEntry {
    pub operator: Operator,
    pub sign: &'static str,
}

impl OperatorEntry {
    pub const fn new(operator: Operator, sign: &'static str) -> Self {
        Self { operator, sign }
    }
}

/// Rejected operator table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("operator table must contain Eq (the fallback operator)")]
    MissingEq,
    #[error("operator {0} appears more than once")]
    Duplicate(Operator),
    #[error("operator {later} is listed after a shorter suffix ({earlier})")]
    NotLongestFirst { earlier: Operator, later: Operator },
}

/// SQL-text backend table, longest suffix first.
const SQL_ENTRIES: [OperatorEntry; 12] = [
    OperatorEntry::new(Operator::NotNull, "IS NOT NULL"),
    OperatorEntry::new(Operator::NotIn, "NOT IN"),
    OperatorEntry::new(Operator::Null, "IS NULL"),
    OperatorEntry::new(Operator::Like, "LIKE"),
    OperatorEntry::new(Operator::Not, "!="),
    OperatorEntry::new(Operator::Eq, "="),
    OperatorEntry::new(Operator::Ne, "<>"),
    OperatorEntry::new(Operator::Gt, ">"),
    OperatorEntry::new(Operator::Ge, ">="),
    OperatorEntry::new(Operator::Lt, "<"),
    OperatorEntry::new(Operator::Le, "<="),
    OperatorEntry::new(Operator::In, "IN"),
];

/// An immutable, explicitly ordered operator table for one backend.
///
/// Entries are tried in order and the first matching suffix wins, so the table
/// is kept longest-suffix-first. That makes resolution a total function:
/// `id_not_in` is always `NotIn`, never `In`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorRegistry {
    entries: &'static [OperatorEntry],
}

impl OperatorRegistry {
    /// The SQL-text backend.
    pub const SQL: OperatorRegistry = OperatorRegistry {
        entries: &SQL_ENTRIES,
    };

    /// Build a registry for another backend.
    pub fn new(entries: &'static [OperatorEntry]) -> Result<Self, RegistryError> {
        if !entries.iter().any(|e| e.operator == Operator::Eq) {
            return Err(RegistryError::MissingEq);
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.operator == entry.operator) {
                return Err(RegistryError::Duplicate(entry.operator));
            }
        }
        for pair in entries.windows(2) {
            if pair[0].operator.suffix().len() < pair[1].operator.suffix().len() {
                return Err(RegistryError::NotLongestFirst {
                    earlier: pair[0].operator,
                    later: pair[1].operator,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &'static [OperatorEntry] {
        self.entries
    }

    /// Backend spelling of `op`, if the backend supports it.
    pub fn sign(&self, op: Operator) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.operator == op)
            .map(|e| e.sign)
    }

    fn eq_sign(&self) -> &'static str {
        self.sign(Operator::Eq).unwrap_or("=")
    }

    fn match_suffix(&self, name: &str) -> Option<FieldConvention> {
        for entry in self.entries {
            let Some(base) = name.strip_suffix(entry.operator.suffix()) else {
                continue;
            };
            if base.is_empty() {
                continue;
            }
            return Some(FieldConvention {
                column: base.to_string(),
                operator: entry.operator,
                sign: entry.sign,
            });
        }
        None
    }

    /// Resolve a field name into its column and operator.
    ///
    /// No matching suffix falls back to `Eq` over the whole name.
    pub fn resolve(&self, name: &str) -> FieldConvention {
        self.match_suffix(name).unwrap_or_else(|| FieldConvention {
            column: name.to_string(),
            operator: Operator::Eq,
            sign: self.eq_sign(),
        })
    }

    /// Resolve with an explicit column tag taking precedence over the derived column.
    pub fn resolve_with(&self, name: &str, column: Option<&str>) -> FieldConvention {
        let mut conv = self.resolve(name);
        if let Some(column) = column {
            conv.column = column.to_string();
        }
        conv
    }

    /// Resolve a subquery field name.
    ///
    /// Subquery fields may carry a qualifier after the operator (`score_gt_avg`),
    /// so when the full name has no suffix the `_`-delimited prefixes are tried
    /// from longest to shortest.
    pub fn resolve_subquery(&self, name: &str, column: Option<&str>) -> FieldConvention {
        let mut end = name.len();
        let mut conv = loop {
            if let Some(conv) = self.match_suffix(&name[..end]) {
                break conv;
            }
            match name[..end].rfind('_') {
                Some(cut) if cut > 0 => end = cut,
                _ => break self.resolve(name),
            }
        };
        if let Some(column) = column {
            conv.column = column.to_string();
        }
        conv
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::SQL
    }
}

/// Column, operator and sign derived from a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConvention {
    pub column: String,
    pub operator: Operator,
    pub sign: &'static str,
}

impl FieldConvention {
    pub fn arity(&self) -> Arity {
        self.operator.arity()
    }

    /// `column sign`, the part of a fragment before any placeholder.
    pub fn head(&self) -> String {
        format!("{} {}", self.column, self.sign)
    }

    /// Fragment for a zero- or one-argument operator: `score < ?`, `memo IS NULL`.
    pub fn fragment(&self) -> String {
        match self.arity() {
            Arity::Zero => self.head(),
            Arity::One | Arity::Many => format!("{} ?", self.head()),
        }
    }

    /// Fragment for a set-membership operator over `n` values: `id IN (?, ?)`.
    pub fn list_fragment(&self, n: usize) -> String {
        list_fragment(&self.head(), n)
    }
}

/// `head (?, ?, ...)` with one placeholder per value.
pub fn list_fragment(head: &str, n: usize) -> String {
    format!("{head} ({})", placeholders(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> (String, Operator) {
        let conv = OperatorRegistry::SQL.resolve(name);
        (conv.column, conv.operator)
    }

    #[test]
    fn sql_table_is_a_valid_registry() {
        let reg = OperatorRegistry::new(&SQL_ENTRIES).unwrap();
        assert_eq!(reg, OperatorRegistry::SQL);
        assert_eq!(reg.entries().len(), Operator::ALL.len());
    }

    #[test]
    fn resolves_every_suffix() {
        assert_eq!(resolve("score_eq"), ("score".into(), Operator::Eq));
        assert_eq!(resolve("score_ne"), ("score".into(), Operator::Ne));
        assert_eq!(resolve("score_not"), ("score".into(), Operator::Not));
        assert_eq!(resolve("score_gt"), ("score".into(), Operator::Gt));
        assert_eq!(resolve("score_ge"), ("score".into(), Operator::Ge));
        assert_eq!(resolve("score_lt"), ("score".into(), Operator::Lt));
        assert_eq!(resolve("score_le"), ("score".into(), Operator::Le));
        assert_eq!(resolve("id_in"), ("id".into(), Operator::In));
        assert_eq!(resolve("id_not_in"), ("id".into(), Operator::NotIn));
        assert_eq!(resolve("memo_null"), ("memo".into(), Operator::Null));
        assert_eq!(resolve("memo_not_null"), ("memo".into(), Operator::NotNull));
        assert_eq!(resolve("memo_like"), ("memo".into(), Operator::Like));
    }

    #[test]
    fn longest_suffix_wins_for_overlapping_names() {
        // `_not_in` also ends with `_in`; `_not_null` also ends with `_null`.
        assert_eq!(resolve("id_not_in").1, Operator::NotIn);
        assert_eq!(resolve("memo_not_null").1, Operator::NotNull);
        assert_eq!(resolve("memo_not_null").0, "memo");
        // `_not` alone is its own operator.
        assert_eq!(resolve("status_not").1, Operator::Not);
        // A column that itself ends in an operator word keeps the rest.
        assert_eq!(resolve("login_not_in"), ("login".into(), Operator::NotIn));
        assert_eq!(resolve("is_not_null_not_null"), ("is_not_null".into(), Operator::NotNull));
    }

    #[test]
    fn falls_back_to_eq() {
        assert_eq!(resolve("username"), ("username".into(), Operator::Eq));
        assert_eq!(resolve("login"), ("login".into(), Operator::Eq));
        // A bare suffix has no column to strip it from.
        assert_eq!(resolve("_in"), ("_in".into(), Operator::Eq));
        assert_eq!(resolve(""), ("".into(), Operator::Eq));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(resolve("score_LT"), ("score_LT".into(), Operator::Eq));
        assert_eq!(resolve("ScoreLt"), ("ScoreLt".into(), Operator::Eq));
    }

    #[test]
    fn column_tag_overrides_column_only() {
        let conv = OperatorRegistry::SQL.resolve_with("score_lt", Some("user_score"));
        assert_eq!(conv.column, "user_score");
        assert_eq!(conv.operator, Operator::Lt);
    }

    #[test]
    fn subquery_names_may_carry_a_qualifier() {
        let reg = OperatorRegistry::SQL;
        let conv = reg.resolve_subquery("score_gt_avg", None);
        assert_eq!((conv.column.as_str(), conv.operator), ("score", Operator::Gt));

        let conv = reg.resolve_subquery("id_in_active_orders", None);
        assert_eq!((conv.column.as_str(), conv.operator), ("id", Operator::In));

        let conv = reg.resolve_subquery("score_lt", Some("points"));
        assert_eq!((conv.column.as_str(), conv.operator), ("points", Operator::Lt));

        let conv = reg.resolve_subquery("top_score", None);
        assert_eq!((conv.column.as_str(), conv.operator), ("top_score", Operator::Eq));
    }

    #[test]
    fn fragments() {
        let reg = OperatorRegistry::SQL;
        assert_eq!(reg.resolve("score_lt").fragment(), "score < ?");
        assert_eq!(reg.resolve("memo_null").fragment(), "memo IS NULL");
        assert_eq!(reg.resolve("memo_not_null").fragment(), "memo IS NOT NULL");
        assert_eq!(reg.resolve("memo_like").fragment(), "memo LIKE ?");
        assert_eq!(reg.resolve("id_in").list_fragment(2), "id IN (?, ?)");
        assert_eq!(reg.resolve("id_not_in").list_fragment(1), "id NOT IN (?)");
    }

    #[test]
    fn rejects_bad_tables() {
        static NO_EQ: [OperatorEntry; 1] = [OperatorEntry::new(Operator::Lt, "<")];
        assert_eq!(OperatorRegistry::new(&NO_EQ), Err(RegistryError::MissingEq));

        static UNORDERED: [OperatorEntry; 3] = [
            OperatorEntry::new(Operator::Eq, "$eq"),
            OperatorEntry::new(Operator::In, "$in"),
            OperatorEntry::new(Operator::NotIn, "$nin"),
        ];
        assert_eq!(
            OperatorRegistry::new(&UNORDERED),
            Err(RegistryError::NotLongestFirst {
                earlier: Operator::In,
                later: Operator::NotIn,
            })
        );

        static DUP: [OperatorEntry; 2] = [
            OperatorEntry::new(Operator::Eq, "="),
            OperatorEntry::new(Operator::Eq, "=="),
        ];
        assert_eq!(
            OperatorRegistry::new(&DUP),
            Err(RegistryError::Duplicate(Operator::Eq))
        );
    }

    #[test]
    fn alternative_backend_signs() {
        static DOC: [OperatorEntry; 3] = [
            OperatorEntry::new(Operator::NotIn, "$nin"),
            OperatorEntry::new(Operator::Eq, "$eq"),
            OperatorEntry::new(Operator::Gt, "$gt"),
        ];
        let reg = OperatorRegistry::new(&DOC).unwrap();
        assert_eq!(reg.resolve("qty_gt").sign, "$gt");
        assert_eq!(reg.resolve("qty_not_in").sign, "$nin");
        // `_lt` is not part of this backend's vocabulary.
        assert_eq!(reg.resolve("qty_lt").operator, Operator::Eq);
        assert_eq!(reg.resolve("qty_lt").column, "qty_lt");
    }
}
