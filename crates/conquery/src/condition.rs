//! Compiled WHERE-clause fragments and their arguments.
//!
//! [`Conditions`] is the output of both compilation paths: the reflective
//! [`WhereCompiler`](crate::WhereCompiler) and the `static_conditions` routines
//! emitted by the code generator. Every helper keeps the argument list in the
//! same order as the placeholders it writes.

use crate::value::Value;
use conquery_convention::list_fragment;

/// Condition fragments (AND-combined) plus positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    conditions: Vec<String>,
    args: Vec<Value>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            conditions: Vec::with_capacity(n),
            args: Vec::with_capacity(n),
        }
    }

    /// One-placeholder fragment: `score < ?`.
    pub fn push(&mut self, fragment: impl Into<String>, arg: Value) {
        self.conditions.push(fragment.into());
        self.args.push(arg);
    }

    /// Zero-placeholder fragment: `memo IS NULL`.
    pub fn push_bare(&mut self, fragment: impl Into<String>) {
        self.conditions.push(fragment.into());
    }

    /// Set-membership fragment with one placeholder per value: `id IN (?, ?)`.
    ///
    /// An empty collection is treated as "not applied".
    pub fn push_list<I>(&mut self, head: &str, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let values: Vec<Value> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        self.conditions.push(list_fragment(head, values.len()));
        self.args.extend(values);
    }

    /// Splice a nested group as one parenthesised OR condition.
    pub fn push_or_group(&mut self, group: Conditions) {
        if group.conditions.is_empty() {
            return;
        }
        self.conditions
            .push(format!("({})", group.conditions.join(" OR ")));
        self.args.extend(group.args);
    }

    /// Nested query condition: `head` + inner WHERE clause + `)`.
    ///
    /// Inner arguments are appended after everything already collected.
    pub fn push_subquery(&mut self, head: &str, correlate: Option<&str>, inner: Conditions) {
        let mut text = String::from(head);
        let mut parts = Vec::with_capacity(inner.conditions.len() + 1);
        if let Some(on) = correlate {
            parts.push(on.to_string());
        }
        parts.extend(inner.conditions);
        if !parts.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&parts.join(" AND "));
        }
        text.push(')');
        self.conditions.push(text);
        self.args.extend(inner.args);
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (self.conditions, self.args)
    }

    /// ` WHERE a AND b`, or an empty string when nothing applies.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        format!(" WHERE {}", self.conditions.join(" AND "))
    }

    /// WHERE clause text and the arguments it binds.
    pub fn into_where(self) -> (String, Vec<Value>) {
        let clause = self.where_clause();
        (clause, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_where_keyword() {
        let c = Conditions::new();
        assert_eq!(c.where_clause(), "");
        assert!(c.is_empty());
    }

    #[test]
    fn fragments_and_args_stay_aligned() {
        let mut c = Conditions::new();
        c.push("score < ?", Value::Int(80));
        c.push_bare("memo IS NULL");
        c.push_list("id IN", vec![Value::Int(1), Value::Int(4)]);
        let (clause, args) = c.into_where();
        assert_eq!(clause, " WHERE score < ? AND memo IS NULL AND id IN (?, ?)");
        assert_eq!(args, vec![Value::Int(80), Value::Int(1), Value::Int(4)]);
    }

    #[test]
    fn empty_list_is_skipped() {
        let mut c = Conditions::new();
        c.push_list("id IN", Vec::new());
        assert!(c.is_empty());
        assert!(c.args().is_empty());
    }

    #[test]
    fn or_group_is_parenthesised() {
        let mut group = Conditions::new();
        group.push("username = ?", Value::from("f0rb"));
        group.push("email = ?", Value::from("f0rb@x.io"));

        let mut c = Conditions::new();
        c.push("id > ?", Value::Int(1));
        c.push_or_group(group);
        c.push_or_group(Conditions::new());

        assert_eq!(c.conditions(), ["id > ?", "(username = ? OR email = ?)"]);
        assert_eq!(
            c.args(),
            [Value::Int(1), Value::from("f0rb"), Value::from("f0rb@x.io")]
        );
    }

    #[test]
    fn subquery_appends_inner_args_after_outer() {
        let mut inner = Conditions::new();
        inner.push("memo LIKE ?", Value::from("%oo%"));

        let mut c = Conditions::new();
        c.push("id > ?", Value::Int(1));
        c.push_subquery("score > (SELECT avg(score) FROM t_user", None, inner);
        c.push_subquery(
            "EXISTS (SELECT 1 FROM t_order",
            Some("t_order.user_id = t_user.id"),
            Conditions::new(),
        );
        c.push_subquery("id IN (SELECT user_id FROM t_order", None, Conditions::new());

        assert_eq!(
            c.conditions(),
            [
                "id > ?",
                "score > (SELECT avg(score) FROM t_user WHERE memo LIKE ?)",
                "EXISTS (SELECT 1 FROM t_order WHERE t_order.user_id = t_user.id)",
                "id IN (SELECT user_id FROM t_order)",
            ]
        );
        assert_eq!(c.args(), [Value::Int(1), Value::from("%oo%")]);
    }
}
