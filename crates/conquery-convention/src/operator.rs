//! The fixed operator vocabulary.

/// How many bind arguments an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// NULL-class: the field only acts as a trigger, no value is read.
    Zero,
    /// Scalar comparison: exactly one argument.
    One,
    /// Set membership: one argument per element, counted at call time.
    Many,
}

/// Comparison operator encoded by a field-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `score_eq` / `score` (default)
    Eq,
    /// `score_ne`
    Ne,
    /// `score_not`
    Not,
    /// `score_gt`
    Gt,
    /// `score_ge`
    Ge,
    /// `score_lt`
    Lt,
    /// `score_le`
    Le,
    /// `id_in`
    In,
    /// `id_not_in`
    NotIn,
    /// `memo_null`
    Null,
    /// `memo_not_null`
    NotNull,
    /// `memo_like`
    Like,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Not,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::In,
        Operator::NotIn,
        Operator::Null,
        Operator::NotNull,
        Operator::Like,
    ];

    /// Operator name as it appears in the vocabulary (`"NotIn"`).
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Eq => "Eq",
            Operator::Ne => "Ne",
            Operator::Not => "Not",
            Operator::Gt => "Gt",
            Operator::Ge => "Ge",
            Operator::Lt => "Lt",
            Operator::Le => "Le",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::Null => "Null",
            Operator::NotNull => "NotNull",
            Operator::Like => "Like",
        }
    }

    /// Field-name suffix that selects this operator (`"_not_in"`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Operator::Eq => "_eq",
            Operator::Ne => "_ne",
            Operator::Not => "_not",
            Operator::Gt => "_gt",
            Operator::Ge => "_ge",
            Operator::Lt => "_lt",
            Operator::Le => "_le",
            Operator::In => "_in",
            Operator::NotIn => "_not_in",
            Operator::Null => "_null",
            Operator::NotNull => "_not_null",
            Operator::Like => "_like",
        }
    }

    pub const fn arity(self) -> Arity {
        match self {
            Operator::Null | Operator::NotNull => Arity::Zero,
            Operator::In | Operator::NotIn => Arity::Many,
            _ => Arity::One,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render `n` comma-separated positional placeholders: `?, ?, ?`.
pub fn placeholders(n: usize) -> String {
    let mut out = String::with_capacity(n.saturating_mul(3));
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}
