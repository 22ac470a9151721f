// @generated by `conquery gen`. Do not edit by hand.
// source: tests/external.rs

use super::*;

impl ScoreQuery {
    /// Conditions compiled without reflection.
    pub fn static_conditions(&self) -> ::conquery::Conditions {
        let mut c = ::conquery::Conditions::with_capacity(3);
        if let ::core::option::Option::Some(v) = &self.score_lt {
            c.push("score < ?", ::conquery::ToValue::to_value(v));
        }
        if self.memo_null {
            c.push_bare("memo IS NULL");
        }
        if let ::core::option::Option::Some(v) = &self.id_in {
            c.push_list("id IN", v.iter().map(::conquery::ToValue::to_value));
        }
        c
    }
}
