//! SQL identifier validation for caller-supplied names.
//!
//! Sort columns arrive as request text, so they are checked before being
//! spliced into a statement. Each dotted part must match
//! `[A-Za-z_][A-Za-z0-9_]*`; `t_user.score` is accepted, `score; DROP` is not.

use crate::error::{OrmError, OrmResult};

/// Validate a (possibly dotted) column identifier and return it unchanged.
pub fn validate_ident(s: &str) -> OrmResult<&str> {
    if s.is_empty() {
        return Err(OrmError::validation("Identifier cannot be empty"));
    }
    for part in s.split('.') {
        let mut chars = part.chars();
        match chars.next() {
            None => {
                return Err(OrmError::validation(format!(
                    "Empty identifier segment in '{s}'"
                )));
            }
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            Some(c) => {
                return Err(OrmError::validation(format!(
                    "Invalid identifier start character: '{c}'"
                )));
            }
        }
        if let Some(c) = chars.find(|c| !(*c == '_' || c.is_ascii_alphanumeric())) {
            return Err(OrmError::validation(format!(
                "Invalid character in identifier: '{c}'"
            )));
        }
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_dotted() {
        assert_eq!(validate_ident("score").unwrap(), "score");
        assert_eq!(validate_ident("_x1").unwrap(), "_x1");
        assert_eq!(validate_ident("t_user.score").unwrap(), "t_user.score");
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "1abc", "a-b", "a.", ".a", "a..b", "score; DROP TABLE", "na me"] {
            let err = validate_ident(bad).unwrap_err();
            assert!(err.is_validation(), "{bad}: {err}");
        }
    }
}
