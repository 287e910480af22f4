//! SQL identifier validation.
//!
//! Identifiers (table and column names) cannot be bound as parameters, so any
//! string that ends up interpolated into SQL text must pass through here first.
//! Only the unquoted single-segment form is accepted: `[a-zA-Z_][a-zA-Z0-9_]*`,
//! at most 63 bytes (the PostgreSQL identifier limit).

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

const MAX_IDENT_LEN: usize = 63;

fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap())
}

/// Validate a table or column name before it is interpolated into SQL.
pub fn validate_identifier(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > MAX_IDENT_LEN || !ident_re().is_match(name) {
        return Err(AppError::BadIdentifier(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for name in ["property_name", "a", "_hidden", "Col9", "price_in_cr"] {
            assert!(validate_identifier(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(validate_identifier("9lives").is_err());
    }

    #[test]
    fn rejects_whitespace() {
        assert!(validate_identifier("two words").is_err());
        assert!(validate_identifier(" padded").is_err());
    }

    #[test]
    fn rejects_statement_terminators_and_quotes() {
        assert!(validate_identifier("name; DROP TABLE property").is_err());
        assert!(validate_identifier("na\"me").is_err());
        assert!(validate_identifier("na'me").is_err());
    }

    #[test]
    fn rejects_dotted_names() {
        assert!(validate_identifier("public.property").is_err());
    }

    #[test]
    fn rejects_over_limit() {
        let long = "a".repeat(64);
        assert!(validate_identifier(&long).is_err());
        let ok = "a".repeat(63);
        assert!(validate_identifier(&ok).is_ok());
    }
}
