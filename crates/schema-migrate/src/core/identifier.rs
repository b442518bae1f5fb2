//! Identifier validation, case normalization and quoting primitives.
//!
//! Dialects build their `identifier` rendering on these helpers. Quoting is a
//! pure function of the identifier text, the quote characters and the
//! keyword set, so the same input always renders the same way.
//!
//! # Security
//!
//! Identifiers cannot be bound as statement parameters, so everything that is
//! spliced into generated DDL goes through [`validate_identifier`] first and
//! quoted identifiers always have their closing quote character doubled.

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Hard upper bound on identifier length, independent of dialect limits.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Case policy applied to unquoted identifiers before quoting decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// Keep the identifier as written.
    #[default]
    Preserve,
    /// Fold to upper case (Oracle, H2, SQL-2003 unquoted semantics).
    Upper,
    /// Fold to lower case (PostgreSQL unquoted semantics).
    Lower,
}

impl IdentifierCase {
    pub fn apply(self, name: &str) -> String {
        match self {
            IdentifierCase::Preserve => name.to_string(),
            IdentifierCase::Upper => name.to_uppercase(),
            IdentifierCase::Lower => name.to_lowercase(),
        }
    }
}

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::invalid_model("Identifier cannot be empty"));
    }

    if name.contains('\0') {
        return Err(MigrateError::invalid_model(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::invalid_model(format!(
            "Identifier exceeds maximum length of {} characters: {:?}",
            MAX_IDENTIFIER_LENGTH, name
        )));
    }

    Ok(())
}

/// Whether `name` is a bare `[A-Za-z0-9_]+` token that needs no quoting
/// (keyword collisions aside).
pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Whether `name` is already wrapped in the given quote characters.
pub fn is_quoted(name: &str, open: char, close: char) -> bool {
    name.chars().count() >= 2 && name.starts_with(open) && name.ends_with(close)
}

/// Wrap `name` in quote characters, doubling embedded closing quotes.
///
/// Already quoted input is returned unchanged.
pub fn quote_with(name: &str, open: char, close: char) -> String {
    if is_quoted(name, open, close) {
        return name.to_string();
    }
    let doubled = format!("{}{}", close, close);
    format!("{}{}{}", open, name.replace(close, &doubled), close)
}

/// Strip quote characters, undoing the doubling applied by [`quote_with`].
///
/// Unquoted input is returned unchanged.
pub fn unquote_with(name: &str, open: char, close: char) -> String {
    if !is_quoted(name, open, close) {
        return name.to_string();
    }
    let inner = &name[open.len_utf8()..name.len() - close.len_utf8()];
    let doubled = format!("{}{}", close, close);
    inner.replace(&doubled, &close.to_string())
}

/// Screen a check constraint expression before it is spliced into DDL.
///
/// Expressions come from source catalogs and should be simple boolean
/// predicates; statement separators and comment markers are rejected.
pub fn validate_check_expression(expression: &str) -> Result<()> {
    if expression.trim().is_empty() {
        return Err(MigrateError::invalid_model(
            "Check constraint expression cannot be empty",
        ));
    }

    if expression.contains(';') {
        return Err(MigrateError::invalid_model(format!(
            "SECURITY: Check constraint contains semicolon (possible injection): {:?}",
            expression
        )));
    }

    if expression.contains("--") || expression.contains("/*") || expression.contains("*/") {
        return Err(MigrateError::invalid_model(format!(
            "SECURITY: Check constraint contains SQL comment markers (possible injection): {:?}",
            expression
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("column with spaces").is_ok());
        assert!(validate_identifier("日本語").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_length_boundary() {
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH + 1)).is_err());
    }

    // =========================================================================
    // Quoting tests
    // =========================================================================

    #[test]
    fn test_plain_identifier() {
        assert!(is_plain_identifier("users"));
        assert!(is_plain_identifier("Order_Items2"));
        assert!(!is_plain_identifier("order items"));
        assert!(!is_plain_identifier("naïve"));
        assert!(!is_plain_identifier(""));
    }

    #[test]
    fn test_quote_with_escapes_closing_quote() {
        assert_eq!(quote_with("users", '"', '"'), "\"users\"");
        assert_eq!(quote_with("a\"b", '"', '"'), "\"a\"\"b\"");
        assert_eq!(quote_with("a]b", '[', ']'), "[a]]b]");
        assert_eq!(quote_with("a`b", '`', '`'), "`a``b`");
    }

    #[test]
    fn test_quote_with_never_double_quotes() {
        let once = quote_with("user name", '"', '"');
        assert_eq!(quote_with(&once, '"', '"'), once);
    }

    #[test]
    fn test_unquote_round_trip() {
        let quoted = quote_with("a]b", '[', ']');
        assert_eq!(unquote_with(&quoted, '[', ']'), "a]b");
        assert_eq!(unquote_with("plain", '"', '"'), "plain");
    }

    #[test]
    fn test_identifier_case() {
        assert_eq!(IdentifierCase::Upper.apply("Users"), "USERS");
        assert_eq!(IdentifierCase::Lower.apply("Users"), "users");
        assert_eq!(IdentifierCase::Preserve.apply("Users"), "Users");
    }

    // =========================================================================
    // Check expression tests
    // =========================================================================

    #[test]
    fn test_check_expression_valid() {
        assert!(validate_check_expression("price >= 0").is_ok());
        assert!(validate_check_expression("status IN ('a', 'b')").is_ok());
    }

    #[test]
    fn test_check_expression_rejects_injection() {
        assert!(validate_check_expression("1=1; DROP TABLE users").is_err());
        assert!(validate_check_expression("1=1 -- bypass").is_err());
        assert!(validate_check_expression("1=1 /* c */").is_err());
        assert!(validate_check_expression("  ").is_err());
    }
}
