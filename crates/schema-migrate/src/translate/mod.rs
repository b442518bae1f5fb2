//! Default value and check expression translation.
//!
//! Source catalogs report defaults in their own spelling (`(getdate())`,
//! `((0))`, `nextval(...)`, `SYSDATE`). Well-known functions are rewritten
//! into the target dialect's spelling. Numeric and quoted literals and
//! expressions pass through, casts on literals are dropped, and bare text is
//! quoted.

use rust_decimal::Decimal;
use tracing::warn;

use crate::dialect::Dialect;

/// Functions returning the current timestamp.
const TIMESTAMP_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_TIMESTAMP()",
    "GETDATE()",
    "SYSDATETIME()",
    "NOW()",
    "SYSDATE",
    "SYSTIMESTAMP",
    "LOCALTIMESTAMP",
    "LOCALTIMESTAMP()",
];

const DATE_FUNCTIONS: &[&str] = &["CURRENT_DATE", "CURRENT_DATE()", "CURDATE()"];

const TIME_FUNCTIONS: &[&str] = &["CURRENT_TIME", "CURRENT_TIME()", "CURTIME()"];

const UUID_FUNCTIONS: &[&str] = &[
    "NEWID()",
    "NEWSEQUENTIALID()",
    "UUID()",
    "GEN_RANDOM_UUID()",
    "UUID_GENERATE_V4()",
    "SYS_GUID()",
    "RANDOM_UUID()",
];

/// Words passed through unquoted.
const KEYWORD_LITERALS: &[&str] = &["NULL", "TRUE", "FALSE"];

/// Translate a column default into the target dialect.
///
/// Returns `None` when the default is a function the target has no
/// equivalent for; the column is then emitted without a default.
pub fn translate_default(value: &str, dialect: &Dialect) -> Option<String> {
    let value = strip_parens(value.trim());
    if value.is_empty() {
        return None;
    }

    let upper = value.to_uppercase();
    let functions = dialect.default_functions();
    if TIMESTAMP_FUNCTIONS.contains(&upper.as_str()) {
        return Some(functions.current_timestamp.to_string());
    }
    if DATE_FUNCTIONS.contains(&upper.as_str()) {
        return Some(functions.current_date.to_string());
    }
    if TIME_FUNCTIONS.contains(&upper.as_str()) {
        return Some(functions.current_time.to_string());
    }
    if UUID_FUNCTIONS.contains(&upper.as_str()) {
        let uuid = functions.random_uuid.map(str::to_string);
        if uuid.is_none() {
            warn!(
                "{}: no random UUID function, dropping default {}",
                dialect, value
            );
        }
        return uuid;
    }

    if KEYWORD_LITERALS.contains(&upper.as_str()) || is_numeric(value) || is_quoted_literal(value) {
        return Some(value.to_string());
    }

    // 'abc'::character varying
    if let Some((literal, _)) = value.split_once("::") {
        let literal = strip_parens(literal.trim());
        if is_quoted_literal(literal) || is_numeric(literal) {
            return Some(literal.to_string());
        }
    }
    if is_expression(value) {
        return Some(value.to_string());
    }

    Some(dialect.quote_literal(value))
}

/// Whether a default is an expression rather than bare text: a cast, a
/// function call, or text starting with a quoted literal.
fn is_expression(value: &str) -> bool {
    if value.contains("::") || value.starts_with('\'') {
        return true;
    }
    let name_len = value
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(value.len());
    name_len > 0
        && value[name_len..].trim_start().starts_with('(')
        && value.ends_with(')')
}

/// Rewrite a check expression for the target dialect.
///
/// Bracket-quoted identifiers are rendered the way the dialect renders
/// column names and timestamp functions are respelled. String literals are
/// copied through untouched, so `LIKE '[0-9]%'` keeps its pattern.
pub fn translate_expression(expression: &str, dialect: &Dialect) -> String {
    let current = dialect.default_functions().current_timestamp;
    let mut result = String::with_capacity(expression.len());
    let mut rest = expression;

    while let Some(start) = rest.find(|c: char| c == '\'' || c == '[') {
        result.push_str(&respell_functions(&rest[..start], current));
        let tail = &rest[start..];
        if tail.starts_with('\'') {
            let end = literal_end(tail);
            result.push_str(&tail[..end]);
            rest = &tail[end..];
        } else if let Some(close) = tail.find(']') {
            result.push_str(&dialect.identifier(&tail[1..close], false));
            rest = &tail[close + 1..];
        } else {
            result.push_str(tail);
            rest = "";
        }
    }
    result.push_str(&respell_functions(rest, current));
    result
}

fn respell_functions(code: &str, current_timestamp: &str) -> String {
    let mut code = code.to_string();
    for function in ["getdate()", "GETDATE()", "GetDate()"] {
        code = code.replace(function, current_timestamp);
    }
    code
}

/// Length of the string literal opening `literal`, closing quote included.
/// A doubled `''` stays inside the literal.
fn literal_end(literal: &str) -> usize {
    let bytes = literal.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Strip balanced outer parentheses: `((0))` becomes `0`.
fn strip_parens(mut value: &str) -> &str {
    while value.starts_with('(') && value.ends_with(')') && encloses(value) {
        value = value[1..value.len() - 1].trim();
    }
    value
}

/// Whether the opening parenthesis at 0 closes at the last character.
fn encloses(value: &str) -> bool {
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in value.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == value.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

fn is_numeric(value: &str) -> bool {
    value.parse::<Decimal>().is_ok() || Decimal::from_scientific(value).is_ok()
}

fn is_quoted_literal(value: &str) -> bool {
    let body = value
        .strip_prefix('N')
        .or_else(|| value.strip_prefix('n'))
        .unwrap_or(value);
    body.len() >= 2 && body.starts_with('\'') && body.ends_with('\'')
}
