//! Value adapters applied when a target cannot store a runtime value class
//! natively.

use std::fmt::Debug;

use chrono::Utc;

use crate::core::value::{SqlValue, ValueKind};
use crate::error::{MigrateError, Result};

/// Converts values of one runtime class into a form the target accepts.
pub trait TypeAdapter: Debug + Send + Sync {
    /// Runtime class this adapter handles.
    fn kind(&self) -> ValueKind;

    /// Convert a value of [`TypeAdapter::kind`].
    fn adapt(&self, value: SqlValue) -> Result<SqlValue>;
}

fn mismatch(adapter: &str, value: &SqlValue) -> MigrateError {
    MigrateError::Adapter(format!(
        "{} cannot convert a {} value",
        adapter,
        value.kind()
    ))
}

/// Booleans stored as `1`/`0` on targets without a boolean type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanToNumberAdapter;

impl TypeAdapter for BooleanToNumberAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn adapt(&self, value: SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Bool(b) => Ok(SqlValue::I16(i16::from(b))),
            other => Err(mismatch("BooleanToNumberAdapter", &other)),
        }
    }
}

/// UUIDs stored as their hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidToTextAdapter;

impl TypeAdapter for UuidToTextAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Uuid
    }

    fn adapt(&self, value: SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Uuid(u) => Ok(SqlValue::Text(u.hyphenated().to_string())),
            other => Err(mismatch("UuidToTextAdapter", &other)),
        }
    }
}

/// Offset timestamps normalized to UTC on targets without zoned timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetToUtcAdapter;

impl TypeAdapter for OffsetToUtcAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::DateTimeOffset
    }

    fn adapt(&self, value: SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::DateTimeOffset(ts) => Ok(SqlValue::DateTime(ts.with_timezone(&Utc).naive_utc())),
            other => Err(mismatch("OffsetToUtcAdapter", &other)),
        }
    }
}
