//! Abstract type identity shared by every dialect.
//!
//! A column type is described by a numeric type code (the JDBC `java.sql.Types`
//! numbering, which every introspection collaborator already speaks) plus the
//! source spelling of the type name. Sizes travel separately in
//! [`JdbcTypeOptions`].

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Type codes (JDBC numbering).
pub mod codes {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const REF: i32 = 2006;
    pub const DATALINK: i32 = 70;
    pub const BOOLEAN: i32 = 16;
    pub const ROWID: i32 = -8;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const NCLOB: i32 = 2011;
    pub const SQLXML: i32 = 2009;
    pub const TIME_WITH_TIMEZONE: i32 = 2013;
    pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;
}

/// Returns the canonical name of a type code, used when a column carries no
/// type name of its own.
pub fn type_code_name(type_code: i32) -> &'static str {
    match type_code {
        codes::BIT => "BIT",
        codes::TINYINT => "TINYINT",
        codes::SMALLINT => "SMALLINT",
        codes::INTEGER => "INTEGER",
        codes::BIGINT => "BIGINT",
        codes::FLOAT => "FLOAT",
        codes::REAL => "REAL",
        codes::DOUBLE => "DOUBLE",
        codes::NUMERIC => "NUMERIC",
        codes::DECIMAL => "DECIMAL",
        codes::CHAR => "CHAR",
        codes::VARCHAR => "VARCHAR",
        codes::LONGVARCHAR => "LONGVARCHAR",
        codes::DATE => "DATE",
        codes::TIME => "TIME",
        codes::TIMESTAMP => "TIMESTAMP",
        codes::BINARY => "BINARY",
        codes::VARBINARY => "VARBINARY",
        codes::LONGVARBINARY => "LONGVARBINARY",
        codes::NULL => "NULL",
        codes::OTHER => "OTHER",
        codes::JAVA_OBJECT => "JAVA_OBJECT",
        codes::DISTINCT => "DISTINCT",
        codes::STRUCT => "STRUCT",
        codes::ARRAY => "ARRAY",
        codes::BLOB => "BLOB",
        codes::CLOB => "CLOB",
        codes::REF => "REF",
        codes::DATALINK => "DATALINK",
        codes::BOOLEAN => "BOOLEAN",
        codes::ROWID => "ROWID",
        codes::NCHAR => "NCHAR",
        codes::NVARCHAR => "NVARCHAR",
        codes::LONGNVARCHAR => "LONGNVARCHAR",
        codes::NCLOB => "NCLOB",
        codes::SQLXML => "SQLXML",
        codes::TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
        codes::TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
        _ => "UNKNOWN",
    }
}

/// Whether values of the type code are written as quoted character literals.
pub fn is_character_type(type_code: i32) -> bool {
    matches!(
        type_code,
        codes::CHAR
            | codes::VARCHAR
            | codes::LONGVARCHAR
            | codes::NCHAR
            | codes::NVARCHAR
            | codes::LONGNVARCHAR
            | codes::CLOB
            | codes::NCLOB
    )
}

/// Whether the type code is a date/time type.
pub fn is_temporal_type(type_code: i32) -> bool {
    matches!(
        type_code,
        codes::DATE
            | codes::TIME
            | codes::TIMESTAMP
            | codes::TIME_WITH_TIMEZONE
            | codes::TIMESTAMP_WITH_TIMEZONE
    )
}

/// Whether the type code is an exact or approximate numeric type.
pub fn is_numeric_type(type_code: i32) -> bool {
    matches!(
        type_code,
        codes::BIT
            | codes::TINYINT
            | codes::SMALLINT
            | codes::INTEGER
            | codes::BIGINT
            | codes::FLOAT
            | codes::REAL
            | codes::DOUBLE
            | codes::NUMERIC
            | codes::DECIMAL
            | codes::BOOLEAN
    )
}

/// Abstract type identity: a type code plus the source spelling of its name.
///
/// Equality is exact on the code and case-insensitive on the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JdbcTypeDesc {
    pub type_code: i32,
    pub type_name: String,
}

impl JdbcTypeDesc {
    pub fn new(type_code: i32, type_name: impl Into<String>) -> Self {
        Self {
            type_code,
            type_name: type_name.into(),
        }
    }

    /// Descriptor named after its type code.
    pub fn from_code(type_code: i32) -> Self {
        Self::new(type_code, type_code_name(type_code))
    }

    /// Whether the name matches `name` ignoring ASCII case.
    pub fn has_name(&self, name: &str) -> bool {
        self.type_name.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for JdbcTypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.type_code == other.type_code && self.has_name(&other.type_name)
    }
}

impl Eq for JdbcTypeDesc {}

impl Hash for JdbcTypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_code.hash(state);
        for b in self.type_name.bytes() {
            b.to_ascii_uppercase().hash(state);
        }
    }
}

impl fmt::Display for JdbcTypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.type_code)
    }
}

/// Size, precision and scale of a column type. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JdbcTypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
}

impl JdbcTypeOptions {
    pub fn size(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn precision_scale(precision: u32, scale: i32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.precision.is_none() && self.scale.is_none()
    }
}
