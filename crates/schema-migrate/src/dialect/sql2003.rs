//! SQL:2003 baseline type names and the source type aliases shared by every
//! dialect.

use crate::core::types::codes;
use crate::typemap::TypeNameRule;

pub(crate) const TYPE_RULES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::BIT, "BOOLEAN"),
    TypeNameRule::new(codes::BOOLEAN, "BOOLEAN"),
    TypeNameRule::new(codes::TINYINT, "SMALLINT"),
    TypeNameRule::new(codes::SMALLINT, "SMALLINT"),
    TypeNameRule::new(codes::INTEGER, "INTEGER"),
    TypeNameRule::new(codes::BIGINT, "BIGINT"),
    TypeNameRule::new(codes::REAL, "REAL"),
    TypeNameRule::new(codes::FLOAT, "DOUBLE PRECISION"),
    TypeNameRule::new(codes::DOUBLE, "DOUBLE PRECISION"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC({P},{S})"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC({P})"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC"),
    TypeNameRule::new(codes::DECIMAL, "DECIMAL({P},{S})"),
    TypeNameRule::new(codes::DECIMAL, "DECIMAL({P})"),
    TypeNameRule::new(codes::DECIMAL, "DECIMAL"),
    TypeNameRule::new(codes::CHAR, "CHAR({N})"),
    TypeNameRule::new(codes::CHAR, "CHAR"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})"),
    TypeNameRule::new(codes::VARCHAR, "CLOB"),
    TypeNameRule::new(codes::LONGVARCHAR, "CLOB"),
    TypeNameRule::new(codes::CLOB, "CLOB"),
    TypeNameRule::new(codes::NCHAR, "NCHAR({N})"),
    TypeNameRule::new(codes::NCHAR, "NCHAR"),
    TypeNameRule::new(codes::NVARCHAR, "NCHAR VARYING({N})"),
    TypeNameRule::new(codes::NVARCHAR, "NCLOB"),
    TypeNameRule::new(codes::LONGNVARCHAR, "NCLOB"),
    TypeNameRule::new(codes::NCLOB, "NCLOB"),
    TypeNameRule::new(codes::BINARY, "BINARY({N})"),
    TypeNameRule::new(codes::BINARY, "BLOB"),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY({N})"),
    TypeNameRule::new(codes::VARBINARY, "BLOB"),
    TypeNameRule::new(codes::LONGVARBINARY, "BLOB"),
    TypeNameRule::new(codes::BLOB, "BLOB"),
    TypeNameRule::new(codes::DATE, "DATE"),
    TypeNameRule::new(codes::TIME, "TIME"),
    TypeNameRule::new(codes::TIMESTAMP, "TIMESTAMP"),
    TypeNameRule::new(codes::TIME_WITH_TIMEZONE, "TIME WITH TIME ZONE"),
    TypeNameRule::new(codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE"),
    TypeNameRule::new(codes::SQLXML, "XML"),
    TypeNameRule::new(codes::OTHER, "CHAR(36)").named("uuid"),
    TypeNameRule::new(codes::OTHER, "CLOB").named("json"),
    TypeNameRule::new(codes::OTHER, "CLOB").named("jsonb"),
];

/// Vendor spellings of source types, mapped to the entry they resolve through.
pub(crate) const TYPE_ALIASES: &[((i32, &str), (i32, &str))] = &[
    // MySQL / MariaDB
    ((codes::LONGVARCHAR, "TINYTEXT"), (codes::CLOB, "CLOB")),
    // also SQL Server `text`
    ((codes::LONGVARCHAR, "TEXT"), (codes::CLOB, "CLOB")),
    ((codes::LONGVARCHAR, "MEDIUMTEXT"), (codes::CLOB, "CLOB")),
    ((codes::LONGVARCHAR, "LONGTEXT"), (codes::CLOB, "CLOB")),
    ((codes::LONGVARBINARY, "TINYBLOB"), (codes::BLOB, "BLOB")),
    ((codes::LONGVARBINARY, "BLOB"), (codes::BLOB, "BLOB")),
    ((codes::LONGVARBINARY, "MEDIUMBLOB"), (codes::BLOB, "BLOB")),
    ((codes::LONGVARBINARY, "LONGBLOB"), (codes::BLOB, "BLOB")),
    ((codes::CHAR, "ENUM"), (codes::VARCHAR, "VARCHAR")),
    ((codes::CHAR, "SET"), (codes::VARCHAR, "VARCHAR")),
    ((codes::LONGVARCHAR, "JSON"), (codes::OTHER, "json")),
    // SQL Server
    ((codes::LONGNVARCHAR, "ntext"), (codes::NCLOB, "NCLOB")),
    ((codes::LONGVARBINARY, "image"), (codes::BLOB, "BLOB")),
    ((codes::NVARCHAR, "sysname"), (codes::NVARCHAR, "NVARCHAR")),
    ((codes::CHAR, "uniqueidentifier"), (codes::OTHER, "uuid")),
    ((codes::TIMESTAMP, "datetimeoffset"), (codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE")),
    ((-155, "datetimeoffset"), (codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE")),
    // PostgreSQL
    ((codes::VARCHAR, "text"), (codes::CLOB, "CLOB")),
    ((codes::BINARY, "bytea"), (codes::BLOB, "BLOB")),
    ((codes::BIT, "bool"), (codes::BOOLEAN, "BOOLEAN")),
    ((codes::TIMESTAMP, "timestamptz"), (codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE")),
    ((codes::TIME, "timetz"), (codes::TIME_WITH_TIMEZONE, "TIME WITH TIME ZONE")),
    // Oracle
    ((-101, "TIMESTAMP WITH TIME ZONE"), (codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE")),
    ((-102, "TIMESTAMP WITH LOCAL TIME ZONE"), (codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE")),
    ((codes::OTHER, "XMLTYPE"), (codes::SQLXML, "XML")),
    ((codes::OTHER, "BINARY_FLOAT"), (codes::REAL, "REAL")),
    ((codes::OTHER, "BINARY_DOUBLE"), (codes::DOUBLE, "DOUBLE")),
];
