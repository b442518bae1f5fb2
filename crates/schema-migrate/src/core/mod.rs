//! Core abstractions shared by every dialect and generator.
//!
//! - [`types`]: abstract type identity (`JdbcTypeDesc`, `JdbcTypeOptions`)
//! - [`schema`]: database, table, column, key, index and sequence metadata
//! - [`identifier`]: identifier validation and quoting primitives
//! - [`value`]: runtime SQL values handed to type adapters
//! - [`catalog`]: dialect registry for dependency injection
//!
//! # Design Patterns
//!
//! - **Registry**: `DialectCatalog` hands out shared, immutable dialects
//! - **Builder**: dialects and type registries are assembled once, then frozen

pub mod catalog;
pub mod identifier;
pub mod schema;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use catalog::DialectCatalog;
pub use schema::{
    CheckConstraint, Column, Database, ForeignKey, Index, PrimaryKey, ReferenceAction,
    Sequence, Table, TableRef, TableType,
};
pub use types::{JdbcTypeDesc, JdbcTypeOptions};
pub use value::{SqlValue, ValueKind};
