//! # schema-migrate
//!
//! Cross-dialect DDL generation for database migrations.
//!
//! This library turns an in-memory schema model into a dependency-ordered
//! list of CREATE/DROP statements for a target database, with support for:
//!
//! - **Vendor dialects** (PostgreSQL, MySQL/MariaDB, SQL Server, Oracle, H2)
//!   built as override tables on a SQL:2003 baseline
//! - **Type mapping** through templated, priority-ordered and aliased rules
//! - **Naming strategies** for constraints, indexes and sequences
//! - **Deferred foreign keys**, so forward and circular references replay
//!   cleanly from a single linear script
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_migrate::{Config, Database, DialectCatalog, ScriptExporter, ScriptOrchestrator};
//!
//! fn main() -> schema_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let dialect = config.resolve_dialect(&DialectCatalog::with_builtins())?;
//!     let db = Database::from_yaml(&std::fs::read_to_string("schema.yaml")?)?;
//!
//!     let orchestrator = ScriptOrchestrator::new(dialect, config.generation_options());
//!     let report = orchestrator.generate(&db)?;
//!     ScriptExporter::new().write_file("schema.sql", &report.scripts)?;
//!     println!("Generated {} statements", report.statement_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod export;
pub mod generator;
pub mod naming;
pub mod orchestrator;
pub mod translate;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, GenerationConfig, OutputConfig, TargetConfig};
pub use crate::core::{
    Column, Database, DialectCatalog, ForeignKey, Index, JdbcTypeDesc, JdbcTypeOptions,
    PrimaryKey, ReferenceAction, Sequence, Table, TableRef, TableType,
};
pub use dialect::{Dialect, DialectBuilder, Feature};
pub use error::{MigrateError, Result};
pub use export::ScriptExporter;
pub use generator::{GeneratorRegistry, GroupBy, ObjectType, ScriptGenerator, ScriptType};
pub use naming::{NamingStrategies, NamingStrategy};
pub use orchestrator::{
    DanglingForeignKeyPolicy, GenerationOptions, GenerationReport, GenerationWarning,
    ScriptOrchestrator,
};
pub use typemap::TypeRegistry;
