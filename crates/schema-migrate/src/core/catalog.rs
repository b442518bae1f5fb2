//! Dialect catalog for explicit dependency injection.
//!
//! The [`DialectCatalog`] maps dialect names and aliases to shared, immutable
//! [`Dialect`] values. It is constructed explicitly and handed to whoever
//! builds a [`ScriptOrchestrator`](crate::orchestrator::ScriptOrchestrator),
//! so tests can register their own dialects next to (or instead of) the
//! built-in ones.
//!
//! # Design Rationale
//!
//! - **No global state**: every catalog is an ordinary value
//! - **Explicit registration**: clear, deterministic initialization order
//! - **Case-insensitive lookup**: `PostgreSQL`, `postgresql` and `pg` all
//!   resolve to the same dialect

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::drivers::builtin_dialects;
use crate::error::{MigrateError, Result};

/// Registry of target dialects.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = DialectCatalog::with_builtins();
/// let dialect = catalog.require_dialect("postgresql")?;
/// assert_eq!(dialect.name(), "postgres");
/// ```
#[derive(Debug, Default, Clone)]
pub struct DialectCatalog {
    /// Registered dialects by canonical (lower-case) name.
    dialects: BTreeMap<String, Arc<Dialect>>,

    /// Alias (lower-case) to canonical name.
    aliases: HashMap<String, String>,
}

impl DialectCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with every built-in dialect and its aliases
    /// registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for builtin in builtin_dialects() {
            catalog.register_dialect((builtin.build)());
            for alias in builtin.aliases {
                catalog.register_alias(*alias, builtin.name);
            }
        }
        catalog
    }

    /// Register a dialect under its own name, replacing any previous one.
    pub fn register_dialect(&mut self, dialect: Dialect) {
        self.register_dialect_arc(Arc::new(dialect));
    }

    /// Register a shared dialect under its own name.
    pub fn register_dialect_arc(&mut self, dialect: Arc<Dialect>) {
        self.dialects
            .insert(dialect.name().to_lowercase(), dialect);
    }

    /// Register an alternative name for a registered dialect.
    pub fn register_alias(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.aliases
            .insert(alias.into().to_lowercase(), name.into().to_lowercase());
    }

    /// Get a dialect by name or alias.
    pub fn get_dialect(&self, name: &str) -> Option<Arc<Dialect>> {
        let key = name.to_lowercase();
        let canonical = self.aliases.get(&key).unwrap_or(&key);
        self.dialects.get(canonical).cloned()
    }

    /// Get a dialect by name or alias, returning an error if not found.
    pub fn require_dialect(&self, name: &str) -> Result<Arc<Dialect>> {
        self.get_dialect(name)
            .ok_or_else(|| MigrateError::UnknownDialect(name.to_string()))
    }

    /// Check if a dialect is registered under a name or alias.
    pub fn has_dialect(&self, name: &str) -> bool {
        self.get_dialect(name).is_some()
    }

    /// Get all registered dialect names, sorted.
    pub fn dialect_names(&self) -> Vec<&str> {
        self.dialects.keys().map(String::as_str).collect()
    }

    /// Aliases registered for a canonical dialect name, sorted.
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let name = name.to_lowercase();
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| **target == name)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectBuilder;

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = DialectCatalog::new();
        assert!(catalog.dialect_names().is_empty());
        assert!(!catalog.has_dialect("postgres"));
    }

    #[test]
    fn test_with_builtins() {
        let catalog = DialectCatalog::with_builtins();
        for name in ["sql2003", "postgres", "mysql", "mssql", "oracle", "h2"] {
            assert!(catalog.has_dialect(name), "missing {}", name);
        }
        assert_eq!(catalog.dialect_names().len(), 6);
    }

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let catalog = DialectCatalog::with_builtins();
        assert_eq!(catalog.require_dialect("PostgreSQL").unwrap().name(), "postgres");
        assert_eq!(catalog.require_dialect("pg").unwrap().name(), "postgres");
        assert_eq!(catalog.require_dialect("MariaDB").unwrap().name(), "mysql");
        assert_eq!(catalog.require_dialect("SqlServer").unwrap().name(), "mssql");
        assert_eq!(catalog.aliases_of("postgres"), vec!["pg", "postgresql"]);
    }

    #[test]
    fn test_require_unknown_dialect() {
        let catalog = DialectCatalog::with_builtins();
        let err = catalog.require_dialect("informix").unwrap_err();
        assert!(matches!(err, MigrateError::UnknownDialect(ref n) if n == "informix"));
    }

    #[test]
    fn test_register_custom_dialect() {
        let mut catalog = DialectCatalog::new();
        catalog.register_dialect(DialectBuilder::sql2003("Acme").quotes('`', '`').build());
        catalog.register_alias("acmedb", "acme");
        let dialect = catalog.require_dialect("ACMEDB").unwrap();
        assert_eq!(dialect.quote("x"), "`x`");
    }

    #[test]
    fn test_dialects_are_shared() {
        let catalog = DialectCatalog::with_builtins();
        let a = catalog.require_dialect("postgres").unwrap();
        let b = catalog.require_dialect("postgresql").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
