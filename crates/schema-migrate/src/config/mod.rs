//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::core::catalog::DialectCatalog;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::orchestrator::GenerationOptions;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Compute a SHA256 hash of the configuration, recorded with generated
    /// scripts so they can be traced back to their settings.
    pub fn hash(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(yaml.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up the target dialect, applying the identifier case override.
    pub fn resolve_dialect(&self, catalog: &DialectCatalog) -> Result<Arc<Dialect>> {
        let dialect = catalog.require_dialect(&self.target.dialect)?;
        Ok(match self.target.identifier_case {
            Some(case) if case != dialect.identifier_case() => {
                Arc::new(dialect.with_identifier_case(case))
            }
            _ => dialect,
        })
    }

    /// Orchestrator options for this configuration.
    pub fn generation_options(&self) -> GenerationOptions {
        let generation = &self.generation;
        GenerationOptions {
            catalog: self.target.catalog.clone(),
            schema: self.target.schema.clone(),
            object_types: generation.object_types.iter().copied().collect(),
            script_types: generation.script_types.iter().copied().collect(),
            group_by: generation.group_by,
            table_types: generation.table_types.iter().copied().collect(),
            naming: self.naming,
            dangling_foreign_keys: generation.dangling_foreign_keys,
            time_zone: generation.time_zone.clone(),
        }
    }
}
