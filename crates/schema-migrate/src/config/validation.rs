//! Configuration validation.

use super::Config;
use crate::error::{MigrateError, Result};

/// Encodings the exporter can write.
const SUPPORTED_ENCODINGS: &[&str] = &["utf-8", "utf8"];

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Target validation
    if config.target.dialect.trim().is_empty() {
        return Err(MigrateError::Config("target.dialect is required".into()));
    }

    // Generation validation
    let generation = &config.generation;
    if generation.object_types.is_empty() {
        return Err(MigrateError::Config(
            "generation.object_types must name at least one object type".into(),
        ));
    }
    if generation.script_types.is_empty() {
        return Err(MigrateError::Config(
            "generation.script_types must contain CREATE, DROP or both".into(),
        ));
    }
    if generation.table_types.is_empty() {
        return Err(MigrateError::Config(
            "generation.table_types must name at least one table type".into(),
        ));
    }
    if let Some(zone) = &generation.time_zone {
        if zone.trim().is_empty() {
            return Err(MigrateError::Config(
                "generation.time_zone must not be empty when set".into(),
            ));
        }
    }

    // Output validation
    let encoding = config.output.encoding.to_lowercase();
    if !SUPPORTED_ENCODINGS.contains(&encoding.as_str()) {
        return Err(MigrateError::Config(format!(
            "output.encoding must be 'utf-8', got '{}'",
            config.output.encoding
        )));
    }

    Ok(())
}
