//! Error types for the schema generation library.

use thiserror::Error;

use crate::generator::ObjectKind;

/// Process exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Process exit code for types the target dialect cannot represent.
pub const EXIT_UNSUPPORTED_TYPE: u8 = 3;
/// Process exit code for schema models that violate their invariants.
pub const EXIT_MODEL_ERROR: u8 = 4;
/// Process exit code for failures while assembling the script.
pub const EXIT_GENERATION_ERROR: u8 = 5;
/// Process exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for schema generation.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No dialect is registered under the requested name.
    #[error("Unknown database dialect: '{0}'")]
    UnknownDialect(String),

    /// The type registry of the target dialect has no rule for a type.
    #[error("Type {type_name} (type code {type_code}) is not supported by target dialect {dialect}")]
    UnsupportedType {
        type_code: i32,
        type_name: String,
        dialect: String,
    },

    /// The generator registry has nothing registered for an object kind.
    #[error("No script generator registered for {0}")]
    UnresolvedGenerator(ObjectKind),

    /// A foreign key references a table that was never processed.
    #[error("Foreign key {foreign_key} on {table} references unprocessed table {target}")]
    DanglingForeignKey {
        foreign_key: String,
        table: String,
        target: String,
    },

    /// The schema model violates one of its invariants.
    #[error("Invalid schema model: {0}")]
    InvalidModel(String),

    /// A value could not be converted by a type adapter.
    #[error("Value adaptation failed: {0}")]
    Adapter(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create an UnsupportedType error.
    pub fn unsupported_type(
        type_code: i32,
        type_name: impl Into<String>,
        dialect: impl Into<String>,
    ) -> Self {
        MigrateError::UnsupportedType {
            type_code,
            type_name: type_name.into(),
            dialect: dialect.into(),
        }
    }

    /// Create an InvalidModel error.
    pub fn invalid_model(message: impl Into<String>) -> Self {
        MigrateError::InvalidModel(message.into())
    }

    /// Map the error to a process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_)
            | MigrateError::UnknownDialect(_)
            | MigrateError::Yaml(_)
            | MigrateError::Json(_) => EXIT_CONFIG_ERROR,
            MigrateError::UnsupportedType { .. } => EXIT_UNSUPPORTED_TYPE,
            MigrateError::InvalidModel(_) => EXIT_MODEL_ERROR,
            MigrateError::UnresolvedGenerator(_)
            | MigrateError::DanglingForeignKey { .. }
            | MigrateError::Adapter(_) => EXIT_GENERATION_ERROR,
            MigrateError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema generation operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_names_code_and_dialect() {
        let err = MigrateError::unsupported_type(2009, "XML", "mysql");
        let msg = err.to_string();
        assert!(msg.contains("2009"));
        assert!(msg.contains("XML"));
        assert!(msg.contains("mysql"));
        assert_eq!(err.exit_code(), EXIT_UNSUPPORTED_TYPE);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(MigrateError::Config("x".into()).exit_code(), EXIT_CONFIG_ERROR);
        assert_eq!(
            MigrateError::invalid_model("dup").exit_code(),
            EXIT_MODEL_ERROR
        );
        assert_eq!(
            MigrateError::UnresolvedGenerator(ObjectKind::Index).exit_code(),
            EXIT_GENERATION_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(MigrateError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_format_detailed_includes_message() {
        let err = MigrateError::UnknownDialect("informix".into());
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Unknown database dialect: 'informix'"));
    }
}
