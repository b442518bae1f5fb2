//! Configuration type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::identifier::IdentifierCase;
use crate::core::schema::TableType;
use crate::generator::{GroupBy, ObjectType, ScriptType};
use crate::naming::NamingStrategies;
use crate::orchestrator::DanglingForeignKeyPolicy;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target database configuration.
    pub target: TargetConfig,

    /// What to generate and how to order it.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Naming strategy per entity kind.
    #[serde(default)]
    pub naming: NamingStrategies,

    /// Where the script goes.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Dialect name or alias (e.g. "postgres", "mariadb").
    pub dialect: String,

    /// Catalog generated objects are placed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Schema generated objects are placed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Override of the dialect's case folding for unquoted identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_case: Option<IdentifierCase>,
}

/// Generation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Object categories to generate (default: all).
    #[serde(default = "default_object_types")]
    pub object_types: Vec<ObjectType>,

    /// CREATE, DROP or both (default: CREATE).
    #[serde(default = "default_script_types")]
    pub script_types: Vec<ScriptType>,

    /// TABLE or META_DATA (default: TABLE).
    #[serde(default)]
    pub group_by: GroupBy,

    /// Table types to include (default: TABLE).
    #[serde(default = "default_table_types")]
    pub table_types: Vec<TableType>,

    /// emit or fail (default: emit).
    #[serde(default)]
    pub dangling_foreign_keys: DanglingForeignKeyPolicy,

    /// Session time zone to set before everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            object_types: default_object_types(),
            script_types: default_script_types(),
            group_by: GroupBy::default(),
            table_types: default_table_types(),
            dangling_foreign_keys: DanglingForeignKeyPolicy::default(),
            time_zone: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Script file; stdout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Script encoding (default: "utf-8", the only one supported).
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            encoding: default_encoding(),
        }
    }
}

fn default_object_types() -> Vec<ObjectType> {
    ObjectType::ALL.to_vec()
}

fn default_script_types() -> Vec<ScriptType> {
    vec![ScriptType::Create]
}

fn default_table_types() -> Vec<TableType> {
    vec![TableType::Table]
}

fn default_encoding() -> String {
    "utf-8".to_string()
}
