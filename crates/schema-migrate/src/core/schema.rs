//! Schema model: databases, tables, columns, keys, indexes and sequences.
//!
//! The model is produced once by an introspection collaborator (or loaded from
//! a YAML/JSON document) and is read-only for the duration of a generation
//! pass. Columns are referenced by name from keys and indexes.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

use super::types::{JdbcTypeDesc, JdbcTypeOptions};

/// Kind of relation, used by the table-type filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    #[default]
    Table,
    View,
    SystemTable,
    GlobalTemporary,
    LocalTemporary,
    Alias,
    Synonym,
}

/// Referential action for ON UPDATE / ON DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceAction {
    #[default]
    #[serde(alias = "NO ACTION")]
    NoAction,
    Cascade,
    #[serde(alias = "SET NULL")]
    SetNull,
    #[serde(alias = "SET DEFAULT")]
    SetDefault,
    Restrict,
}

impl ReferenceAction {
    /// The SQL-2003 spelling of the action.
    pub fn keyword(self) -> &'static str {
        match self {
            ReferenceAction::NoAction => "NO ACTION",
            ReferenceAction::Cascade => "CASCADE",
            ReferenceAction::SetNull => "SET NULL",
            ReferenceAction::SetDefault => "SET DEFAULT",
            ReferenceAction::Restrict => "RESTRICT",
        }
    }
}

/// Reference to a table by its logical (unquoted) name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// Logical `catalog.schema.name` with absent parts omitted.
    pub fn qualified_name(&self) -> String {
        qualify_parts(self.catalog.as_deref(), self.schema.as_deref(), &self.name)
    }

    /// Whether this reference designates `table`. Parts missing from the
    /// reference match any value.
    pub fn matches(&self, table: &Table) -> bool {
        fn part_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
            match wanted {
                None => true,
                Some(w) => actual == Some(w),
            }
        }
        self.name == table.name
            && part_matches(self.schema.as_deref(), table.schema.as_deref())
            && part_matches(self.catalog.as_deref(), table.catalog.as_deref())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

fn qualify_parts(catalog: Option<&str>, schema: Option<&str>, name: &str) -> String {
    [catalog, schema, Some(name)]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Database metadata: an ordered collection of tables plus standalone sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    /// Source catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Source schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Tables in model order.
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Sequences not owned by any identity column.
    #[serde(default)]
    pub sequences: Vec<Sequence>,
}

impl Database {
    /// Parse a model from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let db: Database = serde_yaml::from_str(yaml)?;
        Ok(db)
    }

    /// Parse a model from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let db: Database = serde_json::from_str(json)?;
        Ok(db)
    }

    /// Find the table a reference designates.
    pub fn find_table(&self, table_ref: &TableRef) -> Option<&Table> {
        self.tables.iter().find(|t| table_ref.matches(t))
    }

    /// Check the model invariants.
    ///
    /// Names must be unique within their containing scope, every key and
    /// index column must belong to its table, foreign key column lists must
    /// line up and every sequence may be owned by at most one column.
    pub fn validate(&self) -> Result<()> {
        let mut table_names = HashSet::new();
        let mut sequence_names = HashSet::new();

        for seq in &self.sequences {
            if !sequence_names.insert(seq.name.clone()) {
                return Err(MigrateError::invalid_model(format!(
                    "duplicate sequence {}",
                    seq.name
                )));
            }
        }

        for table in &self.tables {
            if !table_names.insert(table.qualified_name()) {
                return Err(MigrateError::invalid_model(format!(
                    "duplicate table {}",
                    table.qualified_name()
                )));
            }
            table.validate()?;

            for fk in &table.foreign_keys {
                if let Some(target) = self.find_table(&fk.target) {
                    for col in &fk.target_columns {
                        if target.column(col).is_none() {
                            return Err(MigrateError::invalid_model(format!(
                                "foreign key {} on {} references missing column {}.{}",
                                fk.name,
                                table.qualified_name(),
                                target.qualified_name(),
                                col
                            )));
                        }
                    }
                }
            }

            for col in &table.columns {
                if let Some(seq) = col.sequence.as_ref().filter(|s| !s.name.is_empty()) {
                    if !sequence_names.insert(seq.name.clone()) {
                        return Err(MigrateError::invalid_model(format!(
                            "sequence {} is owned by more than one column (found again on {}.{})",
                            seq.name,
                            table.qualified_name(),
                            col.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Table metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Table name.
    pub name: String,

    /// Relation kind.
    #[serde(default)]
    pub table_type: TableType,

    /// Column definitions in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Primary key, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,

    /// Indexes, including the one backing the primary key if the source reported it.
    #[serde(default)]
    pub indexes: Vec<Index>,

    /// Outgoing foreign keys.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    /// Table-level check constraints.
    #[serde(default)]
    pub checks: Vec<CheckConstraint>,

    /// Table comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get the logical qualified table name.
    pub fn qualified_name(&self) -> String {
        qualify_parts(self.catalog.as_deref(), self.schema.as_deref(), &self.name)
    }

    /// Reference designating exactly this table.
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if the table has a primary key.
    pub fn has_pk(&self) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| !pk.columns.is_empty())
    }

    /// Indexes other than the one backing the primary key.
    pub fn non_primary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| !i.primary)
    }

    /// Columns flagged as identity/auto-increment.
    pub fn identity_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.auto_increment)
    }

    fn validate(&self) -> Result<()> {
        let table = self.qualified_name();
        let mut names = HashSet::new();
        for col in &self.columns {
            if !names.insert(col.name.as_str()) {
                return Err(MigrateError::invalid_model(format!(
                    "duplicate column {}.{}",
                    table, col.name
                )));
            }
        }

        let require_columns = |kind: &str, name: &str, columns: &[String]| -> Result<()> {
            if columns.is_empty() {
                return Err(MigrateError::invalid_model(format!(
                    "{} {} on {} has no columns",
                    kind, name, table
                )));
            }
            for col in columns {
                if !names.contains(col.as_str()) {
                    return Err(MigrateError::invalid_model(format!(
                        "{} {} on {} references missing column {}",
                        kind, name, table, col
                    )));
                }
            }
            Ok(())
        };

        if let Some(pk) = &self.primary_key {
            require_columns("primary key", &pk.name, &pk.columns)?;
        }

        let mut index_names = HashSet::new();
        for idx in &self.indexes {
            if !idx.name.is_empty() && !index_names.insert(idx.name.as_str()) {
                return Err(MigrateError::invalid_model(format!(
                    "duplicate index {} on {}",
                    idx.name, table
                )));
            }
            require_columns("index", &idx.name, &idx.columns)?;
        }

        let mut fk_names = HashSet::new();
        for fk in &self.foreign_keys {
            if !fk.name.is_empty() && !fk_names.insert(fk.name.as_str()) {
                return Err(MigrateError::invalid_model(format!(
                    "duplicate foreign key {} on {}",
                    fk.name, table
                )));
            }
            require_columns("foreign key", &fk.name, &fk.columns)?;
            if fk.columns.len() != fk.target_columns.len() {
                return Err(MigrateError::invalid_model(format!(
                    "foreign key {} on {} has {} source columns but {} target columns",
                    fk.name,
                    table,
                    fk.columns.len(),
                    fk.target_columns.len()
                )));
            }
        }

        Ok(())
    }
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Abstract type identity.
    #[serde(flatten)]
    pub type_desc: JdbcTypeDesc,

    /// Size, precision and scale.
    #[serde(flatten)]
    pub options: JdbcTypeOptions,

    /// Whether the column allows NULL.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Default value as a source literal or expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Whether the column is an identity/auto-increment column.
    #[serde(default)]
    pub auto_increment: bool,

    /// Sequence owned by this identity column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Sequence>,

    /// Column check constraint expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,

    /// Column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>, type_desc: JdbcTypeDesc) -> Self {
        Self {
            name: name.into(),
            type_desc,
            options: JdbcTypeOptions::default(),
            nullable: true,
            default_value: None,
            auto_increment: false,
            sequence: None,
            check: None,
            comment: None,
        }
    }

    pub fn with_options(mut self, options: JdbcTypeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Primary key constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint name (may be empty).
    #[serde(default)]
    pub name: String,

    /// Key column names in key order.
    pub columns: Vec<String>,
}

/// Index metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    /// Index name (may be empty).
    #[serde(default)]
    pub name: String,

    /// Indexed column names in key order.
    pub columns: Vec<String>,

    /// Whether the index is unique.
    #[serde(default)]
    pub unique: bool,

    /// Whether the index backs the primary key.
    #[serde(default)]
    pub primary: bool,
}

/// Foreign key constraint from the owning table to a target table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name (may be empty).
    #[serde(default)]
    pub name: String,

    /// Source column names.
    pub columns: Vec<String>,

    /// Referenced table.
    pub target: TableRef,

    /// Referenced column names, positionally matching `columns`.
    pub target_columns: Vec<String>,

    /// ON UPDATE action.
    #[serde(default)]
    pub on_update: ReferenceAction,

    /// ON DELETE action.
    #[serde(default)]
    pub on_delete: ReferenceAction,
}

/// Table-level check constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConstraint {
    /// Constraint name (may be empty).
    #[serde(default)]
    pub name: String,

    /// Boolean SQL expression.
    pub expression: String,
}

/// Sequence metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence name (may be empty for an implicit identity sequence).
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_with: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment_by: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<i64>,

    #[serde(default)]
    pub cycle: bool,

    #[serde(default)]
    pub order: bool,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
