//! Naming strategies for constraints, indexes and sequences.
//!
//! Tables and columns keep their model names. Everything else the generators
//! emit gets its physical name from a [`NamingStrategy`], selected once per
//! run and per entity kind through [`NamingStrategies`].
//!
//! Names produced here are logical (unquoted). Rendering them for a target
//! goes through [`Dialect::identifier`] or [`qualified_name`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::schema::{Column, ForeignKey, Index, PrimaryKey, Sequence, Table};
use crate::dialect::Dialect;

/// Number of hex digits kept from the digest in hashed names.
const HASH_DIGITS: usize = 16;

/// Prefixes databases use for names they generate themselves.
const SYSTEM_PREFIXES: &[&str] = &[
    "SYS_C",
    "SYS_IDX_",
    "SYS_PK_",
    "SYS_FK_",
    "SYS_CT_",
    "PK__",
    "FK__",
    "UQ__",
    "DF__",
    "CK__",
    "CONSTRAINT_",
    "PRIMARY_KEY_",
];

/// Policy computing the physical name of a generated entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// The name stored on the entity, verbatim.
    Literal,
    /// `<table>_<columns>_<kind>`.
    Qualify,
    /// `<KIND>_<hash of table, columns and kind>`.
    Hash,
    /// Literal unless empty, database-generated or too long; hashed otherwise.
    #[default]
    Auto,
}

/// A relational entity that needs a generated name.
#[derive(Debug, Clone, Copy)]
pub enum NamedEntity<'a> {
    PrimaryKey {
        table: &'a Table,
        key: &'a PrimaryKey,
    },
    ForeignKey {
        table: &'a Table,
        key: &'a ForeignKey,
    },
    Index {
        table: &'a Table,
        index: &'a Index,
    },
    /// A standalone sequence, or the one owned by an identity column.
    Sequence {
        table: Option<&'a Table>,
        column: Option<&'a Column>,
        sequence: &'a Sequence,
    },
    /// A column check (`column` set) or the `position`-th table check.
    Check {
        table: &'a Table,
        column: Option<&'a Column>,
        name: &'a str,
        expression: &'a str,
        position: usize,
    },
}

impl<'a> NamedEntity<'a> {
    /// Name stored on the model, possibly empty.
    pub fn literal_name(&self) -> &'a str {
        match self {
            NamedEntity::PrimaryKey { key, .. } => &key.name,
            NamedEntity::ForeignKey { key, .. } => &key.name,
            NamedEntity::Index { index, .. } => &index.name,
            NamedEntity::Sequence { sequence, .. } => &sequence.name,
            NamedEntity::Check { name, .. } => name,
        }
    }

    /// Table the entity belongs to.
    pub fn table(&self) -> Option<&'a Table> {
        match self {
            NamedEntity::PrimaryKey { table, .. }
            | NamedEntity::ForeignKey { table, .. }
            | NamedEntity::Index { table, .. }
            | NamedEntity::Check { table, .. } => Some(table),
            NamedEntity::Sequence { table, .. } => *table,
        }
    }

    /// Participating column names.
    pub fn columns(&self) -> Vec<&'a str> {
        match self {
            NamedEntity::PrimaryKey { key, .. } => key.columns.iter().map(String::as_str).collect(),
            NamedEntity::ForeignKey { key, .. } => key.columns.iter().map(String::as_str).collect(),
            NamedEntity::Index { index, .. } => {
                index.columns.iter().map(String::as_str).collect()
            }
            NamedEntity::Sequence { column, .. } | NamedEntity::Check { column, .. } => {
                column.iter().map(|c| c.name.as_str()).collect()
            }
        }
    }

    /// Lower-case suffix used by [`NamingStrategy::Qualify`].
    pub fn suffix(&self) -> &'static str {
        match self {
            NamedEntity::PrimaryKey { .. } => "pk",
            NamedEntity::ForeignKey { .. } => "fk",
            NamedEntity::Index { index, .. } if index.unique => "uk",
            NamedEntity::Index { .. } => "idx",
            NamedEntity::Sequence { .. } => "seq",
            NamedEntity::Check { .. } => "chk",
        }
    }

    /// Upper-case prefix used by [`NamingStrategy::Hash`].
    pub fn hash_prefix(&self) -> &'static str {
        match self {
            NamedEntity::PrimaryKey { .. } => "PK",
            NamedEntity::ForeignKey { .. } => "FK",
            NamedEntity::Index { index, .. } if index.unique => "UK",
            NamedEntity::Index { .. } => "IDX",
            NamedEntity::Sequence { .. } => "SEQ",
            NamedEntity::Check { .. } => "CK",
        }
    }

    fn hash_input(&self) -> String {
        let table = self.table().map(Table::qualified_name).unwrap_or_default();
        let mut input = format!("{}|{}|{}", self.suffix(), table, self.columns().join(","));
        match self {
            NamedEntity::ForeignKey { key, .. } => {
                input.push('|');
                input.push_str(&key.target.qualified_name());
                input.push('|');
                input.push_str(&key.target_columns.join(","));
            }
            NamedEntity::Sequence { sequence, .. } => {
                input.push('|');
                input.push_str(&sequence.name);
            }
            NamedEntity::Index { index, .. } => {
                input.push('|');
                input.push_str(&index.name);
            }
            NamedEntity::Check {
                expression,
                position,
                ..
            } => {
                input.push_str(&format!("|{}|{}", position, expression));
            }
            _ => {}
        }
        input
    }
}

impl NamingStrategy {
    /// Logical name of `entity`.
    ///
    /// `None` means the entity stays unnamed (a literal empty name); the
    /// caller then omits the `CONSTRAINT <name>` clause. The dialect, when
    /// given, bounds the name length.
    pub fn name(self, entity: &NamedEntity<'_>, dialect: Option<&Dialect>) -> Option<String> {
        let max_len = dialect.and_then(Dialect::max_identifier_length);
        match self {
            NamingStrategy::Literal => {
                let literal = entity.literal_name();
                (!literal.is_empty()).then(|| literal.to_string())
            }
            NamingStrategy::Qualify => Some(
                qualify(entity)
                    .filter(|name| fits(name, max_len))
                    .unwrap_or_else(|| hash(entity)),
            ),
            NamingStrategy::Hash => Some(hash(entity)),
            NamingStrategy::Auto => {
                let literal = entity.literal_name();
                if literal.is_empty() || is_system_generated(literal) || !fits(literal, max_len) {
                    Some(hash(entity))
                } else {
                    Some(literal.to_string())
                }
            }
        }
    }

    /// Like [`name`](Self::name), but never leaves the entity unnamed.
    pub fn required_name(self, entity: &NamedEntity<'_>, dialect: Option<&Dialect>) -> String {
        self.name(entity, dialect).unwrap_or_else(|| hash(entity))
    }
}

/// One strategy per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingStrategies {
    pub primary_key: NamingStrategy,
    pub foreign_key: NamingStrategy,
    pub index: NamingStrategy,
    pub sequence: NamingStrategy,
    pub check: NamingStrategy,
}

impl NamingStrategies {
    /// The same strategy for every kind.
    pub fn uniform(strategy: NamingStrategy) -> Self {
        Self {
            primary_key: strategy,
            foreign_key: strategy,
            index: strategy,
            sequence: strategy,
            check: strategy,
        }
    }

    pub fn strategy_for(&self, entity: &NamedEntity<'_>) -> NamingStrategy {
        match entity {
            NamedEntity::PrimaryKey { .. } => self.primary_key,
            NamedEntity::ForeignKey { .. } => self.foreign_key,
            NamedEntity::Index { .. } => self.index,
            NamedEntity::Sequence { .. } => self.sequence,
            NamedEntity::Check { .. } => self.check,
        }
    }

    pub fn name(&self, entity: &NamedEntity<'_>, dialect: Option<&Dialect>) -> Option<String> {
        self.strategy_for(entity).name(entity, dialect)
    }

    pub fn required_name(&self, entity: &NamedEntity<'_>, dialect: Option<&Dialect>) -> String {
        self.strategy_for(entity).required_name(entity, dialect)
    }

    /// Qualified name of `entity` under the given catalog and schema.
    pub fn qualified_name(
        &self,
        entity: &NamedEntity<'_>,
        catalog: Option<&str>,
        schema: Option<&str>,
        dialect: Option<&Dialect>,
    ) -> String {
        let name = self.required_name(entity, dialect);
        qualified_name(&name, catalog, schema, dialect)
    }
}

/// Prefix `name` with catalog and schema.
///
/// With a dialect the parts are rendered with its quoting rules; without one
/// the result is the unquoted logical name used for lookups.
pub fn qualified_name(
    name: &str,
    catalog: Option<&str>,
    schema: Option<&str>,
    dialect: Option<&Dialect>,
) -> String {
    match dialect {
        Some(dialect) => dialect.qualified_name(catalog, schema, name),
        None => [catalog, schema, Some(name)]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("."),
    }
}

/// Whether `name` looks like one a database generated on its own.
pub fn is_system_generated(name: &str) -> bool {
    let upper = name.to_uppercase();
    if upper == "PRIMARY" {
        return true;
    }
    if SYSTEM_PREFIXES.iter().any(|p| upper.starts_with(p)) {
        return true;
    }
    // SQL<digits>, as assigned by DB2 and Derby.
    upper
        .strip_prefix("SQL")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn fits(name: &str, max_len: Option<usize>) -> bool {
    max_len.map_or(true, |max| name.chars().count() <= max)
}

fn qualify(entity: &NamedEntity<'_>) -> Option<String> {
    let table = entity.table()?;
    let columns = entity.columns();
    let name = match entity {
        NamedEntity::Check {
            column: None,
            position,
            ..
        } => format!("{}_{}{}", table.name, entity.suffix(), position + 1),
        _ if columns.is_empty() => format!("{}_{}", table.name, entity.suffix()),
        _ => format!("{}_{}_{}", table.name, columns.join("_"), entity.suffix()),
    };
    Some(name)
}

fn hash(entity: &NamedEntity<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entity.hash_input().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}_{}", entity.hash_prefix(), &digest[..HASH_DIGITS])
}
