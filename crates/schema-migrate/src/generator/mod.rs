//! Per-entity script generators.
//!
//! Every schema object kind has exactly one [`ScriptGenerator`], registered in
//! a closed [`GeneratorRegistry`]. Generators are stateless; everything that
//! changes during a run lives on the
//! [`GenerationRun`](crate::orchestrator::GenerationRun) passed to them.
//!
//! # Object Types
//!
//! The requested [`ObjectType`]s filter which parts of an object are
//! rendered: a table generated without `INDEX` has no inline indexes, a
//! column without `AUTO_INCREMENT` has no identity clause.

mod column;
mod comment;
mod foreign_key;
mod index;
mod primary_key;
mod sequence;
mod table;

pub use column::ColumnGenerator;
pub use comment::CommentGenerator;
pub use foreign_key::ForeignKeyGenerator;
pub use index::IndexGenerator;
pub use primary_key::PrimaryKeyGenerator;
pub use sequence::SequenceGenerator;
pub use table::TableGenerator;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::schema::{Column, ForeignKey, Index, PrimaryKey, Sequence, Table, TableRef};
use crate::dialect::Dialect;
use crate::error::{MigrateError, Result};
use crate::naming::{NamedEntity, NamingStrategies};
use crate::orchestrator::GenerationRun;

/// Category of objects a run is asked to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Table,
    ColumnCheck,
    TableCheck,
    Index,
    ForeignKey,
    AutoIncrement,
    PrimaryKey,
    Sequence,
    Comment,
}

impl ObjectType {
    pub const ALL: [ObjectType; 9] = [
        ObjectType::Table,
        ObjectType::ColumnCheck,
        ObjectType::TableCheck,
        ObjectType::Index,
        ObjectType::ForeignKey,
        ObjectType::AutoIncrement,
        ObjectType::PrimaryKey,
        ObjectType::Sequence,
        ObjectType::Comment,
    ];
}

/// Direction of a script. `Drop` sorts first so both together run
/// DROP then CREATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScriptType {
    Drop,
    Create,
}

/// Emission granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupBy {
    /// Everything for one table, then flush foreign keys it resolves.
    #[default]
    Table,
    /// One phase per object category across the whole database.
    MetaData,
}

/// Runtime kind of a schema object, the key of the generator registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Table,
    Column,
    PrimaryKey,
    ForeignKey,
    Index,
    Sequence,
    Comment,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Table => "table",
            ObjectKind::Column => "column",
            ObjectKind::PrimaryKey => "primary key",
            ObjectKind::ForeignKey => "foreign key",
            ObjectKind::Index => "index",
            ObjectKind::Sequence => "sequence",
            ObjectKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// A schema object handed to a generator.
#[derive(Debug, Clone, Copy)]
pub enum SchemaObject<'a> {
    Table(&'a Table),
    Column {
        table: &'a Table,
        column: &'a Column,
    },
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
    /// A standalone sequence, or the one backing an identity column.
    Sequence {
        table: Option<&'a Table>,
        column: Option<&'a Column>,
        sequence: &'a Sequence,
    },
    /// Table and column comments of a table.
    Comment(&'a Table),
}

impl SchemaObject<'_> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SchemaObject::Table(_) => ObjectKind::Table,
            SchemaObject::Column { .. } => ObjectKind::Column,
            SchemaObject::PrimaryKey { .. } => ObjectKind::PrimaryKey,
            SchemaObject::ForeignKey { .. } => ObjectKind::ForeignKey,
            SchemaObject::Index { .. } => ObjectKind::Index,
            SchemaObject::Sequence { .. } => ObjectKind::Sequence,
            SchemaObject::Comment(_) => ObjectKind::Comment,
        }
    }
}

/// Read-only inputs shared by all generator calls of a run.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub dialect: &'a Dialect,
    pub naming: &'a NamingStrategies,
    pub object_types: &'a HashSet<ObjectType>,
    /// Target catalog every generated object is placed in.
    pub catalog: Option<&'a str>,
    /// Target schema every generated object is placed in.
    pub schema: Option<&'a str>,
}

impl GeneratorContext<'_> {
    pub fn requested(&self, object_type: ObjectType) -> bool {
        self.object_types.contains(&object_type)
    }

    /// Rendered, qualified name of a table in the target.
    pub fn table_name(&self, table: &Table) -> String {
        self.dialect.qualified_name(self.catalog, self.schema, &table.name)
    }

    /// Rendered, qualified name of a referenced table in the target.
    pub fn table_ref_name(&self, table_ref: &TableRef) -> String {
        self.dialect.qualified_name(self.catalog, self.schema, &table_ref.name)
    }

    pub fn column_name(&self, column: &str) -> String {
        self.dialect.identifier(column, false)
    }

    /// Comma-separated rendered column names.
    pub fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.column_name(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Rendered constraint/index name; `None` leaves the object unnamed.
    pub fn entity_name(&self, entity: &NamedEntity<'_>) -> Option<String> {
        self.naming
            .name(entity, Some(self.dialect))
            .map(|name| self.dialect.identifier(&name, false))
    }

    /// Rendered constraint/index name, synthesized when the model has none.
    pub fn required_entity_name(&self, entity: &NamedEntity<'_>) -> String {
        let name = self.naming.required_name(entity, Some(self.dialect));
        self.dialect.identifier(&name, false)
    }

    /// Rendered name qualified with the target catalog and schema.
    pub fn qualified_entity_name(&self, entity: &NamedEntity<'_>) -> String {
        self.naming
            .qualified_name(entity, self.catalog, self.schema, Some(self.dialect))
    }

    /// Rendered, qualified name of the sequence backing an identity column.
    pub fn identity_sequence_name(&self, table: &Table, column: &Column) -> String {
        let sequence = identity_sequence(column);
        let entity = NamedEntity::Sequence {
            table: Some(table),
            column: Some(column),
            sequence: &*sequence,
        };
        self.qualified_entity_name(&entity)
    }
}

/// The sequence owned by an identity column, or an unnamed implicit one.
pub fn identity_sequence(column: &Column) -> Cow<'_, Sequence> {
    match &column.sequence {
        Some(sequence) => Cow::Borrowed(sequence),
        None => Cow::Owned(Sequence::default()),
    }
}

/// Renders CREATE and DROP statements for one object kind.
pub trait ScriptGenerator: Send + Sync {
    fn kind(&self) -> ObjectKind;

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>>;

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>>;
}

/// Closed map from object kind to its generator.
pub struct GeneratorRegistry {
    generators: HashMap<ObjectKind, Box<dyn ScriptGenerator>>,
}

impl GeneratorRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// A registry with the generator of every object kind.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(TableGenerator);
        registry.register(ColumnGenerator);
        registry.register(PrimaryKeyGenerator);
        registry.register(ForeignKeyGenerator);
        registry.register(IndexGenerator);
        registry.register(SequenceGenerator);
        registry.register(CommentGenerator);
        registry
    }

    /// Register a generator under its kind, replacing any previous one.
    pub fn register(&mut self, generator: impl ScriptGenerator + 'static) {
        self.generators.insert(generator.kind(), Box::new(generator));
    }

    pub fn get(&self, kind: ObjectKind) -> Result<&dyn ScriptGenerator> {
        self.generators
            .get(&kind)
            .map(|g| g.as_ref())
            .ok_or(MigrateError::UnresolvedGenerator(kind))
    }

    pub fn contains(&self, kind: ObjectKind) -> bool {
        self.generators.contains_key(&kind)
    }

    pub fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        self.get(object.kind())?.create_scripts(object, ctx, run)
    }

    pub fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        self.get(object.kind())?.drop_scripts(object, ctx, run)
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.generators.keys().collect();
        kinds.sort();
        f.debug_struct("GeneratorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

/// Error for a generator handed an object of another kind.
fn wrong_kind(object: &SchemaObject<'_>) -> MigrateError {
    MigrateError::UnresolvedGenerator(object.kind())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_covers_every_kind() {
        let registry = GeneratorRegistry::builtin();
        for kind in [
            ObjectKind::Table,
            ObjectKind::Column,
            ObjectKind::PrimaryKey,
            ObjectKind::ForeignKey,
            ObjectKind::Index,
            ObjectKind::Sequence,
            ObjectKind::Comment,
        ] {
            assert!(registry.contains(kind), "missing {}", kind);
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_empty_registry_reports_unresolved_kind() {
        let registry = GeneratorRegistry::empty();
        let err = registry.get(ObjectKind::Index).err().unwrap();
        assert!(matches!(err, MigrateError::UnresolvedGenerator(ObjectKind::Index)));
        assert_eq!(err.to_string(), "No script generator registered for index");
    }

    #[test]
    fn test_script_type_order_is_drop_then_create() {
        let mut types = vec![ScriptType::Create, ScriptType::Drop];
        types.sort();
        assert_eq!(types, vec![ScriptType::Drop, ScriptType::Create]);
    }

    #[test]
    fn test_object_type_names() {
        let parsed: Vec<ObjectType> =
            serde_yaml::from_str("[TABLE, COLUMN_CHECK, AUTO_INCREMENT, FOREIGN_KEY]").unwrap();
        assert_eq!(
            parsed,
            vec![
                ObjectType::Table,
                ObjectType::ColumnCheck,
                ObjectType::AutoIncrement,
                ObjectType::ForeignKey
            ]
        );
        let group: GroupBy = serde_yaml::from_str("META_DATA").unwrap();
        assert_eq!(group, GroupBy::MetaData);
    }
}
