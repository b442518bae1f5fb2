//! Script orchestrator - assembles one dependency-ordered script for a
//! whole database.
//!
//! Foreign keys whose target table has not been created yet are parked on the
//! [`GenerationRun`] and flushed as soon as the target is processed, so the
//! script replays cleanly even with forward or circular references.

mod run;

pub use run::{DanglingForeignKeyPolicy, GenerationRun, GenerationWarning, PendingForeignKey};

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::schema::{Database, Table, TableType};
use crate::dialect::{Dialect, Feature};
use crate::error::{MigrateError, Result};
use crate::generator::{
    identity_sequence, GeneratorContext, GeneratorRegistry, GroupBy, ObjectType, SchemaObject,
    ScriptType,
};
use crate::naming::NamingStrategies;

/// What a generation pass produces and how it is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Target catalog for every generated object.
    pub catalog: Option<String>,

    /// Target schema for every generated object.
    pub schema: Option<String>,

    /// Object categories to generate.
    pub object_types: HashSet<ObjectType>,

    /// Script directions; both together yield DROP then CREATE.
    pub script_types: BTreeSet<ScriptType>,

    pub group_by: GroupBy,

    /// Only tables of these types are generated.
    pub table_types: HashSet<TableType>,

    pub naming: NamingStrategies,

    pub dangling_foreign_keys: DanglingForeignKeyPolicy,

    /// Session time zone set by the first statement, when supported.
    pub time_zone: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            catalog: None,
            schema: None,
            object_types: ObjectType::ALL.into_iter().collect(),
            script_types: [ScriptType::Create].into_iter().collect(),
            group_by: GroupBy::Table,
            table_types: [TableType::Table].into_iter().collect(),
            naming: NamingStrategies::default(),
            dangling_foreign_keys: DanglingForeignKeyPolicy::Emit,
            time_zone: None,
        }
    }
}

/// Result of a generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Unique run identifier.
    pub run_id: String,

    /// Name of the target dialect.
    pub dialect: String,

    /// When the script was generated.
    pub generated_at: DateTime<Utc>,

    /// Statements in execution order, without terminators.
    pub scripts: Vec<String>,

    /// Everything the run left out or emitted against its will.
    pub warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    pub fn statement_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Foreign keys emitted although their target was never created.
    pub fn dangling_foreign_keys(&self) -> impl Iterator<Item = &GenerationWarning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w, GenerationWarning::DanglingForeignKey { .. }))
    }
}

/// Script orchestrator.
///
/// Holds the target dialect, the generator registry and the options; all of
/// it is read-only, so one orchestrator can serve many runs. Per-run state
/// lives on a fresh [`GenerationRun`] inside [`generate`](Self::generate).
#[derive(Debug)]
pub struct ScriptOrchestrator {
    dialect: Arc<Dialect>,
    generators: GeneratorRegistry,
    options: GenerationOptions,
}

impl ScriptOrchestrator {
    /// Create an orchestrator with the built-in generators.
    pub fn new(dialect: Arc<Dialect>, options: GenerationOptions) -> Self {
        Self::with_generators(dialect, GeneratorRegistry::builtin(), options)
    }

    pub fn with_generators(
        dialect: Arc<Dialect>,
        generators: GeneratorRegistry,
        options: GenerationOptions,
    ) -> Self {
        Self {
            dialect,
            generators,
            options,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate the script for a database.
    pub fn generate(&self, db: &Database) -> Result<GenerationReport> {
        let generated_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        db.validate()?;

        let ctx = GeneratorContext {
            dialect: &self.dialect,
            naming: &self.options.naming,
            object_types: &self.options.object_types,
            catalog: self.options.catalog.as_deref(),
            schema: self.options.schema.as_deref(),
        };

        let tables: Vec<&Table> = db
            .tables
            .iter()
            .filter(|t| {
                let keep = self.options.table_types.contains(&t.table_type);
                if !keep {
                    debug!("Skipping {} ({:?})", t.qualified_name(), t.table_type);
                }
                keep
            })
            .collect();

        info!(
            "Starting generation run {} for {} ({} of {} tables)",
            run_id,
            self.dialect,
            tables.len(),
            db.tables.len()
        );

        let mut run = GenerationRun::new();
        self.session_time_zone(&mut run);

        for script_type in &self.options.script_types {
            match script_type {
                ScriptType::Drop => {
                    info!("Phase: DROP");
                    self.drop_phase(db, &tables, &ctx, &mut run)?;
                }
                ScriptType::Create => {
                    info!("Phase: CREATE ({:?})", self.options.group_by);
                    self.create_phase(db, &tables, &ctx, &mut run)?;
                }
            }
        }

        let (scripts, warnings) = run.into_parts();
        info!(
            "Generation run {} complete: {} statements, {} warnings",
            run_id,
            scripts.len(),
            warnings.len()
        );

        Ok(GenerationReport {
            run_id,
            dialect: self.dialect.name().to_string(),
            generated_at,
            scripts,
            warnings,
        })
    }

    fn session_time_zone(&self, run: &mut GenerationRun<'_>) {
        let Some(zone) = self.options.time_zone.as_deref() else {
            return;
        };
        match self.dialect.session_time_zone(zone) {
            Some(sql) => run.push_script(sql),
            None => {
                warn!("{} cannot set session time zone {}", self.dialect, zone);
                run.warn(GenerationWarning::SessionTimeZone {
                    zone: zone.to_string(),
                });
            }
        }
    }

    fn requested(&self, object_type: ObjectType) -> bool {
        self.options.object_types.contains(&object_type)
    }

    // =========================================================================
    // DROP
    // =========================================================================

    /// Foreign keys, then tables, then sequences, each in reverse model order.
    fn drop_phase<'db>(
        &self,
        db: &'db Database,
        tables: &[&'db Table],
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'db>,
    ) -> Result<()> {
        if self.requested(ObjectType::ForeignKey) && self.dialect.supports(Feature::DropConstraints) {
            for &table in tables.iter().rev() {
                for key in &table.foreign_keys {
                    let object = SchemaObject::ForeignKey { table, key };
                    let scripts = self.generators.drop_scripts(&object, ctx, run)?;
                    run.extend_scripts(scripts);
                }
            }
        }

        if self.requested(ObjectType::Table) {
            for &table in tables.iter().rev() {
                debug!("Dropping table: {}", table.qualified_name());
                let scripts = self
                    .generators
                    .drop_scripts(&SchemaObject::Table(table), ctx, run)?;
                run.extend_scripts(scripts);
            }
        }

        if self.requested(ObjectType::AutoIncrement) && self.dialect.identity_requires_sequence() {
            for &table in tables.iter().rev() {
                for column in table.identity_columns() {
                    let sequence = identity_sequence(column);
                    let object = SchemaObject::Sequence {
                        table: Some(table),
                        column: Some(column),
                        sequence: &*sequence,
                    };
                    let scripts = self.generators.drop_scripts(&object, ctx, run)?;
                    run.extend_scripts(scripts);
                }
            }
        }

        if self.requested(ObjectType::Sequence) {
            for sequence in db.sequences.iter().rev() {
                let object = SchemaObject::Sequence {
                    table: None,
                    column: None,
                    sequence,
                };
                let scripts = self.generators.drop_scripts(&object, ctx, run)?;
                run.extend_scripts(scripts);
            }
        }
        Ok(())
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    fn create_phase<'db>(
        &self,
        db: &'db Database,
        tables: &[&'db Table],
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'db>,
    ) -> Result<()> {
        if self.requested(ObjectType::Sequence) {
            for sequence in &db.sequences {
                let object = SchemaObject::Sequence {
                    table: None,
                    column: None,
                    sequence,
                };
                let scripts = self.generators.create_scripts(&object, ctx, run)?;
                run.extend_scripts(scripts);
            }
        }

        match self.options.group_by {
            GroupBy::Table => {
                for &table in tables {
                    self.create_identity_sequences(table, ctx, run)?;
                    self.create_table(table, ctx, run)?;
                    self.create_primary_key(table, ctx, run)?;
                    self.create_indexes(table, ctx, run)?;
                    self.create_comments(table, ctx, run)?;
                    self.create_foreign_keys(db, table, ctx, run)?;
                    self.flush_resolved(ctx, run)?;
                }
            }
            GroupBy::MetaData => {
                for &table in tables {
                    self.create_identity_sequences(table, ctx, run)?;
                }
                for &table in tables {
                    self.create_table(table, ctx, run)?;
                }
                for &table in tables {
                    self.create_primary_key(table, ctx, run)?;
                }
                for &table in tables {
                    self.create_indexes(table, ctx, run)?;
                }
                for &table in tables {
                    self.create_comments(table, ctx, run)?;
                }
                for &table in tables {
                    self.create_foreign_keys(db, table, ctx, run)?;
                }
                self.flush_resolved(ctx, run)?;
            }
        }

        self.flush_dangling(ctx, run)
    }

    /// Sequences backing identity columns, created ahead of their table.
    fn create_identity_sequences(
        &self,
        table: &Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<()> {
        if !self.requested(ObjectType::AutoIncrement) || !self.dialect.identity_requires_sequence() {
            return Ok(());
        }
        for column in table.identity_columns() {
            let sequence = identity_sequence(column);
            let object = SchemaObject::Sequence {
                table: Some(table),
                column: Some(column),
                sequence: &*sequence,
            };
            let scripts = self.generators.create_scripts(&object, ctx, run)?;
            run.extend_scripts(scripts);
        }
        Ok(())
    }

    /// Marks the table processed and emits `CREATE TABLE` when requested.
    fn create_table(
        &self,
        table: &Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<()> {
        run.mark_processed(table);
        if !self.requested(ObjectType::Table) {
            return Ok(());
        }
        debug!("Creating table: {}", table.qualified_name());
        let scripts = self
            .generators
            .create_scripts(&SchemaObject::Table(table), ctx, run)?;
        run.extend_scripts(scripts);
        Ok(())
    }

    fn create_primary_key(
        &self,
        table: &Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<()> {
        let Some(key) = &table.primary_key else {
            return Ok(());
        };
        if !self.requested(ObjectType::PrimaryKey) {
            return Ok(());
        }
        let inlined = self.requested(ObjectType::Table)
            && self.dialect.supports(Feature::PrimaryKeyInCreateTable);
        if inlined {
            return Ok(());
        }
        debug!("Creating PK for: {}", table.qualified_name());
        let scripts = self
            .generators
            .create_scripts(&SchemaObject::PrimaryKey { table, key }, ctx, run)?;
        run.extend_scripts(scripts);
        Ok(())
    }

    fn create_indexes(
        &self,
        table: &Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<()> {
        if !self.requested(ObjectType::Index) {
            return Ok(());
        }
        for index in table.non_primary_indexes() {
            let scripts = self
                .generators
                .create_scripts(&SchemaObject::Index { table, index }, ctx, run)?;
            run.extend_scripts(scripts);
        }
        Ok(())
    }

    fn create_comments(
        &self,
        table: &Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<()> {
        if !self.requested(ObjectType::Comment) {
            return Ok(());
        }
        let scripts = self
            .generators
            .create_scripts(&SchemaObject::Comment(table), ctx, run)?;
        run.extend_scripts(scripts);
        Ok(())
    }

    /// Emits foreign keys whose target is processed and parks the rest.
    fn create_foreign_keys<'db>(
        &self,
        db: &'db Database,
        table: &'db Table,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'db>,
    ) -> Result<()> {
        if !self.requested(ObjectType::ForeignKey) {
            return Ok(());
        }
        for key in &table.foreign_keys {
            let target_key = db
                .find_table(&key.target)
                .map(Table::qualified_name)
                .unwrap_or_else(|| key.target.qualified_name());
            if run.is_processed(&target_key) {
                let scripts = self
                    .generators
                    .create_scripts(&SchemaObject::ForeignKey { table, key }, ctx, run)?;
                run.extend_scripts(scripts);
            } else {
                debug!(
                    "Deferring FK {} on {} until {} is created",
                    key.name,
                    table.qualified_name(),
                    target_key
                );
                run.defer(target_key, table, key);
            }
        }
        Ok(())
    }

    fn flush_resolved(&self, ctx: &GeneratorContext<'_>, run: &mut GenerationRun<'_>) -> Result<()> {
        for pending in run.take_resolved() {
            let object = SchemaObject::ForeignKey {
                table: pending.table,
                key: pending.foreign_key,
            };
            let scripts = self.generators.create_scripts(&object, ctx, run)?;
            run.extend_scripts(scripts);
        }
        Ok(())
    }

    /// Foreign keys whose target never showed up: emitted with a warning, or
    /// an error under [`DanglingForeignKeyPolicy::Fail`].
    fn flush_dangling(&self, ctx: &GeneratorContext<'_>, run: &mut GenerationRun<'_>) -> Result<()> {
        for (target, pending) in run.take_all_pending() {
            let foreign_key = pending.foreign_key.name.clone();
            let table = pending.table.qualified_name();
            match self.options.dangling_foreign_keys {
                DanglingForeignKeyPolicy::Fail => {
                    return Err(MigrateError::DanglingForeignKey {
                        foreign_key,
                        table,
                        target,
                    });
                }
                DanglingForeignKeyPolicy::Emit => {
                    warn!(
                        "FK {} on {} references {}, which was not generated; emitting anyway",
                        foreign_key, table, target
                    );
                    let object = SchemaObject::ForeignKey {
                        table: pending.table,
                        key: pending.foreign_key,
                    };
                    let scripts = self.generators.create_scripts(&object, ctx, run)?;
                    run.extend_scripts(scripts);
                    run.warn(GenerationWarning::DanglingForeignKey {
                        foreign_key,
                        table,
                        target,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, ForeignKey, PrimaryKey, Sequence, TableRef};
    use crate::core::types::{codes, JdbcTypeDesc};
    use crate::drivers::{MssqlDialect, MysqlDialect, PostgresDialect};
    use crate::generator::ObjectKind;

    fn table(name: &str, refs: &[&str]) -> Table {
        let mut table = Table::new(name);
        table.columns = vec![Column::new("id", JdbcTypeDesc::from_code(codes::INTEGER)).not_null()];
        table.primary_key = Some(PrimaryKey {
            name: format!("pk_{}", name),
            columns: vec!["id".to_string()],
        });
        for target in refs {
            let column = format!("{}_id", target);
            table
                .columns
                .push(Column::new(column.clone(), JdbcTypeDesc::from_code(codes::INTEGER)));
            table.foreign_keys.push(ForeignKey {
                name: format!("fk_{}_{}", name, target),
                columns: vec![column],
                target: TableRef::new(*target),
                target_columns: vec!["id".to_string()],
                ..ForeignKey::default()
            });
        }
        table
    }

    fn db(tables: Vec<Table>) -> Database {
        Database {
            tables,
            ..Database::default()
        }
    }

    fn orchestrator(options: GenerationOptions) -> ScriptOrchestrator {
        ScriptOrchestrator::new(Arc::new(PostgresDialect::build()), options)
    }

    fn position(scripts: &[String], needle: &str) -> usize {
        scripts
            .iter()
            .position(|s| s.contains(needle))
            .unwrap_or_else(|| panic!("no statement contains {:?}: {:#?}", needle, scripts))
    }

    #[test]
    fn test_forward_reference_is_deferred_until_target_exists() {
        let db = db(vec![table("b", &["a"]), table("a", &[])]);
        let report = orchestrator(GenerationOptions::default()).generate(&db).unwrap();
        let s = &report.scripts;
        assert!(position(s, "CREATE TABLE a") < position(s, "FOREIGN KEY (a_id)"));
        assert!(position(s, "CREATE TABLE b") < position(s, "FOREIGN KEY (a_id)"));
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_meta_data_grouping_emits_foreign_keys_last() {
        let db = db(vec![table("a", &[]), table("b", &["a"])]);
        let options = GenerationOptions {
            group_by: GroupBy::MetaData,
            ..GenerationOptions::default()
        };
        let report = orchestrator(options).generate(&db).unwrap();
        assert_eq!(
            report.scripts,
            vec![
                "CREATE TABLE a (\n    id INTEGER NOT NULL,\n    CONSTRAINT pk_a PRIMARY KEY (id)\n)",
                "CREATE TABLE b (\n    id INTEGER NOT NULL,\n    a_id INTEGER,\n    \
                 CONSTRAINT pk_b PRIMARY KEY (id)\n)",
                "ALTER TABLE b ADD CONSTRAINT fk_b_a FOREIGN KEY (a_id) REFERENCES a (id)",
            ]
        );
    }

    #[test]
    fn test_dangling_policy() {
        let db = db(vec![table("b", &["missing"])]);
        let report = orchestrator(GenerationOptions::default()).generate(&db).unwrap();
        assert!(report.scripts.last().unwrap().contains("REFERENCES missing"));
        assert_eq!(report.dangling_foreign_keys().count(), 1);

        let options = GenerationOptions {
            dangling_foreign_keys: DanglingForeignKeyPolicy::Fail,
            ..GenerationOptions::default()
        };
        let err = orchestrator(options).generate(&db).unwrap_err();
        assert!(matches!(err, MigrateError::DanglingForeignKey { .. }));
    }

    #[test]
    fn test_table_type_filter_leaves_references_dangling() {
        let mut view = table("v", &[]);
        view.table_type = TableType::View;
        let db = db(vec![view, table("b", &["v"])]);
        let report = orchestrator(GenerationOptions::default()).generate(&db).unwrap();
        assert!(report.scripts.iter().all(|s| !s.contains("CREATE TABLE v")));
        assert_eq!(report.dangling_foreign_keys().count(), 1);
    }

    #[test]
    fn test_identity_sequence_precedes_table() {
        let mut t = table("orders", &[]);
        t.columns[0].auto_increment = true;
        t.columns[0].sequence = Some(Sequence::new("orders_seq"));
        let db = db(vec![t]);
        let report = orchestrator(GenerationOptions::default()).generate(&db).unwrap();
        assert_eq!(report.scripts[0], "CREATE SEQUENCE orders_seq");
        assert!(report.scripts[1].contains("DEFAULT nextval('orders_seq')"));

        let mysql = ScriptOrchestrator::new(Arc::new(MysqlDialect::build()), GenerationOptions::default());
        let report = mysql.generate(&db).unwrap();
        assert!(report.scripts[0].starts_with("CREATE TABLE orders"));
    }

    #[test]
    fn test_drop_then_create() {
        let mut db = db(vec![table("a", &[]), table("b", &["a"])]);
        db.sequences.push(Sequence::new("counter"));
        let options = GenerationOptions {
            script_types: [ScriptType::Create, ScriptType::Drop].into_iter().collect(),
            ..GenerationOptions::default()
        };
        let report = orchestrator(options).generate(&db).unwrap();
        assert_eq!(
            &report.scripts[..4],
            &[
                "ALTER TABLE b DROP CONSTRAINT fk_b_a",
                "DROP TABLE IF EXISTS b CASCADE",
                "DROP TABLE IF EXISTS a CASCADE",
                "DROP SEQUENCE IF EXISTS counter",
            ]
        );
        assert_eq!(report.scripts[4], "CREATE SEQUENCE counter");
    }

    #[test]
    fn test_session_time_zone() {
        let options = GenerationOptions {
            time_zone: Some("UTC".to_string()),
            ..GenerationOptions::default()
        };
        let report = orchestrator(options.clone()).generate(&db(vec![])).unwrap();
        assert_eq!(report.scripts, vec!["SET TIME ZONE 'UTC'"]);

        let mssql = ScriptOrchestrator::new(Arc::new(MssqlDialect::build()), options);
        let report = mssql.generate(&db(vec![])).unwrap();
        assert!(report.scripts.is_empty());
        assert_eq!(
            report.warnings,
            vec![GenerationWarning::SessionTimeZone { zone: "UTC".to_string() }]
        );
    }

    #[test]
    fn test_missing_generator_aborts() {
        let mut registry = GeneratorRegistry::empty();
        registry.register(crate::generator::TableGenerator);
        let orchestrator = ScriptOrchestrator::with_generators(
            Arc::new(PostgresDialect::build()),
            registry,
            GenerationOptions::default(),
        );
        let err = orchestrator.generate(&db(vec![table("a", &[])])).unwrap_err();
        assert!(matches!(err, MigrateError::UnresolvedGenerator(ObjectKind::Comment)));
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let db = db(vec![table("a", &[]), table("a", &[])]);
        let err = orchestrator(GenerationOptions::default()).generate(&db).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidModel(_)));
    }
}
