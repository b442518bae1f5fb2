use tracing::{debug, warn};

use super::{wrong_kind, GeneratorContext, ObjectKind, SchemaObject, ScriptGenerator};
use crate::core::schema::{PrimaryKey, Table};
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::{GenerationRun, GenerationWarning};

/// `ALTER TABLE ... ADD/DROP` for primary keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryKeyGenerator;

impl ScriptGenerator for PrimaryKeyGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::PrimaryKey
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::PrimaryKey { table, key } = *object else {
            return Err(wrong_kind(object));
        };
        let sql = format!(
            "ALTER TABLE {} ADD {}",
            ctx.table_name(table),
            constraint_clause(table, key, ctx)
        );
        debug!("Generated primary key on {}", table.qualified_name());
        Ok(vec![sql])
    }

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::PrimaryKey { table, key } = *object else {
            return Err(wrong_kind(object));
        };
        let name = ctx.entity_name(&NamedEntity::PrimaryKey { table, key });
        match ctx.dialect.drop_primary_key(name.as_deref()) {
            Some(clause) => Ok(vec![format!("ALTER TABLE {} {}", ctx.table_name(table), clause)]),
            None => {
                warn!(
                    "Primary key on {} has no name, DROP omitted",
                    table.qualified_name()
                );
                run.warn(GenerationWarning::UnnamedConstraint {
                    table: table.qualified_name(),
                    constraint: "PRIMARY KEY".to_string(),
                });
                Ok(Vec::new())
            }
        }
    }
}

/// `[CONSTRAINT <name>] PRIMARY KEY (<columns>)`.
pub(crate) fn constraint_clause(table: &Table, key: &PrimaryKey, ctx: &GeneratorContext<'_>) -> String {
    let columns = ctx.column_list(&key.columns);
    match ctx.entity_name(&NamedEntity::PrimaryKey { table, key }) {
        Some(name) => format!("CONSTRAINT {} PRIMARY KEY ({})", name, columns),
        None => format!("PRIMARY KEY ({})", columns),
    }
}
