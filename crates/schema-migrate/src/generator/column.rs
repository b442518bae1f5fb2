//! Column definitions.

use tracing::{debug, warn};

use super::{
    identity_sequence, wrong_kind, GeneratorContext, ObjectKind, ObjectType, SchemaObject,
    ScriptGenerator,
};
use crate::core::identifier::validate_check_expression;
use crate::core::schema::{Column, Table};
use crate::dialect::Feature;
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::{GenerationRun, GenerationWarning};
use crate::translate::{translate_default, translate_expression};

/// `ALTER TABLE ... ADD/DROP COLUMN`, and the column definitions inside
/// `CREATE TABLE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnGenerator;

impl ScriptGenerator for ColumnGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Column
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Column { table, column } = *object else {
            return Err(wrong_kind(object));
        };
        if column.check.is_some()
            && ctx.requested(ObjectType::ColumnCheck)
            && !ctx.dialect.supports(Feature::ColumnCheck)
        {
            unsupported(run, table, column, "CHECK");
        }
        let definition = definition(table, column, ctx, run, false)?;
        Ok(vec![format!(
            "ALTER TABLE {} ADD {}",
            ctx.table_name(table),
            definition
        )])
    }

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Column { table, column } = *object else {
            return Err(wrong_kind(object));
        };
        Ok(vec![format!(
            "ALTER TABLE {} DROP COLUMN {}",
            ctx.table_name(table),
            ctx.column_name(&column.name)
        )])
    }
}

/// Render `<name> <type> [identity | DEFAULT ..] [NOT NULL] [UNIQUE]
/// [CHECK (..)] [COMMENT ..]`.
pub(crate) fn definition(
    table: &Table,
    column: &Column,
    ctx: &GeneratorContext<'_>,
    run: &mut GenerationRun<'_>,
    unique: bool,
) -> Result<String> {
    let dialect = ctx.dialect;
    let type_name = dialect.type_name(&column.type_desc, &column.options)?;
    let mut sql = format!("{} {}", ctx.column_name(&column.name), type_name);

    let identity = if column.auto_increment && ctx.requested(ObjectType::AutoIncrement) {
        let sequence = identity_sequence(column);
        let sequence_name = if dialect.identity_requires_sequence() {
            ctx.identity_sequence_name(table, column)
        } else {
            String::new()
        };
        let clause = dialect.identity_clause(Some(&*sequence), &sequence_name);
        if clause.is_none() {
            unsupported(run, table, column, "identity");
        }
        clause
    } else {
        None
    };

    if let Some(identity) = identity {
        sql.push(' ');
        sql.push_str(&identity);
    } else if let Some(default) = &column.default_value {
        match translate_default(default, dialect) {
            Some(value) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(&value);
            }
            None => unsupported(run, table, column, &format!("DEFAULT {}", default)),
        }
    }

    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if unique {
        sql.push_str(" UNIQUE");
    }

    if let Some(expression) = &column.check {
        if ctx.requested(ObjectType::ColumnCheck) && dialect.supports(Feature::ColumnCheck) {
            sql.push(' ');
            sql.push_str(&check_clause(table, column, expression, ctx)?);
        }
    }

    if let Some(comment) = &column.comment {
        if ctx.requested(ObjectType::Comment) {
            if let Some(clause) = dialect.inline_column_comment(comment) {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }
    }

    debug!("Rendered column {}.{}: {}", table.name, column.name, sql);
    Ok(sql)
}

/// `[CONSTRAINT <name>] CHECK (<expression>)` for a column check.
pub(crate) fn check_clause(
    table: &Table,
    column: &Column,
    expression: &str,
    ctx: &GeneratorContext<'_>,
) -> Result<String> {
    validate_check_expression(expression)?;
    let entity = NamedEntity::Check {
        table,
        column: Some(column),
        name: "",
        expression,
        position: 0,
    };
    let expression = translate_expression(expression, ctx.dialect);
    Ok(match ctx.entity_name(&entity) {
        Some(name) => format!("CONSTRAINT {} CHECK ({})", name, expression),
        None => format!("CHECK ({})", expression),
    })
}

fn unsupported(run: &mut GenerationRun<'_>, table: &Table, column: &Column, clause: &str) {
    let object = format!("{}.{}", table.qualified_name(), column.name);
    warn!("{}: {} not supported by target, omitted", object, clause);
    run.warn(GenerationWarning::UnsupportedClause {
        object,
        clause: clause.to_string(),
    });
}
