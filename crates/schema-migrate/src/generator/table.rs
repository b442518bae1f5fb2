//! `CREATE TABLE` and `DROP TABLE`.

use tracing::{debug, warn};

use super::{column, index, primary_key};
use super::{wrong_kind, GeneratorContext, ObjectKind, ObjectType, SchemaObject, ScriptGenerator};
use crate::core::identifier::validate_check_expression;
use crate::core::schema::{Index, Table};
use crate::dialect::Feature;
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::{GenerationRun, GenerationWarning};
use crate::translate::translate_expression;

const BODY_SEPARATOR: &str = ",\n    ";

/// Renders the table body: columns in declaration order, then whatever the
/// dialect accepts inline (primary key, unique constraints, indexes, checks).
///
/// Foreign keys are never part of the body. Indexes inlined here are recorded
/// on the run so [`IndexGenerator`](super::IndexGenerator) skips them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableGenerator;

impl ScriptGenerator for TableGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Table(table) = *object else {
            return Err(wrong_kind(object));
        };
        let dialect = ctx.dialect;
        let table_name = ctx.table_name(table);

        let inline_unique = inline_unique_indexes(table, ctx);
        let mut lines = Vec::with_capacity(table.columns.len() + 2);
        let mut constraints = Vec::new();

        for col in &table.columns {
            let unique_index = inline_unique
                .iter()
                .find(|index| index.columns[0] == col.name);
            let mut column_unique = false;
            if let Some(index) = unique_index {
                match ctx.entity_name(&NamedEntity::Index { table, index }) {
                    Some(name) => constraints.push(format!(
                        "CONSTRAINT {} UNIQUE ({})",
                        name,
                        ctx.column_name(&col.name)
                    )),
                    None if col.nullable || dialect.supports(Feature::NotNullUnique) => {
                        column_unique = true
                    }
                    None => constraints.push(format!("UNIQUE ({})", ctx.column_name(&col.name))),
                }
                run.mark_index_inlined(table, index);
            }
            lines.push(column::definition(table, col, ctx, run, column_unique)?);
        }

        if let Some(key) = &table.primary_key {
            if inlines_primary_key(ctx) {
                lines.push(primary_key::constraint_clause(table, key, ctx));
            }
        }

        lines.append(&mut constraints);

        if ctx.requested(ObjectType::Index) && dialect.supports(Feature::IndexInCreateTable) {
            for index in table.non_primary_indexes() {
                if run.is_index_inlined(table, index) {
                    continue;
                }
                lines.push(index::inline_clause(table, index, ctx));
                run.mark_index_inlined(table, index);
            }
        }

        lines.extend(check_constraints(table, ctx, run)?);

        let mut sql = format!(
            "CREATE TABLE {} (\n    {}\n)",
            table_name,
            lines.join(BODY_SEPARATOR)
        );
        if let Some(comment) = &table.comment {
            if ctx.requested(ObjectType::Comment) {
                if let Some(clause) = dialect.inline_table_comment(comment) {
                    sql.push(' ');
                    sql.push_str(&clause);
                }
            }
        }

        debug!(
            "Generated table {} ({} columns, {} body lines)",
            table_name,
            table.columns.len(),
            lines.len()
        );
        Ok(vec![sql])
    }

    /// `DROP TABLE` with IF EXISTS before or after the name, never both.
    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Table(table) = *object else {
            return Err(wrong_kind(object));
        };
        let dialect = ctx.dialect;
        let before = dialect.supports(Feature::IfExistsBeforeDropTable);
        let after = !before && dialect.supports(Feature::IfExistsAfterDropTable);

        let mut sql = String::from("DROP TABLE ");
        if before {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&ctx.table_name(table));
        if after {
            sql.push_str(" IF EXISTS");
        }
        if let Some(cascade) = dialect.cascade_constraints() {
            sql.push(' ');
            sql.push_str(cascade);
        }
        Ok(vec![sql])
    }
}

/// Whether `CREATE TABLE` carries the primary key, so no separate
/// `ALTER TABLE ... ADD PRIMARY KEY` is needed.
pub(crate) fn inlines_primary_key(ctx: &GeneratorContext<'_>) -> bool {
    ctx.requested(ObjectType::PrimaryKey) && ctx.dialect.supports(Feature::PrimaryKeyInCreateTable)
}

/// Single-column unique indexes rendered as UNIQUE constraints in the body.
fn inline_unique_indexes<'t>(table: &'t Table, ctx: &GeneratorContext<'_>) -> Vec<&'t Index> {
    if !ctx.requested(ObjectType::Index) || !ctx.dialect.supports(Feature::UniqueInCreateTable) {
        return Vec::new();
    }
    let mut seen = Vec::new();
    table
        .non_primary_indexes()
        .filter(|index| index.unique && index.columns.len() == 1)
        // one constraint per column is enough
        .filter(|index| {
            let fresh = !seen.contains(&index.columns[0]);
            seen.push(index.columns[0].clone());
            fresh
        })
        .collect()
}

/// Table-level checks, plus column checks moved to table level when the
/// dialect has no column-level CHECK.
fn check_constraints(
    table: &Table,
    ctx: &GeneratorContext<'_>,
    run: &mut GenerationRun<'_>,
) -> Result<Vec<String>> {
    let dialect = ctx.dialect;
    let mut lines = Vec::new();

    if ctx.requested(ObjectType::ColumnCheck) && !dialect.supports(Feature::ColumnCheck) {
        for col in table.columns.iter() {
            let Some(expression) = &col.check else {
                continue;
            };
            if dialect.supports(Feature::TableCheck) {
                lines.push(column::check_clause(table, col, expression, ctx)?);
            } else {
                omit_check(run, format!("{}.{}", table.qualified_name(), col.name));
            }
        }
    }

    if !ctx.requested(ObjectType::TableCheck) || table.checks.is_empty() {
        return Ok(lines);
    }
    if !dialect.supports(Feature::TableCheck) {
        omit_check(run, table.qualified_name());
        return Ok(lines);
    }
    for (position, check) in table.checks.iter().enumerate() {
        validate_check_expression(&check.expression)?;
        let entity = NamedEntity::Check {
            table,
            column: None,
            name: &check.name,
            expression: &check.expression,
            position,
        };
        let expression = translate_expression(&check.expression, dialect);
        lines.push(match ctx.entity_name(&entity) {
            Some(name) => format!("CONSTRAINT {} CHECK ({})", name, expression),
            None => format!("CHECK ({})", expression),
        });
    }
    Ok(lines)
}

fn omit_check(run: &mut GenerationRun<'_>, object: String) {
    warn!("{}: CHECK not supported by target, omitted", object);
    run.warn(GenerationWarning::UnsupportedClause {
        object,
        clause: "CHECK".to_string(),
    });
}
