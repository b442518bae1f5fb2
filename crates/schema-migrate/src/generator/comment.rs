use tracing::{debug, warn};

use super::{wrong_kind, GeneratorContext, ObjectKind, SchemaObject, ScriptGenerator};
use crate::dialect::CommentStyle;
use crate::error::Result;
use crate::orchestrator::{GenerationRun, GenerationWarning};

/// `COMMENT ON TABLE/COLUMN` statements for statement-style dialects.
///
/// Inline-style dialects render comments inside `CREATE TABLE`, so this
/// generator has nothing to add for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentGenerator;

impl ScriptGenerator for CommentGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Comment
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Comment(table) = *object else {
            return Err(wrong_kind(object));
        };
        let dialect = ctx.dialect;
        let commented = table.comment.is_some() || table.columns.iter().any(|c| c.comment.is_some());
        if !commented {
            return Ok(Vec::new());
        }

        match dialect.comment_style() {
            CommentStyle::Inline => Ok(Vec::new()),
            CommentStyle::None => {
                let object = table.qualified_name();
                warn!("{}: comments not supported by {}, omitted", object, dialect);
                run.warn(GenerationWarning::UnsupportedClause {
                    object,
                    clause: "COMMENT".to_string(),
                });
                Ok(Vec::new())
            }
            CommentStyle::Statement => {
                let table_name = ctx.table_name(table);
                let mut scripts = Vec::new();
                if let Some(comment) = &table.comment {
                    scripts.extend(dialect.table_comment_statement(&table_name, comment));
                }
                for column in &table.columns {
                    if let Some(comment) = &column.comment {
                        scripts.extend(dialect.column_comment_statement(
                            &table_name,
                            &ctx.column_name(&column.name),
                            comment,
                        ));
                    }
                }
                debug!("Generated {} comments on {}", scripts.len(), table_name);
                Ok(scripts)
            }
        }
    }

    /// Comments go away with their table.
    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        _ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        match object {
            SchemaObject::Comment(_) => Ok(Vec::new()),
            _ => Err(wrong_kind(object)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Table;
    use crate::dialect::Dialect;
    use crate::drivers::{MssqlDialect, MysqlDialect, PostgresDialect};
    use crate::generator::testing::{all_types, ctx, users};
    use crate::naming::NamingStrategies;

    fn commented_users() -> Table {
        let mut table = users();
        table.comment = Some("Registered users".to_string());
        table.columns[1].comment = Some("Login, it's unique".to_string());
        table
    }

    fn create(dialect: &Dialect, table: &Table) -> (Vec<String>, usize) {
        let naming = NamingStrategies::default();
        let types = all_types();
        let ctx = ctx(dialect, &naming, &types);
        let mut run = GenerationRun::new();
        let scripts = CommentGenerator
            .create_scripts(&SchemaObject::Comment(table), &ctx, &mut run)
            .unwrap();
        (scripts, run.warnings().len())
    }

    #[test]
    fn test_statement_comments() {
        let (scripts, _) = create(&PostgresDialect::build(), &commented_users());
        assert_eq!(
            scripts,
            vec![
                "COMMENT ON TABLE users IS 'Registered users'",
                "COMMENT ON COLUMN users.email IS 'Login, it''s unique'",
            ]
        );
    }

    #[test]
    fn test_inline_dialect_emits_nothing() {
        let (scripts, warnings) = create(&MysqlDialect::build(), &commented_users());
        assert!(scripts.is_empty());
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_no_comment_support_warns() {
        let (scripts, warnings) = create(&MssqlDialect::build(), &commented_users());
        assert!(scripts.is_empty());
        assert_eq!(warnings, 1);

        let (_, warnings) = create(&MssqlDialect::build(), &users());
        assert_eq!(warnings, 0);
    }
}
