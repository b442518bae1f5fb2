use tracing::debug;

use super::{wrong_kind, GeneratorContext, ObjectKind, SchemaObject, ScriptGenerator};
use crate::core::schema::{Index, Table};
use crate::dialect::Feature;
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::GenerationRun;

/// `CREATE/DROP INDEX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexGenerator;

impl ScriptGenerator for IndexGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Index
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Index { table, index } = *object else {
            return Err(wrong_kind(object));
        };
        if index.primary || run.is_index_inlined(table, index) {
            return Ok(Vec::new());
        }
        let name = ctx.required_entity_name(&NamedEntity::Index { table, index });
        let sql = format!(
            "CREATE {}INDEX {} ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            name,
            ctx.table_name(table),
            ctx.column_list(&index.columns)
        );
        debug!("Generated index {} on {}", name, table.qualified_name());
        Ok(vec![sql])
    }

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Index { table, index } = *object else {
            return Err(wrong_kind(object));
        };
        if index.primary {
            return Ok(Vec::new());
        }
        let dialect = ctx.dialect;
        let entity = NamedEntity::Index { table, index };

        let mut sql = String::from("DROP INDEX ");
        if dialect.supports(Feature::IfExistsBeforeDropIndex) {
            sql.push_str("IF EXISTS ");
        }
        if dialect.supports(Feature::DropIndexOnTable) {
            sql.push_str(&ctx.required_entity_name(&entity));
            sql.push_str(" ON ");
            sql.push_str(&ctx.table_name(table));
        } else {
            sql.push_str(&ctx.qualified_entity_name(&entity));
        }
        Ok(vec![sql])
    }
}

/// Index clause inside `CREATE TABLE`: `[UNIQUE] INDEX [<name>] (<columns>)`.
pub(crate) fn inline_clause(table: &Table, index: &Index, ctx: &GeneratorContext<'_>) -> String {
    let mut sql = String::new();
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str(ctx.dialect.inline_index_keyword());
    if let Some(name) = ctx.entity_name(&NamedEntity::Index { table, index }) {
        sql.push(' ');
        sql.push_str(&name);
    }
    sql.push_str(&format!(" ({})", ctx.column_list(&index.columns)));
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::drivers::{MssqlDialect, MysqlDialect, OracleDialect, PostgresDialect};
    use crate::generator::testing::{all_types, ctx, users};
    use crate::naming::NamingStrategies;

    fn drop(dialect: &Dialect, schema: Option<&str>) -> String {
        let table = users();
        let index = &table.indexes[0];
        let naming = NamingStrategies::default();
        let types = all_types();
        let mut ctx = ctx(dialect, &naming, &types);
        ctx.schema = schema;
        let mut run = GenerationRun::new();
        let object = SchemaObject::Index { table: &table, index };
        IndexGenerator
            .drop_scripts(&object, &ctx, &mut run)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_create_index() {
        let table = users();
        let index = &table.indexes[0];
        let naming = NamingStrategies::default();
        let types = all_types();
        let pg = PostgresDialect::build();
        let mut ctx = ctx(&pg, &naming, &types);
        ctx.schema = Some("app");
        let mut run = GenerationRun::new();
        let object = SchemaObject::Index { table: &table, index };
        assert_eq!(
            IndexGenerator.create_scripts(&object, &ctx, &mut run).unwrap(),
            vec!["CREATE UNIQUE INDEX uk_users_email ON app.users (email)"]
        );
    }

    #[test]
    fn test_inlined_index_is_not_emitted_again() {
        let table = users();
        let index = &table.indexes[0];
        let naming = NamingStrategies::default();
        let types = all_types();
        let d = Dialect::sql2003();
        let ctx = ctx(&d, &naming, &types);
        let mut run = GenerationRun::new();
        run.mark_index_inlined(&table, index);
        let object = SchemaObject::Index { table: &table, index };
        assert!(IndexGenerator
            .create_scripts(&object, &ctx, &mut run)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_drop_index_placement() {
        assert_eq!(
            drop(&PostgresDialect::build(), Some("app")),
            "DROP INDEX IF EXISTS app.uk_users_email"
        );
        assert_eq!(
            drop(&MssqlDialect::build(), Some("dbo")),
            "DROP INDEX IF EXISTS uk_users_email ON dbo.users"
        );
        assert_eq!(
            drop(&MysqlDialect::build(), None),
            "DROP INDEX uk_users_email ON users"
        );
        assert_eq!(
            drop(&OracleDialect::build(), Some("app")),
            "DROP INDEX APP.UK_USERS_EMAIL"
        );
    }

    #[test]
    fn test_inline_clause() {
        let table = users();
        let naming = NamingStrategies::default();
        let types = all_types();
        let mysql = MysqlDialect::build();
        let ctx = ctx(&mysql, &naming, &types);
        assert_eq!(
            inline_clause(&table, &table.indexes[0], &ctx),
            "UNIQUE INDEX uk_users_email (email)"
        );
    }
}
