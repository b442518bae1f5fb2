use tracing::{debug, warn};

use super::{wrong_kind, GeneratorContext, ObjectKind, SchemaObject, ScriptGenerator};
use crate::core::schema::{ForeignKey, ReferenceAction, Table};
use crate::dialect::Feature;
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::{GenerationRun, GenerationWarning};

/// `ALTER TABLE ... ADD/DROP` for foreign keys.
///
/// Foreign keys are never inlined into `CREATE TABLE`; the orchestrator
/// decides when each one is emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeignKeyGenerator;

impl ScriptGenerator for ForeignKeyGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::ForeignKey
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::ForeignKey { table, key } = *object else {
            return Err(wrong_kind(object));
        };
        let sql = format!(
            "ALTER TABLE {} ADD {}",
            ctx.table_name(table),
            constraint_clause(table, key, ctx, run)
        );
        debug!(
            "Generated foreign key {} on {} -> {}",
            key.name,
            table.qualified_name(),
            key.target
        );
        Ok(vec![sql])
    }

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::ForeignKey { table, key } = *object else {
            return Err(wrong_kind(object));
        };
        if !ctx.dialect.supports(Feature::DropConstraints) {
            return Ok(Vec::new());
        }
        // Same resolution as CREATE, so DROP never names what CREATE left unnamed.
        let Some(name) = ctx.entity_name(&NamedEntity::ForeignKey { table, key }) else {
            warn!(
                "Foreign key on {} has no name, DROP omitted",
                table.qualified_name()
            );
            run.warn(GenerationWarning::UnnamedConstraint {
                table: table.qualified_name(),
                constraint: "FOREIGN KEY".to_string(),
            });
            return Ok(Vec::new());
        };
        Ok(vec![format!(
            "ALTER TABLE {} {} {}",
            ctx.table_name(table),
            ctx.dialect.drop_foreign_key(),
            name
        )])
    }
}

/// `[CONSTRAINT <name>] FOREIGN KEY (..) REFERENCES <target> (..) [ON UPDATE ..]
/// [ON DELETE ..]`.
pub(crate) fn constraint_clause(
    table: &Table,
    key: &ForeignKey,
    ctx: &GeneratorContext<'_>,
    run: &mut GenerationRun<'_>,
) -> String {
    let mut sql = String::new();
    if let Some(name) = ctx.entity_name(&NamedEntity::ForeignKey { table, key }) {
        sql.push_str("CONSTRAINT ");
        sql.push_str(&name);
        sql.push(' ');
    }
    sql.push_str(&format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        ctx.column_list(&key.columns),
        ctx.table_ref_name(&key.target),
        ctx.column_list(&key.target_columns)
    ));

    let on_update = ctx.dialect.update_action(key.on_update);
    if let Some(clause) = action_clause(table, key, "ON UPDATE", key.on_update, on_update, run) {
        sql.push_str(&clause);
    }
    let on_delete = ctx.dialect.delete_action(key.on_delete);
    if let Some(clause) = action_clause(table, key, "ON DELETE", key.on_delete, on_delete, run) {
        sql.push_str(&clause);
    }
    sql
}

/// A NO ACTION the dialect maps to nothing is the default and dropped
/// silently; any other unmapped action is reported.
fn action_clause(
    table: &Table,
    key: &ForeignKey,
    prefix: &str,
    action: ReferenceAction,
    keyword: Option<&str>,
    run: &mut GenerationRun<'_>,
) -> Option<String> {
    match keyword {
        Some(keyword) => Some(format!(" {} {}", prefix, keyword)),
        None if action == ReferenceAction::NoAction => None,
        None => {
            let object = format!("{} ({})", key.name, table.qualified_name());
            let clause = format!("{} {}", prefix, action.keyword());
            warn!("{}: {} not supported by target, omitted", object, clause);
            run.warn(GenerationWarning::UnsupportedClause { object, clause });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::TableRef;
    use crate::dialect::{ActionMap, Dialect, DialectBuilder};
    use crate::drivers::{MssqlDialect, MysqlDialect, OracleDialect};
    use crate::generator::testing::{all_types, ctx, int};
    use crate::naming::{NamingStrategies, NamingStrategy};

    fn orders() -> (Table, ForeignKey) {
        let mut table = Table::new("orders");
        table.columns = vec![int("id"), int("user_id")];
        let key = ForeignKey {
            name: "fk_orders_user".to_string(),
            columns: vec!["user_id".to_string()],
            target: TableRef::new("users"),
            target_columns: vec!["id".to_string()],
            on_update: ReferenceAction::NoAction,
            on_delete: ReferenceAction::Cascade,
        };
        (table, key)
    }

    fn create(dialect: &Dialect, table: &Table, key: &ForeignKey) -> (Vec<String>, usize) {
        let naming = NamingStrategies::default();
        let types = all_types();
        let ctx = ctx(dialect, &naming, &types);
        let mut run = GenerationRun::new();
        let object = SchemaObject::ForeignKey { table, key };
        let scripts = ForeignKeyGenerator
            .create_scripts(&object, &ctx, &mut run)
            .unwrap();
        (scripts, run.warnings().len())
    }

    #[test]
    fn test_add_foreign_key() {
        let (table, key) = orders();
        let (scripts, warnings) = create(&Dialect::sql2003(), &table, &key);
        assert_eq!(
            scripts,
            vec![
                "ALTER TABLE ORDERS ADD CONSTRAINT FK_ORDERS_USER FOREIGN KEY (USER_ID) \
                 REFERENCES USERS (ID) ON DELETE CASCADE"
            ]
        );
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_unsupported_action_is_omitted_with_warning() {
        let (table, mut key) = orders();
        key.on_update = ReferenceAction::Cascade;
        let (scripts, warnings) = create(&OracleDialect::build(), &table, &key);
        assert!(!scripts[0].contains("ON UPDATE"));
        assert!(scripts[0].ends_with("ON DELETE CASCADE"));
        assert_eq!(warnings, 1);

        key.on_delete = ReferenceAction::SetDefault;
        let (scripts, warnings) = create(&MysqlDialect::build(), &table, &key);
        assert!(scripts[0].ends_with("ON UPDATE CASCADE"));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_restrict_spelling() {
        let (table, mut key) = orders();
        key.on_delete = ReferenceAction::Restrict;
        let (scripts, _) = create(&MssqlDialect::build(), &table, &key);
        assert!(scripts[0].ends_with("ON DELETE NO ACTION"));
    }

    #[test]
    fn test_drop_foreign_key() {
        let (table, key) = orders();
        let object = SchemaObject::ForeignKey { table: &table, key: &key };
        let naming = NamingStrategies::default();
        let types = all_types();
        let mut run = GenerationRun::new();

        let mysql = MysqlDialect::build();
        assert_eq!(
            ForeignKeyGenerator
                .drop_scripts(&object, &ctx(&mysql, &naming, &types), &mut run)
                .unwrap(),
            vec!["ALTER TABLE orders DROP FOREIGN KEY fk_orders_user"]
        );

        let sql2003 = Dialect::sql2003();
        assert_eq!(
            ForeignKeyGenerator
                .drop_scripts(&object, &ctx(&sql2003, &naming, &types), &mut run)
                .unwrap(),
            vec!["ALTER TABLE ORDERS DROP CONSTRAINT FK_ORDERS_USER"]
        );

        let no_drop = DialectBuilder::sql2003("nodrop")
            .disable(&[Feature::DropConstraints])
            .build();
        assert!(ForeignKeyGenerator
            .drop_scripts(&object, &ctx(&no_drop, &naming, &types), &mut run)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_no_action_follows_dialect_map() {
        let (table, mut key) = orders();
        key.on_delete = ReferenceAction::NoAction;
        let (scripts, warnings) = create(&Dialect::sql2003(), &table, &key);
        assert!(!scripts[0].contains(" ON "));
        assert_eq!(warnings, 0);

        let explicit = DialectBuilder::sql2003("explicit")
            .delete_actions(ActionMap {
                no_action: Some("NO ACTION"),
                ..ActionMap::SQL2003
            })
            .build();
        let (scripts, warnings) = create(&explicit, &table, &key);
        assert!(scripts[0].ends_with("ON DELETE NO ACTION"));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_unnamed_foreign_key_create_and_drop_agree() {
        let (table, mut key) = orders();
        key.name.clear();
        let object = SchemaObject::ForeignKey { table: &table, key: &key };
        let naming = NamingStrategies::uniform(NamingStrategy::Literal);
        let types = all_types();
        let d = Dialect::sql2003();
        let ctx = ctx(&d, &naming, &types);
        let mut run = GenerationRun::new();

        let created = ForeignKeyGenerator.create_scripts(&object, &ctx, &mut run).unwrap();
        assert_eq!(
            created,
            vec!["ALTER TABLE ORDERS ADD FOREIGN KEY (USER_ID) REFERENCES USERS (ID) ON DELETE CASCADE"]
        );

        let dropped = ForeignKeyGenerator.drop_scripts(&object, &ctx, &mut run).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(
            run.warnings(),
            &[GenerationWarning::UnnamedConstraint {
                table: "orders".to_string(),
                constraint: "FOREIGN KEY".to_string(),
            }]
        );
    }

    #[test]
    fn test_named_foreign_key_drop_matches_create() {
        let (table, mut key) = orders();
        key.name.clear();
        let object = SchemaObject::ForeignKey { table: &table, key: &key };
        let naming = NamingStrategies::uniform(NamingStrategy::Hash);
        let types = all_types();
        let d = Dialect::sql2003();
        let ctx = ctx(&d, &naming, &types);
        let mut run = GenerationRun::new();

        let created = ForeignKeyGenerator.create_scripts(&object, &ctx, &mut run).unwrap();
        let dropped = ForeignKeyGenerator.drop_scripts(&object, &ctx, &mut run).unwrap();
        let name = dropped[0].strip_prefix("ALTER TABLE ORDERS DROP CONSTRAINT ").unwrap();
        assert!(created[0].starts_with(&format!("ALTER TABLE ORDERS ADD CONSTRAINT {} ", name)));
    }
}
