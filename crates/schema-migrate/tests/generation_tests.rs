//! End-to-end generation tests: model in, ordered script out.

use std::collections::HashSet;
use std::sync::Arc;

use schema_migrate::{
    Database, DanglingForeignKeyPolicy, DialectBuilder, DialectCatalog, Feature,
    GenerationOptions, GenerationWarning, GroupBy, MigrateError, NamingStrategies, NamingStrategy,
    ScriptOrchestrator, ScriptType,
};

const TWO_TABLES: &str = r#"
tables:
  - name: b
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: a_id, type_code: 4, type_name: INTEGER }
    primary_key: { name: pk_b, columns: [id] }
    foreign_keys:
      - { name: fk_b_a, columns: [a_id], target: { name: a }, target_columns: [id] }
  - name: a
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: amount, type_code: 3, type_name: DECIMAL, precision: 10, scale: 2 }
    primary_key: { name: pk_a, columns: [id] }
"#;

const CIRCULAR: &str = r#"
tables:
  - name: a
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: b_id, type_code: 4, type_name: INTEGER }
    primary_key: { name: pk_a, columns: [id] }
    foreign_keys:
      - { name: fk_a_b, columns: [b_id], target: { name: b }, target_columns: [id] }
  - name: b
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: a_id, type_code: 4, type_name: INTEGER }
    primary_key: { name: pk_b, columns: [id] }
    foreign_keys:
      - { name: fk_b_a, columns: [a_id], target: { name: a }, target_columns: [id], on_delete: CASCADE }
"#;

fn generate(dialect: &str, yaml: &str, options: GenerationOptions) -> Vec<String> {
    let dialect = DialectCatalog::with_builtins().require_dialect(dialect).unwrap();
    let db = Database::from_yaml(yaml).unwrap();
    ScriptOrchestrator::new(dialect, options)
        .generate(&db)
        .unwrap()
        .scripts
}

fn position(scripts: &[String], needle: &str) -> usize {
    scripts
        .iter()
        .position(|s| s.contains(needle))
        .unwrap_or_else(|| panic!("no statement contains {:?}: {:#?}", needle, scripts))
}

/// Replays a script and checks every referenced table exists when a
/// constraint mentions it.
fn assert_replayable(scripts: &[String]) {
    let mut created = HashSet::new();
    for script in scripts {
        let upper = script.to_uppercase();
        if let Some(rest) = upper.strip_prefix("CREATE TABLE ") {
            let name = rest.split_whitespace().next().unwrap().to_string();
            created.insert(name);
        } else if upper.contains("FOREIGN KEY") {
            let source = upper
                .strip_prefix("ALTER TABLE ")
                .and_then(|r| r.split_whitespace().next())
                .unwrap();
            let target = upper
                .split(" REFERENCES ")
                .nth(1)
                .and_then(|r| r.split_whitespace().next())
                .unwrap();
            assert!(created.contains(source), "{} before CREATE TABLE {}", script, source);
            assert!(created.contains(target), "{} before CREATE TABLE {}", script, target);
        }
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_two_table_foreign_key_waits_for_target() {
    for dialect in ["sql2003", "postgres", "mysql", "mssql", "oracle", "h2"] {
        let scripts = generate(dialect, TWO_TABLES, GenerationOptions::default());
        assert_replayable(&scripts);
        let upper: Vec<String> = scripts.iter().map(|s| s.to_uppercase()).collect();
        assert!(position(&upper, "CREATE TABLE A") < position(&upper, "FOREIGN KEY (A_ID)"));
    }
}

#[test]
fn test_circular_foreign_keys() {
    for group_by in [GroupBy::Table, GroupBy::MetaData] {
        let options = GenerationOptions {
            group_by,
            ..GenerationOptions::default()
        };
        let scripts = generate("postgres", CIRCULAR, options);
        assert_eq!(scripts.len(), 4, "{:#?}", scripts);
        assert!(scripts[0].starts_with("CREATE TABLE a"));
        assert!(scripts[1].starts_with("CREATE TABLE b"));
        assert!(scripts.iter().all(|s| !s.starts_with("CREATE TABLE") || !s.contains("FOREIGN KEY")));

        let fks: Vec<&String> = scripts[2..].iter().collect();
        assert!(fks.iter().any(|s| s.contains("fk_a_b")));
        assert!(fks
            .iter()
            .any(|s| s.contains("fk_b_a") && s.ends_with("ON DELETE CASCADE")));
        assert_replayable(&scripts);
    }
}

#[test]
fn test_decimal_renders_precision_and_scale() {
    let expected = [
        ("sql2003", "AMOUNT DECIMAL(10,2)"),
        ("postgres", "amount NUMERIC(10,2)"),
        ("mysql", "amount DECIMAL(10,2)"),
        ("mssql", "amount DECIMAL(10,2)"),
        ("oracle", "AMOUNT NUMBER(10,2)"),
        ("h2", "AMOUNT DECIMAL(10,2)"),
    ];
    for (dialect, column) in expected {
        let scripts = generate(dialect, TWO_TABLES, GenerationOptions::default());
        assert!(
            scripts.iter().any(|s| s.contains(column)),
            "{}: {:#?}",
            dialect,
            scripts
        );
    }
}

// =============================================================================
// DROP
// =============================================================================

#[test]
fn test_no_if_exists_when_unsupported() {
    let dialect = DialectBuilder::sql2003("plain")
        .disable(&[Feature::IfExistsBeforeDropTable, Feature::IfExistsAfterDropTable])
        .build();
    let options = GenerationOptions {
        script_types: [ScriptType::Drop].into_iter().collect(),
        ..GenerationOptions::default()
    };
    let db = Database::from_yaml(TWO_TABLES).unwrap();
    let report = ScriptOrchestrator::new(Arc::new(dialect), options)
        .generate(&db)
        .unwrap();
    let drops: Vec<&String> = report
        .scripts
        .iter()
        .filter(|s| s.starts_with("DROP TABLE"))
        .collect();
    assert_eq!(drops.len(), 2);
    assert!(drops.iter().all(|s| !s.contains("IF EXISTS")));
}

#[test]
fn test_drop_mirrors_create() {
    let options = GenerationOptions {
        script_types: [ScriptType::Drop, ScriptType::Create].into_iter().collect(),
        ..GenerationOptions::default()
    };
    let scripts = generate("oracle", TWO_TABLES, options);
    let first_create = position(&scripts, "CREATE TABLE");

    // constraints go before the tables they reference
    assert!(position(&scripts, "DROP CONSTRAINT FK_B_A") < position(&scripts, "DROP TABLE B"));
    // reverse model order
    assert!(position(&scripts, "DROP TABLE A") < position(&scripts, "DROP TABLE B"));
    assert!(scripts[..first_create].iter().all(|s| s.starts_with("DROP") || s.starts_with("ALTER")));

    let dropped: HashSet<&str> = scripts[..first_create]
        .iter()
        .filter_map(|s| s.strip_prefix("DROP TABLE "))
        .filter_map(|s| s.split_whitespace().next())
        .collect();
    let created: HashSet<&str> = scripts[first_create..]
        .iter()
        .filter_map(|s| s.strip_prefix("CREATE TABLE "))
        .filter_map(|s| s.split_whitespace().next())
        .collect();
    assert_eq!(dropped, created);
    assert_replayable(&scripts[first_create..]);
}

const UNNAMED: &str = r#"
tables:
  - name: orders
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: user_id, type_code: 4, type_name: INTEGER }
    primary_key: { name: pk_orders, columns: [id] }
    foreign_keys:
      - { columns: [user_id], target: { name: users }, target_columns: [id], on_delete: CASCADE }
  - name: users
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
    primary_key: { name: pk_users, columns: [id] }
"#;

#[test]
fn test_unnamed_constraint_is_created_but_not_dropped() {
    let dialect = DialectCatalog::with_builtins().require_dialect("oracle").unwrap();
    let db = Database::from_yaml(UNNAMED).unwrap();
    let options = GenerationOptions {
        script_types: [ScriptType::Drop, ScriptType::Create].into_iter().collect(),
        naming: NamingStrategies::uniform(NamingStrategy::Literal),
        ..GenerationOptions::default()
    };
    let report = ScriptOrchestrator::new(dialect, options)
        .generate(&db)
        .unwrap();
    let scripts = &report.scripts;
    let first_create = position(scripts, "CREATE TABLE");

    assert!(scripts[..first_create]
        .iter()
        .all(|s| !s.contains("FOREIGN KEY") && !s.contains("DROP CONSTRAINT ORDERS")));
    assert!(scripts[..first_create]
        .iter()
        .any(|s| s.starts_with("DROP TABLE ORDERS")));
    let fk = &scripts[position(scripts, "FOREIGN KEY")];
    assert_eq!(
        fk,
        "ALTER TABLE ORDERS ADD FOREIGN KEY (USER_ID) REFERENCES USERS (ID) ON DELETE CASCADE"
    );
    assert_eq!(
        report.warnings,
        vec![GenerationWarning::UnnamedConstraint {
            table: "orders".to_string(),
            constraint: "FOREIGN KEY".to_string(),
        }]
    );
}

const CHECKED: &str = r#"
tables:
  - name: items
    columns:
      - { name: qty, type_code: 4, type_name: INTEGER }
      - { name: code, type_code: 12, type_name: VARCHAR, size: 10 }
    checks:
      - { name: ck_qty, expression: "[qty] >= 0" }
      - { expression: "code LIKE '[A-Z]%'" }
"#;

#[test]
fn test_check_expressions_follow_dialect_case() {
    let literal = || GenerationOptions {
        naming: NamingStrategies::uniform(NamingStrategy::Literal),
        ..GenerationOptions::default()
    };

    let scripts = generate("oracle", CHECKED, literal());
    let create = &scripts[position(&scripts, "CREATE TABLE ITEMS")];
    assert!(create.contains("CONSTRAINT CK_QTY CHECK (QTY >= 0)"), "{}", create);
    assert!(create.contains("CHECK (code LIKE '[A-Z]%')"), "{}", create);

    let scripts = generate("postgres", CHECKED, literal());
    let create = &scripts[position(&scripts, "CREATE TABLE items")];
    assert!(create.contains("CONSTRAINT ck_qty CHECK (qty >= 0)"), "{}", create);
}

// =============================================================================
// Dangling references
// =============================================================================

const DANGLING: &str = r#"
tables:
  - name: orders
    columns:
      - { name: id, type_code: 4, type_name: INTEGER, nullable: false }
      - { name: customer_id, type_code: 4, type_name: INTEGER }
    foreign_keys:
      - { name: fk_orders_customer, columns: [customer_id], target: { name: customers }, target_columns: [id] }
"#;

#[test]
fn test_dangling_foreign_key_is_flagged() {
    let dialect = DialectCatalog::with_builtins().require_dialect("h2").unwrap();
    let db = Database::from_yaml(DANGLING).unwrap();
    let report = ScriptOrchestrator::new(dialect.clone(), GenerationOptions::default())
        .generate(&db)
        .unwrap();
    assert!(report.scripts.last().unwrap().contains("REFERENCES CUSTOMERS"));
    assert_eq!(
        report.warnings,
        vec![GenerationWarning::DanglingForeignKey {
            foreign_key: "fk_orders_customer".to_string(),
            table: "orders".to_string(),
            target: "customers".to_string(),
        }]
    );

    let options = GenerationOptions {
        dangling_foreign_keys: DanglingForeignKeyPolicy::Fail,
        ..GenerationOptions::default()
    };
    let err = ScriptOrchestrator::new(dialect, options)
        .generate(&db)
        .unwrap_err();
    assert!(matches!(err, MigrateError::DanglingForeignKey { .. }));
    assert!(err.to_string().contains("customers"));
}

#[test]
fn test_runs_do_not_share_state() {
    let dialect = DialectCatalog::with_builtins().require_dialect("postgres").unwrap();
    let orchestrator = ScriptOrchestrator::new(dialect, GenerationOptions::default());
    let db = Database::from_yaml(CIRCULAR).unwrap();
    let first = orchestrator.generate(&db).unwrap();
    let second = orchestrator.generate(&db).unwrap();
    assert_eq!(first.scripts, second.scripts);
    assert_ne!(first.run_id, second.run_id);
}
