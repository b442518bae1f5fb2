//! CLI integration tests for schema-migrate.
//!
//! These tests verify command-line argument parsing, help output,
//! script output and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the schema-migrate binary.
fn cmd() -> Command {
    Command::cargo_bin("schema-migrate").unwrap()
}

const MODEL: &str = r#"
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
    primary_key: { name: pk_a, columns: [id] }
"#;

fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("dialects"))
        .stdout(predicate::str::contains("resolve-type"));
}

#[test]
fn test_generate_subcommand_help() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--dialect"))
        .stdout(predicate::str::contains("--drop"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema-migrate"));
}

#[test]
fn test_missing_subcommand() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// =============================================================================
// Dialect Commands
// =============================================================================

#[test]
fn test_dialects_lists_builtins_and_aliases() {
    cmd()
        .arg("dialects")
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres"))
        .stdout(predicate::str::contains("oracle"))
        .stdout(predicate::str::contains("mariadb"))
        .stdout(predicate::str::contains("ansi"));
}

#[test]
fn test_resolve_type_decimal() {
    cmd()
        .args([
            "resolve-type",
            "--dialect",
            "oracle",
            "--type-code",
            "3",
            "--precision",
            "10",
            "--scale",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("NUMBER(10,2)"));

    cmd()
        .args([
            "resolve-type",
            "--dialect",
            "postgres",
            "--type-code",
            "3",
            "--precision",
            "10",
            "--scale",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("NUMERIC(10,2)"));
}

#[test]
fn test_resolve_type_unknown_dialect() {
    cmd()
        .args(["resolve-type", "--dialect", "db2", "--type-code", "4"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("db2"));
}

// =============================================================================
// Generate Tests
// =============================================================================

#[test]
fn test_generate_to_stdout() {
    let config = write_temp("target:\n  dialect: postgres\n", ".yaml");
    let model = write_temp(MODEL, ".yaml");

    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- Generated by schema-migrate for postgres"))
        .stdout(predicate::str::contains("CREATE TABLE a ("))
        .stdout(predicate::str::contains("\n);\n"))
        .stdout(predicate::str::contains("FOREIGN KEY (a_id)"));
}

#[test]
fn test_generate_to_file_with_dialect_override() {
    let config = write_temp("target:\n  dialect: postgres\n", ".yaml");
    let model = write_temp(MODEL, ".yaml");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("schema.sql");

    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .args(["--dialect", "oracle", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let script = std::fs::read_to_string(&out).unwrap();
    assert!(script.contains("CREATE TABLE A ("));
    let create_a = script.find("CREATE TABLE A (").unwrap();
    let fk = script.find("FOREIGN KEY (A_ID)").unwrap();
    assert!(create_a < fk);
    assert!(script.ends_with(";\n"));
}

#[test]
fn test_generate_json_model_and_report() {
    let config = write_temp("target:\n  dialect: h2\n", ".yaml");
    let model = write_temp(
        r#"{"tables": [{"name": "t", "columns": [{"name": "id", "type_code": 4, "type_name": "INTEGER"}]}]}"#,
        ".json",
    );

    cmd()
        .args(["--config", config.path().to_str().unwrap(), "--output-json"])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dialect\": \"h2\""))
        .stdout(predicate::str::contains("CREATE TABLE T"));
}

#[test]
fn test_generate_with_drop() {
    let config = write_temp("target:\n  dialect: mysql\n", ".yaml");
    let model = write_temp(MODEL, ".yaml");

    let output = cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap(), "--drop"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let script = String::from_utf8(output).unwrap();
    let drop = script.find("DROP TABLE IF EXISTS a").unwrap();
    let create = script.find("CREATE TABLE").unwrap();
    assert!(drop < create);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_missing_config_file() {
    let model = write_temp(MODEL, ".yaml");
    cmd()
        .args(["--config", "/nonexistent/config.yaml"])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_config_yaml() {
    let config = write_temp("target: [unclosed", ".yaml");
    let model = write_temp(MODEL, ".yaml");
    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_unknown_dialect_in_config() {
    let config = write_temp("target:\n  dialect: informix\n", ".yaml");
    let model = write_temp(MODEL, ".yaml");
    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown database dialect"));
}

#[test]
fn test_invalid_model() {
    let config = write_temp("target:\n  dialect: postgres\n", ".yaml");
    let model = write_temp(
        "tables:\n  - name: t\n    columns: []\n  - name: t\n    columns: []\n",
        ".yaml",
    );
    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_dangling_foreign_key_fails_when_configured() {
    let config = write_temp(
        "target:\n  dialect: postgres\ngeneration:\n  dangling_foreign_keys: fail\n",
        ".yaml",
    );
    let model = write_temp(
        r#"
tables:
  - name: orders
    columns:
      - { name: customer_id, type_code: 4, type_name: INTEGER }
    foreign_keys:
      - { name: fk_orders_customer, columns: [customer_id], target: { name: customers }, target_columns: [id] }
"#,
        ".yaml",
    );
    cmd()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["generate", "--model", model.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("customers"));
}
