//! schema-migrate CLI - cross-dialect schema script generation.

use clap::{Parser, Subcommand};
use schema_migrate::{
    Config, Database, DialectCatalog, JdbcTypeDesc, JdbcTypeOptions, MigrateError,
    ScriptExporter, ScriptOrchestrator, ScriptType,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "schema-migrate")]
#[command(about = "Generate dependency-ordered DDL scripts for a target database")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the script for a schema model
    Generate {
        /// Schema model file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        model: PathBuf,

        /// Script file; overrides output.path, stdout when neither is set
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override target dialect
        #[arg(long)]
        dialect: Option<String>,

        /// Override target schema
        #[arg(long)]
        target_schema: Option<String>,

        /// Emit DROP statements before CREATE
        #[arg(long)]
        drop: bool,
    },

    /// List the registered dialects and their aliases
    Dialects,

    /// Resolve one abstract type under a dialect
    ResolveType {
        /// Dialect name or alias
        #[arg(long)]
        dialect: String,

        /// JDBC type code (e.g. 3 for DECIMAL, 12 for VARCHAR)
        #[arg(long, allow_hyphen_values = true)]
        type_code: i32,

        /// Source type name, used for alias lookup
        #[arg(long)]
        type_name: Option<String>,

        #[arg(long)]
        size: Option<u32>,

        #[arg(long)]
        precision: Option<u32>,

        #[arg(long, allow_hyphen_values = true)]
        scale: Option<i32>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| MigrateError::Config(e.to_string()))?;

    let catalog = DialectCatalog::with_builtins();

    match cli.command {
        Commands::Generate {
            model,
            output,
            dialect,
            target_schema,
            drop,
        } => {
            let mut config = Config::load(&cli.config)?;
            info!("Loaded configuration from {:?}", cli.config);

            // Apply overrides
            if let Some(dialect) = dialect {
                config.target.dialect = dialect;
            }
            if let Some(schema) = target_schema {
                config.target.schema = Some(schema);
            }
            if drop && !config.generation.script_types.contains(&ScriptType::Drop) {
                config.generation.script_types.push(ScriptType::Drop);
            }
            if let Some(path) = output {
                config.output.path = Some(path);
            }
            config.validate()?;

            let dialect = config.resolve_dialect(&catalog)?;
            let db = load_model(&model)?;
            info!(
                "Loaded model from {:?}: {} tables, {} sequences",
                model,
                db.tables.len(),
                db.sequences.len()
            );

            let orchestrator = ScriptOrchestrator::new(dialect, config.generation_options());
            let report = orchestrator.generate(&db)?;
            for warning in &report.warnings {
                warn!("{}", warning);
            }

            let exporter = ScriptExporter::new()
                .with_header_line(format!("Generated by schema-migrate for {}", report.dialect))
                .with_header_line(format!("Run {} at {}", report.run_id, report.generated_at))
                .with_header_line(format!("Config {}", &config.hash()[..12]));

            match &config.output.path {
                Some(path) => exporter.write_file(path, &report.scripts)?,
                None if !cli.output_json => {
                    exporter.write_to(&mut io::stdout().lock(), &report.scripts)?
                }
                None => {}
            }

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            info!(
                "Generated {} statements ({} warnings)",
                report.statement_count(),
                report.warnings.len()
            );
        }

        Commands::Dialects => {
            if cli.output_json {
                let entries: Vec<serde_json::Value> = catalog
                    .dialect_names()
                    .into_iter()
                    .map(|name| {
                        serde_json::json!({
                            "name": name,
                            "aliases": catalog.aliases_of(name),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for name in catalog.dialect_names() {
                    let aliases = catalog.aliases_of(name);
                    if aliases.is_empty() {
                        println!("{}", name);
                    } else {
                        println!("{} ({})", name, aliases.join(", "));
                    }
                }
            }
        }

        Commands::ResolveType {
            dialect,
            type_code,
            type_name,
            size,
            precision,
            scale,
        } => {
            let dialect = catalog.require_dialect(&dialect)?;
            let desc = match type_name {
                Some(name) => JdbcTypeDesc::new(type_code, name),
                None => JdbcTypeDesc::from_code(type_code),
            };
            let options = JdbcTypeOptions {
                size,
                precision,
                scale,
            };
            let resolved = dialect.type_name(&desc, &options)?;
            if cli.output_json {
                let result = serde_json::json!({
                    "dialect": dialect.name(),
                    "type_code": type_code,
                    "type_name": resolved,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", resolved);
            }
        }
    }

    Ok(())
}

/// Load a schema model, JSON by extension and YAML otherwise.
fn load_model(path: &Path) -> Result<Database, MigrateError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Database::from_json(&content)
    } else {
        Database::from_yaml(&content)
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the script
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
