//! Built-in target dialects.
//!
//! - [`postgres`]: PostgreSQL
//! - [`mysql`]: MySQL and MariaDB
//! - [`mssql`]: Microsoft SQL Server
//! - [`oracle`]: Oracle
//! - [`h2`]: H2
//!
//! # Adding New Databases
//!
//! To add support for a new database:
//!
//! 1. Create a new module under `drivers/` (e.g., `drivers/db2/`)
//! 2. Describe the vendor as override tables applied to
//!    [`DialectBuilder::sql2003`](crate::dialect::DialectBuilder::sql2003)
//! 3. Add it to [`builtin_dialects`] so `DialectCatalog::with_builtins()`
//!    registers it

pub mod h2;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;

pub use h2::H2Dialect;
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;

use crate::dialect::Dialect;

/// A built-in dialect: canonical name, aliases and constructor.
pub struct BuiltinDialect {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub build: fn() -> Dialect,
}

/// Every built-in dialect, the SQL:2003 baseline first.
pub fn builtin_dialects() -> [BuiltinDialect; 6] {
    [
        BuiltinDialect {
            name: "sql2003",
            aliases: &["ansi", "generic"],
            build: Dialect::sql2003,
        },
        BuiltinDialect {
            name: PostgresDialect::NAME,
            aliases: PostgresDialect::ALIASES,
            build: PostgresDialect::build,
        },
        BuiltinDialect {
            name: MysqlDialect::NAME,
            aliases: MysqlDialect::ALIASES,
            build: MysqlDialect::build,
        },
        BuiltinDialect {
            name: MssqlDialect::NAME,
            aliases: MssqlDialect::ALIASES,
            build: MssqlDialect::build,
        },
        BuiltinDialect {
            name: OracleDialect::NAME,
            aliases: OracleDialect::ALIASES,
            build: OracleDialect::build,
        },
        BuiltinDialect {
            name: H2Dialect::NAME,
            aliases: H2Dialect::ALIASES,
            build: H2Dialect::build,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{codes, JdbcTypeDesc, JdbcTypeOptions};
    use crate::dialect::Feature;

    #[test]
    fn test_builtin_names_match_dialects() {
        for builtin in builtin_dialects() {
            assert_eq!((builtin.build)().name(), builtin.name);
        }
    }

    #[test]
    fn test_decimal_keeps_precision_and_scale_everywhere() {
        let desc = JdbcTypeDesc::from_code(codes::DECIMAL);
        let opts = JdbcTypeOptions::precision_scale(10, 2);
        for builtin in builtin_dialects() {
            let rendered = (builtin.build)().type_name(&desc, &opts).unwrap();
            assert!(
                rendered.ends_with("(10,2)"),
                "{} rendered {}",
                builtin.name,
                rendered
            );
        }
    }

    #[test]
    fn test_drop_table_if_exists_placement_is_exclusive() {
        for builtin in builtin_dialects() {
            let d = (builtin.build)();
            assert!(
                !(d.supports(Feature::IfExistsBeforeDropTable)
                    && d.supports(Feature::IfExistsAfterDropTable)),
                "{} supports both IF EXISTS placements",
                builtin.name
            );
        }
    }
}
