//! MySQL/MariaDB dialect.
//!
//! MySQL has no sequences, no schemas distinct from databases, and declares
//! secondary indexes inside `CREATE TABLE`. Character types are sized for
//! `utf8mb4`, so a `VARCHAR` holds at most 16383 characters; longer values
//! move to the `TEXT` family.

use crate::core::identifier::IdentifierCase;
use crate::core::types::codes;
use crate::dialect::{
    ActionMap, CommentStyle, DefaultFunctions, Dialect, DialectBuilder, Feature, IdentityStyle,
    StreamingFetch, TransactionIsolation,
};
use crate::typemap::{Bound, OffsetToUtcAdapter, TypeNameRule, UuidToTextAdapter};

const ENABLED: &[Feature] = &[
    Feature::IndexInCreateTable,
    Feature::IfExistsBeforeDropTable,
    Feature::DropIndexOnTable,
];

const DISABLED: &[Feature] = &[Feature::Sequences, Feature::Schemas];

const KEYWORDS: &[&str] = &[
    "ACCESSIBLE", "ANALYZE", "CHANGE", "DATABASE", "DATABASES", "DELAYED", "DISTINCTROW",
    "DIV", "DUAL", "ENCLOSED", "ESCAPED", "EXPLAIN", "FORCE", "FULLTEXT", "IGNORE", "INDEX",
    "KEY", "KEYS", "KILL", "LIMIT", "LINEAR", "LINES", "LOAD", "LOCK", "LONG", "LONGBLOB",
    "LONGTEXT", "LOOP", "MEDIUMBLOB", "MEDIUMINT", "MEDIUMTEXT", "OPTIMIZE", "PURGE", "READ",
    "REGEXP", "RENAME", "REPLACE", "REQUIRE", "RLIKE", "SCHEMA", "SCHEMAS", "SHOW", "SPATIAL",
    "STRAIGHT_JOIN", "TERMINATED", "TINYBLOB", "TINYINT", "TINYTEXT", "UNLOCK", "UNSIGNED",
    "USAGE", "USE", "UTC_DATE", "UTC_TIME", "UTC_TIMESTAMP", "WRITE", "XOR", "ZEROFILL",
];

const TYPES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::BIT, "BIT({N})").size(Bound::AtMost(64)),
    TypeNameRule::new(codes::BIT, "BIT(1)"),
    TypeNameRule::new(codes::BOOLEAN, "BOOLEAN"),
    TypeNameRule::new(codes::TINYINT, "TINYINT"),
    TypeNameRule::new(codes::FLOAT, "DOUBLE"),
    TypeNameRule::new(codes::DOUBLE, "DOUBLE"),
    TypeNameRule::new(codes::REAL, "FLOAT"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL({P},{S})"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL({P})"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL"),
    TypeNameRule::new(codes::CHAR, "CHAR({N})").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::CHAR, "VARCHAR({N})").size(Bound::AtMost(16_383)),
    TypeNameRule::new(codes::CHAR, "LONGTEXT"),
    TypeNameRule::new(codes::NCHAR, "CHAR({N})").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::NCHAR, "VARCHAR({N})").size(Bound::AtMost(16_383)),
    TypeNameRule::new(codes::NCHAR, "LONGTEXT"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})").size(Bound::AtMost(16_383)),
    TypeNameRule::new(codes::VARCHAR, "MEDIUMTEXT").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::VARCHAR, "LONGTEXT"),
    TypeNameRule::new(codes::NVARCHAR, "VARCHAR({N})").size(Bound::AtMost(16_383)),
    TypeNameRule::new(codes::NVARCHAR, "MEDIUMTEXT").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::NVARCHAR, "LONGTEXT"),
    TypeNameRule::new(codes::LONGVARCHAR, "TINYTEXT").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::LONGVARCHAR, "TEXT").size(Bound::AtMost(65_535)),
    TypeNameRule::new(codes::LONGVARCHAR, "MEDIUMTEXT").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::LONGVARCHAR, "LONGTEXT"),
    TypeNameRule::new(codes::CLOB, "TINYTEXT").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::CLOB, "TEXT").size(Bound::AtMost(65_535)),
    TypeNameRule::new(codes::CLOB, "MEDIUMTEXT").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::CLOB, "LONGTEXT"),
    TypeNameRule::new(codes::LONGNVARCHAR, "LONGTEXT"),
    TypeNameRule::new(codes::NCLOB, "LONGTEXT"),
    TypeNameRule::new(codes::BINARY, "BINARY({N})").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::BINARY, "LONGBLOB"),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY({N})").size(Bound::AtMost(65_535)),
    TypeNameRule::new(codes::VARBINARY, "LONGBLOB"),
    TypeNameRule::new(codes::LONGVARBINARY, "TINYBLOB").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::LONGVARBINARY, "BLOB").size(Bound::AtMost(65_535)),
    TypeNameRule::new(codes::LONGVARBINARY, "MEDIUMBLOB").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::LONGVARBINARY, "LONGBLOB"),
    TypeNameRule::new(codes::BLOB, "TINYBLOB").size(Bound::AtMost(255)),
    TypeNameRule::new(codes::BLOB, "BLOB").size(Bound::AtMost(65_535)),
    TypeNameRule::new(codes::BLOB, "MEDIUMBLOB").size(Bound::AtMost(16_777_215)),
    TypeNameRule::new(codes::BLOB, "LONGBLOB"),
    TypeNameRule::new(codes::TIMESTAMP, "DATETIME({S})").scale(Bound::AtMost(6)),
    TypeNameRule::new(codes::TIMESTAMP, "DATETIME"),
    TypeNameRule::new(codes::TIMESTAMP_WITH_TIMEZONE, "DATETIME"),
    TypeNameRule::new(codes::TIME_WITH_TIMEZONE, "TIME"),
    TypeNameRule::new(codes::SQLXML, "LONGTEXT"),
    TypeNameRule::new(codes::OTHER, "JSON").named("json"),
    TypeNameRule::new(codes::OTHER, "JSON").named("jsonb"),
];

const ALIASES: &[((i32, &str), (i32, &str))] = &[
    ((codes::DATE, "YEAR"), (codes::SMALLINT, "SMALLINT")),
];

/// MySQL 8.0.16+ (column checks are enforced from that release on).
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    pub const NAME: &'static str = "mysql";
    pub const ALIASES: &'static [&'static str] = &["mariadb"];

    pub fn build() -> Dialect {
        DialectBuilder::sql2003(Self::NAME)
            .quotes('`', '`')
            .identifier_case(IdentifierCase::Preserve)
            .max_identifier_length(Some(64))
            .keywords(KEYWORDS)
            .enable(ENABLED)
            .disable(DISABLED)
            .cascade_constraints(None)
            .drop_foreign_key("DROP FOREIGN KEY")
            .drop_primary_key("DROP PRIMARY KEY")
            .inline_index_keyword("INDEX")
            .identity(IdentityStyle::AutoIncrement)
            .comment_style(CommentStyle::Inline)
            .update_actions(ActionMap {
                set_default: None,
                ..ActionMap::SQL2003
            })
            .delete_actions(ActionMap {
                set_default: None,
                ..ActionMap::SQL2003
            })
            .session_time_zone("SET time_zone = '{TZ}'")
            .escape_backslash(true)
            .default_functions(DefaultFunctions {
                random_uuid: Some("(UUID())"),
                ..DefaultFunctions::SQL2003
            })
            .isolation_levels(
                &[
                    TransactionIsolation::ReadUncommitted,
                    TransactionIsolation::ReadCommitted,
                    TransactionIsolation::RepeatableRead,
                    TransactionIsolation::Serializable,
                ],
                TransactionIsolation::RepeatableRead,
            )
            // The driver streams row by row only for a fetch size of i32::MIN.
            .streaming_fetch(StreamingFetch {
                fetch_size: Some(i32::MIN),
                requires_manual_commit: false,
            })
            .override_types(TYPES)
            .type_aliases(ALIASES)
            .type_adapter(UuidToTextAdapter)
            .type_adapter(OffsetToUtcAdapter)
            .build()
    }
}
