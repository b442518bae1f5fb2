//! Microsoft SQL Server dialect.

use crate::core::identifier::IdentifierCase;
use crate::core::types::codes;
use crate::dialect::{
    ActionMap, CommentStyle, DefaultFunctions, Dialect, DialectBuilder, Feature, IdentityStyle,
    SequenceSyntax, StreamingFetch, TransactionIsolation,
};
use crate::typemap::{Bound, TypeNameRule};

/// SQL Server's proprietary row-versioning isolation level.
pub const SNAPSHOT: TransactionIsolation = TransactionIsolation::Vendor {
    level: 4096,
    name: "SNAPSHOT",
};

const FEATURES: &[Feature] = &[
    Feature::IfExistsBeforeDropTable,
    Feature::IfExistsBeforeDropIndex,
    Feature::DropIndexOnTable,
    Feature::IfExistsDropSequence,
];

const KEYWORDS: &[&str] = &[
    "BACKUP", "BREAK", "BROWSE", "BULK", "CHECKPOINT", "CLUSTERED", "COMPUTE", "CONTAINS",
    "CONTAINSTABLE", "DATABASE", "DBCC", "DENY", "DISK", "DISTRIBUTED", "DUMP", "ERRLVL",
    "EXIT", "FILE", "FILLFACTOR", "FREETEXT", "FREETEXTTABLE", "GOTO", "HOLDLOCK",
    "IDENTITYCOL", "IDENTITY_INSERT", "INDEX", "KEY", "KILL", "LINENO", "LOAD", "NOCHECK",
    "NONCLUSTERED", "OFF", "OFFSETS", "OPENDATASOURCE", "OPENQUERY", "OPENROWSET", "OPENXML",
    "PERCENT", "PIVOT", "PLAN", "PRINT", "PROC", "PUBLIC", "RAISERROR", "READTEXT",
    "RECONFIGURE", "REPLICATION", "RESTORE", "RESTRICT", "REVERT", "ROWCOUNT", "ROWGUIDCOL",
    "RULE", "SAVE", "SCHEMA", "SECURITYAUDIT", "SETUSER", "SHUTDOWN", "STATISTICS",
    "TEXTSIZE", "TOP", "TRAN", "TRANSACTION", "TRUNCATE", "TSEQUAL", "UNPIVOT",
    "UPDATETEXT", "USE", "VIEW", "WAITFOR", "WHILE", "WRITETEXT",
];

const TYPES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::BIT, "BIT"),
    TypeNameRule::new(codes::BOOLEAN, "BIT"),
    TypeNameRule::new(codes::TINYINT, "TINYINT"),
    TypeNameRule::new(codes::FLOAT, "FLOAT"),
    TypeNameRule::new(codes::DOUBLE, "FLOAT"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL({P},{S})"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL({P})"),
    TypeNameRule::new(codes::NUMERIC, "DECIMAL"),
    TypeNameRule::new(codes::CHAR, "CHAR({N})").size(Bound::AtMost(8000)),
    TypeNameRule::new(codes::CHAR, "VARCHAR(MAX)"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})").size(Bound::AtMost(8000)),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR(MAX)"),
    TypeNameRule::new(codes::LONGVARCHAR, "VARCHAR(MAX)"),
    TypeNameRule::new(codes::CLOB, "VARCHAR(MAX)"),
    TypeNameRule::new(codes::NCHAR, "NCHAR({N})").size(Bound::AtMost(4000)),
    TypeNameRule::new(codes::NCHAR, "NVARCHAR(MAX)"),
    TypeNameRule::new(codes::NVARCHAR, "NVARCHAR({N})").size(Bound::AtMost(4000)),
    TypeNameRule::new(codes::NVARCHAR, "NVARCHAR(MAX)"),
    TypeNameRule::new(codes::LONGNVARCHAR, "NVARCHAR(MAX)"),
    TypeNameRule::new(codes::NCLOB, "NVARCHAR(MAX)"),
    TypeNameRule::new(codes::BINARY, "BINARY({N})").size(Bound::AtMost(8000)),
    TypeNameRule::new(codes::BINARY, "VARBINARY(MAX)"),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY({N})").size(Bound::AtMost(8000)),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY(MAX)"),
    TypeNameRule::new(codes::LONGVARBINARY, "VARBINARY(MAX)"),
    TypeNameRule::new(codes::BLOB, "VARBINARY(MAX)"),
    TypeNameRule::new(codes::TIME, "TIME({S})").scale(Bound::AtMost(7)),
    TypeNameRule::new(codes::TIME, "TIME"),
    TypeNameRule::new(codes::TIMESTAMP, "DATETIME2({S})").scale(Bound::AtMost(7)),
    TypeNameRule::new(codes::TIMESTAMP, "DATETIME2"),
    TypeNameRule::new(codes::TIMESTAMP_WITH_TIMEZONE, "DATETIMEOFFSET"),
    TypeNameRule::new(codes::TIME_WITH_TIMEZONE, "DATETIMEOFFSET"),
    TypeNameRule::new(codes::OTHER, "UNIQUEIDENTIFIER").named("uuid"),
    TypeNameRule::new(codes::OTHER, "NVARCHAR(MAX)").named("json"),
    TypeNameRule::new(codes::OTHER, "NVARCHAR(MAX)").named("jsonb"),
];

/// SQL Server 2016+ (`DROP ... IF EXISTS` and sequences).
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    pub const NAME: &'static str = "mssql";
    pub const ALIASES: &'static [&'static str] = &["sqlserver", "sql_server"];

    pub fn build() -> Dialect {
        DialectBuilder::sql2003(Self::NAME)
            .quotes('[', ']')
            .identifier_case(IdentifierCase::Preserve)
            .max_identifier_length(Some(128))
            .keywords(KEYWORDS)
            .enable(FEATURES)
            .cascade_constraints(None)
            .identity(IdentityStyle::IdentitySeed)
            .sequence_syntax(SequenceSyntax::SQL2003)
            .comment_style(CommentStyle::None)
            // RESTRICT is spelled NO ACTION.
            .update_actions(ActionMap {
                restrict: Some("NO ACTION"),
                ..ActionMap::SQL2003
            })
            .delete_actions(ActionMap {
                restrict: Some("NO ACTION"),
                ..ActionMap::SQL2003
            })
            .default_functions(DefaultFunctions {
                current_timestamp: "CURRENT_TIMESTAMP",
                current_date: "CAST(GETDATE() AS DATE)",
                current_time: "CAST(GETDATE() AS TIME)",
                random_uuid: Some("NEWID()"),
            })
            .isolation_levels(
                &[
                    TransactionIsolation::ReadUncommitted,
                    TransactionIsolation::ReadCommitted,
                    TransactionIsolation::RepeatableRead,
                    TransactionIsolation::Serializable,
                    SNAPSHOT,
                ],
                TransactionIsolation::ReadCommitted,
            )
            .streaming_fetch(StreamingFetch {
                fetch_size: None,
                requires_manual_commit: false,
            })
            .override_types(TYPES)
            .build()
    }
}
