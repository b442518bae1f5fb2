//! PostgreSQL dialect.
//!
//! Identity columns are backed by a sequence created ahead of the table and
//! referenced through `DEFAULT nextval('seq')`, which works on every
//! supported server version.

use crate::core::identifier::IdentifierCase;
use crate::core::types::codes;
use crate::dialect::{
    CommentStyle, DefaultFunctions, Dialect, DialectBuilder, Feature, IdentityStyle,
    SequenceSyntax, StreamingFetch, TransactionIsolation,
};
use crate::typemap::{Bound, TypeNameRule};

const FEATURES: &[Feature] = &[
    Feature::IfExistsBeforeDropTable,
    Feature::IfExistsBeforeDropIndex,
    Feature::IfExistsDropSequence,
];

const KEYWORDS: &[&str] = &[
    "ANALYSE", "ANALYZE", "CONCURRENTLY", "FREEZE", "ILIKE", "ISNULL", "LIMIT", "NOTNULL",
    "OFFSET", "PLACING", "RETURNING", "VARIADIC", "VERBOSE",
];

const TYPES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::TINYINT, "SMALLINT"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC({P},{S})"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC({P})"),
    TypeNameRule::new(codes::NUMERIC, "NUMERIC"),
    TypeNameRule::new(codes::DECIMAL, "NUMERIC({P},{S})"),
    TypeNameRule::new(codes::DECIMAL, "NUMERIC({P})"),
    TypeNameRule::new(codes::DECIMAL, "NUMERIC"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR"),
    TypeNameRule::new(codes::LONGVARCHAR, "TEXT"),
    TypeNameRule::new(codes::CLOB, "TEXT"),
    TypeNameRule::new(codes::NCHAR, "CHAR({N})"),
    TypeNameRule::new(codes::NCHAR, "CHAR"),
    TypeNameRule::new(codes::NVARCHAR, "VARCHAR({N})"),
    TypeNameRule::new(codes::NVARCHAR, "VARCHAR"),
    TypeNameRule::new(codes::LONGNVARCHAR, "TEXT"),
    TypeNameRule::new(codes::NCLOB, "TEXT"),
    TypeNameRule::new(codes::BINARY, "BYTEA"),
    TypeNameRule::new(codes::VARBINARY, "BYTEA"),
    TypeNameRule::new(codes::LONGVARBINARY, "BYTEA"),
    TypeNameRule::new(codes::BLOB, "BYTEA"),
    TypeNameRule::new(codes::TIME, "TIME({S})").scale(Bound::AtMost(6)),
    TypeNameRule::new(codes::TIME, "TIME"),
    TypeNameRule::new(codes::TIMESTAMP, "TIMESTAMP({S})").scale(Bound::AtMost(6)),
    TypeNameRule::new(codes::TIMESTAMP, "TIMESTAMP"),
    TypeNameRule::new(codes::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMPTZ"),
    TypeNameRule::new(codes::TIME_WITH_TIMEZONE, "TIMETZ"),
    TypeNameRule::new(codes::OTHER, "UUID").named("uuid"),
    TypeNameRule::new(codes::OTHER, "JSON").named("json"),
    TypeNameRule::new(codes::OTHER, "JSONB").named("jsonb"),
    TypeNameRule::new(codes::OTHER, "INET").named("inet"),
    TypeNameRule::new(codes::OTHER, "CIDR").named("cidr"),
];

const ALIASES: &[((i32, &str), (i32, &str))] = &[
    ((codes::VARCHAR, "citext"), (codes::CLOB, "CLOB")),
];

/// PostgreSQL 10+.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    pub const NAME: &'static str = "postgres";
    pub const ALIASES: &'static [&'static str] = &["postgresql", "pg"];

    pub fn build() -> Dialect {
        DialectBuilder::sql2003(Self::NAME)
            .identifier_case(IdentifierCase::Lower)
            .max_identifier_length(Some(63))
            .keywords(KEYWORDS)
            .enable(FEATURES)
            .disable(&[Feature::Catalogs])
            .identity(IdentityStyle::SequenceDefault {
                template: "DEFAULT nextval({SEQ})",
                literal: true,
            })
            .sequence_syntax(SequenceSyntax::SQL2003)
            .comment_style(CommentStyle::Statement)
            .session_time_zone("SET TIME ZONE '{TZ}'")
            .default_functions(DefaultFunctions {
                random_uuid: Some("gen_random_uuid()"),
                ..DefaultFunctions::SQL2003
            })
            .isolation_levels(
                &[
                    TransactionIsolation::ReadUncommitted,
                    TransactionIsolation::ReadCommitted,
                    TransactionIsolation::RepeatableRead,
                    TransactionIsolation::Serializable,
                ],
                TransactionIsolation::ReadCommitted,
            )
            // Cursor-based fetching only streams outside auto-commit.
            .streaming_fetch(StreamingFetch {
                fetch_size: Some(10_000),
                requires_manual_commit: true,
            })
            .override_types(TYPES)
            .type_aliases(ALIASES)
            .build()
    }
}
