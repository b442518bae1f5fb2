//! Oracle dialect.
//!
//! Oracle folds unquoted identifiers to upper case, limits them to 30
//! characters on pre-12.2 compatibility levels and stores every number as
//! `NUMBER`. It accepts negative scales natively and has no boolean column
//! type, so booleans are written as `NUMBER(1)`.

use crate::core::identifier::IdentifierCase;
use crate::core::types::codes;
use crate::dialect::{
    ActionMap, CommentStyle, DefaultFunctions, Dialect, DialectBuilder, Feature, IdentityStyle,
    SequenceSyntax, StreamingFetch, TransactionIsolation,
};
use crate::typemap::{Bound, BooleanToNumberAdapter, TypeNameRule, UuidToTextAdapter};

const KEYWORDS: &[&str] = &[
    "ACCESS", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "EXCLUSIVE", "FILE", "IDENTIFIED",
    "INCREMENT", "INITIAL", "LEVEL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MLSLABEL",
    "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOWAIT", "NUMBER", "OFFLINE", "ONLINE",
    "PCTFREE", "PRIOR", "PRIVILEGES", "RAW", "RENAME", "RESOURCE", "ROWID", "ROWNUM",
    "SESSION", "SHARE", "SIZE", "SUCCESSFUL", "SYNONYM", "SYSDATE", "UID", "VALIDATE",
    "VARCHAR2", "VIEW",
];

const TYPES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::BIT, "NUMBER(1)"),
    TypeNameRule::new(codes::BOOLEAN, "NUMBER(1)"),
    TypeNameRule::new(codes::TINYINT, "NUMBER(3)"),
    TypeNameRule::new(codes::SMALLINT, "NUMBER(5)"),
    TypeNameRule::new(codes::INTEGER, "NUMBER(10)"),
    TypeNameRule::new(codes::BIGINT, "NUMBER(19)"),
    TypeNameRule::new(codes::REAL, "BINARY_FLOAT"),
    TypeNameRule::new(codes::FLOAT, "BINARY_DOUBLE"),
    TypeNameRule::new(codes::DOUBLE, "BINARY_DOUBLE"),
    TypeNameRule::new(codes::NUMERIC, "NUMBER({P},{S})").precision(Bound::AtMost(38)),
    TypeNameRule::new(codes::NUMERIC, "NUMBER({P})").precision(Bound::AtMost(38)),
    TypeNameRule::new(codes::NUMERIC, "NUMBER"),
    TypeNameRule::new(codes::DECIMAL, "NUMBER({P},{S})").precision(Bound::AtMost(38)),
    TypeNameRule::new(codes::DECIMAL, "NUMBER({P})").precision(Bound::AtMost(38)),
    TypeNameRule::new(codes::DECIMAL, "NUMBER"),
    TypeNameRule::new(codes::CHAR, "CHAR({N})").size(Bound::AtMost(2000)),
    TypeNameRule::new(codes::CHAR, "CLOB"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR2({N})").size(Bound::AtMost(4000)),
    TypeNameRule::new(codes::VARCHAR, "CLOB"),
    TypeNameRule::new(codes::NCHAR, "NCHAR({N})").size(Bound::AtMost(1000)),
    TypeNameRule::new(codes::NCHAR, "NCLOB"),
    TypeNameRule::new(codes::NVARCHAR, "NVARCHAR2({N})").size(Bound::AtMost(2000)),
    TypeNameRule::new(codes::NVARCHAR, "NCLOB"),
    TypeNameRule::new(codes::BINARY, "RAW({N})").size(Bound::AtMost(2000)),
    TypeNameRule::new(codes::BINARY, "BLOB"),
    TypeNameRule::new(codes::VARBINARY, "RAW({N})").size(Bound::AtMost(2000)),
    TypeNameRule::new(codes::VARBINARY, "BLOB"),
    TypeNameRule::new(codes::TIME, "DATE"),
    TypeNameRule::new(codes::TIMESTAMP, "TIMESTAMP({S})").scale(Bound::AtMost(9)),
    TypeNameRule::new(codes::TIMESTAMP, "TIMESTAMP"),
    TypeNameRule::new(codes::TIME_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE"),
    TypeNameRule::new(codes::SQLXML, "XMLTYPE"),
    TypeNameRule::new(codes::OTHER, "CHAR(36)").named("uuid"),
];

/// Oracle 12c+ (identity columns).
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl OracleDialect {
    pub const NAME: &'static str = "oracle";
    pub const ALIASES: &'static [&'static str] = &[];

    pub fn build() -> Dialect {
        DialectBuilder::sql2003(Self::NAME)
            .identifier_case(IdentifierCase::Upper)
            .max_identifier_length(Some(30))
            .keywords(KEYWORDS)
            .enable(&[Feature::NegativeScale])
            .disable(&[Feature::Catalogs])
            .cascade_constraints(Some("CASCADE CONSTRAINTS"))
            .identity(IdentityStyle::GeneratedByDefault)
            .sequence_syntax(SequenceSyntax {
                order: Some("ORDER"),
                ..SequenceSyntax::SQL2003
            })
            .comment_style(CommentStyle::Statement)
            // Oracle has no ON UPDATE clause at all.
            .update_actions(ActionMap {
                no_action: None,
                cascade: None,
                set_null: None,
                set_default: None,
                restrict: None,
            })
            .delete_actions(ActionMap {
                no_action: None,
                cascade: Some("CASCADE"),
                set_null: Some("SET NULL"),
                set_default: None,
                restrict: None,
            })
            .session_time_zone("ALTER SESSION SET TIME_ZONE = '{TZ}'")
            .default_functions(DefaultFunctions {
                random_uuid: Some("SYS_GUID()"),
                ..DefaultFunctions::SQL2003
            })
            .isolation_levels(
                &[
                    TransactionIsolation::ReadCommitted,
                    TransactionIsolation::Serializable,
                ],
                TransactionIsolation::ReadCommitted,
            )
            .streaming_fetch(StreamingFetch {
                fetch_size: Some(1000),
                requires_manual_commit: false,
            })
            .override_types(TYPES)
            .type_adapter(BooleanToNumberAdapter)
            .type_adapter(UuidToTextAdapter)
            .build()
    }
}
