//! H2 dialect.

use crate::core::identifier::IdentifierCase;
use crate::core::types::codes;
use crate::dialect::{
    CommentStyle, DefaultFunctions, Dialect, DialectBuilder, Feature, IdentityStyle,
    SequenceSyntax, TransactionIsolation,
};
use crate::typemap::TypeNameRule;

const FEATURES: &[Feature] = &[
    Feature::IfExistsBeforeDropTable,
    Feature::IfExistsBeforeDropIndex,
    Feature::IfExistsDropSequence,
];

const KEYWORDS: &[&str] = &[
    "_ROWID_", "DAY", "HOUR", "ILIKE", "INTERSECTS", "KEY", "LIMIT", "MINUS", "MINUTE",
    "MONTH", "OFFSET", "QUALIFY", "REGEXP", "ROWNUM", "SECOND", "SYSDATE", "SYSTIME",
    "SYSTIMESTAMP", "TODAY", "TOP", "YEAR",
];

const TYPES: &[TypeNameRule] = &[
    TypeNameRule::new(codes::TINYINT, "TINYINT"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})"),
    TypeNameRule::new(codes::VARCHAR, "VARCHAR"),
    TypeNameRule::new(codes::NVARCHAR, "VARCHAR({N})"),
    TypeNameRule::new(codes::NVARCHAR, "VARCHAR"),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY({N})"),
    TypeNameRule::new(codes::VARBINARY, "VARBINARY"),
    TypeNameRule::new(codes::OTHER, "UUID").named("uuid"),
    TypeNameRule::new(codes::OTHER, "JSON").named("json"),
    TypeNameRule::new(codes::OTHER, "JSON").named("jsonb"),
    TypeNameRule::new(codes::SQLXML, "CLOB"),
];

/// H2 2.x.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl H2Dialect {
    pub const NAME: &'static str = "h2";
    pub const ALIASES: &'static [&'static str] = &[];

    pub fn build() -> Dialect {
        DialectBuilder::sql2003(Self::NAME)
            .identifier_case(IdentifierCase::Upper)
            .max_identifier_length(Some(256))
            .keywords(KEYWORDS)
            .enable(FEATURES)
            .identity(IdentityStyle::SequenceDefault {
                template: "DEFAULT NEXT VALUE FOR {SEQ}",
                literal: false,
            })
            .sequence_syntax(SequenceSyntax::SQL2003)
            .comment_style(CommentStyle::Statement)
            .session_time_zone("SET TIME ZONE '{TZ}'")
            .default_functions(DefaultFunctions {
                random_uuid: Some("RANDOM_UUID()"),
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
            .override_types(TYPES)
            .build()
    }
}
