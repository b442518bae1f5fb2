//! Target database dialects.
//!
//! A [`Dialect`] is a read-only capability and syntax table for one target
//! database product: which features it supports, how it quotes identifiers,
//! which clause spellings it uses and how abstract types map to its own type
//! names. Generators never branch on the vendor; they ask the dialect.
//!
//! # Design Pattern
//!
//! Dialects are assembled by a [`DialectBuilder`] that starts from the
//! SQL:2003 baseline ([`DialectBuilder::sql2003`]) and applies the vendor's
//! declarative overrides. The finished value is immutable and shared behind an
//! `Arc` by the [`DialectCatalog`](crate::core::DialectCatalog).
//!
//! ```rust,ignore
//! let dialect = DialectBuilder::sql2003("acme")
//!     .quotes('`', '`')
//!     .enable(&[Feature::IndexInCreateTable])
//!     .override_types(&[TypeNameRule::new(codes::BOOLEAN, "TINYINT(1)")])
//!     .build();
//! ```

mod builder;
pub mod keywords;
mod sql2003;

pub use builder::DialectBuilder;

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::core::identifier::{
    is_plain_identifier, is_quoted, quote_with, unquote_with, IdentifierCase,
};
use crate::core::schema::{ReferenceAction, Sequence};
use crate::core::types::{JdbcTypeDesc, JdbcTypeOptions};
use crate::error::{MigrateError, Result};
use crate::typemap::TypeRegistry;

/// Placeholder for the rendered sequence name in identity templates.
pub const SEQUENCE_PLACEHOLDER: &str = "{SEQ}";
/// Placeholder for the zone name in session time zone templates.
pub const TIME_ZONE_PLACEHOLDER: &str = "{TZ}";

/// Optional capabilities of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `UNIQUE` on a column inside `CREATE TABLE`.
    UniqueInCreateTable,
    /// `NOT NULL UNIQUE` on the same column.
    NotNullUnique,
    /// Setting the session time zone.
    SessionTimeZone,
    ColumnCheck,
    TableCheck,
    /// `INDEX name (cols)` inside `CREATE TABLE`.
    IndexInCreateTable,
    /// `PRIMARY KEY (cols)` inside `CREATE TABLE`.
    PrimaryKeyInCreateTable,
    /// `DROP TABLE IF EXISTS t`.
    IfExistsBeforeDropTable,
    /// `DROP TABLE t IF EXISTS`.
    IfExistsAfterDropTable,
    /// `DROP INDEX IF EXISTS i`.
    IfExistsBeforeDropIndex,
    /// `DROP INDEX i ON t`.
    DropIndexOnTable,
    /// `ALTER TABLE t DROP CONSTRAINT c`.
    DropConstraints,
    Sequences,
    /// `DROP SEQUENCE IF EXISTS s`.
    IfExistsDropSequence,
    /// `NUMERIC(p, s)` with `s < 0`.
    NegativeScale,
    /// Catalog qualification of object names.
    Catalogs,
    /// Schema qualification of object names.
    Schemas,
}

/// How identity columns are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStyle {
    /// Identity columns are not supported; the column is emitted plain.
    None,
    /// `GENERATED BY DEFAULT AS IDENTITY [(START WITH s INCREMENT BY i)]`
    GeneratedByDefault,
    /// MySQL `AUTO_INCREMENT`
    AutoIncrement,
    /// SQL Server `IDENTITY(seed, increment)`
    IdentitySeed,
    /// Default drawn from a sequence created before the table. `template`
    /// contains [`SEQUENCE_PLACEHOLDER`]; `literal` renders the sequence
    /// name as a string literal (`nextval('s')`) instead of an identifier.
    SequenceDefault { template: &'static str, literal: bool },
}

/// How table and column comments are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Comments are dropped.
    None,
    /// `COMMENT 'x'` on the column and `COMMENT='x'` after the table body.
    Inline,
    /// Separate `COMMENT ON TABLE|COLUMN ... IS 'x'` statements.
    Statement,
}

/// Availability of the sequence option clauses. `None` means the clause is
/// omitted for this dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSyntax {
    pub start_with: Option<&'static str>,
    pub increment_by: Option<&'static str>,
    pub min_value: Option<&'static str>,
    pub max_value: Option<&'static str>,
    pub cycle: Option<&'static str>,
    pub cache: Option<&'static str>,
    pub order: Option<&'static str>,
}

impl SequenceSyntax {
    pub const SQL2003: SequenceSyntax = SequenceSyntax {
        start_with: Some("START WITH"),
        increment_by: Some("INCREMENT BY"),
        min_value: Some("MINVALUE"),
        max_value: Some("MAXVALUE"),
        cycle: Some("CYCLE"),
        cache: Some("CACHE"),
        order: None,
    };
}

/// Keyword for every referential action; `None` omits the clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMap {
    pub no_action: Option<&'static str>,
    pub cascade: Option<&'static str>,
    pub set_null: Option<&'static str>,
    pub set_default: Option<&'static str>,
    pub restrict: Option<&'static str>,
}

impl ActionMap {
    /// NO ACTION is the standard default and is left out.
    pub const SQL2003: ActionMap = ActionMap {
        no_action: None,
        cascade: Some("CASCADE"),
        set_null: Some("SET NULL"),
        set_default: Some("SET DEFAULT"),
        restrict: Some("RESTRICT"),
    };

    pub fn get(&self, action: ReferenceAction) -> Option<&'static str> {
        match action {
            ReferenceAction::NoAction => self.no_action,
            ReferenceAction::Cascade => self.cascade,
            ReferenceAction::SetNull => self.set_null,
            ReferenceAction::SetDefault => self.set_default,
            ReferenceAction::Restrict => self.restrict,
        }
    }
}

/// Spelling of the well-known default value functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFunctions {
    pub current_timestamp: &'static str,
    pub current_date: &'static str,
    pub current_time: &'static str,
    /// Random UUID generator, `None` when the target has none.
    pub random_uuid: Option<&'static str>,
}

impl DefaultFunctions {
    pub const SQL2003: DefaultFunctions = DefaultFunctions {
        current_timestamp: "CURRENT_TIMESTAMP",
        current_date: "CURRENT_DATE",
        current_time: "CURRENT_TIME",
        random_uuid: None,
    };
}

/// Transaction isolation level, numbered like JDBC `Connection.TRANSACTION_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionIsolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    /// Vendor-proprietary level, e.g. SQL Server `SNAPSHOT` (4096).
    Vendor { level: i32, name: &'static str },
}

impl TransactionIsolation {
    pub fn level(self) -> i32 {
        match self {
            TransactionIsolation::ReadUncommitted => 1,
            TransactionIsolation::ReadCommitted => 2,
            TransactionIsolation::RepeatableRead => 4,
            TransactionIsolation::Serializable => 8,
            TransactionIsolation::Vendor { level, .. } => level,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransactionIsolation::ReadUncommitted => "READ UNCOMMITTED",
            TransactionIsolation::ReadCommitted => "READ COMMITTED",
            TransactionIsolation::RepeatableRead => "REPEATABLE READ",
            TransactionIsolation::Serializable => "SERIALIZABLE",
            TransactionIsolation::Vendor { name, .. } => name,
        }
    }
}

impl fmt::Display for TransactionIsolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result-set streaming settings for readers of this dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingFetch {
    /// Fetch size hint; `None` keeps the driver default.
    pub fetch_size: Option<i32>,
    /// Whether streaming only works with auto-commit disabled.
    pub requires_manual_commit: bool,
}

/// Immutable capability and syntax table of one target database.
#[derive(Debug, Clone)]
pub struct Dialect {
    name: String,
    quote_open: char,
    quote_close: char,
    identifier_case: IdentifierCase,
    max_identifier_length: Option<usize>,
    keywords: HashSet<String>,
    features: HashSet<Feature>,
    cascade_constraints: Option<&'static str>,
    drop_foreign_key: &'static str,
    drop_primary_key: Option<&'static str>,
    inline_index_keyword: &'static str,
    identity: IdentityStyle,
    sequence_syntax: SequenceSyntax,
    comment_style: CommentStyle,
    update_actions: ActionMap,
    delete_actions: ActionMap,
    session_time_zone: Option<&'static str>,
    escape_backslash: bool,
    functions: DefaultFunctions,
    isolation_levels: Vec<TransactionIsolation>,
    default_isolation: TransactionIsolation,
    streaming_fetch: StreamingFetch,
    types: TypeRegistry,
}

impl Dialect {
    /// The SQL:2003 baseline dialect.
    pub fn sql2003() -> Self {
        DialectBuilder::sql2003("sql2003").build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn identifier_case(&self) -> IdentifierCase {
        self.identifier_case
    }

    /// A copy of this dialect folding unquoted identifiers to `case`.
    pub fn with_identifier_case(&self, case: IdentifierCase) -> Dialect {
        Dialect {
            identifier_case: case,
            ..self.clone()
        }
    }

    /// Longest identifier the target accepts, if limited.
    pub fn max_identifier_length(&self) -> Option<usize> {
        self.max_identifier_length
    }

    pub fn transaction_isolation_levels(&self) -> &[TransactionIsolation] {
        &self.isolation_levels
    }

    pub fn default_transaction_isolation(&self) -> TransactionIsolation {
        self.default_isolation
    }

    /// Isolation level with the given JDBC number, if supported.
    pub fn transaction_isolation(&self, level: i32) -> Option<TransactionIsolation> {
        self.isolation_levels
            .iter()
            .copied()
            .find(|i| i.level() == level)
    }

    pub fn streaming_fetch(&self) -> StreamingFetch {
        self.streaming_fetch
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    pub fn quote_chars(&self) -> (char, char) {
        (self.quote_open, self.quote_close)
    }

    /// Wrap an identifier in the dialect's quote characters.
    pub fn quote(&self, identifier: &str) -> String {
        quote_with(identifier, self.quote_open, self.quote_close)
    }

    /// Whether `word` is reserved in this dialect (ignoring case).
    pub fn is_reserved(&self, word: &str) -> bool {
        self.keywords.contains(&word.to_uppercase())
    }

    /// Render an identifier.
    ///
    /// Already quoted input keeps its text and stays quoted. Otherwise the
    /// dialect's case policy is applied and the name is quoted only when it
    /// is not a bare `[A-Za-z0-9_]+` token, collides with a reserved word, or
    /// `quoted` forces it.
    pub fn identifier(&self, name: &str, quoted: bool) -> String {
        if is_quoted(name, self.quote_open, self.quote_close) {
            let inner = unquote_with(name, self.quote_open, self.quote_close);
            return self.quote(&inner);
        }

        // A quoted name is stored exactly as written, so only plain names fold.
        if quoted || !is_plain_identifier(name) {
            return self.quote(name);
        }
        let text = self.identifier_case.apply(name);
        if self.is_reserved(&text) {
            self.quote(&text)
        } else {
            text
        }
    }

    /// Render `catalog.schema.name`, dropping parts the dialect cannot
    /// qualify with and parts that are absent.
    pub fn qualified_name(&self, catalog: Option<&str>, schema: Option<&str>, name: &str) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(catalog) = catalog.filter(|c| !c.is_empty() && self.supports(Feature::Catalogs)) {
            parts.push(self.identifier(catalog, false));
        }
        if let Some(schema) = schema.filter(|s| !s.is_empty() && self.supports(Feature::Schemas)) {
            parts.push(self.identifier(schema, false));
        }
        parts.push(self.identifier(name, false));
        parts.join(".")
    }

    // =========================================================================
    // Syntax fragments
    // =========================================================================

    /// Clause appended to `DROP TABLE` to remove dependent constraints.
    pub fn cascade_constraints(&self) -> Option<&'static str> {
        self.cascade_constraints
    }

    /// Keyword between `ALTER TABLE t` and the constraint name when dropping
    /// a foreign key.
    pub fn drop_foreign_key(&self) -> &'static str {
        self.drop_foreign_key
    }

    /// Clause dropping the primary key `name` (rendered) of a table.
    /// `None` when the dialect drops primary keys by name and there is none.
    pub fn drop_primary_key(&self, name: Option<&str>) -> Option<String> {
        match self.drop_primary_key {
            Some(clause) => Some(clause.to_string()),
            None => name.map(|name| format!("DROP CONSTRAINT {}", name)),
        }
    }

    /// Keyword introducing an index inside `CREATE TABLE`.
    pub fn inline_index_keyword(&self) -> &'static str {
        self.inline_index_keyword
    }

    pub fn identity_style(&self) -> IdentityStyle {
        self.identity
    }

    /// Whether identity columns need their sequence created before the table.
    pub fn identity_requires_sequence(&self) -> bool {
        matches!(self.identity, IdentityStyle::SequenceDefault { .. })
            && self.supports(Feature::Sequences)
    }

    /// Identity clause of a column.
    ///
    /// `sequence_name` is the rendered, qualified name of the owning
    /// sequence; it is only used by the sequence-backed style.
    pub fn identity_clause(&self, sequence: Option<&Sequence>, sequence_name: &str) -> Option<String> {
        let start = sequence.and_then(|s| s.start_with);
        let increment = sequence.and_then(|s| s.increment_by);
        match self.identity {
            IdentityStyle::None => None,
            IdentityStyle::GeneratedByDefault => {
                let mut options = Vec::new();
                if let Some(start) = start {
                    options.push(format!("START WITH {}", start));
                }
                if let Some(increment) = increment {
                    options.push(format!("INCREMENT BY {}", increment));
                }
                if options.is_empty() {
                    Some("GENERATED BY DEFAULT AS IDENTITY".to_string())
                } else {
                    Some(format!(
                        "GENERATED BY DEFAULT AS IDENTITY ({})",
                        options.join(" ")
                    ))
                }
            }
            IdentityStyle::AutoIncrement => Some("AUTO_INCREMENT".to_string()),
            IdentityStyle::IdentitySeed => Some(format!(
                "IDENTITY({},{})",
                start.unwrap_or(1),
                increment.unwrap_or(1)
            )),
            IdentityStyle::SequenceDefault { template, literal } => {
                if !self.supports(Feature::Sequences) {
                    return None;
                }
                let seq = if literal {
                    self.quote_literal(sequence_name)
                } else {
                    sequence_name.to_string()
                };
                Some(template.replace(SEQUENCE_PLACEHOLDER, &seq))
            }
        }
    }

    pub fn sequence_syntax(&self) -> &SequenceSyntax {
        &self.sequence_syntax
    }

    pub fn sequence_start_with(&self, value: i64) -> Option<String> {
        self.sequence_syntax
            .start_with
            .map(|kw| format!("{} {}", kw, value))
    }

    pub fn sequence_increment_by(&self, value: i64) -> Option<String> {
        self.sequence_syntax
            .increment_by
            .map(|kw| format!("{} {}", kw, value))
    }

    pub fn sequence_min_value(&self, value: i64) -> Option<String> {
        self.sequence_syntax
            .min_value
            .map(|kw| format!("{} {}", kw, value))
    }

    pub fn sequence_max_value(&self, value: i64) -> Option<String> {
        self.sequence_syntax
            .max_value
            .map(|kw| format!("{} {}", kw, value))
    }

    pub fn sequence_cycle(&self) -> Option<&'static str> {
        self.sequence_syntax.cycle
    }

    pub fn sequence_cache(&self, value: i64) -> Option<String> {
        self.sequence_syntax
            .cache
            .map(|kw| format!("{} {}", kw, value))
    }

    pub fn sequence_order(&self) -> Option<&'static str> {
        self.sequence_syntax.order
    }

    pub fn comment_style(&self) -> CommentStyle {
        self.comment_style
    }

    /// `COMMENT ON TABLE` statement, for statement-style dialects.
    pub fn table_comment_statement(&self, table: &str, comment: &str) -> Option<String> {
        match self.comment_style {
            CommentStyle::Statement => Some(format!(
                "COMMENT ON TABLE {} IS {}",
                table,
                self.quote_literal(comment)
            )),
            _ => None,
        }
    }

    /// `COMMENT ON COLUMN` statement, for statement-style dialects.
    pub fn column_comment_statement(&self, table: &str, column: &str, comment: &str) -> Option<String> {
        match self.comment_style {
            CommentStyle::Statement => Some(format!(
                "COMMENT ON COLUMN {}.{} IS {}",
                table,
                column,
                self.quote_literal(comment)
            )),
            _ => None,
        }
    }

    /// Comment clause inside a column definition, for inline-style dialects.
    pub fn inline_column_comment(&self, comment: &str) -> Option<String> {
        match self.comment_style {
            CommentStyle::Inline => Some(format!("COMMENT {}", self.quote_literal(comment))),
            _ => None,
        }
    }

    /// Table option after the closing parenthesis, for inline-style dialects.
    pub fn inline_table_comment(&self, comment: &str) -> Option<String> {
        match self.comment_style {
            CommentStyle::Inline => Some(format!("COMMENT={}", self.quote_literal(comment))),
            _ => None,
        }
    }

    /// Quote a string literal, doubling single quotes (and backslashes where
    /// the target treats them as escapes).
    pub fn quote_literal(&self, text: &str) -> String {
        let mut escaped = text.replace('\'', "''");
        if self.escape_backslash {
            escaped = escaped.replace('\\', "\\\\");
        }
        format!("'{}'", escaped)
    }

    pub fn default_functions(&self) -> &DefaultFunctions {
        &self.functions
    }

    /// `ON UPDATE` keyword for an action; `None` omits the clause.
    pub fn update_action(&self, action: ReferenceAction) -> Option<&'static str> {
        self.update_actions.get(action)
    }

    /// `ON DELETE` keyword for an action; `None` omits the clause.
    pub fn delete_action(&self, action: ReferenceAction) -> Option<&'static str> {
        self.delete_actions.get(action)
    }

    /// Statement setting the session time zone, if supported.
    pub fn session_time_zone(&self, zone: &str) -> Option<String> {
        if !self.supports(Feature::SessionTimeZone) {
            return None;
        }
        let escaped = zone.replace('\'', "''");
        self.session_time_zone
            .map(|template| template.replace(TIME_ZONE_PLACEHOLDER, &escaped))
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Resolve a column type to this dialect's type name.
    ///
    /// A negative scale on a target without negative scale support is
    /// normalized to `(P - S, 0)` so no integer digits are lost.
    pub fn type_name(&self, desc: &JdbcTypeDesc, options: &JdbcTypeOptions) -> Result<String> {
        let options = self.normalize_scale(desc, options);
        self.types
            .resolve(desc, &options)
            .ok_or_else(|| {
                MigrateError::unsupported_type(desc.type_code, &desc.type_name, &self.name)
            })
    }

    fn normalize_scale(&self, desc: &JdbcTypeDesc, options: &JdbcTypeOptions) -> JdbcTypeOptions {
        match (options.precision, options.scale) {
            (Some(precision), Some(scale))
                if scale < 0 && !self.supports(Feature::NegativeScale) =>
            {
                let widened = precision.saturating_add(scale.unsigned_abs());
                warn!(
                    "{}: negative scale not supported by {}, using ({},0) instead of ({},{})",
                    desc, self.name, widened, precision, scale
                );
                JdbcTypeOptions {
                    precision: Some(widened),
                    scale: Some(0),
                    ..*options
                }
            }
            _ => *options,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
