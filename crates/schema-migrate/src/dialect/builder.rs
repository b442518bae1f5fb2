//! Builder assembling an immutable [`Dialect`].

use std::collections::HashSet;

use crate::core::identifier::IdentifierCase;
use crate::typemap::{TypeAdapter, TypeNameRule, TypeRegistry, TypeRegistryBuilder};

use super::keywords::SQL2003_RESERVED;
use super::sql2003::{TYPE_ALIASES, TYPE_RULES};
use super::{
    ActionMap, CommentStyle, DefaultFunctions, Dialect, Feature, IdentityStyle, SequenceSyntax,
    StreamingFetch, TransactionIsolation,
};

/// Features of the SQL:2003 baseline.
const SQL2003_FEATURES: &[Feature] = &[
    Feature::UniqueInCreateTable,
    Feature::NotNullUnique,
    Feature::ColumnCheck,
    Feature::TableCheck,
    Feature::PrimaryKeyInCreateTable,
    Feature::DropConstraints,
    Feature::Sequences,
    Feature::Catalogs,
    Feature::Schemas,
];

const SQL2003_ISOLATION: &[TransactionIsolation] = &[
    TransactionIsolation::ReadUncommitted,
    TransactionIsolation::ReadCommitted,
    TransactionIsolation::RepeatableRead,
    TransactionIsolation::Serializable,
];

/// Builder for [`Dialect`]. Every vendor starts from
/// [`DialectBuilder::sql2003`] and overrides what diverges.
#[derive(Debug, Clone)]
pub struct DialectBuilder {
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
    types: TypeRegistryBuilder,
}

impl DialectBuilder {
    /// Start from the SQL:2003 baseline.
    pub fn sql2003(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quote_open: '"',
            quote_close: '"',
            identifier_case: IdentifierCase::Upper,
            max_identifier_length: Some(128),
            keywords: SQL2003_RESERVED.iter().map(|k| k.to_string()).collect(),
            features: SQL2003_FEATURES.iter().copied().collect(),
            cascade_constraints: Some("CASCADE"),
            drop_foreign_key: "DROP CONSTRAINT",
            drop_primary_key: None,
            inline_index_keyword: "INDEX",
            identity: IdentityStyle::GeneratedByDefault,
            sequence_syntax: SequenceSyntax::SQL2003,
            comment_style: CommentStyle::Statement,
            update_actions: ActionMap::SQL2003,
            delete_actions: ActionMap::SQL2003,
            session_time_zone: None,
            escape_backslash: false,
            functions: DefaultFunctions::SQL2003,
            isolation_levels: SQL2003_ISOLATION.to_vec(),
            default_isolation: TransactionIsolation::ReadCommitted,
            streaming_fetch: StreamingFetch::default(),
            types: TypeRegistry::builder()
                .rules(TYPE_RULES)
                .aliases(TYPE_ALIASES),
        }
    }

    pub fn quotes(mut self, open: char, close: char) -> Self {
        self.quote_open = open;
        self.quote_close = close;
        self
    }

    pub fn identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = case;
        self
    }

    pub fn max_identifier_length(mut self, length: Option<usize>) -> Self {
        self.max_identifier_length = length;
        self
    }

    /// Add vendor reserved words to the SQL:2003 set.
    pub fn keywords(mut self, words: &[&str]) -> Self {
        self.keywords
            .extend(words.iter().map(|w| w.to_uppercase()));
        self
    }

    pub fn enable(mut self, features: &[Feature]) -> Self {
        self.features.extend(features.iter().copied());
        self
    }

    pub fn disable(mut self, features: &[Feature]) -> Self {
        for feature in features {
            self.features.remove(feature);
        }
        self
    }

    pub fn cascade_constraints(mut self, clause: Option<&'static str>) -> Self {
        self.cascade_constraints = clause;
        self
    }

    pub fn drop_foreign_key(mut self, keyword: &'static str) -> Self {
        self.drop_foreign_key = keyword;
        self
    }

    /// Fixed clause for dropping a primary key, e.g. `DROP PRIMARY KEY`.
    pub fn drop_primary_key(mut self, clause: &'static str) -> Self {
        self.drop_primary_key = Some(clause);
        self
    }

    pub fn inline_index_keyword(mut self, keyword: &'static str) -> Self {
        self.inline_index_keyword = keyword;
        self
    }

    pub fn identity(mut self, style: IdentityStyle) -> Self {
        self.identity = style;
        self
    }

    pub fn sequence_syntax(mut self, syntax: SequenceSyntax) -> Self {
        self.sequence_syntax = syntax;
        self
    }

    pub fn comment_style(mut self, style: CommentStyle) -> Self {
        self.comment_style = style;
        self
    }

    pub fn update_actions(mut self, actions: ActionMap) -> Self {
        self.update_actions = actions;
        self
    }

    pub fn delete_actions(mut self, actions: ActionMap) -> Self {
        self.delete_actions = actions;
        self
    }

    /// Template with a `{TZ}` placeholder; also enables
    /// [`Feature::SessionTimeZone`].
    pub fn session_time_zone(mut self, template: &'static str) -> Self {
        self.session_time_zone = Some(template);
        self.features.insert(Feature::SessionTimeZone);
        self
    }

    pub fn escape_backslash(mut self, escape: bool) -> Self {
        self.escape_backslash = escape;
        self
    }

    pub fn default_functions(mut self, functions: DefaultFunctions) -> Self {
        self.functions = functions;
        self
    }

    pub fn isolation_levels(
        mut self,
        levels: &[TransactionIsolation],
        default: TransactionIsolation,
    ) -> Self {
        self.isolation_levels = levels.to_vec();
        self.default_isolation = default;
        self
    }

    pub fn streaming_fetch(mut self, fetch: StreamingFetch) -> Self {
        self.streaming_fetch = fetch;
        self
    }

    /// Replace the baseline rules sharing a `(code, name)` key with `rules`.
    pub fn override_types(mut self, rules: &[TypeNameRule]) -> Self {
        self.types = self.types.override_rules(rules);
        self
    }

    /// Remove every rule for a type code the target cannot represent.
    pub fn without_type(mut self, type_code: i32) -> Self {
        self.types = self.types.without_code(type_code);
        self
    }

    pub fn type_aliases(mut self, aliases: &[((i32, &str), (i32, &str))]) -> Self {
        self.types = self.types.aliases(aliases);
        self
    }

    pub fn type_adapter(mut self, adapter: impl TypeAdapter + 'static) -> Self {
        self.types = self.types.adapter(adapter);
        self
    }

    pub fn build(self) -> Dialect {
        Dialect {
            name: self.name,
            quote_open: self.quote_open,
            quote_close: self.quote_close,
            identifier_case: self.identifier_case,
            max_identifier_length: self.max_identifier_length,
            keywords: self.keywords,
            features: self.features,
            cascade_constraints: self.cascade_constraints,
            drop_foreign_key: self.drop_foreign_key,
            drop_primary_key: self.drop_primary_key,
            inline_index_keyword: self.inline_index_keyword,
            identity: self.identity,
            sequence_syntax: self.sequence_syntax,
            comment_style: self.comment_style,
            update_actions: self.update_actions,
            delete_actions: self.delete_actions,
            session_time_zone: self.session_time_zone,
            escape_backslash: self.escape_backslash,
            functions: self.functions,
            isolation_levels: self.isolation_levels,
            default_isolation: self.default_isolation,
            streaming_fetch: self.streaming_fetch,
            types: self.types.build(),
        }
    }
}
