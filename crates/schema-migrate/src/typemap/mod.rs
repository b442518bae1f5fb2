//! Type registry: resolves `(type code, type name, size, precision, scale)`
//! to a dialect-specific type name.
//!
//! A registry is assembled once by a [`TypeRegistryBuilder`] from declarative
//! [`TypeNameRule`] tables and is read-only afterwards. Resolution works in
//! three steps:
//!
//! 1. Follow the alias map, so that source-specific spellings (MySQL
//!    `TINYTEXT`, `MEDIUMTEXT`, ...) land on one canonical entry.
//! 2. Collect the candidate rules for the type code, grouped into priority
//!    tiers: name-specific rules before code-only rules, and within each, rules
//!    constraining options before rules that accept anything.
//! 3. Score every candidate of the first tier that has an applicable rule. An
//!    exact match (score 0) wins immediately, otherwise the lowest score wins
//!    and registration order breaks ties.

mod adapter;
mod template;

pub use adapter::{BooleanToNumberAdapter, OffsetToUtcAdapter, TypeAdapter, UuidToTextAdapter};
pub use template::{
    TypeNameTemplate, PRECISION_PLACEHOLDER, SCALE_PLACEHOLDER, SIZE_PLACEHOLDER,
};

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::types::{JdbcTypeDesc, JdbcTypeOptions};
use crate::core::value::{SqlValue, ValueKind};
use crate::error::Result;

/// Longest alias chain followed before giving up.
const MAX_ALIAS_HOPS: usize = 8;

/// Applicability of a rule for one of size, precision or scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Any value, including none.
    Any,
    /// A value must be present.
    Required,
    /// A value must be present and not exceed the limit.
    AtMost(i64),
    /// A value must be present and equal the limit.
    Exactly(i64),
}

impl Bound {
    /// Score of a requested value against the bound, `None` if not applicable.
    ///
    /// `AtMost` scores the unused headroom, so the tightest fitting rule wins.
    fn score(self, value: Option<i64>) -> Option<i64> {
        match (self, value) {
            (Bound::Any, _) => Some(0),
            (_, None) => None,
            (Bound::Required, Some(_)) => Some(0),
            (Bound::AtMost(limit), Some(v)) if v <= limit => Some(limit - v),
            (Bound::Exactly(limit), Some(v)) if v == limit => Some(0),
            _ => None,
        }
    }

    fn or_required(self, required: bool) -> Self {
        match self {
            Bound::Any if required => Bound::Required,
            other => other,
        }
    }
}

/// One declarative type-name rule of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeNameRule {
    pub type_code: i32,
    /// Restricts the rule to one source type name (compared ignoring case).
    pub type_name: Option<&'static str>,
    pub size: Bound,
    pub precision: Bound,
    pub scale: Bound,
    pub template: TypeNameTemplate,
}

impl TypeNameRule {
    /// Rule for every type with `type_code`. Placeholders in the template make
    /// the corresponding option required.
    pub const fn new(type_code: i32, template: &'static str) -> Self {
        Self {
            type_code,
            type_name: None,
            size: Bound::Any,
            precision: Bound::Any,
            scale: Bound::Any,
            template: TypeNameTemplate::new(template),
        }
    }

    pub const fn named(self, type_name: &'static str) -> Self {
        Self {
            type_name: Some(type_name),
            ..self
        }
    }

    pub const fn size(self, size: Bound) -> Self {
        Self { size, ..self }
    }

    pub const fn precision(self, precision: Bound) -> Self {
        Self { precision, ..self }
    }

    pub const fn scale(self, scale: Bound) -> Self {
        Self { scale, ..self }
    }

    fn effective_bounds(&self) -> (Bound, Bound, Bound) {
        (
            self.size.or_required(self.template.has_size()),
            self.precision.or_required(self.template.has_precision()),
            self.scale.or_required(self.template.has_scale()),
        )
    }

    /// Whether the rule constrains any option, explicitly or via placeholders.
    fn has_options(&self) -> bool {
        let (s, p, c) = self.effective_bounds();
        s != Bound::Any || p != Bound::Any || c != Bound::Any
    }

    fn key_matches(&self, type_code: i32, type_name: Option<&str>) -> bool {
        self.type_code == type_code
            && match (self.type_name, type_name) {
                (None, None) => true,
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            }
    }

    fn applies_to(&self, desc: &JdbcTypeDesc) -> bool {
        self.type_code == desc.type_code
            && self
                .type_name
                .map_or(true, |name| desc.type_name.eq_ignore_ascii_case(name))
    }

    /// Match score, `None` when the rule does not apply to the options.
    pub fn score(&self, options: &JdbcTypeOptions) -> Option<i64> {
        let (s, p, c) = self.effective_bounds();
        Some(
            s.score(options.size.map(i64::from))?
                + p.score(options.precision.map(i64::from))?
                + c.score(options.scale.map(i64::from))?,
        )
    }

    fn tier(&self) -> u8 {
        match (self.type_name.is_some(), self.has_options()) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// Read-only registry of type rules, aliases and value adapters.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    rules: Vec<TypeNameRule>,
    aliases: HashMap<JdbcTypeDesc, JdbcTypeDesc>,
    adapters: HashMap<ValueKind, Arc<dyn TypeAdapter>>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Follow the alias chain starting at `desc`.
    pub fn canonical<'a>(&'a self, desc: &'a JdbcTypeDesc) -> &'a JdbcTypeDesc {
        let mut current = desc;
        for _ in 0..MAX_ALIAS_HOPS {
            match self.aliases.get(current) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    /// Best matching rule for the type, if any.
    pub fn find_rule(
        &self,
        desc: &JdbcTypeDesc,
        options: &JdbcTypeOptions,
    ) -> Option<&TypeNameRule> {
        let desc = self.canonical(desc);

        for tier in 0..=3u8 {
            let mut best: Option<(&TypeNameRule, i64)> = None;
            for rule in self
                .rules
                .iter()
                .filter(|r| r.tier() == tier && r.applies_to(desc))
            {
                let Some(score) = rule.score(options) else {
                    continue;
                };
                if score == 0 {
                    return Some(rule);
                }
                if best.map_or(true, |(_, s)| score < s) {
                    best = Some((rule, score));
                }
            }
            if let Some((rule, _)) = best {
                return Some(rule);
            }
        }
        None
    }

    /// Resolve the type to a concrete type name.
    pub fn resolve(&self, desc: &JdbcTypeDesc, options: &JdbcTypeOptions) -> Option<String> {
        self.find_rule(desc, options)
            .map(|rule| rule.template.expand(options))
    }

    /// Whether any rule exists for the type code.
    pub fn supports_code(&self, type_code: i32) -> bool {
        self.rules.iter().any(|r| r.type_code == type_code)
    }

    /// Adapter registered for a runtime value class.
    pub fn adapter(&self, kind: ValueKind) -> Option<&Arc<dyn TypeAdapter>> {
        self.adapters.get(&kind)
    }

    /// Convert a value with the adapter registered for its class, passing
    /// other values through.
    pub fn adapt(&self, value: SqlValue) -> Result<SqlValue> {
        match self.adapters.get(&value.kind()) {
            Some(adapter) => adapter.adapt(value),
            None => Ok(value),
        }
    }
}

/// Builder producing an immutable [`TypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct TypeRegistryBuilder {
    rules: Vec<TypeNameRule>,
    aliases: HashMap<JdbcTypeDesc, JdbcTypeDesc>,
    adapters: HashMap<ValueKind, Arc<dyn TypeAdapter>>,
}

impl TypeRegistryBuilder {
    /// Append rules after the existing ones.
    pub fn rules(mut self, rules: &[TypeNameRule]) -> Self {
        self.rules.extend_from_slice(rules);
        self
    }

    /// Replace every existing rule sharing a `(type code, type name)` key with
    /// one of `rules`, then append `rules`.
    pub fn override_rules(mut self, rules: &[TypeNameRule]) -> Self {
        self.rules.retain(|existing| {
            !rules
                .iter()
                .any(|r| existing.key_matches(r.type_code, r.type_name))
        });
        self.rules.extend_from_slice(rules);
        self
    }

    /// Drop every rule for a type code.
    pub fn without_code(mut self, type_code: i32) -> Self {
        self.rules.retain(|r| r.type_code != type_code);
        self
    }

    /// Resolve `from` through the rules of `to`.
    pub fn alias(mut self, from: JdbcTypeDesc, to: JdbcTypeDesc) -> Self {
        self.aliases.insert(from, to);
        self
    }

    /// Register aliases from `(code, name) -> (code, name)` tuples.
    pub fn aliases(mut self, aliases: &[((i32, &str), (i32, &str))]) -> Self {
        for ((from_code, from_name), (to_code, to_name)) in aliases {
            self.aliases.insert(
                JdbcTypeDesc::new(*from_code, *from_name),
                JdbcTypeDesc::new(*to_code, *to_name),
            );
        }
        self
    }

    pub fn adapter(mut self, adapter: impl TypeAdapter + 'static) -> Self {
        self.adapters.insert(adapter.kind(), Arc::new(adapter));
        self
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            rules: self.rules,
            aliases: self.aliases,
            adapters: self.adapters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::codes;

    fn text_registry() -> TypeRegistry {
        TypeRegistry::builder()
            .rules(&[
                TypeNameRule::new(codes::CLOB, "TINYTEXT").size(Bound::AtMost(255)),
                TypeNameRule::new(codes::CLOB, "TEXT").size(Bound::AtMost(65_535)),
                TypeNameRule::new(codes::CLOB, "MEDIUMTEXT").size(Bound::AtMost(16_777_215)),
                TypeNameRule::new(codes::CLOB, "LONGTEXT"),
                TypeNameRule::new(codes::VARCHAR, "VARCHAR({N})"),
                TypeNameRule::new(codes::VARCHAR, "TEXT"),
                TypeNameRule::new(codes::DECIMAL, "DECIMAL({P},{S})"),
                TypeNameRule::new(codes::DECIMAL, "DECIMAL({P})").scale(Bound::Exactly(0)),
                TypeNameRule::new(codes::DECIMAL, "DECIMAL"),
                TypeNameRule::new(codes::OTHER, "JSON").named("json"),
            ])
            .aliases(&[
                ((codes::LONGVARCHAR, "TINYTEXT"), (codes::CLOB, "CLOB")),
                ((codes::LONGVARCHAR, "TEXT"), (codes::CLOB, "CLOB")),
                ((codes::LONGVARCHAR, "MEDIUMTEXT"), (codes::CLOB, "CLOB")),
                ((codes::LONGVARCHAR, "LONGTEXT"), (codes::CLOB, "CLOB")),
            ])
            .build()
    }

    #[test]
    fn test_parameterized_rule_preferred_when_options_present() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::VARCHAR);
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::size(80)).as_deref(),
            Some("VARCHAR(80)")
        );
    }

    #[test]
    fn test_code_only_rule_used_without_options() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::VARCHAR);
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::default()).as_deref(),
            Some("TEXT")
        );
    }

    #[test]
    fn test_tightest_bound_wins() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::CLOB);
        let resolve = |size| reg.resolve(&desc, &JdbcTypeOptions::size(size)).unwrap();
        assert_eq!(resolve(100), "TINYTEXT");
        assert_eq!(resolve(255), "TINYTEXT");
        assert_eq!(resolve(256), "TEXT");
        assert_eq!(resolve(70_000), "MEDIUMTEXT");
        assert_eq!(resolve(u32::MAX), "LONGTEXT");
    }

    #[test]
    fn test_exact_match_taken_immediately() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::DECIMAL);
        // DECIMAL({P},{S}) is registered first and is exact for (20, 0)
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::precision_scale(20, 0))
                .as_deref(),
            Some("DECIMAL(20,0)")
        );
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::precision_scale(10, 2))
                .as_deref(),
            Some("DECIMAL(10,2)")
        );
    }

    #[test]
    fn test_precision_without_scale_falls_to_code_only() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::DECIMAL);
        let opts = JdbcTypeOptions {
            precision: Some(12),
            ..JdbcTypeOptions::default()
        };
        // Both parameterized rules need a scale; the result never contains a
        // dangling placeholder.
        assert_eq!(reg.resolve(&desc, &opts).as_deref(), Some("DECIMAL"));
    }

    #[test]
    fn test_alias_resolves_through_canonical_entry() {
        let reg = text_registry();
        for name in ["TINYTEXT", "text", "MediumText", "LONGTEXT"] {
            let desc = JdbcTypeDesc::new(codes::LONGVARCHAR, name);
            assert_eq!(reg.canonical(&desc).type_code, codes::CLOB);
        }
        let desc = JdbcTypeDesc::new(codes::LONGVARCHAR, "MEDIUMTEXT");
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::size(16_777_215))
                .as_deref(),
            Some("MEDIUMTEXT")
        );
    }

    #[test]
    fn test_named_rule_only_matches_its_name() {
        let reg = text_registry();
        let json = JdbcTypeDesc::new(codes::OTHER, "JSON");
        assert_eq!(
            reg.resolve(&json, &JdbcTypeOptions::default()).as_deref(),
            Some("JSON")
        );
        let other = JdbcTypeDesc::new(codes::OTHER, "hstore");
        assert!(reg.resolve(&other, &JdbcTypeOptions::default()).is_none());
    }

    #[test]
    fn test_unknown_code_is_unresolved() {
        let reg = text_registry();
        let desc = JdbcTypeDesc::from_code(codes::SQLXML);
        assert!(reg.resolve(&desc, &JdbcTypeOptions::default()).is_none());
        assert!(!reg.supports_code(codes::SQLXML));
    }

    #[test]
    fn test_override_rules_replaces_same_key() {
        let reg = TypeRegistry::builder()
            .rules(&[
                TypeNameRule::new(codes::BOOLEAN, "BOOLEAN"),
                TypeNameRule::new(codes::INTEGER, "INTEGER"),
            ])
            .override_rules(&[TypeNameRule::new(codes::BOOLEAN, "NUMBER(1)")])
            .build();
        let desc = JdbcTypeDesc::from_code(codes::BOOLEAN);
        assert_eq!(
            reg.resolve(&desc, &JdbcTypeOptions::default()).as_deref(),
            Some("NUMBER(1)")
        );
        assert!(reg.supports_code(codes::INTEGER));
    }

    #[test]
    fn test_alias_cycle_terminates() {
        let a = JdbcTypeDesc::new(codes::OTHER, "a");
        let b = JdbcTypeDesc::new(codes::OTHER, "b");
        let reg = TypeRegistry::builder()
            .alias(a.clone(), b.clone())
            .alias(b, a.clone())
            .build();
        // Only checks that resolution terminates.
        let _ = reg.canonical(&a);
    }

    #[test]
    fn test_adapt_passes_through_without_adapter() {
        let reg = TypeRegistry::builder().adapter(BooleanToNumberAdapter).build();
        assert_eq!(reg.adapt(SqlValue::Bool(true)).unwrap(), SqlValue::I16(1));
        assert_eq!(reg.adapt(SqlValue::I32(7)).unwrap(), SqlValue::I32(7));
        assert!(reg.adapter(ValueKind::Bool).is_some());
        assert!(reg.adapter(ValueKind::Uuid).is_none());
    }
}
