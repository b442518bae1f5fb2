//! Per-run generation state.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::schema::{ForeignKey, Index, Table};

/// What to do with foreign keys whose target table is never processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingForeignKeyPolicy {
    /// Emit them at the end of the run and record a warning.
    #[default]
    Emit,
    /// Abort the run.
    Fail,
}

/// Something the run did that callers may want to know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// A foreign key was emitted although its target table was never created.
    DanglingForeignKey {
        foreign_key: String,
        table: String,
        target: String,
    },
    /// A clause was left out because the target cannot express it.
    UnsupportedClause { object: String, clause: String },
    /// The target cannot set a session time zone.
    SessionTimeZone { zone: String },
    /// A constraint created without a name cannot be dropped by name.
    UnnamedConstraint { table: String, constraint: String },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::DanglingForeignKey {
                foreign_key,
                table,
                target,
            } => write!(
                f,
                "foreign key {} on {} references {}, which was not generated",
                foreign_key, table, target
            ),
            GenerationWarning::UnsupportedClause { object, clause } => {
                write!(f, "{}: {} omitted, not supported by target", object, clause)
            }
            GenerationWarning::SessionTimeZone { zone } => {
                write!(f, "session time zone {} not supported by target", zone)
            }
            GenerationWarning::UnnamedConstraint { table, constraint } => {
                write!(f, "{} on {} has no name, DROP omitted", constraint, table)
            }
        }
    }
}

/// A foreign key waiting for its target table.
#[derive(Debug, Clone, Copy)]
pub struct PendingForeignKey<'a> {
    pub table: &'a Table,
    pub foreign_key: &'a ForeignKey,
}

/// State of one generation pass.
///
/// Built fresh for every run and never shared, so processed tables and
/// pending foreign keys cannot leak from one run into the next.
#[derive(Debug, Default)]
pub struct GenerationRun<'a> {
    scripts: Vec<String>,
    processed: HashSet<String>,
    /// Target table key to the foreign keys referencing it. Ordered so the
    /// final flush is deterministic.
    pending: BTreeMap<String, Vec<PendingForeignKey<'a>>>,
    inlined_indexes: HashSet<String>,
    warnings: Vec<GenerationWarning>,
}

impl<'a> GenerationRun<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_script(&mut self, script: String) {
        self.scripts.push(script);
    }

    pub fn extend_scripts(&mut self, scripts: impl IntoIterator<Item = String>) {
        self.scripts.extend(scripts);
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn mark_processed(&mut self, table: &Table) {
        self.processed.insert(table.qualified_name());
    }

    pub fn is_processed(&self, table_key: &str) -> bool {
        self.processed.contains(table_key)
    }

    /// Park a foreign key until `target_key` is processed.
    pub fn defer(&mut self, target_key: String, table: &'a Table, foreign_key: &'a ForeignKey) {
        self.pending
            .entry(target_key)
            .or_default()
            .push(PendingForeignKey { table, foreign_key });
    }

    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Remove and return every pending foreign key whose target is now
    /// processed.
    pub fn take_resolved(&mut self) -> Vec<PendingForeignKey<'a>> {
        let ready: Vec<String> = self
            .pending
            .keys()
            .filter(|key| self.processed.contains(*key))
            .cloned()
            .collect();
        ready
            .into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .flatten()
            .collect()
    }

    /// Remove and return everything still pending, with its target key.
    pub fn take_all_pending(&mut self) -> Vec<(String, PendingForeignKey<'a>)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .flat_map(|(key, fks)| fks.into_iter().map(move |fk| (key.clone(), fk)))
            .collect()
    }

    pub fn mark_index_inlined(&mut self, table: &Table, index: &Index) {
        self.inlined_indexes.insert(index_key(table, index));
    }

    /// Whether the index was already emitted inside `CREATE TABLE`.
    pub fn is_index_inlined(&self, table: &Table, index: &Index) -> bool {
        self.inlined_indexes.contains(&index_key(table, index))
    }

    pub fn warn(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<GenerationWarning>) {
        (self.scripts, self.warnings)
    }
}

fn index_key(table: &Table, index: &Index) -> String {
    format!(
        "{}|{}|{}",
        table.qualified_name(),
        index.name,
        index.columns.join(",")
    )
}
