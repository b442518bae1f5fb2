use tracing::{debug, warn};

use super::{wrong_kind, GeneratorContext, ObjectKind, SchemaObject, ScriptGenerator};
use crate::dialect::Feature;
use crate::error::Result;
use crate::naming::NamedEntity;
use crate::orchestrator::{GenerationRun, GenerationWarning};

/// `CREATE/DROP SEQUENCE`.
///
/// Clauses appear in a fixed order (START WITH, INCREMENT BY, MINVALUE,
/// MAXVALUE, CYCLE, CACHE, ORDER) and only when the sequence sets them and
/// the dialect can spell them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceGenerator;

impl ScriptGenerator for SequenceGenerator {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Sequence
    }

    fn create_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Sequence {
            table,
            column,
            sequence,
        } = *object
        else {
            return Err(wrong_kind(object));
        };
        let dialect = ctx.dialect;
        if !dialect.supports(Feature::Sequences) {
            debug!("{} has no sequences, skipping {}", dialect, sequence.name);
            return Ok(Vec::new());
        }

        let name = ctx.qualified_entity_name(&NamedEntity::Sequence {
            table,
            column,
            sequence,
        });
        let mut sql = format!("CREATE SEQUENCE {}", name);
        let mut omitted = Vec::new();

        let numeric = [
            (
                "START WITH",
                sequence.start_with,
                sequence.start_with.and_then(|v| dialect.sequence_start_with(v)),
            ),
            (
                "INCREMENT BY",
                sequence.increment_by,
                sequence.increment_by.and_then(|v| dialect.sequence_increment_by(v)),
            ),
            (
                "MINVALUE",
                sequence.min_value,
                sequence.min_value.and_then(|v| dialect.sequence_min_value(v)),
            ),
            (
                "MAXVALUE",
                sequence.max_value,
                sequence.max_value.and_then(|v| dialect.sequence_max_value(v)),
            ),
        ];
        for (label, value, clause) in numeric {
            push_clause(&mut sql, &mut omitted, label, value.is_some(), clause);
        }
        push_clause(
            &mut sql,
            &mut omitted,
            "CYCLE",
            sequence.cycle,
            dialect.sequence_cycle().map(str::to_string),
        );
        push_clause(
            &mut sql,
            &mut omitted,
            "CACHE",
            sequence.cache.is_some(),
            sequence.cache.and_then(|v| dialect.sequence_cache(v)),
        );
        push_clause(
            &mut sql,
            &mut omitted,
            "ORDER",
            sequence.order,
            dialect.sequence_order().map(str::to_string),
        );

        for clause in omitted {
            warn!("{}: {} not supported by target, omitted", name, clause);
            run.warn(GenerationWarning::UnsupportedClause {
                object: name.clone(),
                clause: clause.to_string(),
            });
        }

        debug!("Generated sequence {}", name);
        Ok(vec![sql])
    }

    fn drop_scripts(
        &self,
        object: &SchemaObject<'_>,
        ctx: &GeneratorContext<'_>,
        _run: &mut GenerationRun<'_>,
    ) -> Result<Vec<String>> {
        let SchemaObject::Sequence {
            table,
            column,
            sequence,
        } = *object
        else {
            return Err(wrong_kind(object));
        };
        if !ctx.dialect.supports(Feature::Sequences) {
            return Ok(Vec::new());
        }
        let name = ctx.qualified_entity_name(&NamedEntity::Sequence {
            table,
            column,
            sequence,
        });
        let if_exists = if ctx.dialect.supports(Feature::IfExistsDropSequence) {
            "IF EXISTS "
        } else {
            ""
        };
        Ok(vec![format!("DROP SEQUENCE {}{}", if_exists, name)])
    }
}

fn push_clause(
    sql: &mut String,
    omitted: &mut Vec<&'static str>,
    label: &'static str,
    wanted: bool,
    clause: Option<String>,
) {
    if !wanted {
        return;
    }
    match clause {
        Some(clause) => {
            sql.push(' ');
            sql.push_str(&clause);
        }
        None => omitted.push(label),
    }
}
