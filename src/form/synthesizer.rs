//! Default value synthesis
//!
//! Builds the smallest value that fits a shape: used for new array items and
//! as the substitute root document when a loaded one fails validation.

use std::collections::HashSet;
use tracing::{debug, trace};

use super::resolver::{resolve, Shape};
use crate::domain::{DocumentValue, Schema, SchemaNode};

/// Synthesize a value for `node`.
///
/// - strings are empty, numbers are their minimum (or 0)
/// - arrays are empty
/// - objects get one synthesized entry per field
/// - wrappers synthesize their inner shape; their default is not used here
///
/// Returns `None` for unsupported shapes, and objects leave such fields out.
/// Always terminates: a deferred slot that is already being synthesized
/// further up the same branch is not expanded again. The nearest optional
/// field above that point is left out, so the result validates whenever the
/// schema has a finite valid instance. When it has none, required
/// back-references get the empty value of their shape instead.
pub fn synthesize(schema: &Schema, node: &SchemaNode) -> Option<DocumentValue> {
    let mut seen = HashSet::new();
    match synthesize_with(schema, node, &mut seen, OnRecursion::Propagate) {
        Synthesized::Value(value) => Some(value),
        Synthesized::Nothing => None,
        Synthesized::Recursive => {
            debug!("Schema has no finite instance, cutting recursion with empty values");
            seen.clear();
            match synthesize_with(schema, node, &mut seen, OnRecursion::Empty) {
                Synthesized::Value(value) => Some(value),
                Synthesized::Nothing | Synthesized::Recursive => None,
            }
        }
    }
}

enum Synthesized {
    Value(DocumentValue),
    /// Unsupported shape, no value to give
    Nothing,
    /// Needs a definition that is already open further up the branch
    Recursive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnRecursion {
    /// Report the back-reference to the nearest optional field above it
    Propagate,
    /// Required back-references take the empty value of their shape
    Empty,
}

fn synthesize_with<'a>(
    schema: &'a Schema,
    node: &'a SchemaNode,
    seen: &mut HashSet<&'a str>,
    mode: OnRecursion,
) -> Synthesized {
    let resolved = resolve(schema, node);

    if let Some(name) = resolved.refs.iter().find(|name| seen.contains(*name)) {
        trace!(definition = %name, "Recursive definition reached");
        if resolved.optional || mode == OnRecursion::Propagate {
            return Synthesized::Recursive;
        }
        return empty_value(resolved.shape);
    }

    match resolved.shape {
        Shape::Object { fields } => {
            let entered: Vec<&str> = resolved
                .refs
                .iter()
                .copied()
                .filter(|name| seen.insert(name))
                .collect();

            let mut entries = Vec::with_capacity(fields.len());
            let mut outcome = None;
            for (name, field) in fields {
                match synthesize_with(schema, field, seen, mode) {
                    Synthesized::Value(value) => entries.push((name.clone(), value)),
                    Synthesized::Nothing => {}
                    Synthesized::Recursive if resolve(schema, field).optional => {
                        debug!(field = %name, "Leaving recursive optional field out");
                    }
                    Synthesized::Recursive => {
                        outcome = Some(Synthesized::Recursive);
                        break;
                    }
                }
            }

            for name in entered {
                seen.remove(name);
            }
            outcome.unwrap_or_else(|| Synthesized::Value(DocumentValue::object(entries)))
        }
        shape => empty_value(shape),
    }
}

/// The value a shape starts from when nothing is expanded
fn empty_value(shape: Shape<'_>) -> Synthesized {
    match shape {
        Shape::Object { .. } => Synthesized::Value(DocumentValue::empty_object()),
        Shape::Array { .. } => Synthesized::Value(DocumentValue::empty_array()),
        Shape::String => Synthesized::Value(DocumentValue::String(String::new())),
        Shape::Number { min, .. } => Synthesized::Value(DocumentValue::number(min.unwrap_or(0.0))),
        Shape::Unsupported { kind } => {
            trace!(kind, "No default value for unsupported shape");
            Synthesized::Nothing
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
