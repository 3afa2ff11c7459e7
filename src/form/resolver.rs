//! Type resolution
//!
//! Strips wrapper and deferred layers off a [`SchemaNode`] to reach the shape
//! the rest of the engine works with.

use crate::domain::{DocumentValue, FieldPath, PathSegment, Schema, SchemaNode};

// ============================================================================
// Terminal Shape
// ============================================================================

/// The terminal kind a node resolves to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape<'a> {
    Object {
        fields: &'a [(String, SchemaNode)],
    },
    Array {
        element: &'a SchemaNode,
    },
    String,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Unsupported {
        kind: &'a str,
    },
}

/// A resolved node: its shape plus what the wrappers around it carried
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<'a> {
    pub shape: Shape<'a>,
    /// Outermost description, a reference's own before its target's
    pub description: Option<&'a str>,
    /// Outermost wrapper default
    pub default: Option<&'a DocumentValue>,
    /// True when any wrapper was crossed, so the value may be absent
    pub optional: bool,
    /// Deferred slots followed on the way, outermost first
    pub refs: Vec<&'a str>,
}

impl<'a> Resolved<'a> {
    pub fn type_name(&self) -> &'a str {
        match self.shape {
            Shape::Object { .. } => "object",
            Shape::Array { .. } => "array",
            Shape::String => "string",
            Shape::Number { .. } => "number",
            Shape::Unsupported { kind } => kind,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a node to its terminal shape.
///
/// A [`Schema`] only exists once its reference chains are known to end, so
/// the hop limit is never reached for nodes taken from `schema`. A node from
/// elsewhere that names an unknown slot resolves to `Unsupported`.
pub fn resolve<'a>(schema: &'a Schema, node: &'a SchemaNode) -> Resolved<'a> {
    let hop_limit = schema.definition_names().count() + 1;
    let mut resolved = Resolved {
        shape: Shape::Unsupported { kind: "unresolved" },
        description: None,
        default: None,
        optional: false,
        refs: Vec::new(),
    };
    let mut current = node;

    loop {
        match current {
            SchemaNode::Wrapped { inner, default } => {
                resolved.optional = true;
                if resolved.default.is_none() {
                    resolved.default = default.as_ref();
                }
                current = &**inner;
            }
            SchemaNode::Deferred { name, description } => {
                if resolved.description.is_none() {
                    resolved.description = description.as_deref();
                }
                if resolved.refs.len() >= hop_limit {
                    return resolved;
                }
                match schema.resolve_deferred(name) {
                    Some(target) => {
                        resolved.refs.push(name);
                        current = target;
                    }
                    None => return resolved,
                }
            }
            SchemaNode::Object {
                fields,
                description,
            } => {
                resolved.shape = Shape::Object { fields };
                resolved.description = resolved.description.or(description.as_deref());
                return resolved;
            }
            SchemaNode::Array {
                element,
                description,
            } => {
                resolved.shape = Shape::Array { element };
                resolved.description = resolved.description.or(description.as_deref());
                return resolved;
            }
            SchemaNode::String { description } => {
                resolved.shape = Shape::String;
                resolved.description = resolved.description.or(description.as_deref());
                return resolved;
            }
            SchemaNode::Number {
                min,
                max,
                description,
            } => {
                resolved.shape = Shape::Number {
                    min: *min,
                    max: *max,
                };
                resolved.description = resolved.description.or(description.as_deref());
                return resolved;
            }
            SchemaNode::Unsupported { kind, description } => {
                resolved.shape = Shape::Unsupported { kind };
                resolved.description = resolved.description.or(description.as_deref());
                return resolved;
            }
        }
    }
}

/// Find the schema node describing the value at `path`, starting from `node`
pub fn schema_at<'a>(
    schema: &'a Schema,
    node: &'a SchemaNode,
    path: &FieldPath,
) -> Option<&'a SchemaNode> {
    path.segments()
        .iter()
        .try_fold(node, |current, segment| {
            match (resolve(schema, current).shape, segment) {
                (Shape::Object { fields }, PathSegment::Field(name)) => fields
                    .iter()
                    .find(|(field_name, _)| field_name == name)
                    .map(|(_, field)| field),
                (Shape::Array { element }, PathSegment::Index(_)) => Some(element),
                _ => None,
            }
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchemaBuilder;
    use crate::path;

    fn report_schema() -> Schema {
        let mut builder = SchemaBuilder::new();
        let finding = builder.declare("Finding");
        builder
            .define(
                "Finding",
                SchemaNode::object([
                    ("title", SchemaNode::string().describe("Title")),
                    ("severity", SchemaNode::bounded(Some(1.0), Some(4.0))),
                    ("related", SchemaNode::array(SchemaNode::deferred("Finding"))),
                ]),
            )
            .unwrap();
        builder
            .finish(SchemaNode::object([
                ("findings", SchemaNode::array(finding)),
                ("summary", SchemaNode::string().with_default("n/a")),
            ]))
            .unwrap()
    }

    #[test]
    fn test_resolve_through_wrappers() {
        let schema = report_schema();
        let summary = schema_at(&schema, schema.root(), &path!["summary"]).unwrap();
        let resolved = resolve(&schema, summary);

        assert_eq!(resolved.shape, Shape::String);
        assert!(resolved.optional);
        assert_eq!(resolved.default, Some(&DocumentValue::from("n/a")));
    }

    #[test]
    fn test_resolve_through_deferred() {
        let schema = report_schema();
        let element = schema_at(&schema, schema.root(), &path!["findings", 0usize]).unwrap();
        let resolved = resolve(&schema, element);

        assert!(matches!(resolved.shape, Shape::Object { fields } if fields.len() == 3));
        assert_eq!(resolved.refs, vec!["Finding"]);
        assert!(!resolved.optional);
    }

    #[test]
    fn test_reference_description_wins_over_target() {
        let mut builder = SchemaBuilder::new();
        builder
            .define("Person", SchemaNode::object([("name", SchemaNode::string())]).describe("Person"))
            .unwrap();
        let schema = builder
            .finish(SchemaNode::object([
                ("owner", SchemaNode::deferred("Person").describe("Owner")),
                ("reviewer", SchemaNode::deferred("Person")),
            ]))
            .unwrap();

        let owner = schema_at(&schema, schema.root(), &path!["owner"]).unwrap();
        assert_eq!(resolve(&schema, owner).description, Some("Owner"));
        let reviewer = schema_at(&schema, schema.root(), &path!["reviewer"]).unwrap();
        assert_eq!(resolve(&schema, reviewer).description, Some("Person"));
    }

    #[test]
    fn test_schema_at_follows_self_reference() {
        let schema = report_schema();
        let path = path!["findings", 0usize, "related", 2usize, "severity"];
        let node = schema_at(&schema, schema.root(), &path).unwrap();
        assert_eq!(
            resolve(&schema, node).shape,
            Shape::Number {
                min: Some(1.0),
                max: Some(4.0)
            }
        );
    }

    #[test]
    fn test_schema_at_rejects_wrong_segment_kind() {
        let schema = report_schema();
        assert!(schema_at(&schema, schema.root(), &path![0usize]).is_none());
        assert!(schema_at(&schema, schema.root(), &path!["findings", "x"]).is_none());
        assert!(schema_at(&schema, schema.root(), &path!["missing"]).is_none());
    }

    #[test]
    fn test_foreign_dangling_reference_is_unsupported() {
        let schema = Schema::new(SchemaNode::string()).unwrap();
        let stray = SchemaNode::deferred("Nowhere");
        let resolved = resolve(&schema, &stray);
        assert_eq!(resolved.shape, Shape::Unsupported { kind: "unresolved" });
    }
}
