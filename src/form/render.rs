//! Render tree
//!
//! Walks a schema and a document together and produces the tree of fields a
//! presentation layer draws. Building is total: any document, including an
//! empty or stale one, yields a full tree.

use serde::Serialize;
use tracing::trace;

use super::resolver::{resolve, Shape};
use crate::domain::{DocumentValue, FieldPath, Schema, SchemaNode};

/// Kind of field a render node stands for
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Placeholder for a shape the engine cannot edit
    Unsupported { kind: String },
}

/// One field in the render tree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Field name within the parent object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current value, `None` when absent from the document
    pub value: Option<DocumentValue>,
    /// Wrapper default shown while the value is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<DocumentValue>,
    pub optional: bool,
    /// Set on a self-referential field with no data, which is not expanded
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, NodeKind::Unsupported { .. })
    }

    /// Value to display: the document's, else the wrapper default
    pub fn display_value(&self) -> Option<&DocumentValue> {
        self.value.as_ref().or(self.fallback.as_ref())
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }

    /// Depth-first iterator over this node and all descendants
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Nodes without children that are not collapsed references
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.walk().filter(|node| {
            !node.collapsed && !matches!(node.kind, NodeKind::Object | NodeKind::Array)
        })
    }
}

/// Build the render tree for a whole document
pub fn build(schema: &Schema, document: &DocumentValue) -> Node {
    let mut builder = TreeBuilder {
        schema,
        unexpanded: Vec::new(),
    };
    builder.build_node(schema.root(), Some(document), FieldPath::root(), None, "document".into())
}

/// Build the render tree for the value at `path`, described by `node`
pub fn build_at(
    schema: &Schema,
    node: &SchemaNode,
    value: Option<&DocumentValue>,
    path: FieldPath,
) -> Node {
    let mut builder = TreeBuilder {
        schema,
        unexpanded: Vec::new(),
    };
    let label = path.to_string();
    builder.build_node(node, value, path, None, label)
}

struct TreeBuilder<'a> {
    schema: &'a Schema,
    /// Deferred slots being expanded on the current branch without data
    unexpanded: Vec<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    fn build_node(
        &mut self,
        node: &'a SchemaNode,
        value: Option<&DocumentValue>,
        path: FieldPath,
        name: Option<String>,
        fallback_label: String,
    ) -> Node {
        let resolved = resolve(self.schema, node);
        let label = resolved
            .description
            .map(str::to_string)
            .or_else(|| name.clone())
            .unwrap_or(fallback_label);

        let mut out = Node {
            path,
            kind: NodeKind::String,
            name,
            label,
            description: resolved.description.map(str::to_string),
            value: value.cloned(),
            fallback: resolved.default.cloned(),
            optional: resolved.optional,
            collapsed: false,
            children: Vec::new(),
        };

        // Data is finite, so only a branch with no data can recurse forever
        let mut entered = 0;
        if value.is_none() {
            if resolved.refs.iter().any(|name| self.unexpanded.contains(name)) {
                out.kind = kind_of(resolved.shape);
                out.collapsed = true;
                return out;
            }
            entered = resolved.refs.len();
            self.unexpanded.extend(resolved.refs.iter().copied());
        }

        out.kind = kind_of(resolved.shape);
        match resolved.shape {
            Shape::Object { fields } => {
                out.children = fields
                    .iter()
                    .map(|(field_name, field)| {
                        self.build_node(
                            field,
                            value.and_then(|v| v.get_field(field_name)),
                            out.path.field(field_name),
                            Some(field_name.clone()),
                            field_name.clone(),
                        )
                    })
                    .collect();
            }
            Shape::Array { element } => {
                if let Some(items) = value.and_then(DocumentValue::as_array) {
                    out.children = items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| {
                            self.build_node(
                                element,
                                Some(item),
                                out.path.index(idx),
                                None,
                                format!("#{}", idx + 1),
                            )
                        })
                        .collect();
                }
            }
            Shape::Unsupported { kind } => {
                trace!(path = %out.path, kind, "Unsupported field shape");
            }
            Shape::String | Shape::Number { .. } => {}
        }

        let kept = self.unexpanded.len() - entered;
        self.unexpanded.truncate(kept);
        out
    }
}

fn kind_of(shape: Shape<'_>) -> NodeKind {
    match shape {
        Shape::Object { .. } => NodeKind::Object,
        Shape::Array { .. } => NodeKind::Array,
        Shape::String => NodeKind::String,
        Shape::Number { min, max } => NodeKind::Number { min, max },
        Shape::Unsupported { kind } => NodeKind::Unsupported {
            kind: kind.to_string(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchemaBuilder;
    use crate::path;
    use serde_json::json;

    fn assessment_schema() -> Schema {
        Schema::new(SchemaNode::object([
            ("title", SchemaNode::string().describe("Report title")),
            (
                "owner",
                SchemaNode::object([
                    ("name", SchemaNode::string()),
                    ("team", SchemaNode::string().with_default("security")),
                ]),
            ),
            (
                "items",
                SchemaNode::array(SchemaNode::object([
                    ("name", SchemaNode::string()),
                    ("rating", SchemaNode::bounded(Some(1.0), Some(4.0))),
                ])),
            ),
            ("approved", SchemaNode::unsupported("boolean")),
        ]))
        .unwrap()
    }

    #[test]
    fn test_build_follows_schema_order_and_labels() {
        let schema = assessment_schema();
        let tree = build(&schema, &DocumentValue::from(json!({ "title": "Q3" })));

        let names: Vec<_> = tree.children.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["title", "owner", "items", "approved"]);

        let title = tree.child("title").unwrap();
        assert_eq!(title.label, "Report title");
        assert_eq!(title.path, path!["title"]);
        assert_eq!(title.value, Some(DocumentValue::from("Q3")));

        let owner = tree.child("owner").unwrap();
        assert_eq!(owner.label, "owner");
        assert_eq!(owner.kind, NodeKind::Object);
        assert_eq!(tree.label, "document");
    }

    #[test]
    fn test_build_empty_document_marks_leaves_absent() {
        let schema = assessment_schema();
        let tree = build(&schema, &DocumentValue::empty_object());

        let leaves: Vec<_> = tree.leaves().collect();
        assert_eq!(leaves.len(), 4);
        assert!(leaves.iter().all(|leaf| leaf.is_absent()));

        let team = tree.child("owner").and_then(|o| o.child("team")).unwrap();
        assert_eq!(team.path, path!["owner", "team"]);
        assert_eq!(team.display_value(), Some(&DocumentValue::from("security")));
        assert!(team.optional);
    }

    #[test]
    fn test_build_array_children_follow_document() {
        let schema = assessment_schema();
        let doc = DocumentValue::from(json!({
            "items": [{ "name": "PII store", "rating": 4 }, { "name": "Logs" }]
        }));
        let tree = build(&schema, &doc);

        let items = tree.child("items").unwrap();
        assert_eq!(items.children.len(), 2);
        assert_eq!(items.children[0].label, "#1");

        let rating = items.children[1].child("rating").unwrap();
        assert_eq!(rating.path, path!["items", 1usize, "rating"]);
        assert!(rating.is_absent());
        assert_eq!(
            rating.kind,
            NodeKind::Number {
                min: Some(1.0),
                max: Some(4.0)
            }
        );
    }

    #[test]
    fn test_unsupported_shape_is_placeholder() {
        let schema = assessment_schema();
        let tree = build(&schema, &DocumentValue::from(json!({ "approved": true })));

        let approved = tree.child("approved").unwrap();
        assert!(approved.is_unsupported());
        assert_eq!(approved.value, Some(DocumentValue::Bool(true)));
    }

    #[test]
    fn test_stale_document_does_not_break_tree() {
        let schema = assessment_schema();
        let doc = DocumentValue::from(json!({ "owner": "not an object", "items": 7, "extra": 1 }));
        let tree = build(&schema, &doc);

        let owner = tree.child("owner").unwrap();
        assert_eq!(owner.children.len(), 2);
        assert!(owner.children.iter().all(Node::is_absent));
        assert!(tree.child("items").unwrap().children.is_empty());
        assert!(tree.child("extra").is_none());
    }

    #[test]
    fn test_recursive_schema_without_data_is_collapsed() {
        let mut builder = SchemaBuilder::new();
        builder
            .define(
                "Section",
                SchemaNode::object([
                    ("heading", SchemaNode::string()),
                    ("subsection", SchemaNode::deferred("Section").optional()),
                ]),
            )
            .unwrap();
        let schema = builder.finish(SchemaNode::deferred("Section")).unwrap();

        let doc = DocumentValue::from(json!({ "heading": "Scope" }));
        let tree = build(&schema, &doc);

        let sub = tree.child("subsection").unwrap();
        assert!(sub.is_absent());
        assert!(!sub.collapsed);
        let nested = sub.child("subsection").unwrap();
        assert!(nested.collapsed);
        assert!(nested.children.is_empty());
    }

    #[test]
    fn test_recursive_schema_follows_present_data() {
        let mut builder = SchemaBuilder::new();
        builder
            .define(
                "Section",
                SchemaNode::object([
                    ("heading", SchemaNode::string()),
                    ("subsection", SchemaNode::deferred("Section").optional()),
                ]),
            )
            .unwrap();
        let schema = builder.finish(SchemaNode::deferred("Section")).unwrap();

        let doc = DocumentValue::from(json!({
            "heading": "a",
            "subsection": { "heading": "b", "subsection": { "heading": "c" } }
        }));
        let tree = build(&schema, &doc);

        let third = tree
            .child("subsection")
            .and_then(|n| n.child("subsection"))
            .unwrap();
        assert_eq!(third.child("heading").unwrap().value, Some(DocumentValue::from("c")));
        assert!(!third.collapsed);
    }

    #[test]
    fn test_tree_serializes_for_presentation() {
        let schema = Schema::new(SchemaNode::object([("n", SchemaNode::bounded(Some(1.0), None))])).unwrap();
        let tree = build(&schema, &DocumentValue::from(json!({ "n": 2 })));
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["type"], "object");
        assert_eq!(json["children"][0]["path"], "n");
        assert_eq!(json["children"][0]["type"], "number");
        assert_eq!(json["children"][0]["min"], 1.0);
        assert_eq!(json["children"][0]["value"], 2);
    }
}
