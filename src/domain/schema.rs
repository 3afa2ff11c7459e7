//! Schema model
//!
//! A [`SchemaNode`] describes the permitted shape of a document. Self- and
//! mutually-referential structures go through named [`SchemaNode::Deferred`]
//! slots that live in the [`Schema`]'s definitions table, so the order in
//! which definitions are written does not matter.

use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use super::document::DocumentValue;

// ============================================================================
// Schema Node
// ============================================================================

/// One node of a schema
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaNode {
    /// Named fields, in display order
    Object {
        fields: Vec<(String, SchemaNode)>,
        description: Option<String>,
    },
    Array {
        element: Box<SchemaNode>,
        description: Option<String>,
    },
    String {
        description: Option<String>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        description: Option<String>,
    },
    /// Transparent wrapper. With a default it is a defaulted field, without
    /// one it is an optional field.
    Wrapped {
        inner: Box<SchemaNode>,
        default: Option<DocumentValue>,
    },
    /// Reference to a named definition, resolved at traversal time. Its own
    /// description takes precedence over the target's.
    Deferred {
        name: String,
        description: Option<String>,
    },
    /// A shape the form engine does not edit (boolean, enum, oneOf, ...)
    Unsupported {
        kind: String,
        description: Option<String>,
    },
}

impl SchemaNode {
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        SchemaNode::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            description: None,
        }
    }

    pub fn array(element: SchemaNode) -> Self {
        SchemaNode::Array {
            element: Box::new(element),
            description: None,
        }
    }

    pub fn string() -> Self {
        SchemaNode::String { description: None }
    }

    pub fn number() -> Self {
        SchemaNode::Number {
            min: None,
            max: None,
            description: None,
        }
    }

    pub fn bounded(min: Option<f64>, max: Option<f64>) -> Self {
        SchemaNode::Number {
            min,
            max,
            description: None,
        }
    }

    pub fn deferred(name: impl Into<String>) -> Self {
        SchemaNode::Deferred {
            name: name.into(),
            description: None,
        }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        SchemaNode::Unsupported {
            kind: kind.into(),
            description: None,
        }
    }

    /// Wrap as an optional field
    pub fn optional(self) -> Self {
        SchemaNode::Wrapped {
            inner: Box::new(self),
            default: None,
        }
    }

    /// Wrap with a fallback value
    pub fn with_default(self, default: impl Into<DocumentValue>) -> Self {
        SchemaNode::Wrapped {
            inner: Box::new(self),
            default: Some(default.into()),
        }
    }

    /// Attach a description to the terminal shape. Wrappers pass it through
    /// and a deferred reference keeps it for the place it is used.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match &mut self {
            SchemaNode::Object { description, .. }
            | SchemaNode::Array { description, .. }
            | SchemaNode::String { description }
            | SchemaNode::Number { description, .. }
            | SchemaNode::Deferred { description, .. }
            | SchemaNode::Unsupported { description, .. } => *description = Some(text),
            SchemaNode::Wrapped { inner, .. } => {
                let taken = std::mem::replace(inner.as_mut(), SchemaNode::string());
                **inner = taken.describe(text);
            }
        }
        self
    }

    pub fn kind_name(&self) -> &str {
        match self {
            SchemaNode::Object { .. } => "object",
            SchemaNode::Array { .. } => "array",
            SchemaNode::String { .. } => "string",
            SchemaNode::Number { .. } => "number",
            SchemaNode::Wrapped { .. } => "wrapped",
            SchemaNode::Deferred { .. } => "deferred",
            SchemaNode::Unsupported { kind, .. } => kind,
        }
    }

    /// Visit every deferred reference reachable without expanding one
    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            SchemaNode::Object { fields, .. } => {
                for (_, field) in fields {
                    field.collect_refs(out);
                }
            }
            SchemaNode::Array { element, .. } => element.collect_refs(out),
            SchemaNode::Wrapped { inner, .. } => inner.collect_refs(out),
            SchemaNode::Deferred { name, .. } => out.push(name),
            SchemaNode::String { .. }
            | SchemaNode::Number { .. }
            | SchemaNode::Unsupported { .. } => {}
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Reference to undefined schema definition '{0}'")]
    UndefinedReference(String),

    #[error("Schema definition '{0}' is defined more than once")]
    DuplicateDefinition(String),

    #[error("Schema definitions never reach a concrete shape: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("Unsupported reference '{0}' (only #/definitions/* and #/$defs/* are understood)")]
    UnsupportedRef(String),
}

/// A root shape plus the named definitions its deferred references point at
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    root: SchemaNode,
    definitions: HashMap<String, SchemaNode>,
}

impl Schema {
    /// Schema without named definitions
    pub fn new(root: SchemaNode) -> Result<Self, SchemaError> {
        SchemaBuilder::new().finish(root)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Follow a deferred reference one level
    pub fn resolve_deferred(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

/// Collects named definitions, then checks them once in [`SchemaBuilder::finish`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    declared: BTreeSet<String>,
    definitions: HashMap<String, SchemaNode>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot and get a reference to it, before it is defined
    pub fn declare(&mut self, name: &str) -> SchemaNode {
        self.declared.insert(name.to_string());
        SchemaNode::deferred(name)
    }

    /// Fill a slot. Each name may be defined once.
    pub fn define(&mut self, name: &str, node: SchemaNode) -> Result<&mut Self, SchemaError> {
        if self.definitions.contains_key(name) {
            return Err(SchemaError::DuplicateDefinition(name.to_string()));
        }
        self.declared.insert(name.to_string());
        self.definitions.insert(name.to_string(), node);
        Ok(self)
    }

    /// Check every reference has a definition and every reference chain
    /// reaches a concrete shape.
    pub fn finish(self, root: SchemaNode) -> Result<Schema, SchemaError> {
        if let Some(missing) = self
            .declared
            .iter()
            .find(|name| !self.definitions.contains_key(*name))
        {
            return Err(SchemaError::UndefinedReference(missing.clone()));
        }

        let mut refs = Vec::new();
        root.collect_refs(&mut refs);
        for node in self.definitions.values() {
            node.collect_refs(&mut refs);
        }
        if let Some(missing) = refs.iter().find(|name| !self.definitions.contains_key(**name)) {
            return Err(SchemaError::UndefinedReference(missing.to_string()));
        }

        let schema = Schema {
            root,
            definitions: self.definitions,
        };

        let mut names: Vec<&str> = schema.definition_names().collect();
        names.sort_unstable();
        for name in names {
            schema.check_chain(name)?;
        }
        if let Some(start) = schema.leading_ref(&schema.root) {
            schema.check_chain(start)?;
        }

        Ok(schema)
    }
}

impl Schema {
    /// The reference a node reduces to through wrappers alone, if any
    fn leading_ref<'a>(&'a self, mut node: &'a SchemaNode) -> Option<&'a str> {
        loop {
            match node {
                SchemaNode::Wrapped { inner, .. } => node = &**inner,
                SchemaNode::Deferred { name, .. } => return Some(name),
                _ => return None,
            }
        }
    }

    fn check_chain(&self, start: &str) -> Result<(), SchemaError> {
        let mut chain = vec![start.to_string()];
        let mut current = start;
        while let Some(next) = self
            .definitions
            .get(current)
            .and_then(|node| self.leading_ref(node))
        {
            let revisit = chain.iter().any(|seen| seen == next);
            chain.push(next.to_string());
            if revisit {
                return Err(SchemaError::Cycle { chain });
            }
            current = next;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
