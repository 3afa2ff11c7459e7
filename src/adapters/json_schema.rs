//! JSON Schema adapter
//!
//! Converts a JSON Schema document into a [`Schema`]. Entries under
//! `definitions` / `$defs` become named slots and local `$ref`s become
//! deferred references to them, so recursive schemas convert without
//! being expanded.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::domain::{Schema, SchemaBuilder, SchemaError, SchemaNode};

const DEFINITION_PREFIXES: [&str; 2] = ["#/definitions/", "#/$defs/"];

/// Convert a JSON Schema document
pub fn from_json_schema(schema: &Value) -> Result<Schema, SchemaError> {
    let mut builder = SchemaBuilder::new();

    for key in ["definitions", "$defs"] {
        if let Some(defs) = schema.get(key).and_then(Value::as_object) {
            for (name, def) in defs {
                builder.define(name, convert(def)?)?;
            }
        }
    }

    let root = convert(schema)?;
    let schema = builder.finish(root)?;
    debug!(
        definitions = schema.definition_names().count(),
        "Converted JSON Schema"
    );
    Ok(schema)
}

fn convert(schema: &Value) -> Result<SchemaNode, SchemaError> {
    let Some(obj) = schema.as_object() else {
        // `true` / `false` schemas accept anything / nothing
        return Ok(SchemaNode::unsupported("boolean schema"));
    };

    let mut node = if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        SchemaNode::deferred(definition_name(reference)?)
    } else {
        convert_shape(obj)?
    };

    if let Some(description) = obj.get("description").and_then(Value::as_str) {
        node = node.describe(description);
    }
    if let Some(default) = obj.get("default") {
        node = node.with_default(default.clone());
    }
    Ok(node)
}

fn definition_name(reference: &str) -> Result<&str, SchemaError> {
    DEFINITION_PREFIXES
        .iter()
        .find_map(|prefix| reference.strip_prefix(prefix))
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .ok_or_else(|| SchemaError::UnsupportedRef(reference.to_string()))
}

fn convert_shape(obj: &Map<String, Value>) -> Result<SchemaNode, SchemaError> {
    for keyword in ["oneOf", "anyOf", "allOf", "enum", "const"] {
        if obj.contains_key(keyword) {
            trace!(keyword, "Keyword has no editable shape");
            return Ok(SchemaNode::unsupported(keyword));
        }
    }

    match obj.get("type") {
        Some(Value::String(type_name)) => convert_typed(type_name, obj),
        // ["string", "null"] is a nullable string
        Some(Value::Array(types)) => {
            let concrete: Vec<&str> = types
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| *t != "null")
                .collect();
            match concrete.as_slice() {
                [single] if concrete.len() < types.len() => {
                    Ok(convert_typed(single, obj)?.optional())
                }
                [single] => convert_typed(single, obj),
                _ => Ok(SchemaNode::unsupported("union")),
            }
        }
        Some(_) => Ok(SchemaNode::unsupported("invalid type")),
        None if obj.contains_key("properties") => convert_typed("object", obj),
        None if obj.contains_key("items") => convert_typed("array", obj),
        None => Ok(SchemaNode::unsupported("any")),
    }
}

fn convert_typed(type_name: &str, obj: &Map<String, Value>) -> Result<SchemaNode, SchemaError> {
    let node = match type_name {
        "object" => {
            let required: HashSet<&str> = obj
                .get("required")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            let mut fields = Vec::new();
            if let Some(props) = obj.get("properties").and_then(Value::as_object) {
                for (name, prop) in props {
                    let field = convert(prop)?;
                    let field = match field {
                        SchemaNode::Wrapped { .. } => field,
                        _ if required.contains(name.as_str()) => field,
                        _ => field.optional(),
                    };
                    fields.push((name.clone(), field));
                }
            }
            SchemaNode::object(fields)
        }
        "array" => {
            let element = match obj.get("items") {
                Some(items @ Value::Object(_)) => convert(items)?,
                Some(_) => SchemaNode::unsupported("tuple"),
                None => SchemaNode::unsupported("any"),
            };
            SchemaNode::array(element)
        }
        "string" => SchemaNode::string(),
        "number" | "integer" => SchemaNode::bounded(
            obj.get("minimum").and_then(Value::as_f64),
            obj.get("maximum").and_then(Value::as_f64),
        ),
        other => {
            trace!(kind = other, "Type has no editable shape");
            SchemaNode::unsupported(other)
        }
    };
    Ok(node)
}

// ============================================================================
// Tests
// ============================================================================
