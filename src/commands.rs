//! Command execution for the `schema-form` binary
//!
//! Each command reads its inputs from JSON files and produces a JSON value
//! for stdout.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::adapters::from_json_schema;
use crate::cli::Command;
use crate::config::Settings;
use crate::domain::{DocumentValue, FieldPath, Schema};
use crate::form::{self, FormError, StructuralValidator};

/// Result of a command: what to print, and whether the command succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub json: Value,
    pub success: bool,
}

impl Output {
    fn ok(json: Value) -> Self {
        Self {
            json,
            success: true,
        }
    }
}

pub fn run(command: &Command, settings: &Settings) -> Result<Output> {
    match command {
        Command::Tree {
            schema,
            document,
            path,
        } => {
            let schema = read_schema(schema)?;
            let document = read_document(document)?;
            let tree = match path {
                None => form::build(&schema, &document),
                Some(path) => {
                    let node = form::schema_at(&schema, schema.root(), path)
                        .ok_or_else(|| FormError::PathNotInSchema { path: path.clone() })?;
                    form::build_at(&schema, node, form::get(&document, path), path.clone())
                }
            };
            Ok(Output::ok(serde_json::to_value(&tree)?))
        }
        Command::Get { document, path } => {
            let document = read_document(document)?;
            let value = form::get(&document, path).map(DocumentValue::to_json);
            Ok(Output::ok(value.unwrap_or(Value::Null)))
        }
        Command::Set {
            schema,
            document,
            path,
            value,
        } => {
            let schema = read_schema(schema)?;
            let document = load_document(&schema, document)?;
            let value: Value = serde_json::from_str(value)
                .with_context(|| format!("Value for '{}' is not valid JSON", path))?;

            let updated = form::try_set(&document, path, value.into(), settings.engine.addressing)?;
            info!(path = %path, "Value set");
            Ok(Output::ok(updated.to_json()))
        }
        Command::Insert {
            schema,
            document,
            path,
        } => {
            let schema = read_schema(schema)?;
            let document = load_document(&schema, document)?;
            let updated = form::insert_array_item(&schema, &document, path)?;
            Ok(Output::ok(updated.to_json()))
        }
        Command::Remove {
            schema,
            document,
            path,
            index,
        } => {
            let schema = read_schema(schema)?;
            let document = load_document(&schema, document)?;
            let updated = form::remove_array_item(&document, path, *index);
            Ok(Output::ok(updated.to_json()))
        }
        Command::Synthesize { schema, path } => {
            let schema = read_schema(schema)?;
            let root = FieldPath::root();
            let path = path.as_ref().unwrap_or(&root);
            let node = form::schema_at(&schema, schema.root(), path)
                .ok_or_else(|| FormError::PathNotInSchema { path: path.clone() })?;
            let value = form::synthesize(&schema, node).map(|v| v.to_json());
            Ok(Output::ok(value.unwrap_or(Value::Null)))
        }
        Command::Validate { schema, document } => {
            let schema = read_schema(schema)?;
            let document = read_document(document)?;
            match form::validate(&schema, &document) {
                Ok(()) => Ok(Output::ok(json!({ "valid": true, "errors": [] }))),
                Err(errors) => {
                    let errors: Vec<Value> = errors
                        .iter()
                        .map(|e| json!({ "path": e.path(), "message": e.to_string() }))
                        .collect();
                    Ok(Output {
                        json: json!({ "valid": false, "errors": errors }),
                        success: false,
                    })
                }
            }
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

pub fn read_schema(path: &Path) -> Result<Schema> {
    let raw = read_json(path)?;
    let schema = from_json_schema(&raw)
        .with_context(|| format!("Invalid schema in {}", path.display()))?;
    debug!(path = %path.display(), "Schema loaded");
    Ok(schema)
}

pub fn read_document(path: &Path) -> Result<DocumentValue> {
    Ok(read_json(path)?.into())
}

/// Read a document for editing, substituting defaults when it does not fit
/// the schema
fn load_document(schema: &Schema, path: &Path) -> Result<DocumentValue> {
    let raw = read_document(path)?;
    let loaded = form::load(schema, raw, &StructuralValidator);
    if !loaded.is_editable() {
        debug!(path = %path.display(), "Editing defaults in place of document");
    }
    Ok(loaded.into_document())
}
