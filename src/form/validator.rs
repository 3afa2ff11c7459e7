//! Structural document validation
//!
//! Checks a document against a schema and reports every problem found, each
//! with the path it was found at.

use thiserror::Error;

use super::resolver::{resolve, Shape};
use crate::domain::{DocumentValue, FieldPath, Schema, SchemaNode};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(FieldPath),

    #[error("Invalid type at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: String,
        found: &'static str,
    },

    #[error("Value {value} at '{path}' is out of range ({})", describe_bounds(*.min, *.max))]
    OutOfRange {
        path: FieldPath,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl ValidationError {
    pub fn path(&self) -> &FieldPath {
        match self {
            ValidationError::MissingField(path) => path,
            ValidationError::TypeMismatch { path, .. } => path,
            ValidationError::OutOfRange { path, .. } => path,
        }
    }
}

fn describe_bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{} to {}", min, max),
        (Some(min), None) => format!("at least {}", min),
        (None, Some(max)) => format!("at most {}", max),
        (None, None) => "unbounded".to_string(),
    }
}

/// Seam for whatever validates loaded documents
pub trait DocumentValidator {
    fn validate(&self, schema: &Schema, document: &DocumentValue) -> Result<(), Vec<ValidationError>>;
}

/// Validator that checks shapes, required fields and number bounds
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralValidator;

impl DocumentValidator for StructuralValidator {
    fn validate(&self, schema: &Schema, document: &DocumentValue) -> Result<(), Vec<ValidationError>> {
        validate(schema, document)
    }
}

/// Validate `document` against the schema's root
pub fn validate(schema: &Schema, document: &DocumentValue) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_node(schema, schema.root(), Some(document), &FieldPath::root(), &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_node(
    schema: &Schema,
    node: &SchemaNode,
    value: Option<&DocumentValue>,
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    let resolved = resolve(schema, node);

    // A null in an optional field counts as leaving it out
    let value = match value {
        Some(DocumentValue::Null) if resolved.optional => None,
        other => other,
    };
    let Some(value) = value else {
        if !resolved.optional {
            errors.push(ValidationError::MissingField(path.clone()));
        }
        return;
    };

    let mismatch = |errors: &mut Vec<ValidationError>| {
        errors.push(ValidationError::TypeMismatch {
            path: path.clone(),
            expected: resolved.type_name().to_string(),
            found: value.type_name(),
        });
    };

    match resolved.shape {
        Shape::Object { fields } => match value.as_object() {
            Some(map) => {
                for (name, field) in fields {
                    validate_node(schema, field, map.get(name), &path.field(name), errors);
                }
            }
            None => mismatch(errors),
        },
        Shape::Array { element } => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    validate_node(schema, element, Some(item), &path.index(idx), errors);
                }
            }
            None => mismatch(errors),
        },
        Shape::String => {
            if value.as_str().is_none() {
                mismatch(errors);
            }
        }
        Shape::Number { min, max } => match value.as_f64() {
            Some(n) => {
                let below = min.is_some_and(|min| n < min);
                let above = max.is_some_and(|max| n > max);
                if below || above {
                    errors.push(ValidationError::OutOfRange {
                        path: path.clone(),
                        value: n,
                        min,
                        max,
                    });
                }
            }
            None => mismatch(errors),
        },
        Shape::Unsupported { .. } => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
