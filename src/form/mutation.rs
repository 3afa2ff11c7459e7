//! Path-addressed edits
//!
//! Every edit returns a new document. Only the containers on the edited path
//! are copied; everything else is shared with the input, which is never
//! modified.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::accessor::get;
use super::error::FormError;
use super::resolver::{resolve, schema_at, Shape};
use super::synthesizer::synthesize;
use crate::domain::{DocumentMap, DocumentValue, FieldPath, PathSegment, Schema};

/// What `set` does when a container on the path has the wrong kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// Replace it with a container of the right kind
    #[default]
    Lenient,
    /// Fail with [`FormError::KindMismatch`]
    Strict,
}

/// Replace the value at `path`.
///
/// Missing containers on the way are created: an object when the next
/// segment is a field name, an array when it is an index. An array shorter
/// than the index is padded with nulls. A container of the wrong kind is
/// replaced. The empty path replaces the whole document.
pub fn set(document: &DocumentValue, path: &FieldPath, value: DocumentValue) -> DocumentValue {
    match set_at(Some(document), path, 0, value, AddressingMode::Lenient) {
        Ok(updated) => updated,
        // Lenient addressing has no failure path
        Err(_) => document.clone(),
    }
}

/// [`set`] with an explicit addressing mode
pub fn try_set(
    document: &DocumentValue,
    path: &FieldPath,
    value: DocumentValue,
    mode: AddressingMode,
) -> Result<DocumentValue, FormError> {
    set_at(Some(document), path, 0, value, mode)
}

fn set_at(
    current: Option<&DocumentValue>,
    path: &FieldPath,
    depth: usize,
    value: DocumentValue,
    mode: AddressingMode,
) -> Result<DocumentValue, FormError> {
    let Some(segment) = path.segments().get(depth) else {
        return Ok(value);
    };

    match segment {
        PathSegment::Field(name) => {
            let mut map: DocumentMap = match current {
                Some(DocumentValue::Object(map)) => (**map).clone(),
                None | Some(DocumentValue::Null) => {
                    debug!(path = %path.prefix(depth), "Creating missing object");
                    DocumentMap::new()
                }
                Some(other) => {
                    mismatch(path, depth, "object", other, mode)?;
                    DocumentMap::new()
                }
            };
            let child = set_at(map.get(name), path, depth + 1, value, mode)?;
            map.insert(name.clone(), child);
            Ok(DocumentValue::Object(Arc::new(map)))
        }
        PathSegment::Index(idx) => {
            let idx = *idx;
            let mut items: Vec<DocumentValue> = match current {
                Some(DocumentValue::Array(items)) => (**items).clone(),
                None | Some(DocumentValue::Null) => {
                    debug!(path = %path.prefix(depth), "Creating missing array");
                    Vec::new()
                }
                Some(other) => {
                    mismatch(path, depth, "array", other, mode)?;
                    Vec::new()
                }
            };
            let child = set_at(items.get(idx), path, depth + 1, value, mode)?;
            if idx < items.len() {
                items[idx] = child;
            } else {
                items.resize(idx, DocumentValue::Null);
                items.push(child);
            }
            Ok(DocumentValue::Array(Arc::new(items)))
        }
    }
}

fn mismatch(
    path: &FieldPath,
    depth: usize,
    expected: &'static str,
    found: &DocumentValue,
    mode: AddressingMode,
) -> Result<(), FormError> {
    let at = path.prefix(depth);
    match mode {
        AddressingMode::Strict => Err(FormError::KindMismatch {
            path: at,
            expected,
            found: found.type_name(),
        }),
        AddressingMode::Lenient => {
            debug!(
                path = %at,
                expected,
                found = found.type_name(),
                "Replacing container of the wrong kind"
            );
            Ok(())
        }
    }
}

/// Append a synthesized element to the array at `path`
pub fn insert_array_item(
    schema: &Schema,
    document: &DocumentValue,
    path: &FieldPath,
) -> Result<DocumentValue, FormError> {
    let node = schema_at(schema, schema.root(), path)
        .ok_or_else(|| FormError::PathNotInSchema { path: path.clone() })?;

    let resolved = resolve(schema, node);
    let Shape::Array { element } = resolved.shape else {
        return Err(FormError::NotAnArray {
            path: path.clone(),
            found: resolved.type_name().to_string(),
        });
    };

    let item = synthesize(schema, element).unwrap_or_default();
    let mut items = get(document, path)
        .and_then(DocumentValue::as_array)
        .map(<[DocumentValue]>::to_vec)
        .unwrap_or_default();
    items.push(item);

    Ok(set(document, path, DocumentValue::array(items)))
}

/// Drop the element at `index` from the array at `path`.
///
/// An index past the end, or a path that holds no array, leaves the document
/// as it is.
pub fn remove_array_item(document: &DocumentValue, path: &FieldPath, index: usize) -> DocumentValue {
    match get(document, path).and_then(DocumentValue::as_array) {
        Some(items) if index < items.len() => {
            let kept = items
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, item)| item.clone());
            set(document, path, DocumentValue::array(kept))
        }
        Some(items) => {
            debug!(path = %path, index, len = items.len(), "Index out of range, nothing removed");
            document.clone()
        }
        None => {
            debug!(path = %path, index, "No array at path, nothing removed");
            document.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
