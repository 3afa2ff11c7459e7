//! Path-based reads

use crate::domain::{DocumentValue, FieldPath, PathSegment};

/// Read the value at `path`. A missing field, an out-of-range index or a
/// segment that does not fit the container yields `None`.
pub fn get<'a>(document: &'a DocumentValue, path: &FieldPath) -> Option<&'a DocumentValue> {
    path.segments()
        .iter()
        .try_fold(document, |current, segment| match segment {
            PathSegment::Field(name) => current.get_field(name),
            PathSegment::Index(idx) => current.get_index(*idx),
        })
}
