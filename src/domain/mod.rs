//! Core types: schemas, documents and the paths that address them

pub mod document;
pub mod path;
pub mod schema;

pub use document::{DocumentMap, DocumentValue};
pub use path::{FieldPath, PathParseError, PathSegment};
pub use schema::{Schema, SchemaBuilder, SchemaError, SchemaNode};
