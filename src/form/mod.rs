//! Form engine
//!
//! Everything here works on a [`Schema`](crate::domain::Schema) and an
//! immutable [`DocumentValue`](crate::domain::DocumentValue):
//!
//! - [`resolver`] reduces schema nodes to their terminal shape
//! - [`accessor`] reads values by path
//! - [`mutation`] produces edited copies of a document
//! - [`synthesizer`] builds default values
//! - [`render`] pairs schema and document into a tree of editable nodes
//! - [`validator`] and [`session`] check loaded documents

pub mod accessor;
pub mod error;
pub mod mutation;
pub mod render;
pub mod resolver;
pub mod session;
pub mod synthesizer;
pub mod validator;

pub use accessor::get;
pub use error::FormError;
pub use mutation::{insert_array_item, remove_array_item, set, try_set, AddressingMode};
pub use render::{build, build_at, Node, NodeKind};
pub use resolver::{resolve, schema_at, Resolved, Shape};
pub use session::{load, DocumentState, LoadedDocument};
pub use synthesizer::synthesize;
pub use validator::{validate, DocumentValidator, StructuralValidator, ValidationError};
