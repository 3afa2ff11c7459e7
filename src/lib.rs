//! # Schema Form - schema-driven form engine
//!
//! Given a schema describing the shape of a document, this crate renders a tree
//! of editable fields, reads and writes values by path, synthesizes defaults
//! for new items and validates loaded documents.
//!
//! ## Features
//!
//! - **Recursive schemas**: named definitions referenced from anywhere, in any order
//! - **Immutable documents**: every edit returns a new document sharing untouched subtrees
//! - **Total rendering**: any document, however stale, yields a full field tree
//! - **JSON Schema**: `definitions` / `$defs` and local `$ref` support
//!
//! ## Quick Start
//!
//! ```rust
//! use schema_form::domain::{DocumentValue, Schema, SchemaNode};
//! use schema_form::{form, path};
//!
//! let schema = Schema::new(SchemaNode::object([
//!     ("title", SchemaNode::string()),
//!     ("items", SchemaNode::array(SchemaNode::string())),
//! ]))
//! .unwrap();
//!
//! let doc = form::synthesize(&schema, schema.root()).unwrap();
//! let doc = form::set(&doc, &path!["title"], DocumentValue::from("Q3"));
//! let doc = form::insert_array_item(&schema, &doc, &path!["items"]).unwrap();
//!
//! let tree = form::build(&schema, &doc);
//! assert_eq!(tree.child("items").unwrap().children.len(), 1);
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: schema, document and path types
//! - **Form**: resolution, access, mutation, synthesis, rendering and validation
//! - **Adapters**: conversion from JSON Schema
//! - **Config**: settings for the command-line tool

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod form;
