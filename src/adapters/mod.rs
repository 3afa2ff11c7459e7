//! Conversions from external schema formats

pub mod json_schema;

pub use json_schema::from_json_schema;
