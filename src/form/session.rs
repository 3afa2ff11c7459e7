//! Loading documents into an editable state

use tracing::{info, warn};

use super::synthesizer::synthesize;
use super::validator::{DocumentValidator, ValidationError};
use crate::domain::{DocumentValue, Schema};

/// How a loaded document came to be
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentState {
    /// The raw document passed validation and is used as is
    Editable,
    /// The raw document was rejected and a synthesized one stands in for it
    Defaulted { errors: Vec<ValidationError> },
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: DocumentValue,
    pub state: DocumentState,
}

impl LoadedDocument {
    pub fn is_editable(&self) -> bool {
        matches!(self.state, DocumentState::Editable)
    }

    /// A one-line notice for the user when the raw document was replaced
    pub fn warning(&self) -> Option<String> {
        match &self.state {
            DocumentState::Editable => None,
            DocumentState::Defaulted { errors } => {
                let first = errors
                    .first()
                    .map(|e| format!(": {}", e))
                    .unwrap_or_default();
                Some(format!(
                    "Document failed validation with {} error(s){}; starting from defaults",
                    errors.len(),
                    first
                ))
            }
        }
    }

    pub fn into_document(self) -> DocumentValue {
        self.document
    }
}

/// Validate `raw` and fall back to a synthesized root value when it fails.
///
/// The raw document is never partially kept: either all of it is used or
/// none of it.
pub fn load(schema: &Schema, raw: DocumentValue, validator: &dyn DocumentValidator) -> LoadedDocument {
    match validator.validate(schema, &raw) {
        Ok(()) => {
            info!("Document loaded");
            LoadedDocument {
                document: raw,
                state: DocumentState::Editable,
            }
        }
        Err(errors) => {
            for error in &errors {
                warn!(path = %error.path(), "{}", error);
            }
            let document = synthesize(schema, schema.root()).unwrap_or_default();
            let loaded = LoadedDocument {
                document,
                state: DocumentState::Defaulted { errors },
            };
            if let Some(message) = loaded.warning() {
                warn!("{}", message);
            }
            loaded
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchemaNode;
    use crate::form::validator::StructuralValidator;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(SchemaNode::object([
            ("title", SchemaNode::string()),
            ("count", SchemaNode::bounded(Some(1.0), None)),
        ]))
        .unwrap()
    }

    struct RejectAll;

    impl DocumentValidator for RejectAll {
        fn validate(&self, _: &Schema, _: &DocumentValue) -> Result<(), Vec<ValidationError>> {
            Err(Vec::new())
        }
    }

    #[test]
    fn test_valid_document_is_kept() {
        let raw = DocumentValue::from(json!({ "title": "Q3", "count": 2 }));
        let loaded = load(&schema(), raw.clone(), &StructuralValidator);

        assert!(loaded.is_editable());
        assert!(loaded.warning().is_none());
        assert!(loaded.document.shares_with(&raw));
    }

    #[test]
    fn test_invalid_document_is_replaced() {
        let raw = DocumentValue::from(json!({ "title": 7, "count": 2 }));
        let loaded = load(&schema(), raw, &StructuralValidator);

        assert!(!loaded.is_editable());
        assert_eq!(loaded.document, json!({ "title": "", "count": 1 }));
        match &loaded.state {
            DocumentState::Defaulted { errors } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected state: {:?}", other),
        }

        let warning = loaded.warning().unwrap();
        assert!(warning.contains("1 error(s)"));
        assert!(warning.contains("title"));
    }

    #[test]
    fn test_custom_validator_is_consulted() {
        let raw = DocumentValue::from(json!({ "title": "ok", "count": 3 }));
        let loaded = load(&schema(), raw, &RejectAll);

        assert!(!loaded.is_editable());
        assert_eq!(
            loaded.warning().unwrap(),
            "Document failed validation with 0 error(s); starting from defaults"
        );
        assert_eq!(loaded.into_document(), json!({ "title": "", "count": 1 }));
    }

    #[test]
    fn test_unsupported_root_falls_back_to_null() {
        let schema = Schema::new(SchemaNode::unsupported("boolean")).unwrap();
        let loaded = load(&schema, DocumentValue::from(true), &RejectAll);
        assert!(loaded.document.is_null());
    }
}
