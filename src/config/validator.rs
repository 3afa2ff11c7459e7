use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let level = settings.log.level.trim();
        if level.is_empty() {
            errors.push(ValidationError::MissingField("log.level".to_string()));
        } else if let Err(e) = EnvFilter::try_new(level) {
            errors.push(ValidationError::InvalidValue {
                field: "log.level".to_string(),
                reason: e.to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SettingsValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_directive_levels_are_accepted() {
        let mut settings = Settings::default();
        settings.log.level = "schema_form=debug,warn".to_string();
        assert!(SettingsValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_empty_level_is_rejected() {
        let mut settings = Settings::default();
        settings.log.level = "  ".to_string();
        let errors = SettingsValidator::validate(&settings).unwrap_err();
        assert!(matches!(&errors[0], ValidationError::MissingField(f) if f == "log.level"));
    }

    #[test]
    fn test_malformed_level_is_rejected() {
        let mut settings = Settings::default();
        settings.log.level = "schema_form=loud".to_string();
        let errors = SettingsValidator::validate(&settings).unwrap_err();
        assert!(matches!(&errors[0], ValidationError::InvalidValue { field, .. } if field == "log.level"));
    }
}
