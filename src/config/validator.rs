use thiserror::Error;

use crate::config::Settings;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found for {field}: {path}")]
    FileNotFound { field: String, path: String },
}

pub struct SettingsValidator;

impl SettingsValidator {
    /// Collect every problem instead of stopping at the first
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(path) = &settings.catalog.path {
            if !path.is_file() {
                errors.push(ValidationError::FileNotFound {
                    field: "catalog.path".to_string(),
                    path: path.display().to_string(),
                });
            }
        }

        if settings.forms.long_text_threshold == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "forms.long_text_threshold".to_string(),
                reason: "Threshold must be greater than 0".to_string(),
            });
        }

        if settings.preview.template_dir.as_os_str().is_empty() {
            errors.push(ValidationError::MissingField("preview.template_dir".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
