use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::EntityId;

/// Field name to human-readable message, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum InterEdError {
    #[error("{collection} #{id} not found")]
    NotFound { collection: String, id: EntityId },

    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(FieldErrors),

    #[error("invalid {kind} '{value}', expected one of: {expected}")]
    InvalidVocabulary {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("invalid id '{0}': expected a positive integer")]
    InvalidId(String),

    #[error("invalid field assignment '{0}': expected field=value")]
    InvalidAssignment(String),

    #[error("unknown field '{field}' for {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("invalid event type '{0}'")]
    InvalidEventType(String),

    #[error("form is busy: a submission is already in flight")]
    FormBusy,

    #[error("form is not open")]
    FormClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl InterEdError {
    pub fn invalid_event_type(value: String) -> Self {
        InterEdError::InvalidEventType(value)
    }

    /// Field-scoped errors carried by this error, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            InterEdError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Whether the error means the target entity no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(self, InterEdError::NotFound { .. })
    }
}

fn format_field_errors(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, InterEdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "Email is required".to_string());
        fields.insert("name".to_string(), "Name is required".to_string());

        let err = InterEdError::Validation(fields);
        assert_eq!(
            err.to_string(),
            "validation failed: email: Email is required; name: Name is required"
        );
        assert_eq!(err.field_errors().map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_not_found_message() {
        let err = InterEdError::NotFound {
            collection: "students".to_string(),
            id: EntityId::new(7),
        };
        assert_eq!(err.to_string(), "students #7 not found");
        assert!(err.is_not_found());
    }
}
