//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SwitchroomError`] via `#[from]`. Adapter failures are boxed into
//! [`SwitchroomError::Storage`] so the domain never names adapter types.

use std::fmt;

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum SwitchroomError {
    /// The payload broke a field rule.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The payload could not be parsed at all.
    #[error("malformed input")]
    MalformedInput(#[from] MalformedInputError),

    /// The addressed record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistence or file storage backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A single rejected field together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a required field that was absent.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "this field is required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-level validation failures, reported all at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `name` is empty or blank.
    #[error("name must not be empty")]
    EmptyName,

    /// `name` exceeds the column width.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },

    /// `area_type` is not one of the known tags.
    #[error("\"{0}\" is not a valid area type")]
    UnknownAreaType(String),

    /// One or more payload fields were rejected.
    #[error("invalid fields: {}", join_fields(.0))]
    Fields(Vec<FieldError>),
}

impl ValidationError {
    /// Flatten into per-field messages, attributing single-field variants.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => {
                vec![FieldError::new("name", self.to_string())]
            }
            Self::UnknownAreaType(_) => vec![FieldError::new("area_type", self.to_string())],
            Self::Fields(fields) => fields.clone(),
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Input that could not be parsed before validation could even start.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInputError {
    /// `coordinates` was sent as a string that is not valid JSON.
    #[error("invalid coordinates format")]
    InvalidCoordinates(#[source] serde_json::Error),
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
