//! HTTP error response mapping.
//!
//! Backend failures are logged and answered with a sanitized message; the
//! underlying cause never reaches the client.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use switchroom_domain::error::SwitchroomError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<&'static str, Vec<String>>>,
}

impl ErrorBody {
    pub(crate) fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

/// How a backend failure is reported for the operation that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Internal,
    Create,
}

/// Maps [`SwitchroomError`] to an HTTP response with appropriate status code.
pub struct ApiError {
    error: SwitchroomError,
    failure: Failure,
}

impl ApiError {
    /// Wrap an error raised while creating a switchroom.
    ///
    /// Backend failures on creation answer `400` rather than `500`.
    #[must_use]
    pub fn creating(error: SwitchroomError) -> Self {
        Self {
            error,
            failure: Failure::Create,
        }
    }
}

impl From<SwitchroomError> for ApiError {
    fn from(error: SwitchroomError) -> Self {
        Self {
            error,
            failure: Failure::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.error {
            SwitchroomError::Validation(err) => {
                let mut fields: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
                for field in err.field_errors() {
                    fields.entry(field.field).or_default().push(field.message);
                }
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "validation failed".to_string(),
                        fields: Some(fields),
                    },
                )
            }
            SwitchroomError::MalformedInput(err) => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(err.to_string()))
            }
            SwitchroomError::NotFound(err) => {
                (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string()))
            }
            SwitchroomError::Storage(source) => match self.failure {
                Failure::Internal => {
                    tracing::error!(error = ?source, "storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::message("internal server error"),
                    )
                }
                Failure::Create => {
                    tracing::error!(error = ?source, "storage error while creating switchroom");
                    (
                        StatusCode::BAD_REQUEST,
                        ErrorBody::message("failed to create switchroom"),
                    )
                }
            },
        };

        (status, Json(body)).into_response()
    }
}
