//! Error types for the Enclave API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server rejected the request".
//! Non-2xx responses that carry an RFC 7807 body surface as `Problem` with the
//! decoded details; anything else lands in `HttpError` with the raw status and
//! body.

use thiserror::Error;

use crate::types::ProblemDetails;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the builders, clients and transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status with a problem-details body.
    #[error("{} - check problem details for more details", problem_title(.details))]
    Problem { status: u16, details: ProblemDetails },

    /// The server returned a non-2xx status without problem details.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A successful response carried no model where one was expected.
    #[error("response body was empty")]
    EmptyResponse,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A dynamic patch assignment named a field the model does not have.
    #[error("`{field}` is not a field of {model}")]
    InvalidField { model: &'static str, field: String },

    /// The HTTP round trip itself failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn problem_title(details: &ProblemDetails) -> &str {
    details.title.as_deref().unwrap_or("request failed")
}

impl ApiError {
    /// HTTP status of the failed response, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Problem { status, .. } | ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Problem details attached to the error, if any.
    pub fn problem_details(&self) -> Option<&ProblemDetails> {
        match self {
            ApiError::Problem { details, .. } => Some(details),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_message_uses_title() {
        let err = ApiError::Problem {
            status: 400,
            details: ProblemDetails {
                title: Some("Validation failed".to_string()),
                ..ProblemDetails::default()
            },
        };
        assert_eq!(
            err.to_string(),
            "Validation failed - check problem details for more details"
        );
        assert_eq!(err.status(), Some(400));
        assert!(err.problem_details().is_some());
    }

    #[test]
    fn problem_message_without_title() {
        let err = ApiError::Problem {
            status: 500,
            details: ProblemDetails::default(),
        };
        assert_eq!(
            err.to_string(),
            "request failed - check problem details for more details"
        );
    }

    #[test]
    fn invalid_field_names_model_and_field() {
        let err = ApiError::InvalidField {
            model: "EnrolmentKeyPatch",
            field: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "`colour` is not a field of EnrolmentKeyPatch");
        assert_eq!(err.status(), None);
    }
}
