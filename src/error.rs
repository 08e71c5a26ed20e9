//! Domain-specific error types for gaia

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the gaia service
#[derive(Error, Debug)]
pub enum GaiaError {
    #[error("Invalid input: {field} = {value} is outside {domain}")]
    InvalidInput {
        field: &'static str,
        value: String,
        domain: &'static str,
    },

    #[error("Invalid category: '{value}' is not a valid {kind}")]
    InvalidCategory { kind: &'static str, value: String },

    #[error("Invalid answer letter: '{letter}' (expected a, b, c or d)")]
    InvalidAnswerLetter { letter: String },

    #[error("Malformed generator output: {message}")]
    MalformedGeneratorOutput { message: String },

    #[error("Unauthorized. Please login through the main website.")]
    AccessDenied,

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GaiaError {
    /// HTTP status used when this error reaches a client.
    pub fn status(&self) -> StatusCode {
        match self {
            GaiaError::InvalidInput { .. }
            | GaiaError::InvalidCategory { .. }
            | GaiaError::InvalidAnswerLetter { .. }
            | GaiaError::MalformedGeneratorOutput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            GaiaError::AccessDenied => StatusCode::UNAUTHORIZED,
            GaiaError::NotFound { .. } => StatusCode::NOT_FOUND,
            GaiaError::Serialization { .. }
            | GaiaError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for GaiaError {
    fn from(err: anyhow::Error) -> Self {
        GaiaError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GaiaError {
    fn from(err: serde_json::Error) -> Self {
        GaiaError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Convert GaiaError to a JSON HTTP response
impl IntoResponse for GaiaError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "error": { "code": status.as_u16(), "message": self.to_string() } })
                .to_string(),
        )
            .into_response()
    }
}

/// Result type alias for gaia operations
pub type Result<T> = std::result::Result<T, GaiaError>;
