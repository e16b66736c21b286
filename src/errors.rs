use crate::imaging::ImagingError;
use crate::proof::ProofError;
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

/// Possible errors that can occur in the service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error("Key unavailable: {0}")]
    KeyUnavailable(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Rate limit exceeded")]
    RateLimit,
}

impl ServiceError {
    /// Failure kind reported to clients alongside the status code.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Proof(e) => e.kind(),
            ServiceError::Imaging(ImagingError::QrNotFound) => "QrNotFound",
            ServiceError::Imaging(_) => "Imaging",
            ServiceError::KeyUnavailable(_) => "KeyUnavailable",
            ServiceError::Validation(_) => "Validation",
            ServiceError::RateLimit => "RateLimit",
        }
    }
}

impl actix_web::error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Proof(ProofError::InvalidClaim(_))
            | ServiceError::Proof(ProofError::MalformedToken(_))
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Proof(ProofError::SignatureInvalid)
            | ServiceError::Imaging(ImagingError::QrNotFound) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.status_code().to_string(),
            kind: self.kind(),
            message: self.to_string(),
        })
    }
}

/// Error response for API endpoints
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    kind: &'static str,
    message: String,
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}
