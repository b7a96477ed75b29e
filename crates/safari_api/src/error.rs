// --- File: crates/safari_api/src/error.rs ---
use safari_common::error::SafariError;
use thiserror::Error;

pub(crate) const SERVICE_NAME: &str = "safari-api";

/// Errors that can occur when talking to the remote safari API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API returned an error: status={status}, message='{message}'")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("API configuration invalid: {0}")]
    ConfigError(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiError { status, .. } => Some(*status),
            ApiError::RequestError(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl From<ApiError> for SafariError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RequestError(err) if err.is_timeout() => SafariError::TimeoutError(err.to_string()),
            ApiError::RequestError(err) => SafariError::ExternalServiceError {
                service_name: SERVICE_NAME.to_string(),
                message: err.to_string(),
            },
            ApiError::ApiError { status, message } => match status {
                400 | 422 => SafariError::ValidationError(message),
                401 => SafariError::AuthError(message),
                403 => SafariError::ForbiddenError(message),
                404 => SafariError::NotFoundError(message),
                409 => SafariError::ConflictError(message),
                429 => SafariError::RateLimitError(message),
                408 | 504 => SafariError::TimeoutError(message),
                _ => SafariError::ExternalServiceError {
                    service_name: SERVICE_NAME.to_string(),
                    message: format!("status {}: {}", status, message),
                },
            },
            ApiError::ParseError(err) => SafariError::ParseError(err.to_string()),
            ApiError::ConfigError(message) => SafariError::ConfigError(message),
        }
    }
}
