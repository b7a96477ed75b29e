// --- File: crates/safari_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for the safari frontend.
///
/// Every crate converts its own errors into one of these variants so that
/// handlers can decide how to render a failure (form message, error page,
/// redirect to login).
#[derive(Error, Debug)]
pub enum SafariError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller is not signed in or the session has expired
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is signed in but not allowed to do this
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SafariError {
    /// Message that is safe to show to a visitor.
    ///
    /// Validation and conflict messages come from the remote API or our own
    /// form checks and are shown verbatim; everything else gets a generic text.
    pub fn user_message(&self) -> String {
        match self {
            SafariError::ValidationError(msg) | SafariError::ConflictError(msg) => msg.clone(),
            SafariError::AuthError(_) => "Please sign in to continue.".to_string(),
            SafariError::ForbiddenError(_) => {
                "You do not have permission to view this page.".to_string()
            }
            SafariError::NotFoundError(_) => "We could not find what you were looking for.".to_string(),
            SafariError::RateLimitError(_) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            SafariError::TimeoutError(_)
            | SafariError::HttpError(_)
            | SafariError::ExternalServiceError { .. } => {
                "Our booking system is not responding right now. Please try again shortly.".to_string()
            }
            SafariError::ParseError(_) | SafariError::ConfigError(_) | SafariError::InternalError(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SafariError {
    fn status_code(&self) -> u16 {
        match self {
            SafariError::HttpError(_) => 502,
            SafariError::ParseError(_) => 502,
            SafariError::ConfigError(_) => 500,
            SafariError::AuthError(_) => 401,
            SafariError::ForbiddenError(_) => 403,
            SafariError::ValidationError(_) => 400,
            SafariError::ExternalServiceError { .. } => 502,
            SafariError::ConflictError(_) => 409,
            SafariError::NotFoundError(_) => 404,
            SafariError::TimeoutError(_) => 504,
            SafariError::RateLimitError(_) => 429,
            SafariError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, SafariError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, SafariError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, SafariError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| SafariError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SafariError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| SafariError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for SafariError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SafariError::TimeoutError(err.to_string())
        } else {
            SafariError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SafariError {
    fn from(err: serde_json::Error) -> Self {
        SafariError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for SafariError {
    fn from(err: std::io::Error) -> Self {
        SafariError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SafariError {
    SafariError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SafariError {
    SafariError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> SafariError {
    SafariError::NotFoundError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> SafariError {
    SafariError::ForbiddenError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> SafariError {
    SafariError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SafariError {
    SafariError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SafariError {
    SafariError::InternalError(message.to_string())
}
