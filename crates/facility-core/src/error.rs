//! Error types for facility API operations.
//!
//! Every failure a client call can produce is a variant of [`Error`]. Responses the
//! backend rejects become [`Error::Api`], which carries an [`ApiException`] with the
//! status code, the raw body, the flattened response headers and, for documented
//! error statuses, the parsed [`ProblemDetails`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Main error type for facility API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required path parameter was not supplied (or was null).
    #[error("The parameter '{parameter}' must be defined (operation {operation}).")]
    MissingParameter {
        /// Operation identifier.
        operation: String,
        /// Parameter name.
        parameter: String,
    },

    /// An optional parameter was explicitly set to null.
    #[error("The parameter '{parameter}' cannot be null (operation {operation}).")]
    NullParameter {
        /// Operation identifier.
        operation: String,
        /// Parameter name.
        parameter: String,
    },

    /// A query parameter was supplied that the operation does not declare.
    #[error("The parameter '{parameter}' is not declared by operation {operation}.")]
    UndeclaredParameter {
        /// Operation identifier.
        operation: String,
        /// Parameter name.
        parameter: String,
    },

    /// The backend answered with a non-success status.
    #[error("{0}")]
    Api(ApiException),

    /// Service could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The call was cancelled through its cancellation token
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unknown operation identifier
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// Specialized result type for facility API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised for a response the backend marked as failed.
///
/// Mirrors what callers branch on: the status code, the message label, the raw
/// response text and the response headers. `result` holds the structured problem
/// detail when the operation documents the status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiException {
    /// Human-readable message (fixed label for documented statuses).
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub response: String,
    /// Response headers keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Parsed problem detail, when available.
    pub result: Option<ProblemDetails>,
}

impl ApiException {
    /// Returns a header value by (case-insensitive) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl fmt::Display for ApiException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.message, self.status)
    }
}

/// RFC 7807 problem detail returned for documented error statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Status code echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Occurrence-specific explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Occurrence URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Extension members (e.g. `traceId`, `errors`).
    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

/// Builds the error for a failed response.
///
/// All status-dispatch paths construct their API errors here.
#[must_use]
pub fn api_error(
    message: impl Into<String>,
    status: u16,
    response: impl Into<String>,
    headers: HashMap<String, String>,
    result: Option<ProblemDetails>,
) -> Error {
    Error::Api(ApiException {
        message: message.into(),
        status,
        response: response.into(),
        headers,
        result,
    })
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "MISSING_PARAMETER",
            Self::NullParameter { .. } => "NULL_PARAMETER",
            Self::UndeclaredParameter { .. } => "UNDECLARED_PARAMETER",
            Self::Api(_) => "API_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
        }
    }

    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(exception) => Some(exception.status),
            _ => None,
        }
    }

    /// Returns the API exception, if this is one.
    #[must_use]
    pub fn as_api_exception(&self) -> Option<&ApiException> {
        match self {
            Self::Api(exception) => Some(exception),
            _ => None,
        }
    }

    /// True for errors raised locally before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::NullParameter { .. }
                | Self::UndeclaredParameter { .. }
                | Self::ValidationError(_)
                | Self::UnknownOperation(_)
        )
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub fn should_log(&self) -> bool {
        match self {
            Self::Api(exception) => exception.status >= 500,
            Self::ConfigError(_) | Self::ParseError(_) => true,
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
