//! Error types for the Drive service layer.

use thiserror::Error;

/// Result type for Drive operations.
pub type DriveResult<T> = Result<T, DriveError>;

/// Top-level error type for the Drive service layer.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// A caller-supplied argument failed local validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend reported that the resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request timed out before the backend answered.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The request never completed against the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with an error status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code of the error response.
        status: u16,
        /// Machine-readable reason from the error body, if present.
        reason: Option<String>,
        /// Human-readable message from the error body.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("Response error: {0}")]
    Response(String),
}

impl DriveError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        DriveError::Configuration(msg.into())
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DriveError::InvalidArgument(msg.into())
    }

    /// Creates a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        DriveError::NotFound(msg.into())
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        DriveError::Timeout(msg.into())
    }

    /// Creates a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        DriveError::Network(msg.into())
    }

    /// Creates a response error.
    pub fn response(msg: impl Into<String>) -> Self {
        DriveError::Response(msg.into())
    }

    /// Returns true if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriveError::NotFound(_))
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriveError::Timeout(_))
    }

    /// Returns the HTTP status code of the backend response, if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DriveError::NotFound(_) => Some(404),
            DriveError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service-account key file could not be read.
    #[error("Failed to read key file {path}: {source}")]
    KeyFile {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The key material could not be parsed.
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// Signing the token-request assertion failed.
    #[error("JWT signing error: {0}")]
    Signing(String),

    /// The token exchange request could not be completed.
    #[error("Token exchange failed: {0}")]
    Exchange(String),

    /// The token endpoint rejected the grant.
    #[error("Token endpoint returned {status}: {body}")]
    Denied {
        /// HTTP status of the token response.
        status: u16,
        /// Response body as returned by the endpoint.
        body: String,
    },
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<TransportError> for DriveError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => DriveError::Timeout(msg),
            TransportError::Network(msg) => DriveError::Network(msg),
            TransportError::Http(msg) | TransportError::Serialization(msg) => {
                DriveError::Response(msg)
            }
        }
    }
}
