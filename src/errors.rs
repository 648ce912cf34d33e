//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the Search-A-Word client, mapping HTTP
//! failure statuses onto a fixed taxonomy and carrying context for
//! user-facing messages.
//!
//! ## Input/Output Specification
//! - **Input**: Transport failures, HTTP failure statuses with response
//!   bodies, local validation failures
//! - **Output**: Structured error variants with the originating status
//! - **Error Categories**: network, auth, request, server, upload, config
//!
//! ## Propagation Policy
//! The transport layer performs cross-cutting side effects (forced logout,
//! generic toasts) and then always forwards the original failure to the
//! caller, which may render a more specific message. No retries anywhere.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error taxonomy for the Search-A-Word client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network/transport failure (DNS, connect, timeout, body read)
    #[error("Network error: {details}")]
    Network { details: String },

    /// Authentication failure (HTTP 401)
    #[error("Authentication failed: {details}")]
    Unauthorized { details: String },

    /// Authorization failure (HTTP 403)
    #[error("Access denied: {details}")]
    Forbidden { details: String },

    /// Validation failure (HTTP 400)
    #[error("Validation failed: {details}")]
    Validation { details: String },

    /// Resource not found (HTTP 404)
    #[error("Not found: {details}")]
    NotFound { details: String },

    /// Conflicting resource, e.g. duplicate document (HTTP 409)
    #[error("Conflict: {details}")]
    Conflict { details: String },

    /// Request payload too large (HTTP 413)
    #[error("Payload too large: {details}")]
    PayloadTooLarge { details: String },

    /// Server-side failure (HTTP status >= 500)
    #[error("Server error (HTTP {status}): {details}")]
    Server { status: u16, details: String },

    /// Any other non-success HTTP status
    #[error("Unexpected HTTP {status}: {details}")]
    UnexpectedStatus { status: u16, details: String },

    /// Upload rejected by client-side pre-flight checks (no request sent)
    #[error("Upload rejected: {reason}")]
    UploadRejected { reason: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Field-level validation errors (config, CLI input)
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Response body could not be decoded into the expected shape
    #[error("Failed to decode response from {endpoint}: {details}")]
    Decode { endpoint: String, details: String },

    /// I/O errors (token file, upload file, download target)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ClientError {
    /// Map a non-success HTTP status onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ClientError::Validation { details: body },
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized { details: body },
            StatusCode::FORBIDDEN => ClientError::Forbidden { details: body },
            StatusCode::NOT_FOUND => ClientError::NotFound { details: body },
            StatusCode::CONFLICT => ClientError::Conflict { details: body },
            StatusCode::PAYLOAD_TOO_LARGE => ClientError::PayloadTooLarge { details: body },
            s if s.is_server_error() => ClientError::Server {
                status: s.as_u16(),
                details: body,
            },
            s => ClientError::UnexpectedStatus {
                status: s.as_u16(),
                details: body,
            },
        }
    }

    /// The HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Validation { .. } => Some(400),
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Conflict { .. } => Some(409),
            ClientError::PayloadTooLarge { .. } => Some(413),
            ClientError::Server { status, .. } => Some(*status),
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::Network { .. } => "network",
            ClientError::Unauthorized { .. } | ClientError::Forbidden { .. } => "auth",
            ClientError::Validation { .. }
            | ClientError::NotFound { .. }
            | ClientError::Conflict { .. }
            | ClientError::PayloadTooLarge { .. } => "request",
            ClientError::Server { .. } | ClientError::UnexpectedStatus { .. } => "server",
            ClientError::UploadRejected { .. } => "upload",
            ClientError::Config { .. } | ClientError::ValidationFailed { .. } => "configuration",
            ClientError::Decode { .. } | ClientError::Json(_) => "decode",
            ClientError::Io(_) | ClientError::Toml(_) => "local",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_taxonomy() {
        let cases = [
            (StatusCode::BAD_REQUEST, 400),
            (StatusCode::UNAUTHORIZED, 401),
            (StatusCode::FORBIDDEN, 403),
            (StatusCode::NOT_FOUND, 404),
            (StatusCode::CONFLICT, 409),
            (StatusCode::PAYLOAD_TOO_LARGE, 413),
            (StatusCode::INTERNAL_SERVER_ERROR, 500),
            (StatusCode::BAD_GATEWAY, 502),
        ];
        for (status, code) in cases {
            let err = ClientError::from_status(status, String::new());
            assert_eq!(err.status(), Some(code), "status {status}");
        }
    }

    #[test]
    fn unmapped_status_passes_through() {
        let err = ClientError::from_status(StatusCode::IM_A_TEAPOT, "teapot".into());
        assert!(matches!(
            err,
            ClientError::UnexpectedStatus { status: 418, .. }
        ));
    }
}
