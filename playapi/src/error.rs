//! Error types for the Play Store client.
//!
//! Each failure kind has its own enum so callers can tell a rejected login
//! from a network failure, a malformed response body, or a response that
//! decoded fine but lacks the payload the operation asked for. [`ApiError`]
//! wraps them all for the catalog-level API.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Credential exchange failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The login endpoint answered with an `Error=` line.
    #[error("login rejected, server says: {0}")]
    Rejected(String),

    /// The login response carried neither an `Auth=` nor an `Error=` line.
    #[error("auth token not found in login response")]
    TokenNotFound,
}

/// Network, TLS or HTTP-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed to read response from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Response bytes did not parse against the schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to decode {message}: {source}")]
pub struct DecodeError {
    /// Name of the message type being decoded.
    pub message: &'static str,
    #[source]
    pub source: prost::DecodeError,
}

impl DecodeError {
    pub fn new(message: &'static str, source: prost::DecodeError) -> Self {
        Self { message, source }
    }
}

/// A decoded response lacks what the invoked operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The response payload does not carry the expected branch.
    #[error("{operation}: response payload has no {field}")]
    MissingPayload {
        operation: &'static str,
        field: &'static str,
    },

    /// A purchase or delivery response has no app delivery data.
    #[error("{operation}: response has no app delivery data")]
    MissingDeliveryData { operation: &'static str },

    /// App delivery data has no download URL.
    #[error("{operation}: app delivery data has no download URL")]
    MissingDownloadUrl { operation: &'static str },

    /// App delivery data has no authorization cookie.
    #[error("{operation}: app delivery data has no download auth cookie")]
    MissingAuthCookie { operation: &'static str },

    /// The server kept handing out continuation tokens.
    #[error("search did not terminate after {pages} pages")]
    PaginationLimit { pages: usize },
}

/// Configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the INI file.
    #[error("failed to load config {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// A value is present but malformed.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// A required value is missing.
    #[error("missing config value: {0}")]
    Missing(&'static str),

    /// No platform config directory could be determined.
    #[error("cannot determine config directory")]
    NoConfigDir,
}

/// Umbrella error for catalog operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_login_error_display_carries_reason() {
        let err = LoginError::Rejected("BadAuthentication".to_string());
        assert!(err.to_string().contains("BadAuthentication"));
        assert!(LoginError::TokenNotFound.to_string().contains("not found"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            url: "https://example.com/fdfe/details".to_string(),
            status: 401,
        };
        assert_eq!(err.to_string(), "HTTP 401 from https://example.com/fdfe/details");
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = crate::proto::ResponseWrapper::decode(&[0x0a, 0x05][..]).unwrap_err();
        let err = DecodeError::new("ResponseWrapper", source);
        assert!(err.to_string().starts_with("failed to decode ResponseWrapper"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_api_error_from_kinds() {
        let api: ApiError = LoginError::TokenNotFound.into();
        assert!(matches!(api, ApiError::Login(_)));

        let api: ApiError = ProtocolError::PaginationLimit { pages: 3 }.into();
        assert!(matches!(api, ApiError::Protocol(_)));
        assert_eq!(api.to_string(), "search did not terminate after 3 pages");
    }
}
