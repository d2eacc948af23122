//! HTTPS transport abstraction.
//!
//! The [`Transport`] trait lets the session, executor and binary fetcher be
//! driven by the real [`ReqwestTransport`] or by a stub in tests. Callers
//! supply the complete header set; the transport adds nothing of its own and
//! never asks for compressed responses.

mod http;

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::TransportError;

pub use http::{ReqwestTransport, TrustMode};

#[cfg(test)]
pub use http::tests::{MockTransport, RecordedRequest, RequestMethod};

/// A single request header.
pub type Header = (&'static str, String);

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default CA bundle checked before falling back to the built-in roots.
pub const DEFAULT_CA_BUNDLE: &str = "/etc/ssl/certs/ca-certificates.crt";

/// URL used to check that the CA bundle can actually verify the service.
pub const DEFAULT_PROBE_URL: &str = "https://android.clients.google.com";

/// Trait for HTTP operations against the store.
///
/// Implementations must be shareable across threads; they hold no
/// per-session state.
pub trait Transport: Send + Sync {
    /// Performs a GET and returns the full response body.
    fn get(&self, url: &str, headers: &[Header]) -> Result<Vec<u8>, TransportError>;

    /// Performs a POST with `body` and returns the full response body.
    fn post(&self, url: &str, headers: &[Header], body: &[u8]) -> Result<Vec<u8>, TransportError>;

    /// Performs a GET and hands back the body as a reader.
    fn get_stream(&self, url: &str, headers: &[Header]) -> Result<StreamingBody, TransportError>;
}

/// A response body that has not been read yet.
pub struct StreamingBody {
    /// Declared `Content-Length`, when the server sent one.
    pub content_length: Option<u64>,
    pub reader: Box<dyn Read + Send>,
}

impl fmt::Debug for StreamingBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Transport settings.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,

    /// CA bundle to verify against. `None` uses the built-in roots directly.
    pub ca_bundle: Option<PathBuf>,

    /// Request issued once at construction to validate the CA bundle.
    /// `None` skips the probe.
    pub probe_url: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ca_bundle: Some(PathBuf::from(DEFAULT_CA_BUNDLE)),
            probe_url: Some(DEFAULT_PROBE_URL.to_string()),
        }
    }
}

impl TransportConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the CA bundle path.
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Verify against the built-in roots only.
    pub fn without_ca_bundle(mut self) -> Self {
        self.ca_bundle = None;
        self
    }

    /// Skip the start-up probe.
    pub fn without_probe(mut self) -> Self {
        self.probe_url = None;
        self
    }
}
