//! Blocking reqwest transport with CA bundle verification.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Certificate;
use tracing::{debug, warn};

use super::{Header, StreamingBody, Transport, TransportConfig};
use crate::error::TransportError;

/// Which certificates a [`ReqwestTransport`] verifies servers against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMode {
    /// Only the certificates from this PEM bundle.
    Bundle(PathBuf),
    /// The roots compiled into the TLS stack.
    BuiltIn,
}

/// Real transport implementation using reqwest.
///
/// The trust decision is made once, in [`ReqwestTransport::with_config`]:
/// if the configured bundle cannot be loaded, or the probe request fails,
/// the instance verifies against the built-in roots for its whole lifetime.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    trust: TrustMode,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport with the default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates a transport, falling back to built-in roots if the configured
    /// CA bundle is unusable.
    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        if let Some(path) = &config.ca_bundle {
            match Self::with_bundle(config, path) {
                Ok(transport) => return Ok(transport),
                Err(reason) => warn!(
                    bundle = %path.display(),
                    %reason,
                    "CA bundle unusable, falling back to built-in roots"
                ),
            }
        }

        let client = build_client(config.timeout, None)?;
        Ok(Self {
            client,
            trust: TrustMode::BuiltIn,
            timeout: config.timeout,
        })
    }

    fn with_bundle(config: &TransportConfig, path: &Path) -> Result<Self, String> {
        let certs = load_bundle(path)?;
        let client = build_client(config.timeout, Some(certs)).map_err(|e| e.to_string())?;

        if let Some(probe_url) = &config.probe_url {
            client
                .post(probe_url)
                .header("Accept-Encoding", "")
                .send()
                .map_err(|e| format!("probe of {} failed: {}", probe_url, e))?;
        }

        debug!(bundle = %path.display(), "Verifying against CA bundle");
        Ok(Self {
            client,
            trust: TrustMode::Bundle(path.to_path_buf()),
            timeout: config.timeout,
        })
    }

    /// The trust mode chosen at construction.
    pub fn trust_mode(&self) -> &TrustMode {
        &self.trust
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                TransportError::Request {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    fn read_body(&self, url: &str, response: Response) -> Result<Vec<u8>, TransportError> {
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Body {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &[Header]) -> Result<Vec<u8>, TransportError> {
        let request = with_headers(self.client.get(url), headers);
        let response = self.send(url, request)?;
        self.read_body(url, response)
    }

    fn post(&self, url: &str, headers: &[Header], body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let request = with_headers(self.client.post(url), headers).body(body.to_vec());
        let response = self.send(url, request)?;
        self.read_body(url, response)
    }

    fn get_stream(&self, url: &str, headers: &[Header]) -> Result<StreamingBody, TransportError> {
        let request = with_headers(self.client.get(url), headers);
        let response = self.send(url, request)?;
        Ok(StreamingBody {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[Header]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }
    request
}

fn load_bundle(path: &Path) -> Result<Vec<Certificate>, String> {
    let pem = fs::read(path).map_err(|e| format!("cannot read bundle: {}", e))?;
    let certs =
        Certificate::from_pem_bundle(&pem).map_err(|e| format!("cannot parse bundle: {}", e))?;
    if certs.is_empty() {
        return Err("bundle contains no certificates".to_string());
    }
    Ok(certs)
}

fn build_client(
    timeout: Duration,
    roots: Option<Vec<Certificate>>,
) -> Result<Client, TransportError> {
    let mut builder = Client::builder().timeout(timeout);
    if let Some(certs) = roots {
        builder = builder.tls_built_in_root_certs(false);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }
    builder
        .build()
        .map_err(|e| TransportError::ClientBuild(e.to_string()))
}
