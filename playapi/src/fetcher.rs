//! APK download from signed delivery URLs.
//!
//! Purchase and delivery responses hand out a signed URL plus an auth
//! cookie. The download host is a plain HTTP file server, so this path uses
//! its own minimal header set rather than the `fdfe` headers.

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use tracing::debug;

use crate::error::TransportError;
use crate::transport::{Header, Transport};

/// User agent of the platform download manager.
pub const DOWNLOAD_USER_AGENT: &str =
    "AndroidDownloadManager/4.4.3 (Linux; U; Android 4.4.3; Nexus S Build/JRO03E)";

/// Bytes read per progress callback when streaming.
pub const CHUNK_SIZE: usize = 1024;

/// Upper bound for buffer pre-allocation from a declared content length.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Progress callback: `(bytes_so_far, total_expected)`.
///
/// `total_expected` is `None` when the server declares no content length.
pub type Progress<'a> = &'a mut dyn FnMut(u64, Option<u64>);

/// Authorization cookie for a download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
}

/// Everything needed to fetch one APK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTicket {
    pub url: String,
    pub cookie: AuthCookie,
}

impl DownloadTicket {
    fn headers(&self) -> Vec<Header> {
        vec![
            ("User-Agent", DOWNLOAD_USER_AGENT.to_string()),
            ("Accept-Encoding", String::new()),
            (
                "Cookie",
                format!("{}={}", self.cookie.name, self.cookie.value),
            ),
        ]
    }
}

/// Downloads binaries over a [`Transport`].
pub struct BinaryFetcher<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> BinaryFetcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Downloads the binary behind `ticket`.
    ///
    /// With a progress callback the body is streamed in [`CHUNK_SIZE`]
    /// chunks and the callback runs after every chunk; without one the body
    /// is read in a single request.
    pub fn fetch(
        &self,
        ticket: &DownloadTicket,
        progress: Option<Progress<'_>>,
    ) -> Result<Vec<u8>, TransportError> {
        let headers = ticket.headers();
        debug!(url = %ticket.url, cookie = %ticket.cookie.name, "Downloading binary");

        match progress {
            None => self.transport.get(&ticket.url, &headers),
            Some(on_progress) => self.fetch_streaming(ticket, &headers, on_progress),
        }
    }

    fn fetch_streaming(
        &self,
        ticket: &DownloadTicket,
        headers: &[Header],
        on_progress: Progress<'_>,
    ) -> Result<Vec<u8>, TransportError> {
        let mut body = self.transport.get_stream(&ticket.url, headers)?;
        let total = body.content_length;

        let mut content = Vec::with_capacity(total.unwrap_or(0).min(MAX_PREALLOC) as usize);
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let bytes_read = match body.reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(TransportError::Body {
                        url: ticket.url.clone(),
                        reason: format!("read error: {}", e),
                    })
                }
            };

            content.extend_from_slice(&buffer[..bytes_read]);
            downloaded += bytes_read as u64;
            on_progress(downloaded, total);
        }

        debug!(url = %ticket.url, bytes = downloaded, "Download complete");
        Ok(content)
    }
}
