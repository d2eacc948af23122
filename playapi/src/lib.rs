//! playapi - Client for the Play Store device protocol
//!
//! This library speaks the protocol the store app uses on a phone: it logs
//! in as a registered device, issues catalog requests against the `fdfe`
//! API, decodes the protobuf responses, and downloads APKs.
//!
//! The layers, bottom to top:
//!
//! - [`transport`]: HTTPS with a one-time fallback from a CA bundle to the
//!   built-in trust roots
//! - [`codec`] and [`proto`]: the response schema and its decoding, plus
//!   generic projections to JSON and text format
//! - [`session`]: device identity, credentials and the auth token
//! - [`executor`]: header construction, the pre-fetch cache and the
//!   request/decode cycle
//! - [`catalog`]: typed operations ([`PlayApi`])
//! - [`fetcher`]: APK download with optional progress reporting

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod logging;
pub mod prefetch;
pub mod proto;
pub mod session;
pub mod transport;

pub use catalog::{PlayApi, ReviewQuery, DEFAULT_OFFER_TYPE, MAX_SEARCH_PAGES};
pub use codec::{to_text, to_value};
pub use config::ClientConfig;
pub use error::{
    ApiError, ApiResult, ConfigError, DecodeError, LoginError, ProtocolError, TransportError,
};
pub use executor::{Endpoints, RequestBody, RequestExecutor};
pub use fetcher::{AuthCookie, BinaryFetcher, DownloadTicket, Progress};
pub use prefetch::PreFetchCache;
pub use session::{Credentials, DeviceIdentity, Session};
pub use transport::{ReqwestTransport, StreamingBody, Transport, TransportConfig, TrustMode};
