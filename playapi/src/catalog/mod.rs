//! Typed catalog operations.
//!
//! [`PlayApi`] is the entry point for callers: it owns the session, the
//! request executor and the binary fetcher, and maps each store operation to
//! its `fdfe` path and response payload.
//!
//! # Example
//!
//! ```no_run
//! use playapi::{DeviceIdentity, PlayApi, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new()?;
//! let mut api = PlayApi::new(transport, DeviceIdentity::new("3f1abc0123456789", "en_US"));
//! api.login_with_token("DQAAAL...");
//!
//! let results = api.search("maps", 50, None)?;
//! for app in results.items() {
//!     println!("{}", app.docid.as_deref().unwrap_or("?"));
//! }
//! # Ok::<(), playapi::ApiError>(())
//! ```

mod purchase;
mod search;

use std::sync::Arc;

use tracing::debug;
use url::form_urlencoded;

use crate::codec;
use crate::config::ClientConfig;
use crate::error::{ApiResult, ProtocolError};
use crate::executor::{Endpoints, RequestBody, RequestExecutor};
use crate::fetcher::BinaryFetcher;
use crate::proto::{
    BrowseResponse, BulkDetailsRequest, BulkDetailsResponse, DetailsResponse, ListResponse,
    Payload, ResponseWrapper, ReviewResponse,
};
use crate::session::{Credentials, DeviceIdentity, Session};
use crate::transport::{ReqwestTransport, Transport};

pub use purchase::DEFAULT_OFFER_TYPE;
pub use search::MAX_SEARCH_PAGES;

/// Review sort order used when none is given.
pub const DEFAULT_REVIEW_SORT: u32 = 2;

/// Options for [`PlayApi::reviews`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    /// Only reviews written on devices like this one.
    pub filter_by_device: bool,
    pub sort: u32,
    pub count: Option<u32>,
    pub offset: Option<u32>,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            filter_by_device: false,
            sort: DEFAULT_REVIEW_SORT,
            count: None,
            offset: None,
        }
    }
}

/// Client for the store's device API.
pub struct PlayApi<T: Transport> {
    executor: RequestExecutor<T>,
    fetcher: BinaryFetcher<T>,
}

impl<T: Transport> PlayApi<T> {
    /// Creates a client for `identity` against the production endpoints.
    pub fn new(transport: T, identity: DeviceIdentity) -> Self {
        Self::with_session(Arc::new(transport), Session::new(identity), Endpoints::default())
    }

    /// Creates a client from an existing session.
    pub fn with_session(transport: Arc<T>, session: Session, endpoints: Endpoints) -> Self {
        Self {
            fetcher: BinaryFetcher::new(transport.clone()),
            executor: RequestExecutor::new(transport, session, endpoints),
        }
    }

    pub fn session(&self) -> &Session {
        self.executor.session()
    }

    /// Direct access to the request executor for paths not covered here.
    pub fn executor_mut(&mut self) -> &mut RequestExecutor<T> {
        &mut self.executor
    }

    /// Authenticates with whichever credentials were supplied.
    pub fn login(&mut self, credentials: &Credentials) -> ApiResult<()> {
        let transport = self.executor.transport().clone();
        let login_url = self.executor.endpoints().login_url.clone();
        self.executor
            .session_mut()
            .authenticate(transport.as_ref(), &login_url, credentials)
    }

    /// Exchanges an email and password for a session token.
    pub fn login_with_password(&mut self, email: &str, password: &str) -> ApiResult<()> {
        self.login(&Credentials::Password {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Uses a previously obtained session token.
    pub fn login_with_token(&mut self, token: impl Into<String>) {
        self.executor.session_mut().authenticate_with_token(token);
    }

    /// Details of one app. `package` is the app id, e.g. `com.example.app`.
    pub fn details(&mut self, package: &str) -> ApiResult<DetailsResponse> {
        let path = format!("details?doc={}", quote(package));
        let message = self.executor.execute(&path, None)?;
        take_payload(message, "details", "detailsResponse", |p| p.details_response)
    }

    /// Details of several apps in a single round trip.
    ///
    /// Entries come back in request order.
    pub fn bulk_details<S: AsRef<str>>(
        &mut self,
        packages: &[S],
    ) -> ApiResult<BulkDetailsResponse> {
        let request = BulkDetailsRequest {
            docid: packages.iter().map(|p| p.as_ref().to_string()).collect(),
            include_child_docs: None,
        };
        debug!(count = packages.len(), "Requesting bulk details");
        let body = RequestBody::Protobuf(codec::encode(&request));
        let message = self.executor.execute("bulkDetails", Some(body))?;
        take_payload(message, "bulkDetails", "bulkDetailsResponse", |p| {
            p.bulk_details_response
        })
    }

    /// Browses categories, optionally narrowed to a category and subcategory.
    pub fn browse(
        &mut self,
        category: Option<&str>,
        subcategory: Option<&str>,
    ) -> ApiResult<BrowseResponse> {
        let mut path = "browse?c=3".to_string();
        if let Some(cat) = category {
            path.push_str(&format!("&cat={}", quote(cat)));
        }
        if let Some(ctr) = subcategory {
            path.push_str(&format!("&ctr={}", quote(ctr)));
        }
        let message = self.executor.execute(&path, None)?;
        take_payload(message, "browse", "browseResponse", |p| p.browse_response)
    }

    /// Lists apps in a subcategory, or the valid subcategories of `category`
    /// when `subcategory` is `None`.
    ///
    /// One request only; callers page with `count` and `offset`.
    pub fn list(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        count: Option<u32>,
        offset: Option<u32>,
    ) -> ApiResult<ListResponse> {
        let mut path = format!("list?c=3&cat={}", quote(category));
        if let Some(ctr) = subcategory {
            path.push_str(&format!("&ctr={}", quote(ctr)));
        }
        if let Some(n) = count {
            path.push_str(&format!("&n={}", n));
        }
        if let Some(o) = offset {
            path.push_str(&format!("&o={}", o));
        }
        let message = self.executor.execute(&path, None)?;
        take_payload(message, "list", "listResponse", |p| p.list_response)
    }

    /// Reviews of an app.
    pub fn reviews(&mut self, package: &str, query: &ReviewQuery) -> ApiResult<ReviewResponse> {
        let mut path = format!("rev?doc={}&sort={}", quote(package), query.sort);
        if let Some(n) = query.count {
            path.push_str(&format!("&n={}", n));
        }
        if let Some(o) = query.offset {
            path.push_str(&format!("&o={}", o));
        }
        if query.filter_by_device {
            path.push_str("&dfil=1");
        }
        let message = self.executor.execute(&path, None)?;
        take_payload(message, "reviews", "reviewResponse", |p| p.review_response)
    }
}

impl PlayApi<ReqwestTransport> {
    /// Builds a client from configuration and authenticates with the
    /// configured credentials, if any.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::with_config(&config.transport)?;
        let session =
            Session::new(config.identity.clone()).with_login_country(config.country.clone());
        let mut api = Self::with_session(Arc::new(transport), session, config.endpoints.clone());

        if let Some(credentials) = config.credentials() {
            api.login(&credentials)?;
        }
        Ok(api)
    }
}

/// Percent-encodes a query parameter value.
pub(crate) fn quote(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Unwraps one branch of the response payload.
fn take_payload<R>(
    message: ResponseWrapper,
    operation: &'static str,
    field: &'static str,
    pick: impl FnOnce(Payload) -> Option<R>,
) -> ApiResult<R> {
    message
        .payload
        .and_then(pick)
        .ok_or_else(|| ProtocolError::MissingPayload { operation, field }.into())
}
