//! Device-bound session state and credential exchange.
//!
//! A [`Session`] ties a device identity to the current session token and the
//! pre-fetch cache. The token comes either from a password login against the
//! `auth` endpoint or straight from the caller.
//!
//! The login endpoint does not speak protobuf. It answers with plain text
//! lines such as:
//!
//! ```text
//! SID=...
//! LSID=...
//! Auth=DQAAAL...
//! ```

use tracing::{debug, info};
use url::form_urlencoded;

use crate::error::{ApiResult, LoginError};
use crate::prefetch::PreFetchCache;
use crate::transport::{Header, Transport};

/// Service the session token is issued for.
pub const LOGIN_SERVICE: &str = "androidmarket";

/// Account type accepted by the login endpoint.
pub const ACCOUNT_TYPE_HOSTED_OR_GOOGLE: &str = "HOSTED_OR_GOOGLE";

/// Package name of the store app the login claims to be.
pub const LOGIN_APP: &str = "com.android.vending";

/// Android SDK level reported at login.
pub const LOGIN_SDK_VERSION: &str = "24";

/// Country and language reported at login unless overridden.
pub const DEFAULT_LOGIN_COUNTRY: &str = "fr";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// The registered device a session acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// GSF android id of a real device, as a hex string.
    pub android_id: String,
    /// Value sent as `Accept-Language`, e.g. `en_US`.
    pub locale: String,
}

impl DeviceIdentity {
    pub fn new(android_id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            android_id: android_id.into(),
            locale: locale.into(),
        }
    }
}

/// What a caller can authenticate with.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account email and password, exchanged for a session token.
    Password { email: String, password: String },
    /// A session token obtained earlier.
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .finish_non_exhaustive(),
            Credentials::Token(_) => f.write_str("Token(..)"),
        }
    }
}

/// Session state for one logical client.
#[derive(Clone)]
pub struct Session {
    identity: DeviceIdentity,
    login_country: String,
    token: Option<String>,
    prefetch: PreFetchCache,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("login_country", &self.login_country)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("prefetch_entries", &self.prefetch.len())
            .finish()
    }
}

impl Session {
    /// Creates an unauthenticated session for `identity`.
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            login_country: DEFAULT_LOGIN_COUNTRY.to_string(),
            token: None,
            prefetch: PreFetchCache::new(),
        }
    }

    /// Set the country/language reported at password login.
    pub fn with_login_country(mut self, country: impl Into<String>) -> Self {
        self.login_country = country.into();
        self
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// The current session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn prefetch(&self) -> &PreFetchCache {
        &self.prefetch
    }

    pub fn prefetch_mut(&mut self) -> &mut PreFetchCache {
        &mut self.prefetch
    }

    /// Stores a previously obtained token. No network call.
    pub fn authenticate_with_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        debug!("Session token set");
    }

    /// Exchanges an email and password for a session token.
    ///
    /// On success the token replaces any token held before. On failure the
    /// previous token, if any, is kept.
    pub fn authenticate_with_credentials<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        login_url: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<()> {
        let body = self.login_form(email, password);
        let headers: Vec<Header> = vec![
            ("Accept-Encoding", String::new()),
            ("Content-Type", FORM_CONTENT_TYPE.to_string()),
        ];

        debug!(url = login_url, "Requesting session token");
        let response = transport.post(login_url, &headers, body.as_bytes())?;
        let token = parse_login_response(&String::from_utf8_lossy(&response))?;

        self.token = Some(token);
        info!("Logged in");
        Ok(())
    }

    /// Authenticates with whichever credentials were supplied.
    pub fn authenticate<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        login_url: &str,
        credentials: &Credentials,
    ) -> ApiResult<()> {
        match credentials {
            Credentials::Password { email, password } => {
                self.authenticate_with_credentials(transport, login_url, email, password)
            }
            Credentials::Token(token) => {
                self.authenticate_with_token(token.clone());
                Ok(())
            }
        }
    }

    fn login_form(&self, email: &str, password: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("Email", email)
            .append_pair("Passwd", password)
            .append_pair("service", LOGIN_SERVICE)
            .append_pair("accountType", ACCOUNT_TYPE_HOSTED_OR_GOOGLE)
            .append_pair("has_permission", "1")
            .append_pair("source", "android")
            .append_pair("androidId", &self.identity.android_id)
            .append_pair("app", LOGIN_APP)
            .append_pair("device_country", &self.login_country)
            .append_pair("operatorCountry", &self.login_country)
            .append_pair("lang", &self.login_country)
            .append_pair("sdk_version", LOGIN_SDK_VERSION)
            .finish()
    }
}

/// Extracts the session token from a login response body.
///
/// The body is split on whitespace; each `key=value` token is recorded with
/// its key lower-cased. Tokens without `=` are ignored.
pub fn parse_login_response(body: &str) -> Result<String, LoginError> {
    let mut auth = None;
    let mut error = None;

    for token in body.split_whitespace() {
        let mut parts = token.split('=');
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "auth" => auth = Some(value.trim().to_string()),
            "error" => error = Some(value.trim().to_string()),
            _ => {}
        }
    }

    match (auth, error) {
        (Some(token), _) => Ok(token),
        (None, Some(reason)) => Err(LoginError::Rejected(reason)),
        (None, None) => Err(LoginError::TokenNotFound),
    }
}
