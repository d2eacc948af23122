//! Protocol-mandated header values and endpoints.
//!
//! These mirror what the store app of the emulated version sends; the
//! service rejects or degrades requests that deviate.

use crate::session::Session;
use crate::transport::Header;

pub const ENABLED_EXPERIMENTS: &str = "cl:billing.select_add_instrument_by_default";

pub const UNSUPPORTED_EXPERIMENTS: &str = "nocache:billing.use_charging_poller,market_emails,\
buyer_currency,prod_baseline,checkin.set_asset_paid_app_field,shekel_test,content_ratings,\
buyer_currency_in_app,nocache:encrypted_apk,recent_changes";

pub const CLIENT_ID: &str = "am-android-google";

pub const FINSKY_USER_AGENT: &str = "Android-Finsky/4.4.3 (api=3,versionCode=8013013,sdk=24,\
device=angler,hardware=angler,product=angler)";

pub const SMALLEST_SCREEN_WIDTH_DP: &str = "335";

pub const FILTER_LEVEL: &str = "3";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

pub const DEFAULT_HOST: &str = "android.clients.google.com";

/// Where requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Value of the `Host` header.
    pub host: String,
    /// Prefix that relative `fdfe` paths are appended to, with trailing `/`.
    pub api_base: String,
    /// Password login endpoint.
    pub login_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST)
    }
}

impl Endpoints {
    /// Endpoints of the service at `https://<host>/`.
    pub fn for_host(host: &str) -> Self {
        Self {
            host: host.to_string(),
            api_base: format!("https://{}/fdfe/", host),
            login_url: format!("https://{}/auth", host),
        }
    }

    /// Absolute URL of a relative `fdfe` path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Builds the fixed header set every `fdfe` request carries.
pub fn api_headers(session: &Session, host: &str) -> Vec<Header> {
    let identity = session.identity();
    vec![
        ("Accept-Language", identity.locale.clone()),
        (
            "Authorization",
            format!("GoogleLogin auth={}", session.token().unwrap_or_default()),
        ),
        ("X-DFE-Enabled-Experiments", ENABLED_EXPERIMENTS.to_string()),
        (
            "X-DFE-Unsupported-Experiments",
            UNSUPPORTED_EXPERIMENTS.to_string(),
        ),
        ("X-DFE-Device-Id", identity.android_id.clone()),
        ("X-DFE-Client-Id", CLIENT_ID.to_string()),
        ("User-Agent", FINSKY_USER_AGENT.to_string()),
        (
            "X-DFE-SmallestScreenWidthDp",
            SMALLEST_SCREEN_WIDTH_DP.to_string(),
        ),
        ("X-DFE-Filter-Level", FILTER_LEVEL.to_string()),
        ("Accept-Encoding", String::new()),
        ("Host", host.to_string()),
    ]
}
