//! Client configuration.
//!
//! Supplies the device identity, optional credentials, and transport
//! settings, either built in code or loaded from an INI file:
//!
//! ```ini
//! [device]
//! android_id = 3f1abc0123456789
//! lang = en_US
//! country = fr
//!
//! [auth]
//! token = DQAAAL...
//! # or
//! email = user@example.com
//! password = app-password
//!
//! [transport]
//! timeout_secs = 30
//! ca_bundle = /etc/ssl/certs/ca-certificates.crt
//! host = android.clients.google.com
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;

use crate::error::ConfigError;
use crate::executor::Endpoints;
use crate::session::{Credentials, DeviceIdentity, DEFAULT_LOGIN_COUNTRY};
use crate::transport::TransportConfig;

/// Locale used when the config does not name one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Configuration for a [`crate::PlayApi`] client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Device the client acts as.
    pub identity: DeviceIdentity,

    /// Previously obtained session token. Preferred over email/password.
    pub auth_token: Option<String>,

    /// Account email for password login.
    pub email: Option<String>,

    /// Account password for password login.
    pub password: Option<String>,

    /// Country/language reported at password login.
    pub country: String,

    /// Service endpoints.
    pub endpoints: Endpoints,

    /// HTTP transport settings.
    pub transport: TransportConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("identity", &self.identity)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("country", &self.country)
            .field("endpoints", &self.endpoints)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given device with default settings.
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            auth_token: None,
            email: None,
            password: None,
            country: DEFAULT_LOGIN_COUNTRY.to_string(),
            endpoints: Endpoints::default(),
            transport: TransportConfig::default(),
        }
    }

    /// Set a previously obtained session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set email/password credentials.
    pub fn with_password(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Set the login country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the service endpoints.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the transport configuration.
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Credentials to authenticate with: the token if set, otherwise
    /// email and password if both are set.
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(token) = &self.auth_token {
            return Some(Credentials::Token(token.clone()));
        }
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::Password {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Default location of the config file: `<config dir>/playapi/config.ini`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("playapi").join("config.ini"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads the config file from its default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path()?)
    }

    /// Loads configuration from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let get = |section: &str, key: &str| -> Option<String> {
            ini.section(Some(section))
                .and_then(|s| s.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let android_id =
            get("device", "android_id").ok_or(ConfigError::Missing("device.android_id"))?;
        let locale = get("device", "lang").unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let mut config = Self::new(DeviceIdentity::new(android_id, locale));
        if let Some(country) = get("device", "country") {
            config.country = country;
        }

        config.auth_token = get("auth", "token");
        config.email = get("auth", "email");
        config.password = get("auth", "password");

        if let Some(host) = get("transport", "host") {
            config.endpoints = Endpoints::for_host(&host);
        }
        if let Some(secs) = get("transport", "timeout_secs") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "transport.timeout_secs".to_string(),
                value: secs.clone(),
            })?;
            config.transport.timeout = Duration::from_secs(secs);
        }
        if let Some(bundle) = get("transport", "ca_bundle") {
            config.transport.ca_bundle = Some(PathBuf::from(bundle));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_full_config() {
        let (_dir, path) = write_config(
            "[device]\n\
             android_id = 3f1abc\n\
             lang = de_DE\n\
             country = de\n\
             [auth]\n\
             token = tok123\n\
             [transport]\n\
             timeout_secs = 5\n\
             ca_bundle = /tmp/bundle.pem\n\
             host = mirror.test\n",
        );

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.identity, DeviceIdentity::new("3f1abc", "de_DE"));
        assert_eq!(config.country, "de");
        assert_eq!(config.auth_token.as_deref(), Some("tok123"));
        assert_eq!(config.transport.timeout, Duration::from_secs(5));
        assert_eq!(
            config.transport.ca_bundle,
            Some(PathBuf::from("/tmp/bundle.pem"))
        );
        assert_eq!(config.endpoints, Endpoints::for_host("mirror.test"));
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let (_dir, path) = write_config("[device]\nandroid_id = 3f1abc\n");

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.identity.locale, DEFAULT_LOCALE);
        assert_eq!(config.country, DEFAULT_LOGIN_COUNTRY);
        assert_eq!(config.endpoints, Endpoints::default());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_missing_android_id() {
        let (_dir, path) = write_config("[device]\nlang = en_US\n");
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("device.android_id")));
    }

    #[test]
    fn test_invalid_timeout() {
        let (_dir, path) =
            write_config("[device]\nandroid_id = a\n[transport]\ntimeout_secs = soon\n");
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::load(Path::new("/nonexistent/playapi.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    fn test_token_preferred_over_password() {
        let config = ClientConfig::new(DeviceIdentity::new("a", "en"))
            .with_password("user@example.com", "pw")
            .with_token("tok");
        assert_eq!(config.credentials(), Some(Credentials::Token("tok".to_string())));

        let config = ClientConfig::new(DeviceIdentity::new("a", "en"))
            .with_password("user@example.com", "pw");
        assert!(matches!(
            config.credentials(),
            Some(Credentials::Password { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new(DeviceIdentity::new("a", "en"))
            .with_password("user@example.com", "hunter2")
            .with_token("tok-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok-secret"));
    }
}
