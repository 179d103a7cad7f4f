use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_HOST: &str = "image-charts.com";
pub const DEFAULT_PATH: &str = "chart";
pub const DEFAULT_API_VERSION: u32 = 1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Account id used when none is configured explicitly or in the settings file.
pub const ENV_ACCOUNT: &str = "IMAGE_CHARTS_ID";
/// Signing secret used when none is configured explicitly or in the settings file.
pub const ENV_SECRET: &str = "IMAGE_CHARTS_SECRET";
/// Overrides the location of the settings file.
pub const ENV_SETTINGS_PATH: &str = "IMAGE_CHARTS_AUTH";

const SETTINGS_FILE_NAME: &str = ".image_charts.json";

/// Shared secret used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Intentionally does not print the secret value.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Client identification sent as JSON in the `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAgent {
    pub bindings_version: String,
    pub lang: String,
    pub lang_version: String,
    pub platform: String,
    pub publisher: String,
    pub account: Option<String>,
}

impl UserAgent {
    fn for_account(account: Option<&str>) -> Self {
        Self {
            bindings_version: env!("CARGO_PKG_VERSION").to_owned(),
            lang: "rust".to_owned(),
            lang_version: option_env!("CARGO_PKG_RUST_VERSION")
                .unwrap_or_default()
                .to_owned(),
            platform: std::env::consts::OS.to_owned(),
            publisher: "ImageCharts".to_owned(),
            account: account.map(str::to_owned),
        }
    }

    /// Serialized header value.
    ///
    /// # Errors
    /// Returns [`ConfigError::UserAgent`] if serialization fails.
    pub fn to_header(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Values read from the settings file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub account: Option<String>,
    pub secret: Option<String>,
    pub version: Option<u32>,
    /// Request timeout in milliseconds.
    pub timeout: Option<u64>,
}

impl Settings {
    /// Read `IMAGE_CHARTS_ID` and `IMAGE_CHARTS_SECRET`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            account: std::env::var(ENV_ACCOUNT).ok(),
            secret: std::env::var(ENV_SECRET).ok(),
            version: None,
            timeout: None,
        }
    }

    /// Settings file location: `$IMAGE_CHARTS_AUTH`, else `~/.image_charts.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(ENV_SETTINGS_PATH)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(SETTINGS_FILE_NAME)))
    }

    /// Load a settings file. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`ConfigError::SettingsIo`] if the file exists but cannot be
    /// read, or [`ConfigError::SettingsFormat`] if it is not valid JSON.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::SettingsIo {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let settings =
            serde_json::from_str(&contents).map_err(|source| ConfigError::SettingsFormat {
                path: path.display().to_string(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "loaded image-charts settings file");
        Ok(Some(settings))
    }
}

/// Immutable client configuration, shared by every chart a client creates.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    account: Option<String>,
    secret: Option<Secret>,
    api_version: u32,
    protocol: String,
    host: String,
    port: Option<u16>,
    path: String,
    timeout: Duration,
    user_agent: UserAgent,
    base_url: Url,
}

impl ClientConfig {
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration from the settings file and environment only.
    ///
    /// Expects (all optional):
    /// - `IMAGE_CHARTS_AUTH`: settings file path (default `~/.image_charts.json`)
    /// - `IMAGE_CHARTS_ID`: account id
    /// - `IMAGE_CHARTS_SECRET`: signing secret
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the settings file is unreadable or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().with_ambient()?.build()
    }

    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    #[must_use]
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    #[must_use]
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn user_agent(&self) -> &UserAgent {
        &self.user_agent
    }

    /// `protocol://host[:port]/path`, without a query.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Builder for [`ClientConfig`]. Unset values fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    account: Option<String>,
    secret: Option<Secret>,
    api_version: Option<u32>,
    protocol: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(Secret::new(secret));
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = Some(version);
        self
    }

    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// URL path of the chart endpoint; empty means the host root.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fill values that are still unset (or empty) from `settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        if self.account.as_deref().is_none_or(str::is_empty) {
            self.account = settings.account.filter(|a| !a.is_empty()).or(self.account);
        }
        if self.secret.as_ref().is_none_or(Secret::is_empty) {
            self.secret = settings
                .secret
                .filter(|s| !s.is_empty())
                .map(Secret::new)
                .or(self.secret);
        }
        self.api_version = self.api_version.or(settings.version);
        self.timeout = self
            .timeout
            .or_else(|| settings.timeout.map(Duration::from_millis));
        self
    }

    /// Fill unset values from the settings file, then from the environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the settings file is unreadable or malformed.
    pub fn with_ambient(self) -> Result<Self, ConfigError> {
        let file = match Settings::default_path() {
            Some(path) => Settings::load(&path)?.unwrap_or_default(),
            None => Settings::default(),
        };
        Ok(self.with_settings(file).with_settings(Settings::from_env()))
    }

    /// Validate the endpoint and freeze the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] if protocol, host, port and
    /// path do not form a valid URL.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let protocol = self
            .protocol
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_owned())
            .to_lowercase();
        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let path = self.path.unwrap_or_else(|| DEFAULT_PATH.to_owned());
        let base_url = base_url(&protocol, &host, self.port, &path)?;
        let account = self.account.filter(|a| !a.is_empty());

        Ok(ClientConfig {
            user_agent: UserAgent::for_account(account.as_deref()),
            account,
            secret: self.secret.filter(|s| !s.is_empty()),
            api_version: self.api_version.unwrap_or(DEFAULT_API_VERSION),
            protocol,
            host,
            port: self.port,
            path,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            base_url,
        })
    }
}

fn base_url(protocol: &str, host: &str, port: Option<u16>, path: &str) -> Result<Url, ConfigError> {
    let raw = format!("{protocol}://{host}");
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.clone(),
        reason: reason.to_owned(),
    };

    let mut url = Url::parse(&raw).map_err(|e| invalid(&e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if !path.is_empty() {
        url.set_path(path);
    }
    if port.is_some() {
        url.set_port(port)
            .map_err(|()| invalid("port not supported for this scheme"))?;
    }
    Ok(url)
}
