//! Connection options and their loader.
//!
//! `ClientOptions` is moved into a client when it is opened and is read-only
//! from then on. `OptionsLoader` layers a config file, inline snippets and
//! `UNIPILE_*` environment variables (highest precedence) on top of the
//! built-in defaults.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api2.unipile.com:13260";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_USER_AGENT: &str = concat!("comm-client/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "UNIPILE";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to load options: {0}")]
    Load(#[from] config::ConfigError),
    #[error("timeout_ms must be greater than zero")]
    InvalidTimeout,
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("api_version must not be empty")]
    EmptyApiVersion,
}

/// Static connection configuration for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Sent as `X-API-KEY`. When absent the header is omitted and the remote
    /// rejects the request.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    pub api_version: String,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Options from `UNIPILE_*` environment variables only.
    pub fn from_env() -> Result<Self, OptionsError> {
        OptionsLoader::new().load()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `{base_url}/api/{api_version}/`, the prefix every request path is
    /// appended to.
    pub fn api_prefix(&self) -> String {
        format!(
            "{}/api/{}/",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.timeout_ms == 0 {
            return Err(OptionsError::InvalidTimeout);
        }
        if self.api_version.trim().is_empty() {
            return Err(OptionsError::EmptyApiVersion);
        }
        let url = Url::parse(&self.base_url).map_err(|e| OptionsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OptionsError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(())
    }
}

/// Dashboards show the DSN as `host:port`; accept it and assume https.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    access_token: Option<String>,
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    api_version: Option<String>,
    user_agent: Option<String>,
}

impl RawOptions {
    fn into_options(self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            api_key: self.access_token.filter(|k| !k.is_empty()),
            base_url: self
                .base_url
                .map(|u| normalize_base_url(&u))
                .unwrap_or(defaults.base_url),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            api_version: self.api_version.unwrap_or(defaults.api_version),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

/// Builder over the `config` crate: files and snippets first, environment
/// last.
///
/// ```
/// use comm_core::OptionsLoader;
///
/// let options = OptionsLoader::new()
///     .with_toml_str("base_url = \"http://localhost:3000\"\ntimeout_ms = 500")
///     .load()
///     .expect("valid options");
/// assert_eq!(options.api_prefix(), "http://localhost:3000/api/v1/");
/// assert_eq!(options.timeout_ms, 500);
/// ```
pub struct OptionsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for OptionsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a TOML/YAML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    pub fn load(self) -> Result<ClientOptions, OptionsError> {
        let raw: RawOptions = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        let options = raw.into_options();
        options.validate()?;
        Ok(options)
    }
}
