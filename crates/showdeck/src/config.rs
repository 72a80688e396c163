//! Configuration for the Showdeck client

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use http::HeaderMap;
use secrecy::SecretString;

use crate::error::Result;

static GLOBAL_CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Configuration for a Showdeck client.
///
/// Holds everything a client needs to dispatch requests: credentials,
/// endpoint, TLS and proxy settings, timeouts and the retry envelope. A
/// process-wide snapshot can be installed once at startup and is readable
/// without locking; per-client configuration always wins over it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for authentication
    pub api_key: Option<SecretString>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// API version header value
    pub api_version: Option<String>,

    /// Account to scope requests to
    pub account: Option<String>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Verify the server's TLS certificate
    pub verify_tls: bool,

    /// Custom CA bundle (PEM) to trust in addition to the system store
    pub ca_bundle: Option<PathBuf>,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// Timeout for receiving a response
    pub read_timeout: Duration,

    /// Maximum number of network retries for transport failures
    pub max_network_retries: u32,

    /// Delay before the first retry (and the backoff floor)
    pub initial_retry_delay: Duration,

    /// Ceiling on the delay between retries
    pub max_retry_delay: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            api_version: None,
            account: None,
            proxy: None,
            verify_tls: true,
            ca_bundle: None,
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(80),
            max_network_retries: 2,
            initial_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(2),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Create a builder for fluent configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Looks for:
    /// - `SHOWDECK_API_KEY` for authentication
    /// - `SHOWDECK_BASE_URL`, `SHOWDECK_API_VERSION`, `SHOWDECK_ACCOUNT`
    /// - `SHOWDECK_PROXY`
    /// - `SHOWDECK_CONNECT_TIMEOUT` / `SHOWDECK_READ_TIMEOUT` (seconds)
    /// - `SHOWDECK_MAX_RETRIES`
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        // Pick up a .env file when present; missing files are fine.
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("SHOWDECK_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }
        if let Ok(base_url) = env::var("SHOWDECK_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(api_version) = env::var("SHOWDECK_API_VERSION") {
            config.api_version = Some(api_version);
        }
        if let Ok(account) = env::var("SHOWDECK_ACCOUNT") {
            config.account = Some(account);
        }
        if let Ok(proxy) = env::var("SHOWDECK_PROXY") {
            config.proxy = Some(proxy);
        }
        if let Ok(secs) = env::var("SHOWDECK_CONNECT_TIMEOUT")
            && let Ok(secs) = secs.parse::<u64>()
        {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Ok(secs) = env::var("SHOWDECK_READ_TIMEOUT")
            && let Ok(secs) = secs.parse::<u64>()
        {
            config.read_timeout = Duration::from_secs(secs);
        }
        if let Ok(retries) = env::var("SHOWDECK_MAX_RETRIES")
            && let Ok(retries) = retries.parse::<u32>()
        {
            config.max_network_retries = retries;
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking
    /// precedence where it differs from the defaults.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        let defaults = ClientConfig::default();

        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.api_version.is_some() {
            self.api_version = other.api_version;
        }
        if other.account.is_some() {
            self.account = other.account;
        }
        if other.proxy.is_some() {
            self.proxy = other.proxy;
        }
        if other.verify_tls != defaults.verify_tls {
            self.verify_tls = other.verify_tls;
        }
        if other.ca_bundle.is_some() {
            self.ca_bundle = other.ca_bundle;
        }
        if other.connect_timeout != defaults.connect_timeout {
            self.connect_timeout = other.connect_timeout;
        }
        if other.read_timeout != defaults.read_timeout {
            self.read_timeout = other.read_timeout;
        }
        if other.max_network_retries != defaults.max_network_retries {
            self.max_network_retries = other.max_network_retries;
        }
        if other.initial_retry_delay != defaults.initial_retry_delay {
            self.initial_retry_delay = other.initial_retry_delay;
        }
        if other.max_retry_delay != defaults.max_retry_delay {
            self.max_retry_delay = other.max_retry_delay;
        }
        if !other.default_headers.is_empty() {
            for (key, value) in other.default_headers.iter() {
                self.default_headers.insert(key.clone(), value.clone());
            }
        }

        self
    }

    /// Install this configuration as the process-wide snapshot consumed by
    /// lazily-created default clients. May only be called once.
    pub fn install_global(self) -> Result<()> {
        GLOBAL_CONFIG
            .set(self)
            .map_err(|_| anyhow::anyhow!("global configuration is already installed").into())
    }

    /// The installed process-wide snapshot, if any.
    pub fn global() -> Option<&'static ClientConfig> {
        GLOBAL_CONFIG.get()
    }
}

/// Builder for creating a [`ClientConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Scope requests to an account.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.config.account = Some(account.into());
        self
    }

    /// Set the HTTP proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Toggle TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Trust an additional CA bundle (PEM file).
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ca_bundle = Some(path.into());
        self
    }

    /// Set the connection-establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the response-read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the maximum number of network retries.
    pub fn max_network_retries(mut self, retries: u32) -> Self {
        self.config.max_network_retries = retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn initial_retry_delay(mut self, delay: Duration) -> Self {
        self.config.initial_retry_delay = delay;
        self
    }

    /// Set the ceiling on retry delays.
    pub fn max_retry_delay(mut self, delay: Duration) -> Self {
        self.config.max_retry_delay = delay;
        self
    }

    /// Add a default header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str.parse().map_err(|_| {
            crate::error::Error::HttpClient(format!("Invalid header name '{key_str}'"))
        })?;
        let value: http::HeaderValue = value_str.parse().map_err(|_| {
            crate::error::Error::HttpClient(format!("Invalid header value '{value_str}'"))
        })?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
