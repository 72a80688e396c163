//! Main client for the Showdeck API

use std::sync::{Arc, Mutex, OnceLock};

use http::Method;
use serde_json::Value;
use url::Url;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    executor::{RequestOptions, execute_call},
    http::{ApiResponse, ReqwestTransport, transport::Transport},
    resources::{Episodes, Shows},
    retry::RetryPolicy,
};

/// Main client for interacting with the Showdeck API.
///
/// A client owns one reusable transport and a configuration snapshot.
/// Cloning is cheap (the inner state is shared); sequential logical calls
/// on one client reuse its pooled connections.
///
/// # Example
///
/// ```rust,no_run
/// use showdeck::Client;
///
/// let client = Client::new("sk_live_...");
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// Injected transport handling the actual HTTP dispatch
    transport: Arc<dyn Transport>,
    /// Configuration snapshot taken at construction
    config: ClientConfig,
    base_url: Url,
    retry: RetryPolicy,
    /// Most recent successfully decoded response (see `last_response`)
    last_response: Mutex<Option<ApiResponse>>,

    // Lazy-initialized resources
    episodes: OnceLock<Episodes>,
    shows: OnceLock<Shows>,
}

impl Client {
    /// Create a new client with an API key.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built with the default
    /// configuration. Use [`Client::try_new()`] for explicit error
    /// handling.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder()
            .api_key(api_key)
            .build()
            .expect("Failed to build client with provided API key")
    }

    /// Create a new client with an API key (fallible version).
    pub fn try_new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object, with the default
    /// `reqwest`-backed transport.
    ///
    /// A missing API key is not an error here: key resolution happens per
    /// call, where per-call overrides can still supply one.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);
        Self::with_transport(transport, config)
    }

    /// Create a client with an injected transport.
    ///
    /// This is the seam for alternative transports and for tests that stub
    /// out the network entirely.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(config.base_url.as_deref())?;
        let retry = RetryPolicy::from_config(&config);

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                base_url,
                retry,
                last_response: Mutex::new(None),
                episodes: OnceLock::new(),
                shows: OnceLock::new(),
            }),
        })
    }

    /// Access the Episodes API endpoint.
    pub fn episodes(&self) -> &Episodes {
        self.inner
            .episodes
            .get_or_init(|| Episodes::new(self.clone()))
    }

    /// Access the Shows API endpoint.
    pub fn shows(&self) -> &Shows {
        self.inner.shows.get_or_init(|| Shows::new(self.clone()))
    }

    /// Issue a GET request.
    pub async fn get(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.request(Method::GET, path, params, RequestOptions::new())
            .await
    }

    /// Issue a POST request with form-encoded params.
    pub async fn post(&self, path: &str, params: Value) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(params), RequestOptions::new())
            .await
    }

    /// Issue a DELETE request.
    pub async fn delete(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, params, RequestOptions::new())
            .await
    }

    /// Issue a request with full control over method and per-call options.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<Value>,
        opts: RequestOptions,
    ) -> Result<ApiResponse> {
        execute_call(self, method, path, params, opts).await
    }

    /// The most recent response this client produced, so a caller can get
    /// both the decoded resource and the raw response metadata from one
    /// logical call.
    pub fn last_response(&self) -> Option<ApiResponse> {
        self.inner
            .last_response
            .lock()
            .expect("last_response lock poisoned")
            .clone()
    }

    pub(crate) fn record_response(&self, response: &ApiResponse) {
        *self
            .inner
            .last_response
            .lock()
            .expect("last_response lock poisoned") = Some(response.clone());
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }
}

fn parse_base_url(base_url: Option<&str>) -> Result<Url> {
    let base_url = base_url.unwrap_or(crate::DEFAULT_BASE_URL);

    if base_url.trim().is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let url: Url = base_url
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!(
            "Invalid URL scheme '{scheme}'. Only 'http' and 'https' are supported."
        ))),
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(secrecy::SecretString::new(
            api_key.into().into_boxed_str(),
        ));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version header value.
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

    /// Set the connection-establishment timeout.
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the response-read timeout.
    pub fn read_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the maximum number of network retries.
    pub fn max_network_retries(mut self, retries: u32) -> Self {
        self.config.max_network_retries = retries;
        self
    }

    /// Add a custom default header.
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

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::HttpClient(format!("Invalid header name '{key_str}'")))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::HttpClient(format!("Invalid header value '{value_str}'")))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
