//! Request executor
//!
//! Drives one logical API call through its states: build the encoded
//! request, dispatch it over the transport, retry transport failures with
//! backoff, classify anything else, and decode the final response. HTTP
//! error responses are classified immediately and never retried; only the
//! retry policy's transport-failure classes loop back to dispatch.

use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use uuid::Uuid;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::form::{self, FormPayload};
use crate::http::ApiResponse;
use crate::http::transport::TransportRequest;
use crate::observability::{RequestLog, RequestTimer};
use crate::request_context::{RequestContext, mask_api_key};

/// Per-call overrides merged over the client's configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Base URL override for this call
    pub base_url: Option<String>,
    /// API key override for this call
    pub api_key: Option<String>,
    /// Account override for this call
    pub account: Option<String>,
    /// API version override for this call
    pub api_version: Option<String>,
    /// Explicit idempotency key; suppresses automatic generation
    pub idempotency_key: Option<String>,
    /// Extra headers for this call
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Empty options: the client's configuration applies unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base URL for this call.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the API key for this call.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Scope this call to an account.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Pin the API version for this call.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Supply an explicit idempotency key.
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Execute one logical call against the client's transport.
pub(crate) async fn execute_call(
    client: &Client,
    method: Method,
    path: &str,
    params: Option<Value>,
    opts: RequestOptions,
) -> Result<ApiResponse> {
    let config = client.config();

    // Building: local validation happens before anything touches the wire.
    let api_key = resolve_api_key(config, &opts)?;
    let params = params.map(objects_to_ids);

    let (path_only, embedded_query) = split_path_query(path);
    let has_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);

    let (query, body) = if has_body {
        let query = reconcile_query(&embedded_query, None);
        (query, FormPayload::new(params.unwrap_or(Value::Null)))
    } else {
        let query = reconcile_query(&embedded_query, params.as_ref());
        (query, FormPayload::default())
    };

    let account = opts.account.clone().or_else(|| config.account.clone());
    let api_version = opts
        .api_version
        .clone()
        .or_else(|| config.api_version.clone())
        .unwrap_or_else(|| crate::DEFAULT_API_VERSION.to_string());

    // One key per logical call, reused across all of its retries so the
    // server can deduplicate replayed side effects.
    let idempotency_key = opts.idempotency_key.clone().or_else(|| {
        (client.retry_policy().enabled() && matches!(method, Method::POST | Method::DELETE))
            .then(|| Uuid::new_v4().to_string())
    });

    let base_url = match &opts.base_url {
        Some(base) => base
            .parse::<url::Url>()
            .map_err(|e| Error::InvalidUrl(format!("Invalid base URL override '{base}': {e}")))?,
        None => client.base_url().clone(),
    };
    let mut url = base_url
        .join(&path_only)
        .map_err(|e| Error::InvalidUrl(format!("Failed to construct URL from path '{path}': {e}")))?;
    if !query.is_empty() {
        url.set_query(Some(&query));
    }

    let mut headers = config.default_headers.clone();
    for (key, value) in opts.headers.iter() {
        headers.insert(key.clone(), value.clone());
    }
    headers.insert(
        "authorization",
        header_value(format!("Bearer {api_key}"), "authorization")?,
    );
    headers.insert(
        "user-agent",
        header_value(crate::useragent::user_agent(), "user-agent")?,
    );
    headers.insert(
        "x-showdeck-client-user-agent",
        header_value(crate::useragent::client_user_agent(), "client user agent")?,
    );
    headers.insert(
        "showdeck-version",
        header_value(api_version.clone(), "showdeck-version")?,
    );
    if let Some(account) = &account {
        headers.insert("showdeck-account", header_value(account.clone(), "showdeck-account")?);
    }
    if let Some(key) = &idempotency_key {
        headers.insert("idempotency-key", header_value(key.clone(), "idempotency-key")?);
    }

    let body_bytes = if has_body && !body.is_empty() {
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        Some(body.wire().as_bytes().to_vec())
    } else {
        None
    };

    // The same memoized encoding feeds both the wire body above and the
    // log record below.
    let context = RequestContext {
        account,
        api_key: Some(mask_api_key(&api_key)),
        api_version: Some(api_version),
        body: has_body.then(|| body.wire().to_string()),
        method: method.to_string(),
        path: path_only,
        query: (!query.is_empty()).then_some(query),
        idempotency_key,
    };

    let request = TransportRequest {
        method,
        url,
        headers,
        body: body_bytes,
    };

    dispatch(client, request, context).await
}

/// Dispatching / Retrying: sequential attempts, transport failures only.
async fn dispatch(
    client: &Client,
    request: TransportRequest,
    context: RequestContext,
) -> Result<ApiResponse> {
    let timer = RequestTimer::start();
    let mut attempts: u32 = 0;

    loop {
        RequestLog::new(&context).request(attempts);

        match client.transport().execute(request.clone()).await {
            Ok(raw) => {
                // Response headers are authoritative for the log context.
                let context = context.apply_response_headers(&raw.headers);
                let log = RequestLog::new(&context);
                let status = raw.status;
                log.response(status.as_u16(), timer.elapsed(), attempts);

                if !status.is_success() {
                    let err = Error::from_response(
                        status.as_u16(),
                        &String::from_utf8_lossy(&raw.body),
                        &raw.headers,
                    );
                    log.error(&err);
                    return Err(err);
                }

                match ApiResponse::from_transport(raw) {
                    Ok(response) => {
                        client.record_response(&response);
                        return Ok(response);
                    }
                    Err(err) => {
                        log.error(&err);
                        return Err(err);
                    }
                }
            }
            Err(failure) => {
                if client.retry_policy().should_retry(&failure, attempts) {
                    attempts += 1;
                    let delay = client.retry_policy().backoff_delay(attempts);
                    RequestLog::new(&context).retry(&failure, attempts, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }

                let err = Error::from_transport(failure, attempts);
                RequestLog::new(&context).error(&err);
                return Err(err);
            }
        }
    }
}

/// Resolve the API key from per-call overrides and client configuration,
/// failing fast on keys that would never authenticate. These are local
/// validation errors and are never dispatched.
fn resolve_api_key(config: &ClientConfig, opts: &RequestOptions) -> Result<String> {
    use secrecy::ExposeSecret;

    let key = opts.api_key.clone().or_else(|| {
        config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string())
    });

    let Some(key) = key else {
        return Err(Error::Authentication {
            message: "No API key provided. Set your key with \
                      Client::builder().api_key(...) or the SHOWDECK_API_KEY \
                      environment variable."
                .to_string(),
            failure: None,
        });
    };

    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return Err(Error::Authentication {
            message: "Your API key is invalid (it contains whitespace). \
                      Double-check it against the dashboard."
                .to_string(),
            failure: None,
        });
    }

    Ok(key)
}

/// Replace fetched resource objects in a parameter tree with their
/// identifiers. A map carrying both an `id` and an `object` type tag is the
/// wire shape of a fetched resource; the API wants just the id back.
fn objects_to_ids(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if let (Some(Value::String(id)), Some(Value::String(_))) =
                (map.get("id"), map.get("object"))
            {
                return Value::String(id.clone());
            }
            Value::Object(
                map.into_iter()
                    .map(|(key, child)| (key, objects_to_ids(child)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(objects_to_ids).collect()),
        scalar => scalar,
    }
}

/// Split a request path into its path-only form and any embedded query
/// pairs.
fn split_path_query(path: &str) -> (String, Vec<(String, String)>) {
    match path.split_once('?') {
        Some((path_only, query)) => (
            path_only.to_string(),
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        ),
        None => (path.to_string(), Vec::new()),
    }
}

/// Merge query pairs embedded in the path with explicitly supplied params.
/// Explicit params win per top-level key, so callers can safely provide
/// both without silently losing either set.
fn reconcile_query(embedded: &[(String, String)], explicit: Option<&Value>) -> String {
    let explicit_keys: Vec<&str> = match explicit {
        Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
        _ => Vec::new(),
    };

    let mut parts: Vec<String> = embedded
        .iter()
        .filter(|(key, _)| !explicit_keys.contains(&top_level_key(key)))
        .map(|(key, value)| format!("{}={}", form::escape(key), form::escape(value)))
        .collect();

    if let Some(params) = explicit {
        let encoded = form::encode(params);
        if !encoded.is_empty() {
            parts.push(encoded);
        }
    }

    parts.join("&")
}

fn top_level_key(key: &str) -> &str {
    &key[..key.find('[').unwrap_or(key.len())]
}

fn header_value(value: String, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&value)
        .map_err(|_| Error::HttpClient(format!("Invalid {what} header value")))
}
