use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use coresuite_core::IntegrationLog;
use coresuite_domain::constants::{
    DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS, MAX_CONNECT_TIMEOUT_SECS,
    MIN_TIMEOUT_SECS,
};
use coresuite_domain::{IntegrationError, ResponseResult, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde_json::{Map, Value};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Body of an outbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized as JSON; adds `Content-Type: application/json` unless the
    /// caller already set a content type.
    Json(Value),
    /// Sent verbatim.
    Text(String),
}

impl RequestBody {
    /// Serialize `value` into a JSON body.
    ///
    /// # Errors
    /// Returns `IntegrationError::Serialization` when `value` cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

/// Per-call request options. Anything left unset falls back to the client
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    base_url: Option<String>,
    headers: Vec<(String, String)>,
    query: Vec<(String, Option<String>)>,
    body: RequestBody,
    timeout: Option<Duration>,
    retries: Option<u32>,
    retry_delay: Option<Duration>,
}

impl RequestOptions {
    /// Options that inherit every client default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the client base URL for this call.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header. Names are trimmed; blank names are dropped.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query pair. `None` values are dropped when the URL is built.
    pub fn query(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.query.push((key.into(), value));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Total timeout for each attempt, never below half a second.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retries after the first attempt; only transport failures are retried.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Pause between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

/// HTTP transport with retry on transport failures and one log line per
/// logical call.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    connect_timeout: Duration,
    // reqwest fixes the connect timeout per client, so calls whose own
    // timeout implies a different one get a client built for it.
    per_connect_timeout: Arc<Mutex<BTreeMap<Duration, ReqwestClient>>>,
    base_url: Option<String>,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    log: Option<Arc<dyn IntegrationLog>>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Perform one logical call.
    ///
    /// Transport failures are retried up to `retries` times and end up as a
    /// [`ResponseResult`] with `status == 0`; HTTP error statuses are
    /// returned as received. This never fails for network reasons.
    pub async fn execute(&self, method: Method, uri: &str, options: RequestOptions) -> ResponseResult {
        let base_url = options.base_url.as_deref().or(self.base_url.as_deref()).unwrap_or("");
        let url = build_url(base_url, uri, &options.query);

        let mut headers = normalize_headers(&options.headers);
        let payload = match options.body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Some(value.to_string())
            }
            RequestBody::Text(text) => Some(text),
        };

        let timeout = options
            .timeout
            .unwrap_or(self.timeout)
            .max(Duration::from_secs_f64(MIN_TIMEOUT_SECS));
        let attempts = options.retries.unwrap_or(self.retries).saturating_add(1);
        let retry_delay = options.retry_delay.unwrap_or(self.retry_delay);

        let mut response = ResponseResult::transport_failure("request not executed");
        for attempt in 1..=attempts {
            debug!(attempt, %method, %url, "sending HTTP request");
            response = self.perform(&method, &url, &headers, payload.as_deref(), timeout).await;

            match &response.error {
                None => {
                    debug!(attempt, %method, %url, status = response.status, "received HTTP response");
                    break;
                }
                Some(error) => {
                    debug!(attempt, %method, %url, %error, "HTTP request failed");
                    if attempt < attempts && !retry_delay.is_zero() {
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        }

        self.log_call(&method, &url, &response);
        response
    }

    async fn perform(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        payload: Option<&str>,
        timeout: Duration,
    ) -> ResponseResult {
        let mut request = self
            .client_with_connect_timeout(connect_timeout(timeout))
            .request(method.clone(), url)
            .headers(headers.clone())
            .timeout(timeout);
        if let Some(payload) = payload {
            request = request.body(payload.to_owned());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return ResponseResult::transport_failure(describe(err)),
        };

        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        match response.text().await {
            Ok(raw) => ResponseResult::received(status, headers, decode_body(&raw)),
            Err(err) => ResponseResult::transport_failure(describe(err)),
        }
    }

    /// Client whose connect timeout is `connect`, built on first use.
    fn client_with_connect_timeout(&self, connect: Duration) -> ReqwestClient {
        if connect == self.connect_timeout {
            return self.client.clone();
        }

        let mut clients = self.per_connect_timeout.lock();
        if let Some(client) = clients.get(&connect) {
            return client.clone();
        }
        match reqwest_client(connect) {
            Ok(client) => {
                clients.insert(connect, client.clone());
                client
            }
            Err(err) => {
                warn!(error = %err, ?connect, "falling back to default connect timeout");
                self.client.clone()
            }
        }
    }

    fn log_call(&self, method: &Method, url: &str, response: &ResponseResult) {
        let Some(log) = &self.log else { return };

        let mut context = Map::new();
        context.insert("method".into(), Value::from(method.as_str()));
        context.insert("url".into(), Value::from(url));
        context.insert("status".into(), Value::from(response.status));
        context.insert(
            "error".into(),
            response.error.as_deref().map_or(Value::Null, Value::from),
        );

        if response.is_transport_failure() {
            log.error("HTTP request failed", context);
        } else {
            log.info("HTTP request completed", context);
        }
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    log: Option<Arc<dyn IntegrationLog>>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            log: None,
        }
    }
}

impl HttpClientBuilder {
    /// Base URL used when a call does not override it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Default total timeout. A call's effective timeout also bounds its
    /// connect timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Default retry count after the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Default pause between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Attach the sink receiving one record per logical call.
    pub fn log_sink(mut self, log: Arc<dyn IntegrationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when reqwest cannot build the
    /// client.
    pub fn build(self) -> Result<HttpClient> {
        let timeout = self.timeout.max(Duration::from_secs_f64(MIN_TIMEOUT_SECS));
        let connect_timeout = connect_timeout(timeout);
        let client = reqwest_client(connect_timeout)?;

        Ok(HttpClient {
            client,
            connect_timeout,
            per_connect_timeout: Arc::new(Mutex::new(BTreeMap::new())),
            base_url: self.base_url,
            timeout: self.timeout,
            retries: self.retries,
            retry_delay: self.retry_delay,
            log: self.log,
        })
    }
}

/// Join `base` and `uri` with exactly one `/` and append the percent-encoded
/// query pairs whose value is present.
pub fn build_url(base: &str, uri: &str, query: &[(String, Option<String>)]) -> String {
    let base = base.trim_end_matches('/');
    let uri = uri.trim_start_matches('/');
    let mut url = if base.is_empty() { uri.to_string() } else { format!("{base}/{uri}") };

    let pairs: Vec<String> = query
        .iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|value| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
        })
        .collect();

    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    url
}

/// Decode a response body: JSON when it looks like an object or array and
/// parses, the raw text otherwise, `null` when blank.
pub fn decode_body(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(decoded) = serde_json::from_str(trimmed) {
            return decoded;
        }
    }

    Value::String(raw.to_string())
}

fn reqwest_client(connect_timeout: Duration) -> Result<ReqwestClient> {
    ReqwestClient::builder()
        .connect_timeout(connect_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .map_err(|err| IntegrationError::from(InfraError::from(err)))
}

fn connect_timeout(timeout: Duration) -> Duration {
    timeout
        .min(Duration::from_secs_f64(MAX_CONNECT_TIMEOUT_SECS))
        .max(Duration::from_secs_f64(MIN_TIMEOUT_SECS))
}

fn normalize_headers(headers: &[(String, String)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value.trim())) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!(header = name, "dropping header with invalid name or value"),
        }
    }
    map
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
        })
        .collect()
}

fn describe(err: reqwest::Error) -> String {
    IntegrationError::from(InfraError::from(err)).to_string()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use coresuite_domain::ErrorReport;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Default)]
    struct CapturingLog {
        lines: Mutex<Vec<(String, Map<String, Value>)>>,
    }

    impl IntegrationLog for CapturingLog {
        fn info(&self, message: &str, context: Map<String, Value>) {
            self.lines.lock().push((format!("INFO {message}"), context));
        }

        fn error(&self, message: &str, context: Map<String, Value>) {
            self.lines.lock().push((format!("ERROR {message}"), context));
        }

        fn exception(&self, report: &ErrorReport, context: Map<String, Value>) {
            self.lines.lock().push((format!("ERROR {}", report.message), context));
        }
    }

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::builder()
            .base_url(server.uri())
            .retry_delay(Duration::from_millis(5))
            .build()
            .expect("http client")
    }

    #[test]
    fn build_url_joins_and_drops_null_query_values() {
        let query = vec![("a".to_string(), Some("1".to_string())), ("b".to_string(), None)];
        assert_eq!(
            build_url("https://api.example.com/", "/v1/items", &query),
            "https://api.example.com/v1/items?a=1"
        );
    }

    #[test]
    fn build_url_encodes_query_rfc3986_style() {
        let query = vec![("q".to_string(), Some("a b/c~".to_string()))];
        assert_eq!(build_url("http://h", "x", &query), "http://h/x?q=a%20b%2Fc~");
        assert_eq!(build_url("", "/only/path", &[]), "only/path");
        assert_eq!(build_url("http://h//", "", &[]), "http://h/");
    }

    #[test]
    fn decode_body_handles_json_text_and_blank() {
        assert_eq!(decode_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_body(" [1,2] "), json!([1, 2]));
        assert_eq!(decode_body("plain text"), json!("plain text"));
        assert_eq!(decode_body("{not json"), json!("{not json"));
        assert_eq!(decode_body("  \n"), Value::Null);
    }

    #[test]
    fn connect_timeout_is_clamped() {
        assert_eq!(connect_timeout(Duration::from_secs(20)), Duration::from_secs(5));
        assert_eq!(connect_timeout(Duration::from_millis(100)), Duration::from_millis(500));
        assert_eq!(connect_timeout(Duration::from_secs(2)), Duration::from_secs(2));
    }

    #[test]
    fn call_timeout_selects_matching_connect_timeout() {
        let client = HttpClient::builder()
            .timeout(Duration::from_millis(600))
            .build()
            .expect("http client");
        assert_eq!(client.connect_timeout, Duration::from_millis(600));

        client.client_with_connect_timeout(connect_timeout(Duration::from_millis(600)));
        assert!(client.per_connect_timeout.lock().is_empty());

        client.client_with_connect_timeout(connect_timeout(Duration::from_secs(10)));
        client.client_with_connect_timeout(connect_timeout(Duration::from_secs(30)));
        let cached: Vec<Duration> = client.per_connect_timeout.lock().keys().copied().collect();
        assert_eq!(cached, [Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn longer_call_timeout_still_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow-connect"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let client = HttpClient::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(600))
            .build()
            .expect("http client");

        let response = client
            .execute(
                Method::GET,
                "/slow-connect",
                RequestOptions::new().timeout(Duration::from_secs(10)),
            )
            .await;

        assert_eq!(response.status, 200);
        assert_eq!(client.per_connect_timeout.lock().len(), 1);
    }

    #[test]
    fn non_serializable_json_body_fails_fast() {
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], "value");
        let err = RequestBody::json(&bad).unwrap_err();
        assert_eq!(err.code(), "serialization");
    }

    #[tokio::test]
    async fn sends_json_body_with_default_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/items"))
            .and(header("content-type", "application/json"))
            .and(header("x-trimmed", "value"))
            .and(query_param("page", "2"))
            .and(body_json(json!({"name": "SIM"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .execute(
                Method::POST,
                "/v1/items",
                RequestOptions::new()
                    .header("  X-Trimmed ", " value ")
                    .header("   ", "dropped")
                    .query("page", Some("2".into()))
                    .body(RequestBody::Json(json!({"name": "SIM"}))),
            )
            .await;

        assert_eq!(response.status, 201);
        assert_eq!(response.body, json!({"id": 9}));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn caller_content_type_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header("content-type", "application/vnd.api+json"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .execute(
                Method::PUT,
                "/x",
                RequestOptions::new()
                    .header("content-type", "application/vnd.api+json")
                    .body(RequestBody::Json(json!({}))),
            )
            .await;

        assert_eq!(response.status, 204);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn text_body_is_sent_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string("a=1&b=2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .execute(Method::POST, "/", RequestOptions::new().body(RequestBody::Text("a=1&b=2".into())))
            .await;

        assert_eq!(response.body, json!("plain text"));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).insert_header("x-request-id", "abc"))
            .expect(1)
            .mount(&server)
            .await;

        let response =
            client_for(&server).execute(Method::GET, "/missing", RequestOptions::new().retries(3)).await;

        assert_eq!(response.status, 404);
        assert!(response.error.is_none());
        assert_eq!(response.headers.get("x-request-id").map(String::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn server_errors_are_returned_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let response =
            client_for(&server).execute(Method::GET, "/", RequestOptions::new().retries(2)).await;

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn option_base_url_overrides_client_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().base_url("http://127.0.0.1:9").build().expect("client");
        let response =
            client.execute(Method::GET, "ping", RequestOptions::new().base_url(server.uri())).await;

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn refused_connection_becomes_zero_status_and_single_log_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let log = Arc::new(CapturingLog::default());
        let client = HttpClient::builder()
            .base_url(format!("http://{addr}"))
            .retries(2)
            .retry_delay(Duration::from_millis(5))
            .log_sink(log.clone())
            .build()
            .expect("http client");

        let response = client.execute(Method::GET, "/", RequestOptions::new()).await;

        assert_eq!(response.status, 0);
        assert!(response.error.is_some());
        let lines = log.lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].0.starts_with("ERROR"));
        assert_eq!(lines[0].1["status"], 0);
        assert_eq!(lines[0].1["method"], "GET");
    }

    #[tokio::test]
    async fn successful_call_logs_once_at_info() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let log = Arc::new(CapturingLog::default());
        let client = HttpClient::builder()
            .base_url(server.uri())
            .log_sink(log.clone())
            .build()
            .expect("http client");

        client.execute(Method::DELETE, "/a", RequestOptions::new()).await;

        let lines = log.lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].0.starts_with("INFO"));
        assert_eq!(lines[0].1["status"], 500);
        assert_eq!(lines[0].1["url"], format!("{}/a", server.uri()));
        assert_eq!(lines[0].1["error"], Value::Null);
    }
}
