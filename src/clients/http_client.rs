//! Transport layer for Monitor API communication.
//!
//! The dispatcher only needs "send a request, get a response"; that
//! capability is the [`Transport`] trait. [`HttpClient`] implements it with
//! `reqwest`. Transports never retry and never interpret status codes.

use std::collections::HashMap;
use std::future::Future;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::MonitorConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends a single HTTP request and returns the raw response.
///
/// Implementations report every failure to obtain a response, including a
/// timeout, as a [`TransportError`].
pub trait Transport: Send + Sync {
    /// Sends the request.
    fn send(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Builds the `User-Agent` value shared by the async and blocking transports.
pub(crate) fn user_agent(config: &MonitorConfig) -> String {
    let prefix = config
        .user_agent_prefix()
        .map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("{prefix}Monitor API Client v{SDK_VERSION} | Rust {rust_version}")
}

/// Parses response headers into a `HashMap` keyed by lowercase name.
pub(crate) fn parse_response_headers(
    headers: &reqwest::header::HeaderMap,
) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

/// `reqwest`-backed [`Transport`].
///
/// The request timeout and certificate policy come from [`MonitorConfig`].
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; clone it cheaply to share a connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a transport for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying client cannot be
    /// created (e.g. TLS initialization failure).
    pub fn new(config: &MonitorConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .build()?;

        let mut default_headers = HashMap::new();
        default_headers.insert("user-agent".to_string(), user_agent(config));
        default_headers.insert("accept".to_string(), "application/json".to_string());

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

impl Transport for HttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in self.default_headers.iter().chain(&request.headers) {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(HttpResponse::new(code, headers, body))
    }
}
