//! Blocking transport built on `reqwest::blocking`.

use std::collections::HashMap;

use crate::clients::errors::TransportError;
use crate::clients::http_client::{parse_response_headers, user_agent};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::MonitorConfig;

/// Sends a single HTTP request on the calling thread.
pub trait BlockingTransport: Send + Sync {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was received.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest::blocking`-backed [`BlockingTransport`].
///
/// Must not be created or dropped inside an async runtime; `reqwest` runs
/// its own runtime internally.
#[derive(Clone, Debug)]
pub struct BlockingHttpClient {
    client: reqwest::blocking::Client,
    default_headers: HashMap<String, String>,
}

// Verify BlockingHttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BlockingHttpClient>();
};

impl BlockingHttpClient {
    /// Creates a transport for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying client cannot be created.
    pub fn new(config: &MonitorConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
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

impl BlockingTransport for BlockingHttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
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

        let res = req_builder.send()?;

        let code = res.status().as_u16();
        let headers = parse_response_headers(res.headers());
        let body = res.text()?;

        Ok(HttpResponse::new(code, headers, body))
    }
}
