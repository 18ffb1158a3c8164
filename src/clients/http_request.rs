//! HTTP request descriptors for the Monitor API client.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! is a plain value: building one performs no I/O and reads no shared state.
//! The session header is the only part written after construction, by the
//! dispatcher, immediately before each send.

use std::collections::BTreeMap;
use std::fmt;

/// Name of the header carrying the session id, in its canonical lowercase form.
pub const SESSION_ID_HEADER: &str = "x-monitor-sessionid";

/// HTTP methods used by the Monitor API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET, used by queries.
    Get,
    /// HTTP POST, used by login, commands and batches.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// An HTTP request to be sent to the Monitor API.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use monitor_api::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "https://host/en/001.1/login")
///     .body(json!({"Username": "user"}))
///     .build();
///
/// assert!(request.session_id().is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute URL, without query string.
    pub url: String,
    /// Query parameters in insertion order. Never contains empty values.
    pub query: Vec<(String, String)>,
    /// Headers keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Returns the value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the session id currently attached to this request.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.header(SESSION_ID_HEADER)
    }

    /// Attaches (or replaces) the session id header.
    ///
    /// The URL, query and body are left untouched so the same descriptor can
    /// be resent after a session refresh.
    pub fn set_session_id(&mut self, session_id: &str) {
        self.headers
            .insert(SESSION_ID_HEADER.to_string(), session_id.to_string());
    }

    /// Returns the full URL including the encoded query string.
    ///
    /// Used for logging; transports pass [`Self::query`] to their own encoder.
    #[must_use]
    pub fn display_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.url)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body if one is given.
    #[must_use]
    pub fn optional_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// Adds a query parameter unless the value is empty.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.query.push((key.into(), value));
        }
        self
    }

    /// Adds a query parameter if the value is present and non-empty.
    #[must_use]
    pub fn optional_query_param<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query_param(key, value.to_string()),
            None => self,
        }
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            url: self.url,
            query: self.query,
            headers: self.headers,
            body: self.body,
        }
    }
}
