//! HTTP client types for Monitor API communication.
//!
//! This module provides the request/response plumbing and the two public
//! clients built on it.
//!
//! # Overview
//!
//! - [`Client`]: The async client (query, command, batch, login)
//! - [`blocking::BlockingClient`]: The same operations on the calling thread
//! - [`Transport`] / [`blocking::BlockingTransport`]: The "send one request" seam
//! - [`HttpClient`] / [`blocking::BlockingHttpClient`]: `reqwest`-backed transports
//! - [`HttpRequest`] / [`HttpResponse`]: Transport-neutral request and response values
//! - [`QueryParams`], [`CommandOptions`], [`BatchOptions`], [`BatchCommandEntity`]: Call parameters
//! - [`classify`]: Maps a raw response to a payload or a [`MonitorError`]
//!
//! # Retry Behavior
//!
//! The only retry is for an expired session: a request answered with 401 is
//! resent exactly once after a fresh login. Every other failure, including
//! timeouts and 5xx responses, is returned immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use monitor_api::{Client, CommandOptions, QueryParams};
//! use serde_json::json;
//!
//! let client = Client::new(config)?;
//!
//! let parts = client
//!     .query("Inventory", "Parts", &QueryParams::new().filter("PartNumber eq 'P-1'"))
//!     .await?;
//!
//! let created = client
//!     .command(
//!         "Inventory",
//!         "Parts",
//!         "Create",
//!         Some(json!({"PartNumber": "P-2"})),
//!         &CommandOptions::new().simulate(true),
//!     )
//!     .await?;
//! ```

pub mod blocking;
mod classifier;
mod client;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod request_builder;

pub use classifier::{
    check_batch_result, classify, OperationKind, Outcome, API_NOT_AVAILABLE_MESSAGE,
};
pub use client::Client;
pub use errors::{ErrorKind, MonitorError, TransportError};
pub use http_client::{HttpClient, Transport, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, SESSION_ID_HEADER};
pub use http_response::HttpResponse;
pub use request_builder::{
    batch_request, command_request, login_request, query_request, BatchCommandEntity,
    BatchOptions, CommandOptions, QueryParams,
};
