//! # Monitor ERP API Client
//!
//! A Rust client for the Monitor ERP HTTP API with managed, session-based
//! authentication.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`MonitorConfig`] and [`MonitorConfigBuilder`]
//! - Validated newtypes for credentials and connection values
//! - Query, command and batch operations on an async [`Client`] and a
//!   [`BlockingClient`]
//! - Transparent session handling: an expired session is replaced by a
//!   single shared login and the failed request is retried once
//! - A typed error taxonomy ([`MonitorError`], [`ErrorKind`]) that keeps the
//!   server's status and body
//!
//! ## Quick Start
//!
//! ```rust
//! use monitor_api::{BaseUrl, CompanyNumber, MonitorConfig, Password, Username};
//!
//! let config = MonitorConfig::builder()
//!     .company_number(CompanyNumber::new("001.1").unwrap())
//!     .username(Username::new("api-user").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .base_url(BaseUrl::from_host_port("monitor.example.com", 8001).unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use monitor_api::{BatchCommandEntity, BatchOptions, Client, QueryParams};
//! use serde_json::json;
//!
//! let client = Client::new(config)?;
//!
//! // No explicit login needed: the first request logs in on demand.
//! let parts = client
//!     .query("Inventory", "Parts", &QueryParams::new().select("Id,PartNumber").top(50))
//!     .await?;
//!
//! // Commands that depend on each other go in one batch.
//! let result = client
//!     .batch(
//!         &[
//!             BatchCommandEntity::new("Inventory/Parts/Create", json!({"PartNumber": "P-1"}))
//!                 .forward_property_name("EntityId"),
//!             BatchCommandEntity::new("Common/Notes/Create", json!({"Text": "new part"}))
//!                 .receiving_property_name("ParentId"),
//!         ],
//!         &BatchOptions::new().raise_on_error(true),
//!     )
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.
//! Passwords and session tokens are never logged.
//!
//! ## Design Principles
//!
//! - **No global state**: Each client owns its configuration and session
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: Clients are `Send + Sync` and meant to be shared
//! - **Single-flight login**: Concurrent rejections trigger one login

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::Session;
pub use config::{
    ApiVersion, BaseUrl, CompanyNumber, LanguageCode, MonitorConfig, MonitorConfigBuilder,
    Password, Username, DEFAULT_PORT, DEFAULT_TIMEOUT,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::blocking::{BlockingClient, BlockingHttpClient, BlockingTransport};
pub use clients::{
    BatchCommandEntity, BatchOptions, Client, CommandOptions, ErrorKind, HttpClient, HttpMethod,
    HttpRequest, HttpResponse, MonitorError, QueryParams, Transport, TransportError,
};
