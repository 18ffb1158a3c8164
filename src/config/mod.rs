//! Configuration types for the Monitor API client.
//!
//! This module provides the credentials and connection settings a client
//! instance is built from. Values are validated on construction and are
//! immutable for the lifetime of the client.
//!
//! # Overview
//!
//! - [`MonitorConfig`]: The configuration consumed by the clients
//! - [`MonitorConfigBuilder`]: A builder for constructing [`MonitorConfig`] instances
//! - [`CompanyNumber`], [`Username`], [`Password`]: Validated credentials
//! - [`BaseUrl`]: The validated server address
//! - [`LanguageCode`]: The default language path segment
//! - [`ApiVersion`]: The Monitor API version to use
//!
//! # Example
//!
//! ```rust
//! use monitor_api::{MonitorConfig, CompanyNumber, Username, Password, BaseUrl};
//!
//! let config = MonitorConfig::builder()
//!     .company_number(CompanyNumber::new("001.1").unwrap())
//!     .username(Username::new("api-user").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .base_url(BaseUrl::new("https://monitor.example.com:8001").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.language_code().as_ref(), "en");
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{BaseUrl, CompanyNumber, LanguageCode, Password, Username, DEFAULT_PORT};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Default timeout applied to every network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a Monitor API client.
///
/// # Thread Safety
///
/// `MonitorConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    company_number: CompanyNumber,
    username: Username,
    password: Password,
    base_url: BaseUrl,
    language_code: LanguageCode,
    api_version: ApiVersion,
    timeout: Duration,
    session_id: Option<String>,
    accept_invalid_certs: bool,
    user_agent_prefix: Option<String>,
}

impl MonitorConfig {
    /// Creates a new builder for constructing a `MonitorConfig`.
    #[must_use]
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::new()
    }

    /// Returns the company number.
    #[must_use]
    pub const fn company_number(&self) -> &CompanyNumber {
        &self.company_number
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }

    /// Returns the server base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default language code.
    #[must_use]
    pub const fn language_code(&self) -> &LanguageCode {
        &self.language_code
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the timeout applied to each network call.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the session id the client starts with, if one was supplied.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns whether TLS certificate validation is disabled.
    #[must_use]
    pub const fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify MonitorConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MonitorConfig>();
};

/// Builder for constructing [`MonitorConfig`] instances.
///
/// Required fields are `company_number`, `username`, `password` and
/// `base_url`.
///
/// # Defaults
///
/// - `language_code`: `en`
/// - `api_version`: `v1`
/// - `timeout`: 10 seconds
/// - `session_id`: `None`
/// - `accept_invalid_certs`: `false`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    company_number: Option<CompanyNumber>,
    username: Option<Username>,
    password: Option<Password>,
    base_url: Option<BaseUrl>,
    language_code: Option<LanguageCode>,
    api_version: Option<ApiVersion>,
    timeout: Option<Duration>,
    session_id: Option<String>,
    accept_invalid_certs: bool,
    user_agent_prefix: Option<String>,
}

impl MonitorConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the company number (required).
    #[must_use]
    pub fn company_number(mut self, company: CompanyNumber) -> Self {
        self.company_number = Some(company);
        self
    }

    /// Sets the username (required).
    #[must_use]
    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Sets the password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the server base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the default language code.
    #[must_use]
    pub fn language_code(mut self, code: LanguageCode) -> Self {
        self.language_code = Some(code);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the timeout applied to each network call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Seeds the client with a previously issued session id.
    ///
    /// The first request is sent with this id; a login only happens if the
    /// server rejects it.
    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Disables TLS certificate validation.
    ///
    /// On-premise servers frequently use self-signed certificates.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`MonitorConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if any of
    /// `company_number`, `username`, `password` or `base_url` are not set.
    pub fn build(self) -> Result<MonitorConfig, ConfigError> {
        let company_number = self.company_number.ok_or(ConfigError::MissingRequiredField {
            field: "company_number",
        })?;
        let username = self
            .username
            .ok_or(ConfigError::MissingRequiredField { field: "username" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(MonitorConfig {
            company_number,
            username,
            password,
            base_url,
            language_code: self.language_code.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            session_id: self.session_id.filter(|id| !id.is_empty()),
            accept_invalid_certs: self.accept_invalid_certs,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
