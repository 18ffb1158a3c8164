//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// Default port of an on-premise Monitor API server.
pub const DEFAULT_PORT: u16 = 8001;

/// A validated Monitor company number (e.g. `001.1`).
///
/// # Example
///
/// ```rust
/// use monitor_api::CompanyNumber;
///
/// let company = CompanyNumber::new("001.1").unwrap();
/// assert_eq!(company.as_ref(), "001.1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyNumber(String);

impl CompanyNumber {
    /// Creates a new validated company number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCompanyNumber`] if the value is blank.
    pub fn new(company: impl Into<String>) -> Result<Self, ConfigError> {
        let company = company.into().trim().to_string();
        if company.is_empty() {
            return Err(ConfigError::EmptyCompanyNumber);
        }
        Ok(Self(company))
    }
}

impl AsRef<str> for CompanyNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Monitor API username.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Creates a new validated username.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] if the username is empty.
    pub fn new(username: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Monitor API password.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// ```rust
/// use monitor_api::Password;
///
/// let password = Password::new("hunter2").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// The base network address of a Monitor API server.
///
/// Only `http` and `https` schemes are accepted. A trailing `/` is removed so
/// paths can be appended with a single separator.
///
/// # Example
///
/// ```rust
/// use monitor_api::BaseUrl;
///
/// let url = BaseUrl::new("https://monitor.example.com:8001/").unwrap();
/// assert_eq!(url.as_ref(), "https://monitor.example.com:8001");
///
/// let url = BaseUrl::from_host_port("monitor.example.com", 8001).unwrap();
/// assert_eq!(url.as_ref(), "https://monitor.example.com:8001");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the scheme is not `http` or
    /// `https`, or if no host follows the scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        if host.is_empty() || host.starts_with(['/', ':']) || host.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Builds an `https` base URL from a host name and port.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the host is empty.
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, ConfigError> {
        Self::new(format!("https://{}:{port}", host.trim()))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated language code used as the first path segment of every call.
///
/// Accepts codes like `en`, `sv` or `en-GB`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Creates a new validated language code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLanguageCode`] if the code is empty or
    /// contains anything other than ASCII letters and an optional region part.
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into().trim().to_string();
        if !Self::is_valid(&code) {
            return Err(ConfigError::InvalidLanguageCode { code });
        }
        Ok(Self(code))
    }

    fn is_valid(code: &str) -> bool {
        let mut parts = code.split('-');
        let primary = parts.next().unwrap_or_default();
        let region = parts.next();

        if parts.next().is_some() || primary.is_empty() {
            return false;
        }

        primary.chars().all(|c| c.is_ascii_alphabetic())
            && region.map_or(true, |r| {
                !r.is_empty() && r.chars().all(|c| c.is_ascii_alphanumeric())
            })
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
