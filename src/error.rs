//! Configuration error types for the Monitor API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so invalid
//! credentials or addresses are rejected before any request is made.
//!
//! # Example
//!
//! ```rust
//! use monitor_api::{CompanyNumber, ConfigError};
//!
//! let result = CompanyNumber::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyCompanyNumber)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Company number cannot be empty.
    #[error("Company number cannot be empty. Please provide the Monitor company number (e.g. '001.1').")]
    EmptyCompanyNumber,

    /// Username cannot be empty.
    #[error("Username cannot be empty. Please provide a valid Monitor API user.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Please provide the password for the Monitor API user.")]
    EmptyPassword,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an http(s) URL such as 'https://monitor.example.com:8001'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Language code is invalid.
    #[error("Invalid language code '{code}'. Expected a code such as 'en' or 'sv'.")]
    InvalidLanguageCode {
        /// The invalid code that was provided.
        code: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'v<number>' (e.g., 'v1').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
