//! Monitor API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the Monitor API to use.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Monitor API version.
///
/// The version appears as a path segment after `/api/`. `V1` is the only
/// published version; `Custom` carries any later `v<number>` string.
///
/// # Example
///
/// ```rust
/// use monitor_api::ApiVersion;
///
/// let version: ApiVersion = "v1".parse().unwrap();
/// assert_eq!(version, ApiVersion::V1);
/// assert_eq!(format!("{}", ApiVersion::V1), "v1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version `v1`.
    #[default]
    V1,
    /// Custom version string for future versions.
    Custom(String),
}

impl ApiVersion {
    fn is_valid_version_format(s: &str) -> bool {
        s.strip_prefix('v')
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "v1" => Ok(Self::V1),
            _ if Self::is_valid_version_format(&s) => Ok(Self::Custom(s)),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}
