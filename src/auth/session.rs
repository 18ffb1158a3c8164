//! Session state for Monitor API authentication.
//!
//! This module provides the [`Session`] value: the opaque token sent in the
//! `x-monitor-sessionid` header, plus a generation counter identifying which
//! login produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A snapshot of the client's session.
///
/// A session starts either unset or seeded with a token supplied in the
/// configuration (generation `0`). Every successful login produces a new
/// session with the next generation. The token is never validated locally;
/// the server rejecting it is the only signal that it has expired.
///
/// Sessions serialize to JSON so a token can be stored and handed back to
/// [`MonitorConfigBuilder::session_id`](crate::MonitorConfigBuilder::session_id)
/// on the next start.
///
/// # Example
///
/// ```rust
/// use monitor_api::Session;
///
/// let session = Session::unset();
/// assert!(!session.is_active());
/// assert_eq!(session.header_value(), "");
///
/// let session = Session::seeded("ABC123");
/// assert_eq!(session.token(), Some("ABC123"));
/// assert_eq!(session.generation(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    generation: u64,
    acquired_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates the initial session with no token.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            token: None,
            generation: 0,
            acquired_at: None,
        }
    }

    /// Creates the initial session from a previously issued token.
    #[must_use]
    pub fn seeded(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
            generation: 0,
            acquired_at: None,
        }
    }

    /// Creates the session produced by a successful login.
    #[must_use]
    pub(crate) fn logged_in(token: String, generation: u64) -> Self {
        Self {
            token: Some(token),
            generation,
            acquired_at: Some(Utc::now()),
        }
    }

    /// Returns the token, if one is held.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the value to send in the session header.
    ///
    /// An unset session sends an empty value, which the server rejects with
    /// 401 and thereby triggers the first login.
    #[must_use]
    pub fn header_value(&self) -> &str {
        self.token().unwrap_or_default()
    }

    /// Returns `true` if a token is held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Returns the number of successful logins that preceded this session.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns when the login producing this session completed.
    ///
    /// `None` for unset and seeded sessions.
    #[must_use]
    pub const fn acquired_at(&self) -> Option<DateTime<Utc>> {
        self.acquired_at
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::unset()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};
