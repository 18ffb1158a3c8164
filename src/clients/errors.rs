//! Error taxonomy for Monitor API operations.
//!
//! Every failure a client call can produce is a variant of [`MonitorError`].
//! Variants derived from an HTTP response keep the raw status code and body
//! for diagnostics; [`MonitorError::RequestError`] is the only variant raised
//! without a response.
//!
//! # Example
//!
//! ```rust,ignore
//! use monitor_api::{ErrorKind, MonitorError};
//!
//! match client.query("Inventory", "Parts", &params).await {
//!     Ok(parts) => println!("{parts}"),
//!     Err(e) if e.kind() == ErrorKind::QueryInvalidFilter => {
//!         println!("Bad $filter: {}", e.body().unwrap_or_default());
//!     }
//!     Err(MonitorError::RequestError { message, .. }) => {
//!         println!("Server unreachable: {message}");
//!     }
//!     Err(e) => println!("API error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned by a transport when no HTTP response could be obtained.
///
/// This covers connection failures, TLS failures and timeouts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Whether the configured timeout elapsed.
    pub is_timeout: bool,
}

impl TransportError {
    /// Creates a transport error that is not a timeout.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_timeout: false,
        }
    }

    /// Creates a transport error for an elapsed timeout.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_timeout: true,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            message: format!("Network error: {error}"),
            is_timeout: error.is_timeout(),
        }
    }
}

/// Fieldless mirror of [`MonitorError`] for matching on the kind alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequestError,
    LoginFailed,
    SessionSuspended,
    ApiNotAvailable,
    InvalidSessionId,
    UnhandledException,
    QueryInvalidId,
    QueryInvalidFilter,
    QueryEntityNotFound,
    QueryError,
    CommandValidationFailure,
    CommandNotFound,
    CommandEntityNotFound,
    CommandConflict,
    CommandError,
    BatchCommandError,
    InvalidResponse,
}

/// Unified error type for all Monitor API operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// No response was received (connection failure or timeout).
    #[error("Request failed without a response: {message}")]
    RequestError {
        /// Description of the transport failure.
        message: String,
        /// Whether the configured timeout elapsed.
        is_timeout: bool,
    },

    /// The login endpoint returned a non-success status.
    ///
    /// This typically means the username or password is invalid.
    #[error("Login failed with status {status}: {body}")]
    LoginFailed { status: u16, body: String },

    /// Another principal holds the exclusive session for this user.
    #[error("Session suspended (status {status}): {body}")]
    SessionSuspended { status: u16, body: String },

    /// The API option is not enabled for this system.
    #[error("API not available (status {status}): {body}")]
    ApiNotAvailable { status: u16, body: String },

    /// The session header was missing or rejected.
    #[error("Invalid session id (status {status}): {body}")]
    InvalidSessionId { status: u16, body: String },

    /// The server reported an unhandled exception.
    #[error("Unhandled server exception (status {status}): {body}")]
    UnhandledException { status: u16, body: String },

    /// The id segment of a query could not be converted to an identifier.
    #[error("Invalid query id (status {status}): {body}")]
    QueryInvalidId { status: u16, body: String },

    /// The `$filter` clause of a query could not be parsed.
    #[error("Invalid query filter (status {status}): {body}")]
    QueryInvalidFilter { status: u16, body: String },

    /// The query provider or entity could not be found.
    #[error("Query entity not found (status {status}): {body}")]
    QueryEntityNotFound { status: u16, body: String },

    /// Any other query failure.
    #[error("Query failed with status {status}: {body}")]
    QueryError { status: u16, body: String },

    /// The command handler rejected the input data.
    #[error("Command validation failed (status {status}): {body}")]
    CommandValidationFailure { status: u16, body: String },

    /// The requested command does not exist.
    #[error("Command not found (status {status}): {body}")]
    CommandNotFound { status: u16, body: String },

    /// The command handler could not find an entity it needed.
    #[error("Command entity not found (status {status}): {body}")]
    CommandEntityNotFound { status: u16, body: String },

    /// The entity changed since the command processor first read it.
    ///
    /// Sending the command again usually resolves this.
    #[error("Command conflict (status {status}): {body}")]
    CommandConflict { status: u16, body: String },

    /// Any other command failure.
    #[error("Command failed with status {status}: {body}")]
    CommandError { status: u16, body: String },

    /// An element of a batch response reported `IsSuccessful: false`.
    #[error("Batch command at index {index} was not successful (status {status}): {body}")]
    BatchCommandError {
        /// Position of the failing element in the submitted batch.
        index: usize,
        status: u16,
        /// The failing element, serialized as JSON.
        body: String,
    },

    /// A successful response could not be interpreted.
    #[error("Invalid response (status {status}): {reason}")]
    InvalidResponse {
        status: u16,
        body: String,
        reason: String,
    },
}

impl MonitorError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestError { .. } => ErrorKind::RequestError,
            Self::LoginFailed { .. } => ErrorKind::LoginFailed,
            Self::SessionSuspended { .. } => ErrorKind::SessionSuspended,
            Self::ApiNotAvailable { .. } => ErrorKind::ApiNotAvailable,
            Self::InvalidSessionId { .. } => ErrorKind::InvalidSessionId,
            Self::UnhandledException { .. } => ErrorKind::UnhandledException,
            Self::QueryInvalidId { .. } => ErrorKind::QueryInvalidId,
            Self::QueryInvalidFilter { .. } => ErrorKind::QueryInvalidFilter,
            Self::QueryEntityNotFound { .. } => ErrorKind::QueryEntityNotFound,
            Self::QueryError { .. } => ErrorKind::QueryError,
            Self::CommandValidationFailure { .. } => ErrorKind::CommandValidationFailure,
            Self::CommandNotFound { .. } => ErrorKind::CommandNotFound,
            Self::CommandEntityNotFound { .. } => ErrorKind::CommandEntityNotFound,
            Self::CommandConflict { .. } => ErrorKind::CommandConflict,
            Self::CommandError { .. } => ErrorKind::CommandError,
            Self::BatchCommandError { .. } => ErrorKind::BatchCommandError,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// Returns the HTTP status code, or `None` for [`Self::RequestError`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestError { .. } => None,
            Self::LoginFailed { status, .. }
            | Self::SessionSuspended { status, .. }
            | Self::ApiNotAvailable { status, .. }
            | Self::InvalidSessionId { status, .. }
            | Self::UnhandledException { status, .. }
            | Self::QueryInvalidId { status, .. }
            | Self::QueryInvalidFilter { status, .. }
            | Self::QueryEntityNotFound { status, .. }
            | Self::QueryError { status, .. }
            | Self::CommandValidationFailure { status, .. }
            | Self::CommandNotFound { status, .. }
            | Self::CommandEntityNotFound { status, .. }
            | Self::CommandConflict { status, .. }
            | Self::CommandError { status, .. }
            | Self::BatchCommandError { status, .. }
            | Self::InvalidResponse { status, .. } => Some(*status),
        }
    }

    /// Returns the raw response body, or `None` for [`Self::RequestError`].
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::RequestError { .. } => None,
            Self::LoginFailed { body, .. }
            | Self::SessionSuspended { body, .. }
            | Self::ApiNotAvailable { body, .. }
            | Self::InvalidSessionId { body, .. }
            | Self::UnhandledException { body, .. }
            | Self::QueryInvalidId { body, .. }
            | Self::QueryInvalidFilter { body, .. }
            | Self::QueryEntityNotFound { body, .. }
            | Self::QueryError { body, .. }
            | Self::CommandValidationFailure { body, .. }
            | Self::CommandNotFound { body, .. }
            | Self::CommandEntityNotFound { body, .. }
            | Self::CommandConflict { body, .. }
            | Self::CommandError { body, .. }
            | Self::BatchCommandError { body, .. }
            | Self::InvalidResponse { body, .. } => Some(body),
        }
    }

    /// Returns `true` if the server rejected the session id.
    #[must_use]
    pub const fn is_session_rejected(&self) -> bool {
        matches!(self, Self::InvalidSessionId { .. })
    }

    /// Builds the error for `kind` from a raw status and body.
    ///
    /// `RequestError` and `BatchCommandError` carry extra data and are mapped
    /// to their nearest representation (`is_timeout: false`, `index: 0`).
    #[must_use]
    pub fn from_kind(kind: ErrorKind, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match kind {
            ErrorKind::RequestError => Self::RequestError {
                message: body,
                is_timeout: false,
            },
            ErrorKind::LoginFailed => Self::LoginFailed { status, body },
            ErrorKind::SessionSuspended => Self::SessionSuspended { status, body },
            ErrorKind::ApiNotAvailable => Self::ApiNotAvailable { status, body },
            ErrorKind::InvalidSessionId => Self::InvalidSessionId { status, body },
            ErrorKind::UnhandledException => Self::UnhandledException { status, body },
            ErrorKind::QueryInvalidId => Self::QueryInvalidId { status, body },
            ErrorKind::QueryInvalidFilter => Self::QueryInvalidFilter { status, body },
            ErrorKind::QueryEntityNotFound => Self::QueryEntityNotFound { status, body },
            ErrorKind::QueryError => Self::QueryError { status, body },
            ErrorKind::CommandValidationFailure => Self::CommandValidationFailure { status, body },
            ErrorKind::CommandNotFound => Self::CommandNotFound { status, body },
            ErrorKind::CommandEntityNotFound => Self::CommandEntityNotFound { status, body },
            ErrorKind::CommandConflict => Self::CommandConflict { status, body },
            ErrorKind::CommandError => Self::CommandError { status, body },
            ErrorKind::BatchCommandError => Self::BatchCommandError {
                index: 0,
                status,
                body,
            },
            ErrorKind::InvalidResponse => Self::InvalidResponse {
                status,
                reason: "unexpected response".to_string(),
                body,
            },
        }
    }
}

impl From<TransportError> for MonitorError {
    fn from(error: TransportError) -> Self {
        Self::RequestError {
            message: error.message,
            is_timeout: error.is_timeout,
        }
    }
}
