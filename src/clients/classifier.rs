//! Classification of raw HTTP responses into [`Outcome`]s.
//!
//! The rules below are a compatibility contract with the server's free-text
//! error messages and are kept exactly as the server has always been
//! interpreted:
//!
//! | Status | Query | Command / Batch |
//! |---|---|---|
//! | 2xx | JSON body, empty body is `null` | same |
//! | 400 | body contains `Id` → `QueryInvalidId`, else `QueryInvalidFilter` | `CommandValidationFailure` |
//! | 401 | `InvalidSessionId` | same |
//! | 403 | body equals [`API_NOT_AVAILABLE_MESSAGE`] → `ApiNotAvailable`, else `SessionSuspended` | same |
//! | 404 | `QueryEntityNotFound` | body contains `id` → `CommandEntityNotFound`, else `CommandNotFound` |
//! | 409 | `QueryError` | `CommandConflict` |
//! | 500 | `UnhandledException` | same |
//! | other | `QueryError` | `CommandError` |
//!
//! Both substring checks are case-sensitive.

use serde_json::Value;

use crate::clients::errors::{ErrorKind, MonitorError};
use crate::clients::http_response::HttpResponse;

/// Exact 403 body sent when the API option is disabled for the system.
pub const API_NOT_AVAILABLE_MESSAGE: &str = "Monitor.API is not available for this system";

/// The kind of operation a response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// A GET query.
    Query,
    /// A POST command.
    Command,
    /// A POST batch; classified with the command rules.
    Batch,
}

/// The result of classifying one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with the decoded body (`Value::Null` for an empty body).
    Success(Value),
    /// Any failure, carrying the raw status and body.
    Failure(MonitorError),
}

impl Outcome {
    /// Returns `true` if the server rejected the session id.
    #[must_use]
    pub const fn is_session_rejected(&self) -> bool {
        matches!(self, Self::Failure(error) if error.is_session_rejected())
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the contained [`MonitorError`] for [`Outcome::Failure`].
    pub fn into_result(self) -> Result<Value, MonitorError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

/// Classifies a response for the given operation kind.
///
/// This is a pure function: the same status and body always produce the
/// same outcome.
#[must_use]
pub fn classify(kind: OperationKind, response: &HttpResponse) -> Outcome {
    if response.is_ok() {
        return decode_body(response).map_or_else(Outcome::Failure, Outcome::Success);
    }

    let error_kind = match kind {
        OperationKind::Query => query_error_kind(response.code, &response.body),
        OperationKind::Command | OperationKind::Batch => {
            command_error_kind(response.code, &response.body)
        }
    };

    Outcome::Failure(MonitorError::from_kind(
        error_kind,
        response.code,
        response.body.clone(),
    ))
}

/// Scans a successful batch result for elements with `IsSuccessful: false`.
///
/// # Errors
///
/// Returns [`MonitorError::BatchCommandError`] for the first unsuccessful
/// element. Non-array payloads and elements without the field pass.
pub fn check_batch_result(status: u16, payload: &Value) -> Result<(), MonitorError> {
    let Some(items) = payload.as_array() else {
        return Ok(());
    };

    items
        .iter()
        .position(|item| item.get("IsSuccessful").and_then(Value::as_bool) == Some(false))
        .map_or(Ok(()), |index| {
            Err(MonitorError::BatchCommandError {
                index,
                status,
                body: items[index].to_string(),
            })
        })
}

fn decode_body(response: &HttpResponse) -> Result<Value, MonitorError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&response.body).map_err(|e| MonitorError::InvalidResponse {
        status: response.code,
        body: response.body.clone(),
        reason: format!("Response body is not valid JSON: {e}"),
    })
}

fn query_error_kind(status: u16, body: &str) -> ErrorKind {
    match status {
        400 if body.contains("Id") => ErrorKind::QueryInvalidId,
        400 => ErrorKind::QueryInvalidFilter,
        404 => ErrorKind::QueryEntityNotFound,
        _ => general_error_kind(status, body).unwrap_or(ErrorKind::QueryError),
    }
}

fn command_error_kind(status: u16, body: &str) -> ErrorKind {
    match status {
        400 => ErrorKind::CommandValidationFailure,
        404 if body.contains("id") => ErrorKind::CommandEntityNotFound,
        404 => ErrorKind::CommandNotFound,
        409 => ErrorKind::CommandConflict,
        _ => general_error_kind(status, body).unwrap_or(ErrorKind::CommandError),
    }
}

fn general_error_kind(status: u16, body: &str) -> Option<ErrorKind> {
    match status {
        401 => Some(ErrorKind::InvalidSessionId),
        403 if body == API_NOT_AVAILABLE_MESSAGE => Some(ErrorKind::ApiNotAvailable),
        403 => Some(ErrorKind::SessionSuspended),
        500 => Some(ErrorKind::UnhandledException),
        _ => None,
    }
}
