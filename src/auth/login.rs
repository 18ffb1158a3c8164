//! Interpretation of login responses.
//!
//! Building the login request lives with the other request builders; this
//! module turns the login endpoint's response into a session token or an
//! error.

use serde::Deserialize;

use crate::clients::{HttpResponse, MonitorError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginResponse {
    #[serde(default)]
    session_suspended: bool,
}

/// Extracts the session token from a login response.
///
/// # Errors
///
/// - [`MonitorError::LoginFailed`] for any non-2xx status
/// - [`MonitorError::SessionSuspended`] if the body reports `SessionSuspended: true`
/// - [`MonitorError::InvalidResponse`] if the body is not JSON or the
///   `x-monitor-sessionid` header is missing
pub fn handle_login_response(response: &HttpResponse) -> Result<String, MonitorError> {
    if !response.is_ok() {
        tracing::warn!(status = response.code, "Login failed with status {}", response.code);
        return Err(MonitorError::LoginFailed {
            status: response.code,
            body: response.body.clone(),
        });
    }

    let data: LoginResponse = if response.body.trim().is_empty() {
        LoginResponse::default()
    } else {
        serde_json::from_str(&response.body).map_err(|e| MonitorError::InvalidResponse {
            status: response.code,
            body: response.body.clone(),
            reason: format!("Failed to parse login response: {e}"),
        })?
    };

    if data.session_suspended {
        tracing::warn!("Session suspended");
        return Err(MonitorError::SessionSuspended {
            status: response.code,
            body: response.body.clone(),
        });
    }

    response
        .session_id()
        .map(str::to_string)
        .ok_or_else(|| MonitorError::InvalidResponse {
            status: response.code,
            body: response.body.clone(),
            reason: "Login response did not include an x-monitor-sessionid header".to_string(),
        })
}
