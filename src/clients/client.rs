//! The async Monitor API client.
//!
//! [`Client`] exposes the four public operations (login, query, command and
//! batch) and owns the dispatch cycle shared by the last three:
//!
//! 1. Build the request descriptor and attach the current session id.
//! 2. Send it and classify the response.
//! 3. On an `InvalidSessionId` outcome, refresh the session through the
//!    single-flight [`SessionManager`] and resend the same descriptor once.
//! 4. Return the final outcome. A second rejection is returned as-is.

use serde_json::Value;

use crate::auth::{handle_login_response, Session, SessionManager};
use crate::clients::classifier::{check_batch_result, classify, OperationKind, Outcome};
use crate::clients::errors::{MonitorError, TransportError};
use crate::clients::http_client::{HttpClient, Transport};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::request_builder::{
    batch_request, command_request, login_request, query_request, BatchCommandEntity,
    BatchOptions, CommandOptions, QueryParams,
};
use crate::config::MonitorConfig;

/// Async client for the Monitor ERP API.
///
/// The client is cheap to share: wrap it in an `Arc` and call it from as many
/// tasks as needed. Concurrent requests that find the session expired share
/// a single login.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync` whenever its transport is.
///
/// # Example
///
/// ```rust,ignore
/// use monitor_api::{BaseUrl, Client, CompanyNumber, MonitorConfig, Password, QueryParams, Username};
///
/// let config = MonitorConfig::builder()
///     .company_number(CompanyNumber::new("001.1")?)
///     .username(Username::new("api-user")?)
///     .password(Password::new("secret")?)
///     .base_url(BaseUrl::new("https://monitor.example.com:8001")?)
///     .build()?;
///
/// let client = Client::new(config)?;
/// let parts = client
///     .query("Inventory", "Parts", &QueryParams::new().top(10))
///     .await?;
/// ```
#[derive(Debug)]
pub struct Client<T: Transport = HttpClient> {
    config: MonitorConfig,
    transport: T,
    sessions: SessionManager,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client<HttpClient> {
    /// Creates a client using the `reqwest` transport.
    ///
    /// No network traffic happens here; the first login occurs when it is
    /// first needed.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::RequestError`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        let transport = HttpClient::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client using a custom transport.
    ///
    /// The session is seeded from [`MonitorConfig::session_id`] if one was
    /// configured.
    #[must_use]
    pub fn with_transport(config: MonitorConfig, transport: T) -> Self {
        let initial = config.session_id().map_or_else(Session::unset, Session::seeded);
        Self {
            config,
            transport,
            sessions: SessionManager::new(initial),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.sessions.snapshot()
    }

    /// Logs in and stores the new session.
    ///
    /// Calling this is optional; other operations log in on demand. If a
    /// login is already in flight, this joins it.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::LoginFailed`] for a non-success status
    /// - [`MonitorError::SessionSuspended`] if the server reports the session suspended
    /// - [`MonitorError::InvalidResponse`] if the session header is missing
    /// - [`MonitorError::RequestError`] if the server cannot be reached
    pub async fn login(&self) -> Result<Session, MonitorError> {
        self.sessions.login(|| self.perform_login()).await
    }

    /// Runs a query against `{module}/{entity}`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`MonitorError`].
    pub async fn query(
        &self,
        module: &str,
        entity: &str,
        params: &QueryParams,
    ) -> Result<Value, MonitorError> {
        let request = query_request(&self.config, module, entity, params);
        self.execute(OperationKind::Query, request)
            .await
            .map(|(_, payload)| payload)
    }

    /// Runs a command at `{module}/{namespace}/{command}`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`MonitorError`].
    pub async fn command(
        &self,
        module: &str,
        namespace: &str,
        command: &str,
        body: Option<Value>,
        options: &CommandOptions,
    ) -> Result<Value, MonitorError> {
        let request = command_request(&self.config, module, namespace, command, body, options);
        self.execute(OperationKind::Command, request)
            .await
            .map(|(_, payload)| payload)
    }

    /// Runs several commands as one batch, in the given order.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`MonitorError`]. With
    /// [`BatchOptions::raise_on_error`], also returns
    /// [`MonitorError::BatchCommandError`] for the first unsuccessful entry.
    pub async fn batch(
        &self,
        commands: &[BatchCommandEntity],
        options: &BatchOptions,
    ) -> Result<Value, MonitorError> {
        let request = batch_request(&self.config, commands, options);
        let (status, payload) = self.execute(OperationKind::Batch, request).await?;
        if options.raise_on_error {
            check_batch_result(status, &payload)?;
        }
        Ok(payload)
    }

    async fn execute(
        &self,
        kind: OperationKind,
        mut request: HttpRequest,
    ) -> Result<(u16, Value), MonitorError> {
        let session = self.sessions.current().await?;
        let response = self.send_with_session(&mut request, &session).await?;
        let outcome = classify(kind, &response);
        if !outcome.is_session_rejected() {
            return finish(response.code, outcome);
        }

        tracing::info!(
            method = %request.http_method,
            url = %request.display_url(),
            "Session rejected, logging in and retrying once"
        );
        let session = self
            .sessions
            .refresh(&session, || self.perform_login())
            .await?;
        let response = self.send_with_session(&mut request, &session).await?;
        finish(response.code, classify(kind, &response))
    }

    async fn send_with_session(
        &self,
        request: &mut HttpRequest,
        session: &Session,
    ) -> Result<HttpResponse, MonitorError> {
        request.set_session_id(session.header_value());
        let result = self.transport.send(request).await;
        log_exchange(request, &result);
        Ok(result?)
    }

    async fn perform_login(&self) -> Result<String, MonitorError> {
        let request = login_request(&self.config);
        tracing::debug!(url = %request.url, "Logging in");
        let result = self.transport.send(&request).await;
        log_exchange(&request, &result);
        handle_login_response(&result?)
    }
}

pub(crate) fn finish(status: u16, outcome: Outcome) -> Result<(u16, Value), MonitorError> {
    outcome.into_result().map(|payload| (status, payload))
}

/// Logs one request/response exchange. Never logs headers or bodies, which
/// may carry credentials or the session token.
pub(crate) fn log_exchange(request: &HttpRequest, result: &Result<HttpResponse, TransportError>) {
    match result {
        Ok(response) if response.is_ok() => tracing::debug!(
            method = %request.http_method,
            url = %request.display_url(),
            status = response.code,
            "Monitor API request succeeded"
        ),
        Ok(response) => tracing::warn!(
            method = %request.http_method,
            url = %request.display_url(),
            status = response.code,
            "Monitor API request returned an error status"
        ),
        Err(error) => tracing::error!(
            method = %request.http_method,
            url = %request.display_url(),
            timeout = error.is_timeout,
            "Monitor API request failed: {error}"
        ),
    }
}
