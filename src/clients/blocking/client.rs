//! The blocking Monitor API client.

use serde_json::Value;

use crate::auth::{handle_login_response, BlockingSessionManager, Session};
use crate::clients::blocking::http_client::{BlockingHttpClient, BlockingTransport};
use crate::clients::classifier::{check_batch_result, classify, OperationKind};
use crate::clients::client::{finish, log_exchange};
use crate::clients::errors::MonitorError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::request_builder::{
    batch_request, command_request, login_request, query_request, BatchCommandEntity,
    BatchOptions, CommandOptions, QueryParams,
};
use crate::config::MonitorConfig;

/// Blocking client for the Monitor ERP API.
///
/// Same operations and session semantics as [`Client`](crate::Client), run
/// on the calling thread. Share it between threads with an `Arc`; rejected
/// requests on different threads still share a single login.
///
/// # Example
///
/// ```rust,ignore
/// use monitor_api::{BlockingClient, CommandOptions};
/// use serde_json::json;
///
/// let client = BlockingClient::new(config)?;
/// let created = client.command(
///     "Inventory",
///     "Parts",
///     "Create",
///     Some(json!({"PartNumber": "P-1"})),
///     &CommandOptions::new(),
/// )?;
/// ```
#[derive(Debug)]
pub struct BlockingClient<T: BlockingTransport = BlockingHttpClient> {
    config: MonitorConfig,
    transport: T,
    sessions: BlockingSessionManager,
}

// Verify BlockingClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BlockingClient>();
};

impl BlockingClient<BlockingHttpClient> {
    /// Creates a client using the `reqwest::blocking` transport.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::RequestError`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        let transport = BlockingHttpClient::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: BlockingTransport> BlockingClient<T> {
    /// Creates a client using a custom transport.
    #[must_use]
    pub fn with_transport(config: MonitorConfig, transport: T) -> Self {
        let initial = config.session_id().map_or_else(Session::unset, Session::seeded);
        Self {
            config,
            transport,
            sessions: BlockingSessionManager::new(initial),
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

    /// Logs in and stores the new session, joining a login in flight.
    ///
    /// # Errors
    ///
    /// See [`Client::login`](crate::Client::login).
    pub fn login(&self) -> Result<Session, MonitorError> {
        self.sessions.login(|| self.perform_login())
    }

    /// Runs a query against `{module}/{entity}`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`MonitorError`].
    pub fn query(
        &self,
        module: &str,
        entity: &str,
        params: &QueryParams,
    ) -> Result<Value, MonitorError> {
        let request = query_request(&self.config, module, entity, params);
        self.execute(OperationKind::Query, request)
            .map(|(_, payload)| payload)
    }

    /// Runs a command at `{module}/{namespace}/{command}`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`MonitorError`].
    pub fn command(
        &self,
        module: &str,
        namespace: &str,
        command: &str,
        body: Option<Value>,
        options: &CommandOptions,
    ) -> Result<Value, MonitorError> {
        let request = command_request(&self.config, module, namespace, command, body, options);
        self.execute(OperationKind::Command, request)
            .map(|(_, payload)| payload)
    }

    /// Runs several commands as one batch, in the given order.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or [`MonitorError::BatchCommandError`]
    /// when [`BatchOptions::raise_on_error`] is set.
    pub fn batch(
        &self,
        commands: &[BatchCommandEntity],
        options: &BatchOptions,
    ) -> Result<Value, MonitorError> {
        let request = batch_request(&self.config, commands, options);
        let (status, payload) = self.execute(OperationKind::Batch, request)?;
        if options.raise_on_error {
            check_batch_result(status, &payload)?;
        }
        Ok(payload)
    }

    fn execute(
        &self,
        kind: OperationKind,
        mut request: HttpRequest,
    ) -> Result<(u16, Value), MonitorError> {
        let session = self.sessions.current()?;
        let response = self.send_with_session(&mut request, &session)?;
        let outcome = classify(kind, &response);
        if !outcome.is_session_rejected() {
            return finish(response.code, outcome);
        }

        tracing::info!(
            method = %request.http_method,
            url = %request.display_url(),
            "Session rejected, logging in and retrying once"
        );
        let session = self.sessions.refresh(&session, || self.perform_login())?;
        let response = self.send_with_session(&mut request, &session)?;
        finish(response.code, classify(kind, &response))
    }

    fn send_with_session(
        &self,
        request: &mut HttpRequest,
        session: &Session,
    ) -> Result<HttpResponse, MonitorError> {
        request.set_session_id(session.header_value());
        let result = self.transport.send(request);
        log_exchange(request, &result);
        Ok(result?)
    }

    fn perform_login(&self) -> Result<String, MonitorError> {
        let request = login_request(&self.config);
        tracing::debug!(url = %request.url, "Logging in");
        let result = self.transport.send(&request);
        log_exchange(&request, &result);
        handle_login_response(&result?)
    }
}
