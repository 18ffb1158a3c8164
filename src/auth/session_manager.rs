//! Single-flight session management for the async client.
//!
//! [`SessionManager`] owns the client's [`Session`] and guarantees that at
//! most one login is in flight at any time. Callers that need a fresh token
//! while a login is running subscribe to it and observe its result instead
//! of starting their own.
//!
//! Each successful login bumps the session generation. A caller refreshing
//! after a rejection passes the generation it was rejected with; if a newer
//! session already exists it is returned without logging in again.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::auth::Session;
use crate::clients::MonitorError;

type LoginResult = Result<Session, MonitorError>;

#[derive(Debug)]
struct SessionSlot {
    session: Session,
    in_flight: Option<broadcast::Sender<LoginResult>>,
}

enum Role {
    Leader(broadcast::Sender<LoginResult>),
    Follower(broadcast::Receiver<LoginResult>),
}

/// Coordinates session reads and logins across concurrent tasks.
///
/// # Thread Safety
///
/// `SessionManager` is `Send + Sync`. The internal lock is never held across
/// an `.await`.
#[derive(Debug)]
pub struct SessionManager {
    slot: Mutex<SessionSlot>,
}

// Verify SessionManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SessionManager>();
};

impl SessionManager {
    /// Creates a manager holding the given initial session.
    #[must_use]
    pub const fn new(initial: Session) -> Self {
        Self {
            slot: Mutex::new(SessionSlot {
                session: initial,
                in_flight: None,
            }),
        }
    }

    /// Returns the stored session without waiting for an in-flight login.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    /// Returns the session to attach to a new request.
    ///
    /// If a login is in flight, waits for it and returns its result.
    ///
    /// # Errors
    ///
    /// Returns the in-flight login's error if it fails.
    pub async fn current(&self) -> Result<Session, MonitorError> {
        let receiver = {
            let slot = self.lock();
            match &slot.in_flight {
                Some(sender) => sender.subscribe(),
                None => return Ok(slot.session.clone()),
            }
        };
        wait_for(receiver).await
    }

    /// Logs in, or joins the login already in flight.
    ///
    /// `login` is only invoked if this caller becomes the leader. It returns
    /// the new token.
    ///
    /// # Errors
    ///
    /// Returns the login's error. Every caller sharing the login observes
    /// the same error.
    pub async fn login<F, Fut>(&self, login: F) -> Result<Session, MonitorError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, MonitorError>>,
    {
        self.coordinate(None, login).await
    }

    /// Replaces a session the server rejected.
    ///
    /// If `rejected` has already been superseded by a newer login, the
    /// newer session is returned and `login` is not invoked.
    ///
    /// # Errors
    ///
    /// Returns the login's error.
    pub async fn refresh<F, Fut>(&self, rejected: &Session, login: F) -> Result<Session, MonitorError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, MonitorError>>,
    {
        self.coordinate(Some(rejected.generation()), login).await
    }

    async fn coordinate<F, Fut>(&self, rejected_generation: Option<u64>, login: F) -> LoginResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, MonitorError>>,
    {
        let role = {
            let mut slot = self.lock();
            if let Some(sender) = &slot.in_flight {
                tracing::debug!("Joining login already in flight");
                Role::Follower(sender.subscribe())
            } else if rejected_generation.is_some_and(|g| g != slot.session.generation()) {
                tracing::debug!(
                    generation = slot.session.generation(),
                    "Session already refreshed by another request"
                );
                return Ok(slot.session.clone());
            } else {
                let (sender, _) = broadcast::channel(1);
                slot.in_flight = Some(sender.clone());
                Role::Leader(sender)
            }
        };

        match role {
            Role::Follower(receiver) => wait_for(receiver).await,
            Role::Leader(sender) => {
                let guard = InFlightGuard {
                    manager: self,
                    sender,
                    armed: true,
                };
                let token = login().await;
                guard.complete(token)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn wait_for(mut receiver: broadcast::Receiver<LoginResult>) -> LoginResult {
    receiver.recv().await.unwrap_or_else(|_| {
        Err(MonitorError::RequestError {
            message: "Login ended without producing a session".to_string(),
            is_timeout: false,
        })
    })
}

/// Clears the in-flight slot when the leader finishes or is dropped.
///
/// If the leader's future is cancelled mid-login, the waiters are released
/// with an error and the next caller may start a new login.
struct InFlightGuard<'a> {
    manager: &'a SessionManager,
    sender: broadcast::Sender<LoginResult>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self, token: Result<String, MonitorError>) -> LoginResult {
        let result = {
            let mut slot = self.manager.lock();
            let result = token.map(|token| {
                let session = Session::logged_in(token, slot.session.generation() + 1);
                slot.session = session.clone();
                session
            });
            slot.in_flight = None;
            result
        };

        match &result {
            Ok(session) => tracing::debug!(generation = session.generation(), "Session refreshed"),
            Err(error) => tracing::warn!(kind = ?error.kind(), "Login failed: {error}"),
        }

        // No receivers is not an error: nobody joined this login.
        let _ = self.sender.send(result.clone());
        self.armed = false;
        result
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.manager.lock().in_flight = None;
        let _ = self.sender.send(Err(MonitorError::RequestError {
            message: "Login was cancelled".to_string(),
            is_timeout: false,
        }));
    }
}
