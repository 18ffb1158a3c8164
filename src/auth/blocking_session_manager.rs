//! Single-flight session management for the blocking client.
//!
//! Same contract as [`SessionManager`](crate::auth::SessionManager), built on
//! `std::sync` primitives: the in-flight slot holds a shared ticket that
//! waiting threads block on until the leader publishes its result.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::auth::Session;
use crate::clients::MonitorError;

type LoginResult = Result<Session, MonitorError>;

/// The result slot for one login attempt.
#[derive(Debug, Default)]
struct LoginTicket {
    result: Mutex<Option<LoginResult>>,
    done: Condvar,
}

impl LoginTicket {
    fn publish(&self, result: LoginResult) {
        *lock(&self.result) = Some(result);
        self.done.notify_all();
    }

    fn wait(&self) -> LoginResult {
        let mut guard = lock(&self.result);
        loop {
            if let Some(result) = guard.as_ref() {
                return result.clone();
            }
            guard = self.done.wait(guard).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[derive(Debug)]
struct SessionSlot {
    session: Session,
    in_flight: Option<Arc<LoginTicket>>,
}

/// Coordinates session reads and logins across threads.
#[derive(Debug)]
pub struct BlockingSessionManager {
    slot: Mutex<SessionSlot>,
}

// Verify BlockingSessionManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BlockingSessionManager>();
};

impl BlockingSessionManager {
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
        lock(&self.slot).session.clone()
    }

    /// Returns the session to attach to a new request, blocking on an
    /// in-flight login.
    ///
    /// # Errors
    ///
    /// Returns the in-flight login's error if it fails.
    pub fn current(&self) -> Result<Session, MonitorError> {
        let ticket = {
            let slot = lock(&self.slot);
            match &slot.in_flight {
                Some(ticket) => Arc::clone(ticket),
                None => return Ok(slot.session.clone()),
            }
        };
        ticket.wait()
    }

    /// Logs in, or joins the login already in flight.
    ///
    /// # Errors
    ///
    /// Returns the login's error.
    pub fn login<F>(&self, login: F) -> Result<Session, MonitorError>
    where
        F: FnOnce() -> Result<String, MonitorError>,
    {
        self.coordinate(None, login)
    }

    /// Replaces a session the server rejected, unless it was already
    /// superseded by a newer login.
    ///
    /// # Errors
    ///
    /// Returns the login's error.
    pub fn refresh<F>(&self, rejected: &Session, login: F) -> Result<Session, MonitorError>
    where
        F: FnOnce() -> Result<String, MonitorError>,
    {
        self.coordinate(Some(rejected.generation()), login)
    }

    fn coordinate<F>(&self, rejected_generation: Option<u64>, login: F) -> LoginResult
    where
        F: FnOnce() -> Result<String, MonitorError>,
    {
        let ticket = {
            let mut slot = lock(&self.slot);
            if let Some(ticket) = &slot.in_flight {
                tracing::debug!("Joining login already in flight");
                let ticket = Arc::clone(ticket);
                drop(slot);
                return ticket.wait();
            }
            if rejected_generation.is_some_and(|g| g != slot.session.generation()) {
                tracing::debug!(
                    generation = slot.session.generation(),
                    "Session already refreshed by another request"
                );
                return Ok(slot.session.clone());
            }
            let ticket = Arc::new(LoginTicket::default());
            slot.in_flight = Some(Arc::clone(&ticket));
            ticket
        };

        let guard = InFlightGuard {
            manager: self,
            ticket,
            armed: true,
        };
        let token = login();
        guard.complete(token)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publishes a result to waiters even if the login closure panics.
struct InFlightGuard<'a> {
    manager: &'a BlockingSessionManager,
    ticket: Arc<LoginTicket>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self, token: Result<String, MonitorError>) -> LoginResult {
        let result = {
            let mut slot = lock(&self.manager.slot);
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

        self.ticket.publish(result.clone());
        self.armed = false;
        result
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        lock(&self.manager.slot).in_flight = None;
        self.ticket.publish(Err(MonitorError::RequestError {
            message: "Login was abandoned".to_string(),
            is_timeout: false,
        }));
    }
}
