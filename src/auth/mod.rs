//! Session authentication for the Monitor API.
//!
//! Monitor issues an opaque session token at login and expects it in the
//! `x-monitor-sessionid` header of every request. Tokens expire server-side
//! without notice, so the clients treat a 401 as the signal to log in again.
//!
//! # Overview
//!
//! - [`Session`]: The current token plus the generation of the login that produced it
//! - [`SessionManager`]: Single-flight login coordination for the async client
//! - [`BlockingSessionManager`]: The same coordination for the blocking client
//! - [`handle_login_response`]: Turns a login response into a token or an error
//!
//! # Single-flight login
//!
//! At most one login runs at a time per client. Requests that are rejected
//! while a login is in flight wait for it and reuse its token; if it fails,
//! they all observe the same error.
//!
//! ```rust
//! use monitor_api::auth::SessionManager;
//! use monitor_api::Session;
//!
//! # tokio_test::block_on(async {
//! let manager = SessionManager::new(Session::unset());
//! let session = manager
//!     .login(|| async { Ok("ABC123".to_string()) })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(session.token(), Some("ABC123"));
//! assert_eq!(session.generation(), 1);
//! # });
//! ```

mod blocking_session_manager;
mod login;
pub mod session;
mod session_manager;

pub use blocking_session_manager::BlockingSessionManager;
pub use login::handle_login_response;
pub use session::Session;
pub use session_manager::SessionManager;
