//! Blocking counterparts of the async client and transport.
//!
//! The blocking client shares request building, classification and error
//! types with the async one; only the transport and the session
//! coordination primitives differ.

mod client;
mod http_client;

pub use client::BlockingClient;
pub use http_client::{BlockingHttpClient, BlockingTransport};
