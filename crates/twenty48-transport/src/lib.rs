//! Transport layer for twenty48.
//!
//! Two unrelated wires live here:
//!
//! - **Game connections**: [`WsListener`] accepts one WebSocket per player
//!   and hands back a [`WsConnection`] that moves opaque byte frames.
//! - **Advisor calls**: [`HttpClient`], a small HTTP/1.1 client that POSTs
//!   a JSON body and hands back the response body.
//!
//! Neither side knows what the bytes mean; that is the protocol layer's job.
//!
//! # Feature Flags
//!
//! - `websocket` (default): game connections via `tokio-tungstenite`
//! - `http` (default): HTTP client for the advisor service

mod error;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpClient, MAX_RESPONSE_BYTES};
#[cfg(feature = "websocket")]
pub use websocket::{WsConnection, WsListener};

use std::fmt;

/// Process-unique number of an accepted game connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
