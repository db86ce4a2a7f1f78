//! Wire protocol for twenty48.
//!
//! This crate defines everything that crosses a process boundary:
//!
//! - **Game messages** ([`Envelope`], [`ClientMessage`], [`ServerMessage`])
//!   exchanged between the game server and its clients.
//! - **Advisor contract** ([`AdvisorRequest`], [`AdvisorResponse`],
//!   [`Advice`]) for the external move-scoring service.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the session
//! layer (game state). It knows nothing about connections or turn order;
//! it only knows the shapes of messages.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Session (GameSession)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Advice, AdvisorMode, AdvisorRequest, AdvisorResponse, BoardSnapshot,
    ClientMessage, Envelope, ScoredMove, ServerMessage, SessionId, TurnReport,
};
