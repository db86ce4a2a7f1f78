//! # twenty48
//!
//! A 2048 game server with an optional move advisor.
//!
//! Each WebSocket connection is one player with one game. The board rules
//! live in `twenty48-engine`, turn processing in `twenty48-session`, and the
//! expectimax advisor client in `twenty48-advisor`; this crate wires them to
//! the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use twenty48::prelude::*;
//!
//! # async fn run() -> Result<(), Twenty48Error> {
//! let server = Twenty48Server::builder()
//!     .bind("0.0.0.0:8080")
//!     .session_config(SessionConfig { seed: Some(42), ..SessionConfig::default() })
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! ## Wire protocol
//!
//! Every frame is a JSON [`Envelope`](twenty48_protocol::Envelope). Clients
//! send [`ClientMessage`](twenty48_protocol::ClientMessage)s (`GetBoard`,
//! `Move`, `Reset`, `SetMode`, `Advise`, `Disconnect`); the server answers
//! with [`ServerMessage`](twenty48_protocol::ServerMessage)s. A new
//! connection receives its starting `Board` right away.

mod error;
mod handler;
mod server;

pub use error::Twenty48Error;
pub use server::{DEFAULT_IDLE_TIMEOUT, Twenty48Server, Twenty48ServerBuilder};

/// Everything needed to run a server or talk to one.
pub mod prelude {
    pub use crate::{Twenty48Error, Twenty48Server, Twenty48ServerBuilder};
    pub use twenty48_advisor::{Advisor, AdvisorConfig};
    pub use twenty48_engine::{Direction, Grid, Position, apply_move, is_terminal};
    pub use twenty48_protocol::{
        Advice, AdvisorMode, BoardSnapshot, ClientMessage, Envelope, ServerMessage, SessionId,
        TurnReport,
    };
    pub use twenty48_session::{SessionConfig, SessionError};
}
