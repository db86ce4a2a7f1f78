//! Game sessions for twenty48.
//!
//! This crate turns the pure rules in `twenty48-engine` into a playable
//! game:
//!
//! 1. **The turn loop**: [`GameSession`] owns a board and score and runs
//!    move → spawn → terminal check, with a small state machine
//!    ([`SessionState`]) guarding when moves are allowed.
//! 2. **Serialized turns**: each live game runs inside an actor task;
//!    callers hold a [`SessionHandle`] and every command waits its turn in
//!    the actor's queue.
//! 3. **Bookkeeping**: [`SessionManager`] hands out session IDs and keeps
//!    track of which games are still running.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)           ← one session per connected player
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Engine + Protocol (below) ← rules, snapshots, turn reports
//! ```

mod actor;
mod config;
mod error;
mod game;
mod manager;

pub use actor::SessionHandle;
pub use config::{DEFAULT_QUEUE_CAPACITY, SessionConfig, SessionState};
pub use error::SessionError;
pub use game::GameSession;
pub use manager::SessionManager;
