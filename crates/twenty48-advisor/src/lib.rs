//! Client for the twenty48 move advisor.
//!
//! The advisor is an external HTTP service that scores the four moves on a
//! board. This crate knows how to ask it (which endpoint, which body, per
//! [`AdvisorMode`](twenty48_protocol::AdvisorMode)) and how to read its
//! answers. An advisor that is down, slow, or talking nonsense never hurts a
//! game: [`Advisor::advise`] turns every failure into `None`.
//!
//! ```text
//! BoardSnapshot ──dispatch──→ (path, AdvisorRequest) ──HTTP POST──→ service
//!                                                                      │
//! Option<Advice> ←──classify── AdvisorResponse ←───────JSON────────────┘
//! ```
//!
//! Advice is tagged with the turn its board came from. Whoever shows it to
//! the player should drop it once the session has moved on
//! ([`Advice::is_current`](twenty48_protocol::Advice::is_current)).

mod client;
mod config;
mod dispatch;
mod error;

pub use client::Advisor;
pub use config::{AdvisorConfig, AdvisorPaths, DEFAULT_DEPTH, DEFAULT_TIMEOUT, MAX_DEPTH};
pub use dispatch::{classify, coach_fallback, dispatch};
pub use error::AdvisorError;
