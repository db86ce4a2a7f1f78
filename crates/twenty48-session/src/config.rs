//! Session configuration and state machine.

use rand::rngs::StdRng;
use twenty48_engine::RngTiles;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Default capacity of a session actor's command queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Configuration shared by every session a [`SessionManager`](crate::SessionManager)
/// creates.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seed for tile spawning. `Some` makes every session replay the same
    /// spawn sequence for the same moves; `None` seeds from the OS.
    pub seed: Option<u64>,

    /// How many commands may wait in a session's queue before
    /// [`SessionHandle::try_apply_direction`](crate::SessionHandle::try_apply_direction)
    /// starts answering `Busy`.
    pub queue_capacity: usize,
}

impl SessionConfig {
    /// Returns a copy with values that can't work replaced by defaults.
    ///
    /// A zero queue capacity would make `tokio::sync::mpsc::channel` panic.
    pub fn validated(mut self) -> Self {
        if self.queue_capacity == 0 {
            tracing::warn!(
                default = DEFAULT_QUEUE_CAPACITY,
                "session queue capacity 0 is invalid, using default"
            );
            self.queue_capacity = DEFAULT_QUEUE_CAPACITY;
        }
        self
    }

    /// Builds the tile source for a new session.
    pub fn tile_source(&self) -> RngTiles<StdRng> {
        match self.seed {
            Some(seed) => RngTiles::seeded(seed),
            None => RngTiles::from_os_rng(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of a game session.
///
/// ```text
/// Initializing ──start──→ Playing ──terminal move──→ Over
///      ↑                     │                        │
///      └───────reset─────────┴──────────reset─────────┘
/// ```
///
/// - **Initializing**: The session exists but no game has been dealt.
///   Moves are rejected with `NotStarted`.
/// - **Playing**: Moves are accepted.
/// - **Over**: No legal move is left. Moves are rejected with `GameOver`
///   until the session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Initializing,
    Playing,
    Over,
}

impl SessionState {
    /// Returns `true` if the session accepts moves.
    pub fn accepts_moves(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` once the game has ended.
    pub fn is_over(self) -> bool {
        matches!(self, Self::Over)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Playing => write!(f, "Playing"),
            Self::Over => write!(f, "Over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use twenty48_engine::{Grid, spawn_tile};

    use super::*;

    #[test]
    fn test_session_state_accepts_moves_only_while_playing() {
        assert!(!SessionState::Initializing.accepts_moves());
        assert!(SessionState::Playing.accepts_moves());
        assert!(!SessionState::Over.accepts_moves());
    }

    #[test]
    fn test_session_state_is_over() {
        assert!(SessionState::Over.is_over());
        assert!(!SessionState::Playing.is_over());
    }

    #[test]
    fn test_session_state_default_is_initializing() {
        assert_eq!(SessionState::default(), SessionState::Initializing);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Initializing.to_string(), "Initializing");
        assert_eq!(SessionState::Over.to_string(), "Over");
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_session_config_validated_replaces_zero_capacity() {
        let config = SessionConfig {
            seed: Some(1),
            queue_capacity: 0,
        }
        .validated();
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_session_config_seeded_sources_agree() {
        let config = SessionConfig {
            seed: Some(2048),
            ..SessionConfig::default()
        };
        let (mut a, mut b) = (Grid::EMPTY, Grid::EMPTY);
        let (mut sa, mut sb) = (config.tile_source(), config.tile_source());
        for _ in 0..6 {
            assert_eq!(spawn_tile(&mut a, &mut sa), spawn_tile(&mut b, &mut sb));
        }
        assert_eq!(a, b);
    }
}
