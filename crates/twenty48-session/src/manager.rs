//! Session manager: creates, tracks, and tears down game sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use twenty48_engine::TileSource;
use twenty48_protocol::SessionId;

use crate::actor::spawn_session;
use crate::{GameSession, SessionConfig, SessionError, SessionHandle};

/// Counter for generating unique session IDs.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Tracks every live session by ID.
///
/// The manager only holds handles; each game lives in its own actor task.
pub struct SessionManager {
    config: SessionConfig,
    sessions: HashMap<SessionId, SessionHandle>,
}

impl SessionManager {
    /// Creates a new, empty session manager.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: config.validated(),
            sessions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts a new game with a tile source built from the config.
    pub fn create(&mut self) -> SessionHandle {
        let tiles = self.config.tile_source();
        self.create_with(tiles)
    }

    /// Starts a new game that draws its spawns from `tiles`.
    pub fn create_with<S>(&mut self, tiles: S) -> SessionHandle
    where
        S: TileSource + Send + 'static,
    {
        let session_id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_session(
            GameSession::new(session_id, tiles),
            self.config.queue_capacity,
        );
        self.sessions.insert(session_id, handle.clone());
        tracing::info!(%session_id, live = self.sessions.len(), "session created");
        handle
    }

    /// Returns a handle to a live session.
    pub fn get(&self, session_id: SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions
            .get(&session_id)
            .cloned()
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Shuts a session down and forgets it.
    pub async fn remove(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        // An actor that already stopped has nothing left to shut down.
        let _ = handle.shutdown().await;

        tracing::info!(%session_id, live = self.sessions.len(), "session removed");
        Ok(())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Lists all live session IDs.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
