//! `Twenty48Server` builder and server loop.
//!
//! This is the entry point for running a twenty48 game server. It ties
//! together all the layers: transport → protocol → session, with the
//! advisor on the side.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use twenty48_advisor::{Advisor, AdvisorConfig};
use twenty48_protocol::{AdvisorMode, Codec, JsonCodec};
use twenty48_session::{SessionConfig, SessionManager};
use twenty48_transport::WsListener;

use crate::Twenty48Error;
use crate::handler::handle_connection;

/// How long a connection may stay silent before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) advisor: Option<Advisor>,
    pub(crate) default_mode: AdvisorMode,
    pub(crate) idle_timeout: Duration,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a twenty48 server.
///
/// # Example
///
/// ```rust,no_run
/// use twenty48::prelude::*;
///
/// # async fn run() -> Result<(), Twenty48Error> {
/// let server = Twenty48Server::builder()
///     .bind("0.0.0.0:8080")
///     .advisor(AdvisorConfig::new("127.0.0.1:5000"))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct Twenty48ServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    advisor: Option<AdvisorConfig>,
    idle_timeout: Duration,
}

impl Twenty48ServerBuilder {
    /// Creates a new builder with default settings and no advisor.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_config: SessionConfig::default(),
            advisor: None,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Enables the move advisor.
    ///
    /// Without one, `Advise` requests are answered with
    /// `AdvisorUnavailable`.
    pub fn advisor(mut self, config: AdvisorConfig) -> Self {
        self.advisor = Some(config);
        self
    }

    /// Sets how long a connection may stay silent before it is dropped.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` over WebSocket.
    pub async fn build(self) -> Result<Twenty48Server<JsonCodec>, Twenty48Error> {
        let listener = WsListener::bind(&self.bind_addr).await?;

        let advisor = self.advisor.map(Advisor::new);
        let default_mode = advisor
            .as_ref()
            .map(|a| a.config().default_mode)
            .unwrap_or_default();
        if let Some(advisor) = &advisor {
            tracing::info!(
                address = %advisor.config().address,
                depth = advisor.config().depth,
                mode = %default_mode,
                "advisor enabled"
            );
        }

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new(self.session_config)),
            advisor,
            default_mode,
            idle_timeout: self.idle_timeout,
            codec: JsonCodec,
        });

        Ok(Twenty48Server { listener, state })
    }
}

impl Default for Twenty48ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running twenty48 game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Twenty48Server<C: Codec> {
    listener: WsListener,
    state: Arc<ServerState<C>>,
}

impl Twenty48Server<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> Twenty48ServerBuilder {
        Twenty48ServerBuilder::new()
    }
}

impl<C: Codec> Twenty48Server<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Every accepted connection gets its own game session and its own
    /// handler task. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), Twenty48Error> {
        tracing::info!(addr = ?self.local_addr().ok(), "twenty48 server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
