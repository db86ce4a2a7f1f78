//! Advisor configuration.

use std::time::Duration;

use twenty48_protocol::AdvisorMode;

/// Search depth used when none is configured.
pub const DEFAULT_DEPTH: u32 = 2;

/// Deepest search the client will ask for. Expectimax cost grows
/// exponentially with depth, and anything past this ties up the service for
/// longer than a player waits.
pub const MAX_DEPTH: u32 = 8;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Endpoint path for each advisor mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorPaths {
    pub suggest: String,
    pub insight: String,
    pub coach: String,
}

impl AdvisorPaths {
    /// The path requests in `mode` are POSTed to.
    pub fn for_mode(&self, mode: AdvisorMode) -> &str {
        match mode {
            AdvisorMode::Suggest => &self.suggest,
            AdvisorMode::Insight => &self.insight,
            AdvisorMode::Coach => &self.coach,
        }
    }
}

impl Default for AdvisorPaths {
    fn default() -> Self {
        Self {
            suggest: "/ai_suggest".to_string(),
            insight: "/ai_insight".to_string(),
            coach: "/ai_coach".to_string(),
        }
    }
}

/// Where the advisor service lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// `host:port` of the service, no scheme.
    pub address: String,

    /// Expectimax search depth sent with every request.
    pub depth: u32,

    /// Upper bound on one request, connect to last byte.
    pub timeout: Duration,

    pub paths: AdvisorPaths,

    /// Mode a new connection starts in.
    pub default_mode: AdvisorMode,
}

impl AdvisorConfig {
    /// Creates a config for the service at `address` with default settings.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with `depth` brought into `1..=MAX_DEPTH`.
    ///
    /// Out-of-range depths are clamped rather than rejected, with a
    /// warning, so a typo in an environment variable still yields a
    /// working advisor.
    pub fn validated(mut self) -> Self {
        let clamped = self.depth.clamp(1, MAX_DEPTH);
        if clamped != self.depth {
            tracing::warn!(
                requested = self.depth,
                using = clamped,
                "advisor depth out of range, clamping"
            );
            self.depth = clamped;
        }
        self
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:5000".to_string(),
            depth: DEFAULT_DEPTH,
            timeout: DEFAULT_TIMEOUT,
            paths: AdvisorPaths::default(),
            default_mode: AdvisorMode::Suggest,
        }
    }
}
