//! The advisor client.

use twenty48_engine::Direction;
use twenty48_protocol::{Advice, AdvisorMode, AdvisorResponse, BoardSnapshot, Codec, JsonCodec};
use twenty48_transport::HttpClient;

use crate::{AdvisorConfig, AdvisorError, classify, dispatch};

/// Asks the external advisor service about boards.
///
/// Cheap to clone; each call opens its own connection, so one `Advisor` can
/// serve every session concurrently.
#[derive(Debug, Clone)]
pub struct Advisor<C: Codec = JsonCodec> {
    config: AdvisorConfig,
    http: HttpClient,
    codec: C,
}

impl Advisor<JsonCodec> {
    /// Creates a client from `config`, clamping its depth into range.
    pub fn new(config: AdvisorConfig) -> Self {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> Advisor<C> {
    /// Creates a client that encodes requests with `codec`.
    pub fn with_codec(config: AdvisorConfig, codec: C) -> Self {
        let config = config.validated();
        let http = HttpClient::new(config.address.clone(), config.timeout);
        Self {
            config,
            http,
            codec,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Asks for advice on `snapshot` and reports exactly what went wrong.
    pub async fn try_advise(
        &self,
        mode: AdvisorMode,
        snapshot: &BoardSnapshot,
        last_move: Option<Direction>,
    ) -> Result<Advice, AdvisorError> {
        let (path, request) = dispatch(&self.config, mode, snapshot, last_move)?;
        let body = self.codec.encode(&request)?;

        tracing::debug!(
            session_id = %snapshot.session_id,
            turn = snapshot.turn,
            %mode,
            path,
            "requesting advice"
        );
        let reply = self.http.post_json(path, &body).await?;
        let response: AdvisorResponse = self.codec.decode(&reply)?;

        classify(mode, snapshot.turn, response)
    }

    /// Asks for advice on `snapshot`, treating every failure as "no
    /// suggestion".
    ///
    /// Failures are logged at `warn`; the caller only learns that there is
    /// nothing to show.
    pub async fn advise(
        &self,
        mode: AdvisorMode,
        snapshot: &BoardSnapshot,
        last_move: Option<Direction>,
    ) -> Option<Advice> {
        match self.try_advise(mode, snapshot, last_move).await {
            Ok(advice) => Some(advice),
            Err(e) => {
                tracing::warn!(
                    session_id = %snapshot.session_id,
                    turn = snapshot.turn,
                    %mode,
                    error = %e,
                    "advisor unavailable"
                );
                None
            }
        }
    }
}
