//! Runs a twenty48 server.
//!
//! Environment:
//!
//! - `TWENTY48_BIND`: listen address (default `127.0.0.1:8080`)
//! - `TWENTY48_ADVISOR`: advisor `host:port`; unset runs without advice
//! - `TWENTY48_ADVISOR_DEPTH`: expectimax depth (default 2, clamped to 1..=8)
//! - `TWENTY48_SEED`: fixed spawn seed, for reproducible games
//! - `RUST_LOG`: log filter (default `info`)

use std::env;

use tracing_subscriber::EnvFilter;
use twenty48::prelude::*;

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Twenty48Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind = env::var("TWENTY48_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let session_config = SessionConfig {
        seed: parse_env("TWENTY48_SEED"),
        ..SessionConfig::default()
    };

    let mut builder = Twenty48Server::builder()
        .bind(&bind)
        .session_config(session_config);

    if let Ok(address) = env::var("TWENTY48_ADVISOR") {
        let mut advisor = AdvisorConfig::new(address);
        if let Some(depth) = parse_env("TWENTY48_ADVISOR_DEPTH") {
            advisor.depth = depth;
        }
        builder = builder.advisor(advisor);
    } else {
        tracing::info!("TWENTY48_ADVISOR not set, running without advice");
    }

    let server = builder.build().await?;
    if let Ok(addr) = server.local_addr() {
        tracing::info!("play at ws://{addr}");
    }
    server.run().await
}
