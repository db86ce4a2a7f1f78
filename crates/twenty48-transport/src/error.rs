use std::time::Duration;

/// Failures on either wire: game WebSockets or advisor HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening an outgoing connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer answered an HTTP request with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The peer's HTTP response could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request did not complete in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
