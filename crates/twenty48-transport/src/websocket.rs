//! Game connections over WebSocket (`tokio-tungstenite`).

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::{ConnectionId, TransportError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn io_error(kind: std::io::ErrorKind, err: WsError) -> std::io::Error {
    std::io::Error::new(kind, err)
}

/// Listens for players and upgrades each TCP connection to a WebSocket.
#[derive(Debug)]
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds to `addr`. Port 0 picks a free port; read it back with
    /// [`local_addr`](Self::local_addr).
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "listening for WebSocket players");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next player and completes the WebSocket handshake.
    ///
    /// A failed handshake is an error for this one peer only; the listener
    /// stays usable.
    pub async fn accept(&self) -> Result<WsConnection, TransportError> {
        let (stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| TransportError::AcceptFailed(io_error(std::io::ErrorKind::InvalidData, e)))?;

        let id = ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %peer, "WebSocket handshake complete");

        Ok(WsConnection {
            id,
            peer,
            ws: Mutex::new(ws),
        })
    }
}

/// One player's WebSocket.
///
/// `recv` holds the stream lock only while it waits for the next frame, so
/// dropping a pending `recv` (e.g. losing a `tokio::select!` race) releases
/// the lock and lets a `send` through.
pub struct WsConnection {
    id: ConnectionId,
    peer: SocketAddr,
    ws: Mutex<WebSocketStream<TcpStream>>,
}

impl WsConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Sends one frame. UTF-8 payloads (every JSON frame) go out as text so
    /// browser clients receive strings; anything else goes out as binary.
    pub async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let frame = match std::str::from_utf8(data) {
            Ok(text) => Message::Text(text.to_owned().into()),
            Err(_) => Message::Binary(data.to_vec().into()),
        };
        self.ws
            .lock()
            .await
            .send(frame)
            .await
            .map_err(|e| TransportError::SendFailed(io_error(std::io::ErrorKind::BrokenPipe, e)))
    }

    /// Receives the next text or binary frame as bytes.
    ///
    /// Control frames are skipped. Returns `Ok(None)` once the peer has
    /// closed the connection.
    pub async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            let next = self.ws.lock().await.next().await;
            let frame = match next {
                None | Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(io_error(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            };
            match frame {
                Message::Text(text) => return Ok(Some(text.as_bytes().to_vec())),
                Message::Binary(data) => return Ok(Some(data.to_vec())),
                _ => continue,
            }
        }
    }

    /// Sends a close frame. Closing an already-closed socket is not an error.
    pub async fn close(&self) -> Result<(), TransportError> {
        match self.ws.lock().await.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::SendFailed(io_error(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))),
        }
    }
}
