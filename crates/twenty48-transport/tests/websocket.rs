//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;
    use twenty48_transport::{WsConnection, WsListener};

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds to port 0, connects one client, and returns both ends.
    async fn connected_pair() -> (WsConnection, ClientWs) {
        let listener = WsListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("bound address");

        let server_handle =
            tokio::spawn(async move { listener.accept().await.expect("should accept") });

        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let server = server_handle.await.expect("task should complete");
        (server, client)
    }

    #[tokio::test]
    async fn test_websocket_json_goes_out_as_text_frame() {
        let (server, mut client) = connected_pair().await;
        assert!(server.id().0 > 0);
        assert!(server.peer_addr().ip().is_loopback());

        server
            .send(br#"{"type":"board"}"#)
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg, Message::Text(r#"{"type":"board"}"#.into()));
    }

    #[tokio::test]
    async fn test_websocket_non_utf8_goes_out_as_binary_frame() {
        let (server, mut client) = connected_pair().await;

        server.send(&[0xff, 0x00, 0x10]).await.unwrap();

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_binary());
        assert_eq!(msg.into_data().as_ref(), &[0xff, 0x00, 0x10]);
    }

    #[tokio::test]
    async fn test_websocket_recv_accepts_text_and_binary() {
        let (server, mut client) = connected_pair().await;

        client
            .send(Message::Text(r#"{"type":"reset"}"#.into()))
            .await
            .unwrap();
        client
            .send(Message::Binary(b"left".to_vec().into()))
            .await
            .unwrap();

        let first = server.recv().await.unwrap().expect("text frame");
        assert_eq!(first, br#"{"type":"reset"}"#);
        let second = server.recv().await.unwrap().expect("binary frame");
        assert_eq!(second, b"left");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = server.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        let (server, mut client) = connected_pair().await;

        // A recv that loses the race must not keep the stream locked.
        tokio::select! {
            _ = server.recv() => panic!("client has sent nothing"),
            _ = tokio::time::sleep(std::time::Duration::from_millis(20)) => {}
        }
        server.send(b"still writable").await.unwrap();

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"still writable");
    }

    #[tokio::test]
    async fn test_websocket_close_after_peer_closed_is_ok() {
        let (server, mut client) = connected_pair().await;
        client.send(Message::Close(None)).await.unwrap();

        assert!(server.recv().await.unwrap().is_none());
        server.close().await.expect("closing a closed socket is not an error");
    }

    #[tokio::test]
    async fn test_listener_survives_failed_handshake() {
        let listener = WsListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // A plain TCP client that never speaks WebSocket.
        let raw = tokio::net::TcpStream::connect(addr).await.unwrap();
        drop(raw);
        assert!(listener.accept().await.is_err());

        let accept = tokio::spawn(async move { listener.accept().await });
        let (_client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        assert!(accept.await.unwrap().is_ok());
    }
}
