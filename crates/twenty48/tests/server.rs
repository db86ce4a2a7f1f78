//! Integration tests for the twenty48 server, handler, and full connection flow.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use twenty48::prelude::*;
use twenty48_engine::legal_moves;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts `builder` on a random port and returns the address.
async fn start_server(builder: Twenty48ServerBuilder) -> String {
    let server = builder
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    addr
}

fn seeded(seed: u64) -> Twenty48ServerBuilder {
    Twenty48Server::builder().session_config(SessionConfig {
        seed: Some(seed),
        ..SessionConfig::default()
    })
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, message: ClientMessage) {
    let bytes = serde_json::to_vec(&Envelope::new(0, 0, message)).expect("encode");
    ws.send(Message::Text(String::from_utf8(bytes).unwrap().into()))
        .await
        .expect("send");
}

/// Receives the next server message, failing the test after two seconds.
async fn recv(ws: &mut ClientWs) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("server should answer")
        .expect("stream open")
        .expect("frame");
    let envelope: Envelope<ServerMessage> =
        serde_json::from_slice(&msg.into_data()).expect("decode");
    envelope.message
}

async fn recv_board(ws: &mut ClientWs) -> BoardSnapshot {
    match recv(ws).await {
        ServerMessage::Board { snapshot } => snapshot,
        other => panic!("expected Board, got {other:?}"),
    }
}

/// A fake advisor that always recommends `left`.
async fn fake_advisor() -> String {
    slow_fake_advisor(Duration::ZERO).await
}

/// Like [`fake_advisor`], but waits `delay` before answering.
async fn slow_fake_advisor(delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                // Read until the JSON body's closing brace arrives.
                while !buf.ends_with(b"}") {
                    let n = stream.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                tokio::time::sleep(delay).await;
                let body = r#"{"best_move":"left","scores":{"left":10.0,"up":2.5},"explanation":"corner"}"#;
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    addr
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_receives_starting_board() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;

    let snapshot = recv_board(&mut ws).await;
    assert_eq!(snapshot.turn, 1);
    assert_eq!(snapshot.score, 0);
    assert!(!snapshot.over);
    assert_eq!(snapshot.grid.count_empty(), 14);
}

#[tokio::test]
async fn test_get_board_returns_same_board() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    let first = recv_board(&mut ws).await;

    send(&mut ws, ClientMessage::GetBoard).await;
    assert_eq!(recv_board(&mut ws).await, first);
}

#[tokio::test]
async fn test_seeded_connections_deal_identical_boards() {
    let addr = start_server(seeded(2048)).await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    let board_a = recv_board(&mut a).await;
    let board_b = recv_board(&mut b).await;
    assert_eq!(board_a.grid, board_b.grid);
    assert_ne!(board_a.session_id, board_b.session_id);
}

#[tokio::test]
async fn test_move_applies_engine_result_and_spawns() {
    let addr = start_server(seeded(7)).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    let direction = legal_moves(&start.grid)[0];
    let expected = apply_move(&start.grid, direction);
    send(
        &mut ws,
        ClientMessage::Move {
            direction: direction.to_string(),
        },
    )
    .await;

    let report = match recv(&mut ws).await {
        ServerMessage::Turn { report } => report,
        other => panic!("expected Turn, got {other:?}"),
    };
    assert!(report.changed);
    assert_eq!(report.direction, direction);
    assert_eq!(report.turn, 2);
    assert_eq!(report.score_delta, expected.score_delta);
    assert_eq!(report.score, expected.score_delta);
    assert_eq!(report.merged_cells, expected.merged_cells);
    assert_eq!(report.new_cells.len(), 1);

    // The only difference from the engine's grid is the spawned tile.
    let spawned = report.new_cells[0];
    assert_eq!(expected.grid.get(spawned), 0);
    assert!(matches!(report.grid.get(spawned), 2 | 4));
    assert_eq!(report.grid.sum(), expected.grid.sum() + u64::from(report.grid.get(spawned)));
}

#[tokio::test]
async fn test_noop_move_changes_nothing() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    let legal = legal_moves(&start.grid);
    let Some(noop) = Direction::ALL.into_iter().find(|d| !legal.contains(d)) else {
        // Every direction moves something on this deal; nothing to check.
        return;
    };
    send(
        &mut ws,
        ClientMessage::Move {
            direction: noop.to_string(),
        },
    )
    .await;

    match recv(&mut ws).await {
        ServerMessage::Turn { report } => {
            assert!(!report.changed);
            assert_eq!(report.grid, start.grid);
            assert_eq!(report.turn, start.turn);
            assert!(report.new_cells.is_empty());
        }
        other => panic!("expected Turn, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_direction_is_rejected_with_400() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(
        &mut ws,
        ClientMessage::Move {
            direction: "north".into(),
        },
    )
    .await;

    match recv(&mut ws).await {
        ServerMessage::Error { code, message } => {
            assert_eq!(code, 400);
            assert!(message.contains("north"));
        }
        other => panic!("expected Error, got {other:?}"),
    }

    // The board is untouched.
    send(&mut ws, ClientMessage::GetBoard).await;
    assert_eq!(recv_board(&mut ws).await, start);
}

#[tokio::test]
async fn test_malformed_frame_is_rejected_with_400() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    recv_board(&mut ws).await;

    ws.send(Message::Text("{not json".into())).await.unwrap();

    match recv(&mut ws).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, 400),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reset_deals_new_game() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(&mut ws, ClientMessage::Reset).await;
    let fresh = recv_board(&mut ws).await;

    assert_eq!(fresh.session_id, start.session_id);
    assert_eq!(fresh.turn, start.turn + 1);
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.grid.count_empty(), 14);
}

#[tokio::test]
async fn test_set_mode_is_acknowledged() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    recv_board(&mut ws).await;

    send(
        &mut ws,
        ClientMessage::SetMode {
            mode: AdvisorMode::Insight,
        },
    )
    .await;

    assert_eq!(
        recv(&mut ws).await,
        ServerMessage::ModeChanged {
            mode: AdvisorMode::Insight
        }
    );
}

#[tokio::test]
async fn test_advise_without_advisor_is_unavailable() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(&mut ws, ClientMessage::Advise).await;

    assert_eq!(
        recv(&mut ws).await,
        ServerMessage::AdvisorUnavailable { turn: start.turn }
    );
}

#[tokio::test]
async fn test_advise_with_advisor_returns_current_advice() {
    let advisor = fake_advisor().await;
    let addr = start_server(Twenty48Server::builder().advisor(AdvisorConfig::new(advisor))).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(&mut ws, ClientMessage::Advise).await;

    match recv(&mut ws).await {
        ServerMessage::Advice { advice } => {
            assert_eq!(advice.turn, start.turn);
            assert_eq!(advice.mode, AdvisorMode::Suggest);
            assert_eq!(advice.best_move, Some(Direction::Left));
            assert_eq!(advice.scores.len(), 2);
            assert_eq!(advice.explanation.as_deref(), Some("corner"));
        }
        other => panic!("expected Advice, got {other:?}"),
    }
}

#[tokio::test]
async fn test_coach_mode_coaches_after_each_move() {
    let advisor = fake_advisor().await;
    let addr = start_server(seeded(3).advisor(AdvisorConfig::new(advisor))).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(
        &mut ws,
        ClientMessage::SetMode {
            mode: AdvisorMode::Coach,
        },
    )
    .await;
    recv(&mut ws).await;

    let direction = legal_moves(&start.grid)[0];
    send(
        &mut ws,
        ClientMessage::Move {
            direction: direction.to_string(),
        },
    )
    .await;

    let report = match recv(&mut ws).await {
        ServerMessage::Turn { report } => report,
        other => panic!("expected Turn, got {other:?}"),
    };
    // The fake service sends no coach_msg, so the text is built from the best move.
    match recv(&mut ws).await {
        ServerMessage::Advice { advice } => {
            assert_eq!(advice.mode, AdvisorMode::Coach);
            assert_eq!(advice.turn, report.turn);
            assert_eq!(advice.best_move, Some(Direction::Left));
            assert_eq!(
                advice.coaching.as_deref(),
                Some("The advisor would play left. corner")
            );
        }
        other => panic!("expected Advice, got {other:?}"),
    }
}

#[tokio::test]
async fn test_advice_for_a_board_already_moved_past_is_dropped() {
    let advisor = slow_fake_advisor(Duration::from_millis(300)).await;
    let addr = start_server(seeded(5).advisor(AdvisorConfig::new(advisor))).await;
    let mut ws = connect(&addr).await;
    let start = recv_board(&mut ws).await;

    send(&mut ws, ClientMessage::Advise).await;
    let direction = legal_moves(&start.grid)[0];
    send(
        &mut ws,
        ClientMessage::Move {
            direction: direction.to_string(),
        },
    )
    .await;

    let report = match recv(&mut ws).await {
        ServerMessage::Turn { report } => report,
        other => panic!("expected Turn, got {other:?}"),
    };
    assert!(report.turn > start.turn);

    // The advisor answers for the starting board after the move landed.
    let late = tokio::time::timeout(Duration::from_secs(1), ws.next()).await;
    if let Ok(Some(Ok(frame))) = late {
        let envelope: Envelope<ServerMessage> =
            serde_json::from_slice(&frame.into_data()).expect("decode");
        assert!(
            !matches!(envelope.message, ServerMessage::Advice { .. }),
            "stale advice forwarded: {:?}",
            envelope.message
        );
    }
}

#[tokio::test]
async fn test_disconnect_closes_connection() {
    let addr = start_server(Twenty48Server::builder()).await;
    let mut ws = connect(&addr).await;
    recv_board(&mut ws).await;

    send(
        &mut ws,
        ClientMessage::Disconnect {
            reason: "done".into(),
        },
    )
    .await;

    let next = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("server should close");
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}

#[tokio::test]
async fn test_idle_connection_is_dropped() {
    let addr = start_server(Twenty48Server::builder().idle_timeout(Duration::from_millis(100))).await;
    let mut ws = connect(&addr).await;
    recv_board(&mut ws).await;

    let next = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("server should close");
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}
