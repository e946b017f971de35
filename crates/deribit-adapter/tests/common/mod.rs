/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for deribit-adapter tests

#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use deribit_adapter::{ClientConfig, DeribitClient};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

pub type ServerSocket = WebSocketStream<TcpStream>;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// HTTP client pointed at the mock server's `/api/v2/` base
pub fn http_client(server: &MockServer) -> DeribitClient {
    DeribitClient::with_config_and_base_url(
        ClientConfig::default(),
        &format!("{}/api/v2", server.uri()),
    )
    .expect("client init")
}

/// Accept one WebSocket connection on a local port and hand it to `script`.
///
/// Returns the `ws://` URL to connect to.
pub async fn spawn_ws_server<F, Fut>(script: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let socket = tokio_tungstenite::accept_async(stream)
            .await
            .expect("ws handshake");
        script(socket).await;
    });
    format!("ws://{addr}")
}

/// Like `spawn_ws_server`, but waits `delay` after accepting TCP before the handshake
pub async fn spawn_slow_ws_server<F, Fut>(delay: Duration, script: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(delay).await;
        let socket = tokio_tungstenite::accept_async(stream)
            .await
            .expect("ws handshake");
        script(socket).await;
    });
    format!("ws://{addr}")
}

/// Next JSON-RPC request sent by the client; `None` once it hangs up
pub async fn next_request(socket: &mut ServerSocket) -> Option<Value> {
    while let Some(message) = socket.next().await {
        match message {
            Ok(Message::Text(text)) => {
                return Some(serde_json::from_str(&text).expect("client sent json"));
            }
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
    None
}

pub async fn send_json(socket: &mut ServerSocket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("server send");
}

pub fn success(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
        "usIn": 1744208208919000u64,
        "usOut": 1744208208919250u64,
        "usDiff": 250,
        "testnet": true
    })
}

pub fn failure(id: &Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
        "testnet": true
    })
}

/// Order book result for BTC-PERPETUAL at 2025-04-09 14:16:48.919 UTC
pub fn order_book_result() -> Value {
    json!({
        "instrument_name": "BTC-PERPETUAL",
        "timestamp": 1744208208919i64,
        "state": "open",
        "change_id": 5520,
        "bids": [[82000.0, 1500.0], [81999.5, 300.0]],
        "asks": [[82001.0, 700.0]],
        "best_bid_price": 82000.0,
        "best_ask_price": 82001.0,
        "mark_price": 82000.4,
        "index_price": 81990.1
    })
}
