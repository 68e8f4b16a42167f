//! Fake mail log server shared by the integration tests.

#![allow(dead_code, clippy::expect_used)]

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Raw source served for every known message.
pub const RAW_MESSAGE: &str = "Subject: Invoice\r\n\r\nPlease pay.";

/// Builds the wire form of a message entry.
pub fn message_json(uuid: &str, subject: &str) -> Value {
    json!({
        "uuid": uuid,
        "message_id": format!("<{uuid}@example.com>"),
        "from": "billing@example.com",
        "to": "bob@example.com",
        "subject": subject,
        "plain_text": true,
        "html": true,
        "attachments": false,
        "spam_score": 3,
        "source_ip": "192.0.2.7",
        "size": 2048,
        "received": "2024-03-01T12:30:00Z",
        "status": "sent"
    })
}

fn router() -> Router {
    Router::new()
        .route("/api/ping", get(|| async { Json(json!({"status": "ok"})) }))
        .route("/api/config", get(config))
        .route("/api/message_log", get(message_log))
        .route("/api/message/:file", get(message_file))
        .route("/api/message/:uuid/:action", put(learn))
        .route("/ws", get(channel))
}

async fn config() -> Json<Value> {
    Json(json!({
        "status": "",
        "error": "",
        "custom_brand": "Test Relay",
        "disable_spam_reporting": false,
        "disable_logs": true,
        "message_count": 2
    }))
}

async fn message_log(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("q").map_or("", String::as_str);
    match query {
        "nothing" => Json(json!({"status": "ok", "error": "", "messages": null})),
        "locked" => Json(json!({"status": "error", "error": "database is locked"})),
        _ => {
            let page = params.get("p").map_or("1", String::as_str);
            Json(json!({
                "status": "ok",
                "error": "",
                "messages": [
                    message_json("abc-1", &format!("Invoice page {page}")),
                    message_json("abc-2", "Weekly digest"),
                ]
            }))
        }
    }
}

async fn message_file(Path(file): Path<String>) -> Response {
    match file.as_str() {
        "abc-1" => Json(json!({
            "status": "ok",
            "error": "",
            "message": message_json("abc-1", "Invoice")
        }))
        .into_response(),
        "gone" => Json(json!({
            "status": "error",
            "error": "Messages was not found",
            "message": {}
        }))
        .into_response(),
        "abc-1.txt" => "Please pay.".into_response(),
        "abc-1.html" => (
            [(header::CONTENT_TYPE, "text/html")],
            "<p>Please pay.</p>",
        )
            .into_response(),
        "abc-1.eml" => RAW_MESSAGE.into_response(),
        "abc-1.log" => Json(json!({"status": "error", "error": "Logs are disabled"})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn learn(Path((uuid, action)): Path<(String, String)>) -> Response {
    if !matches!(action.as_str(), "learn_ham" | "learn_spam") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if uuid == "abc-2" {
        return Json(json!({
            "status": "error",
            "error": "No successful request was made.",
            "requests": [
                {"url": "http://rspamd:11334", "success": "false", "error": "dial tcp: connection refused"},
                {"url": "http://backup:11334", "success": "false", "error": "500"}
            ]
        }))
        .into_response();
    }
    if uuid != "abc-1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "status": "ok",
        "error": "",
        "requests": [
            {"url": "http://rspamd:11334", "success": "true", "error": "", "response": "{}"},
            {"url": "http://backup:11334", "success": "false", "error": "timeout", "response": ""}
        ]
    }))
    .into_response()
}

async fn channel(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(push_events)
}

/// Pushes a fixed burst of frames and closes the connection.
async fn push_events(mut socket: WebSocket) {
    let frames = [
        json!({"type": "receivedNewMessage", "msg": message_json("abc-3", "Fresh")}).to_string(),
        json!({"type": "updateMessageCount", "msg": 3}).to_string(),
        "not json".to_string(),
        json!({"type": "messageStatusesUpdated", "msg": true}).to_string(),
    ];
    for frame in frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

/// Starts the fake server on the current runtime and returns its base URL.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("fake backend stopped");
    });
    format!("http://{addr}")
}

/// Starts the fake server on its own thread, for tests that run the binary.
pub fn spawn_backend_thread() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fake backend runtime");
        runtime.block_on(async move {
            let url = spawn_backend().await;
            tx.send(url).expect("report fake backend URL");
            std::future::pending::<()>().await;
        });
    });
    rx.recv().expect("fake backend URL")
}
