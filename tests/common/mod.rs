// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use habit_tracker::config::Config;
use habit_tracker::db::FirestoreDb;
use habit_tracker::routes::create_router;
use habit_tracker::services::{AiContentService, OllamaClient};
use habit_tracker::AppState;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Port 1 is never listening in test environments.
#[allow(dead_code)]
pub const UNREACHABLE_OLLAMA: &str = "http://127.0.0.1:1";

#[allow(dead_code)]
pub fn test_ollama_client(url: &str) -> OllamaClient {
    OllamaClient::new(
        url,
        "llama3.2",
        Duration::from_millis(300),
        Duration::from_secs(2),
        500,
    )
    .expect("Failed to build Ollama client")
}

/// Create a test app with an offline database and an unreachable model server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_ollama(UNREACHABLE_OLLAMA)
}

/// Create a test app with an offline database and the given model server.
#[allow(dead_code)]
pub fn create_test_app_with_ollama(ollama_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        ollama_url: ollama_url.to_string(),
        ..Config::default()
    };

    let state = Arc::new(AppState {
        ai: AiContentService::new(test_ollama_client(ollama_url)),
        db: test_db_offline(),
        config,
    });

    (create_router(state.clone()), state)
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

// ─── Fake Ollama ─────────────────────────────────────────────

/// How the fake model server behaves.
#[derive(Clone)]
#[allow(dead_code)]
pub enum FakeOllama {
    /// Healthy; `/api/generate` answers with this text
    Reply(&'static str),
    /// Healthy probe, but `/api/generate` fails with this status
    GenerateStatus(StatusCode),
    /// `/api/tags` fails with this status
    TagsStatus(StatusCode),
}

#[allow(dead_code)]
pub struct FakeOllamaServer {
    pub url: String,
    /// Bodies received on `/api/generate`
    pub requests: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
impl FakeOllamaServer {
    pub fn generate_requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Spawn an in-process model server on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_fake_ollama(behavior: FakeOllama) -> FakeOllamaServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let tags_behavior = behavior.clone();

    let app = Router::new()
        .route(
            "/api/tags",
            get(move || async move {
                match tags_behavior {
                    FakeOllama::TagsStatus(status) => status.into_response(),
                    _ => Json(json!({ "models": [{ "name": "llama3.2:latest" }] })).into_response(),
                }
            }),
        )
        .route(
            "/api/generate",
            post(move |Json(body): Json<Value>| async move {
                recorded.lock().unwrap().push(body);
                match behavior {
                    FakeOllama::Reply(text) => {
                        Json(json!({ "model": "llama3.2", "response": text, "done": true }))
                            .into_response()
                    }
                    FakeOllama::GenerateStatus(status) => {
                        (status, "model \"llama3.2\" not found").into_response()
                    }
                    FakeOllama::TagsStatus(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Ollama");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    FakeOllamaServer {
        url: format!("http://{}", addr),
        requests,
    }
}
