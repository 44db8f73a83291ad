//! Shared fixtures for the integration suite: a mocked backend plus
//! canned wire payloads.

#![allow(dead_code)]

use std::sync::Arc;

use httpmock::MockServer;
use serde_json::{Value, json};

use flowdeck::config::ClientConfig;
use flowdeck::session::MemoryTokenStore;
use flowdeck::workbench::Workbench;

pub const TS: &str = "2025-11-02T10:30:00Z";
pub const TOKEN: &str = "token-abc123";
pub const EMAIL: &str = "ada@example.com";

/// A workbench wired to the mock server, with in-memory token storage.
pub fn bench_for(server: &MockServer) -> Workbench {
    Workbench::with_token_store(
        ClientConfig::new(server.base_url()),
        Arc::new(MemoryTokenStore::new()),
    )
}

/// Mounts the login and profile endpoints every authenticated flow needs.
pub async fn mount_auth(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST).path("/auth/login");
            then.status(200).json_body(json!({ "access_token": TOKEN }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET).path("/users/me");
            then.status(200).json_body(profile_json());
        })
        .await;
}

pub fn profile_json() -> Value {
    json!({
        "id": 1,
        "email": EMAIL,
        "created_at": TS,
        "updated_at": TS,
    })
}

pub fn workflow_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "owner_id": 1,
        "name": name,
        "created_at": TS,
        "updated_at": TS,
    })
}

pub fn node_json(id: i64, workflow_id: i64, node_type: &str, data: Value, x: f64, y: f64) -> Value {
    json!({
        "id": id,
        "workflow_id": workflow_id,
        "type": node_type,
        "data": data,
        "position_x": x,
        "position_y": y,
    })
}

pub fn edge_json(id: i64, workflow_id: i64, source: i64, target: i64) -> Value {
    json!({
        "id": id,
        "workflow_id": workflow_id,
        "source_node_id": source,
        "target_node_id": target,
    })
}

pub fn execution_json(id: i64, workflow_id: i64, status: &str, input: Value) -> Value {
    json!({
        "id": id,
        "workflow_id": workflow_id,
        "status": status,
        "input_data": input,
        "output_data": null,
        "error": null,
        "started_at": TS,
        "finished_at": null,
    })
}

/// Pumps the workbench until its pending-move set is empty or the
/// attempt budget runs out. Background writes land on their own time.
pub async fn settle_moves(bench: &mut Workbench) {
    for _ in 0..100 {
        bench.pump().await;
        if bench.graph().pending_moves().is_empty() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}

/// Pumps until the pending-move set has a failed entry (or gives up).
pub async fn settle_move_failure(bench: &mut Workbench) {
    for _ in 0..100 {
        bench.pump().await;
        if !bench.graph().pending_moves().failed().is_empty() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
