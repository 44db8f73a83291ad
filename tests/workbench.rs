//! End-to-end workbench behavior against a mocked backend: the composed
//! scenarios, the total reset, stale-cache rules, and the fire-and-forget
//! move path.

mod common;

use std::sync::Arc;

use httpmock::MockServer;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

use common::*;
use flowdeck::config::ClientConfig;
use flowdeck::session::{AuthPhase, MemoryTokenStore, TokenStore};
use flowdeck::types::{EdgeId, NodeId, NodeType, Position, WorkflowId};
use flowdeck::workbench::Workbench;

#[tokio::test]
async fn compose_and_run_pipeline() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/workflows");
            then.status(201).json_body(workflow_json(1, "Pipeline A"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nodes")
                .query_param("workflow_id", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/edges")
                .query_param("workflow_id", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/nodes")
                .json_body_partial(r#"{"type": "INPUT"}"#);
            then.status(200).json_body(node_json(
                10,
                1,
                "INPUT",
                json!({"label": "INPUT node"}),
                120.0,
                120.0,
            ));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/nodes")
                .json_body_partial(r#"{"type": "LLM"}"#);
            then.status(200).json_body(node_json(
                11,
                1,
                "LLM",
                json!({"label": "LLM node"}),
                156.0,
                156.0,
            ));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/edges");
            then.status(200).json_body(edge_json(20, 1, 10, 11));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/executions")
                .json_body_partial(r#"{"input_data": {"x": 1}}"#);
            then.status(200)
                .json_body(execution_json(30, 1, "created", json!({"x": 1})));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;
    assert_eq!(bench.auth_phase(), AuthPhase::Authenticated);
    assert_eq!(bench.email(), Some(EMAIL));

    bench.create_workflow("Pipeline A").await;
    assert_eq!(bench.workflows().active(), Some(WorkflowId(1)));

    bench.add_node(NodeType::Input).await;
    bench.add_node(NodeType::Llm).await;
    let nodes = bench.graph().nodes();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, NodeId(10));
    assert_eq!(nodes[1].id, NodeId(11));
    // Each add selects its node; the LLM node was added last.
    assert_eq!(bench.graph().selected(), Some(NodeId(11)));

    bench.connect(NodeId(10), NodeId(11)).await;
    let edges = bench.graph().edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, NodeId(10));
    assert_eq!(edges[0].target, NodeId(11));

    bench.run(r#"{"x":1}"#).await;
    let execution = bench.last_execution().expect("execution recorded");
    assert_eq!(execution.status, "created");

    assert_eq!(bench.workflows().active_workflow().unwrap().name, "Pipeline A");
    assert_eq!(bench.signals().error(), None);
    assert!(!bench.signals().is_busy());
}

#[tokio::test]
async fn auth_failure_is_a_total_reset() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/executions");
            then.status(200)
                .json_body(execution_json(30, 1, "created", json!(null)));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/workflows/1");
            then.status(401).json_body(json!({"detail": "Expired"}));
        })
        .await;

    let store: Arc<MemoryTokenStore> = Arc::new(MemoryTokenStore::new());
    let mut bench = Workbench::with_token_store(
        ClientConfig::new(server.base_url()),
        store.clone() as Arc<dyn TokenStore>,
    );
    bench.login(EMAIL, "hunter2").await;
    bench.run("").await;
    bench.select_node(Some(NodeId(10)));
    // Leave an error showing so the reset provably clears it too.
    bench.create_workflow("  ").await;
    assert!(bench.signals().error().is_some());
    assert!(bench.last_execution().is_some());

    bench.rename_workflow(WorkflowId(1), "New name").await;

    assert_eq!(bench.auth_phase(), AuthPhase::Anonymous);
    assert_eq!(bench.email(), None);
    assert!(bench.workflows().items().is_empty());
    assert_eq!(bench.workflows().active(), None);
    assert!(bench.graph().nodes().is_empty());
    assert!(bench.graph().edges().is_empty());
    assert_eq!(bench.graph().selected(), None);
    assert!(bench.last_execution().is_none());
    assert_eq!(bench.signals().error(), None);
    assert!(store.load().await.is_none(), "persisted token cleared");
}

#[tokio::test]
async fn disconnected_edge_is_not_reintroduced_from_stale_cache() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200).json_body(json!([
                node_json(10, 1, "INPUT", json!({}), 120.0, 120.0),
                node_json(11, 1, "LLM", json!({}), 156.0, 156.0),
            ]));
        })
        .await;
    let mut edges_with_edge = server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([edge_json(20, 1, 10, 11)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/edges/20");
            then.status(202).json_body(json!({"detail": "Edge deleted"}));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;
    assert_eq!(bench.graph().edges().len(), 1);

    bench.disconnect_edge(EdgeId(20)).await;
    assert!(bench.graph().edges().is_empty());

    // The server no longer holds the edge: a reload must not revive it.
    edges_with_edge.delete_async().await;
    let mut edges_empty = server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    bench.reload_graph().await;
    assert!(bench.graph().edges().is_empty());

    // But if the server independently still holds it, the reload shows it.
    edges_empty.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([edge_json(20, 1, 10, 11)]));
        })
        .await;
    bench.reload_graph().await;
    assert_eq!(bench.graph().edges().len(), 1);
}

#[tokio::test]
async fn deleting_the_selected_node_clears_selection() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200).json_body(json!([node_json(
                10,
                1,
                "INPUT",
                json!({"label": "INPUT node"}),
                120.0,
                120.0
            )]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/nodes/10");
            then.status(200).json_body(node_json(
                10,
                1,
                "INPUT",
                json!({"label": "Renamed", "sample_input": ""}),
                120.0,
                120.0,
            ));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/nodes/10");
            then.status(200).json_body(json!({"detail": "Node deleted"}));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.select_node(Some(NodeId(10)));
    bench
        .set_node_field(NodeId(10), "label", json!("Renamed"))
        .await;
    assert_eq!(bench.graph().node(NodeId(10)).unwrap().label(), "Renamed");

    bench.remove_node(NodeId(10)).await;
    assert!(bench.graph().nodes().is_empty());
    assert_eq!(bench.graph().selected(), None);
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn run_payload_rules() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    // Empty payload: no input_data key at all.
    let exec_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/executions")
                .json_body(json!({"workflow_id": 1}));
            then.status(200)
                .json_body(execution_json(30, 1, "created", json!(null)));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.run("   ").await;
    exec_mock.assert_async().await;
    assert_eq!(bench.last_execution().unwrap().status, "created");
    assert_eq!(bench.signals().error(), None);

    // Malformed JSON: a local failure, no call issued.
    bench.run("{bad json").await;
    assert_eq!(exec_mock.hits_async().await, 1);
    let error = bench.signals().error().expect("parse failure surfaced");
    assert!(error.contains("JSON"), "unexpected message: {error}");
    // The previously recorded execution is untouched.
    assert_eq!(bench.last_execution().unwrap().status, "created");
}

#[tokio::test]
async fn empty_workflow_name_is_rejected_locally() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([]));
        })
        .await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/workflows");
            then.status(201).json_body(workflow_json(1, "never"));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.create_workflow("   ").await;
    assert_eq!(create_mock.hits_async().await, 0);
    assert!(bench.workflows().items().is_empty());
    let error = bench.signals().error().expect("validation surfaced");
    assert!(error.contains("name"), "unexpected message: {error}");
}

#[tokio::test]
async fn move_node_is_fire_and_forget() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/nodes/10")
                .json_body(json!({"position_x": 300.0, "position_y": 200.0}));
            then.status(200)
                .json_body(node_json(10, 1, "INPUT", json!({}), 300.0, 200.0));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.move_node(NodeId(10), 300.0, 200.0).await;
    // Applied locally before the write lands.
    assert_eq!(
        bench.graph().node(NodeId(10)).unwrap().position,
        Position::new(300.0, 200.0)
    );
    assert!(!bench.signals().is_busy(), "moves are not busy windows");

    settle_moves(&mut bench).await;
    patch_mock.assert_async().await;
    assert!(bench.graph().pending_moves().is_empty());
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn failed_move_is_retryable_and_never_reverts() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    let mut failing_patch = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/nodes/10");
            then.status(500).json_body(json!({"detail": "Save failed"}));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.move_node(NodeId(10), 300.0, 200.0).await;
    settle_move_failure(&mut bench).await;

    let error = bench.signals().error().expect("move failure surfaced");
    assert!(error.contains("Save failed"), "unexpected message: {error}");
    // The visual position is never reverted by a failed save.
    assert_eq!(
        bench.graph().node(NodeId(10)).unwrap().position,
        Position::new(300.0, 200.0)
    );
    assert_eq!(
        bench.graph().pending_moves().failed(),
        vec![(NodeId(10), Position::new(300.0, 200.0))]
    );

    // Server recovers; an explicit retry drains the pending set.
    failing_patch.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/nodes/10");
            then.status(200)
                .json_body(node_json(10, 1, "INPUT", json!({}), 300.0, 200.0));
        })
        .await;
    bench.retry_pending_moves().await;
    settle_moves(&mut bench).await;
    assert!(bench.graph().pending_moves().is_empty());

    // A background save never clears the error slot; the next successful
    // foreground operation does.
    assert!(bench.signals().error().is_some());
    bench.reload_graph().await;
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn rejected_move_with_expired_session_resets() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/nodes/10");
            then.status(401).json_body(json!({"detail": "Expired"}));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;

    bench.move_node(NodeId(10), 300.0, 200.0).await;
    settle_moves(&mut bench).await;

    assert_eq!(bench.auth_phase(), AuthPhase::Anonymous);
    assert!(bench.graph().nodes().is_empty());
    assert!(bench.workflows().items().is_empty());
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn bootstrap_restores_a_persisted_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", format!("Bearer {TOKEN}"));
            then.status(200).json_body(profile_json());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([]));
        })
        .await;

    let store: Arc<MemoryTokenStore> = Arc::new(MemoryTokenStore::new());
    store.save(TOKEN).await;
    let mut bench = Workbench::with_token_store(
        ClientConfig::new(server.base_url()),
        store as Arc<dyn TokenStore>,
    );

    assert!(bench.bootstrap().await);
    assert_eq!(bench.auth_phase(), AuthPhase::Authenticated);
    assert_eq!(bench.email(), Some(EMAIL));
    assert_eq!(bench.workflows().active(), Some(WorkflowId(1)));
    assert_eq!(bench.graph().nodes().len(), 1);
}

#[tokio::test]
async fn bootstrap_with_stale_token_logs_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/me");
            then.status(401).json_body(json!({"detail": "Expired"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;

    let store: Arc<MemoryTokenStore> = Arc::new(MemoryTokenStore::new());
    store.save("stale-token").await;
    let mut bench = Workbench::with_token_store(
        ClientConfig::new(server.base_url()),
        store.clone() as Arc<dyn TokenStore>,
    );

    assert!(bench.bootstrap().await);
    assert_eq!(bench.auth_phase(), AuthPhase::Anonymous);
    assert!(bench.workflows().items().is_empty());
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn anonymous_operations_issue_no_calls() {
    let server = MockServer::start_async().await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([]));
        })
        .await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/workflows");
            then.status(201).json_body(workflow_json(1, "never"));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.refresh_workflows().await;
    bench.create_workflow("Pipeline").await;
    bench.add_node(NodeType::Input).await;
    bench.run("{}").await;

    assert_eq!(list_mock.hits_async().await, 0);
    assert_eq!(create_mock.hits_async().await, 0);
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn workflow_rename_and_delete_keep_active_consistent() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200)
                .json_body(json!([workflow_json(2, "B"), workflow_json(1, "A")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nodes")
                .query_param("workflow_id", "2");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/edges")
                .query_param("workflow_id", "2");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nodes")
                .query_param("workflow_id", "1");
            then.status(200)
                .json_body(json!([node_json(10, 1, "OUTPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/edges")
                .query_param("workflow_id", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/workflows/1");
            then.status(200).json_body(workflow_json(1, "A renamed"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/workflows/2");
            then.status(202).json_body(json!({"detail": "Workflow deleted"}));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;
    assert_eq!(bench.workflows().active(), Some(WorkflowId(2)));

    bench.rename_workflow(WorkflowId(1), "A renamed").await;
    assert_eq!(bench.workflows().items()[1].name, "A renamed");
    assert_eq!(bench.workflows().items()[0].name, "B");

    // Deleting the active workflow falls back to the next one, and the
    // graph follows it.
    bench.delete_workflow(WorkflowId(2)).await;
    assert_eq!(bench.workflows().active(), Some(WorkflowId(1)));
    assert_eq!(bench.graph().nodes().len(), 1);
    assert_eq!(bench.graph().nodes()[0].id, NodeId(10));
    assert_eq!(bench.signals().error(), None);
}

#[tokio::test]
async fn switching_workflows_replaces_the_graph_wholesale() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200)
                .json_body(json!([workflow_json(1, "A"), workflow_json(2, "B")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nodes")
                .query_param("workflow_id", "1");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/edges")
                .query_param("workflow_id", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nodes")
                .query_param("workflow_id", "2");
            then.status(200).json_body(json!([
                node_json(20, 2, "LLM", json!({}), 120.0, 120.0),
                node_json(21, 2, "OUTPUT", json!({}), 156.0, 156.0),
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/edges")
                .query_param("workflow_id", "2");
            then.status(200).json_body(json!([edge_json(30, 2, 20, 21)]));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;
    bench.select_node(Some(NodeId(10)));
    assert_eq!(bench.graph().nodes().len(), 1);

    bench.select_workflow(WorkflowId(2)).await;
    assert_eq!(bench.graph().nodes().len(), 2);
    assert_eq!(bench.graph().edges().len(), 1);
    // Switching workflows discards the old selection with the old graph.
    assert_eq!(bench.graph().selected(), None);
}

#[tokio::test]
async fn partial_graph_fetch_failure_keeps_previous_graph() {
    let server = MockServer::start_async().await;
    mount_auth(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/workflows");
            then.status(200).json_body(json!([workflow_json(1, "W")]));
        })
        .await;
    let mut nodes_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200)
                .json_body(json!([node_json(10, 1, "INPUT", json!({}), 120.0, 120.0)]));
        })
        .await;
    let mut edges_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(200).json_body(json!([edge_json(20, 1, 10, 10)]));
        })
        .await;

    let mut bench = bench_for(&server);
    bench.login(EMAIL, "hunter2").await;
    assert_eq!(bench.graph().nodes().len(), 1);
    assert_eq!(bench.graph().edges().len(), 1);

    // The edge fetch now fails: the reload must not half-apply.
    edges_mock.delete_async().await;
    nodes_mock.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/edges");
            then.status(500).json_body(json!({"detail": "edge store down"}));
        })
        .await;

    bench.reload_graph().await;
    assert_eq!(bench.graph().nodes().len(), 1, "old nodes kept");
    assert_eq!(bench.graph().edges().len(), 1, "old edges kept");
    let error = bench.signals().error().expect("failure surfaced");
    assert!(error.contains("edge store down"), "unexpected message: {error}");
}
