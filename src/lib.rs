//! # Flowdeck: Client Engine for a Visual Workflow Builder
//!
//! Flowdeck is the client-side graph state synchronization engine behind a
//! visual automation builder. It holds a locally editable model of one
//! workflow's typed node graph, keeps it consistent with an authoritative
//! remote store through asynchronous CRUD calls, and drives the coarse
//! busy/error surface the rest of the UI reads.
//!
//! ## Core Concepts
//!
//! - **Workbench**: the facade owning one of every component and exposing
//!   the operations a UI binds to
//! - **Session**: the `Anonymous → Authenticating → Authenticated` state
//!   machine gating everything else, with one persisted token
//! - **Stores**: pure local state (workflow collection, graph) mutated
//!   only by explicit transitions after server confirmation
//! - **Signals**: one busy flag and one error slot, last-write-wins, fed
//!   by every operation's failure path
//! - **Inspector**: a tagged-union view over each node's configuration
//!   bag, typed per node kind
//!
//! ## Quick Start
//!
//! ```no_run
//! use flowdeck::config::ClientConfig;
//! use flowdeck::types::NodeType;
//! use flowdeck::workbench::Workbench;
//!
//! # async fn example() {
//! let mut bench = Workbench::new(ClientConfig::from_env());
//!
//! // Restore a prior session, or log in fresh.
//! if !bench.bootstrap().await {
//!     bench.login("ada@example.com", "hunter2").await;
//! }
//!
//! // Compose a workflow.
//! bench.create_workflow("Pipeline A").await;
//! bench.add_node(NodeType::Input).await;
//! bench.add_node(NodeType::Llm).await;
//! let ids: Vec<_> = bench.graph().nodes().iter().map(|n| n.id).collect();
//! bench.connect(ids[0], ids[1]).await;
//!
//! // Trigger a server-side run.
//! bench.run(r#"{"x": 1}"#).await;
//! if let Some(execution) = bench.last_execution() {
//!     println!("status: {}", execution.status);
//! }
//! # }
//! ```
//!
//! ## Failure Policy
//!
//! Operations do not return errors: every failure is classified by the
//! status signals (the single chokepoint). An authentication failure on
//! any call resets the session entirely: token, lists, graph, selection,
//! execution, and error slot. Anything else becomes the one visible error
//! message, which persists until the next successful operation replaces
//! it. Check [`signals::StatusSignals::error`] after an operation to see
//! what, if anything, went wrong.
//!
//! ## Module Guide
//!
//! - [`workbench`] - The orchestrator facade and its operations
//! - [`api`] - Typed HTTP client, payloads, and the error taxonomy
//! - [`session`] - Auth state machine and token persistence
//! - [`workflows`] - Workflow collection and active selection
//! - [`graph`] - Graph state, load generations, pending position writes
//! - [`inspector`] - Typed node-configuration editing
//! - [`execution`] - Run payload parsing
//! - [`signals`] - Busy flag and the single error slot
//! - [`config`] - Client configuration and env resolution
//! - [`telemetry`] - Tracing initialization

pub mod api;
pub mod config;
pub mod execution;
pub mod graph;
pub mod inspector;
pub mod session;
pub mod signals;
pub mod telemetry;
pub mod types;
pub mod workbench;
pub mod workflows;
