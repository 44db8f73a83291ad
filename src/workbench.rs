//! The orchestrator facade tying the engine together.
//!
//! A [`Workbench`] owns one of everything: the API client, the session
//! manager, the status signals, the workflow collection, the graph store,
//! and the most recent execution. Public operations follow one shape:
//! raise the busy flag (RAII release), issue the remote call, apply the
//! store transition on success, and route any failure through the status
//! signals, where an authentication failure triggers the total session
//! reset and everything else becomes the single visible error.
//!
//! The session gates everything: while anonymous, workflow and graph
//! operations return without issuing a call. Node moves are the one
//! fire-and-forget path; their outcomes arrive over an internal channel
//! that [`Workbench::pump`] drains (it runs implicitly at the start of
//! every operation).

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::api::payloads::{EdgeCreate, ExecutionRecord, NodeCreate, NodeUpdate};
use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::execution;
use crate::graph::GraphStore;
use crate::graph::pending::MoveOutcome;
use crate::inspector::NodeConfig;
use crate::session::{AuthPhase, FsTokenStore, MemoryTokenStore, SessionManager, TokenStore};
use crate::signals::{FailureDisposition, StatusSignals};
use crate::types::{EdgeId, NodeId, NodeType, Position, WorkflowId};
use crate::workflows::WorkflowStore;

/// Client-side engine for one workflow-builder session.
///
/// # Examples
///
/// ```no_run
/// use flowdeck::config::ClientConfig;
/// use flowdeck::types::NodeType;
/// use flowdeck::workbench::Workbench;
///
/// # async fn example() {
/// let mut bench = Workbench::new(ClientConfig::new("http://localhost:8000"));
/// bench.login("ada@example.com", "hunter2").await;
/// bench.create_workflow("Pipeline A").await;
/// bench.add_node(NodeType::Input).await;
/// assert!(bench.signals().error().is_none());
/// # }
/// ```
pub struct Workbench {
    instance: Uuid,
    api: ApiClient,
    session: SessionManager,
    signals: StatusSignals,
    workflows: WorkflowStore,
    graph: GraphStore,
    last_execution: Option<ExecutionRecord>,
    move_tx: flume::Sender<MoveOutcome>,
    move_rx: flume::Receiver<MoveOutcome>,
}

impl Workbench {
    /// Creates a workbench from configuration.
    ///
    /// Token persistence uses the configured file when present, otherwise
    /// an in-memory store.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let store: Arc<dyn TokenStore> = match config.token_path() {
            Some(path) => Arc::new(FsTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_token_store(config, store)
    }

    /// Creates a workbench with an explicit token store.
    #[must_use]
    pub fn with_token_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let api = ApiClient::new(config.base_url());
        let session = SessionManager::new(api.clone(), store);
        let (move_tx, move_rx) = flume::unbounded();
        Self {
            instance: Uuid::new_v4(),
            api,
            session,
            signals: StatusSignals::new(),
            workflows: WorkflowStore::new(),
            graph: GraphStore::new(),
            last_execution: None,
            move_tx,
            move_rx,
        }
    }

    // ---- read surface ----

    /// The busy/error surface, cloneable into UI layers.
    #[must_use]
    pub fn signals(&self) -> &StatusSignals {
        &self.signals
    }

    /// Current authentication phase.
    #[must_use]
    pub fn auth_phase(&self) -> AuthPhase {
        self.session.phase()
    }

    /// The profile email, once known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.session.email()
    }

    /// The workflow collection.
    #[must_use]
    pub fn workflows(&self) -> &WorkflowStore {
        &self.workflows
    }

    /// The active workflow's graph.
    #[must_use]
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// The most recent execution, if one was triggered this session.
    #[must_use]
    pub fn last_execution(&self) -> Option<&ExecutionRecord> {
        self.last_execution.as_ref()
    }

    // ---- session operations ----

    /// Restores a persisted session and, if one exists, fetches the
    /// profile and workflow list together, then the active graph.
    /// Returns `true` when a token was found.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn bootstrap(&mut self) -> bool {
        if !self.session.restore().await {
            return false;
        }
        self.refresh_session_state().await;
        true
    }

    /// Logs in and loads the session's data on success.
    #[instrument(skip(self, password), fields(instance = %self.instance))]
    pub async fn login(&mut self, email: &str, password: &str) {
        self.pump().await;
        let result = {
            let _busy = self.signals.begin_busy();
            self.session.login(email, password).await
        };
        match result {
            Ok(_) => {
                self.signals.clear_error();
                self.refresh_workflows().await;
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Registers an account, then logs in with the same credentials.
    #[instrument(skip(self, password), fields(instance = %self.instance))]
    pub async fn register(&mut self, email: &str, password: &str) {
        self.pump().await;
        let result = {
            let _busy = self.signals.begin_busy();
            self.session.register(email, password).await
        };
        match result {
            Ok(_) => {
                self.signals.clear_error();
                self.refresh_workflows().await;
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Logs out: the total reset. Token, workflow list, graph, selection,
    /// last execution, and error slot are all cleared.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn logout(&mut self) {
        self.reset_session().await;
    }

    // ---- workflow operations ----

    /// Re-fetches the workflow list, then synchronizes the graph to the
    /// resulting active selection.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn refresh_workflows(&mut self) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let listed = {
            let _busy = self.signals.begin_busy();
            self.api.list_workflows().await
        };
        match listed {
            Ok(items) => {
                self.workflows.apply_listed(items);
                self.signals.clear_error();
                self.sync_graph().await;
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Creates a workflow and makes it active.
    ///
    /// An empty (trimmed) name is a local input failure: it surfaces like
    /// any other error and no call is issued.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn create_workflow(&mut self, name: &str) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let name = name.trim();
        if name.is_empty() {
            self.absorb(&ApiError::InvalidInput(
                "workflow name must not be empty".into(),
            ))
            .await;
            return;
        }
        let created = {
            let _busy = self.signals.begin_busy();
            self.api.create_workflow(name).await
        };
        match created {
            Ok(workflow) => {
                debug!(id = %workflow.id, "workflow created");
                self.workflows.apply_created(workflow);
                self.signals.clear_error();
                self.sync_graph().await;
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Renames a workflow, preserving its position in the list.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn rename_workflow(&mut self, id: WorkflowId, name: &str) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let name = name.trim();
        if name.is_empty() {
            self.absorb(&ApiError::InvalidInput(
                "workflow name must not be empty".into(),
            ))
            .await;
            return;
        }
        let updated = {
            let _busy = self.signals.begin_busy();
            self.api.update_workflow(id, name).await
        };
        match updated {
            Ok(workflow) => {
                self.workflows.apply_renamed(workflow);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Deletes a workflow; if it was active, the selection falls back to
    /// the new first entry and the graph follows.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn delete_workflow(&mut self, id: WorkflowId) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let deleted = {
            let _busy = self.signals.begin_busy();
            self.api.delete_workflow(id).await
        };
        match deleted {
            Ok(()) => {
                let active_changed = self.workflows.apply_removed(id);
                self.signals.clear_error();
                if active_changed {
                    self.sync_graph().await;
                }
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Switches the active workflow and re-fetches its graph.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn select_workflow(&mut self, id: WorkflowId) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        if self.workflows.select(id) {
            self.sync_graph().await;
        }
    }

    /// Re-fetches the active workflow's graph (or clears it when no
    /// workflow is active).
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn reload_graph(&mut self) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        self.sync_graph().await;
    }

    // ---- graph operations ----

    /// Creates a node of the given type in the active workflow.
    ///
    /// The node spawns at the cascade position for the current node count
    /// with a default label; nothing is applied locally until the server
    /// confirms, after which the new node becomes the selection.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn add_node(&mut self, node_type: NodeType) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let Some(workflow_id) = self.workflows.active() else {
            return;
        };
        let position = self.graph.next_spawn_position();
        let mut data = Map::new();
        data.insert(
            "label".to_string(),
            Value::String(node_type.default_label()),
        );
        let payload = NodeCreate {
            workflow_id,
            node_type,
            data,
            position_x: position.x,
            position_y: position.y,
        };
        let created = {
            let _busy = self.signals.begin_busy();
            self.api.create_node(&payload).await
        };
        match created {
            Ok(record) => {
                debug!(id = %record.id, %node_type, "node created");
                self.graph.apply_node_created(record);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Replaces a node's data bag. Not optimistic: the local bag changes
    /// only once the round trip completes.
    #[instrument(skip(self, data), fields(instance = %self.instance))]
    pub async fn update_node_data(&mut self, node_id: NodeId, data: Map<String, Value>) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let updated = {
            let _busy = self.signals.begin_busy();
            self.api.update_node(node_id, &NodeUpdate::data(data)).await
        };
        match updated {
            Ok(record) => {
                self.graph.apply_node_data(record);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Edits one inspector field of a node and persists the rebuilt bag.
    #[instrument(skip(self, value), fields(instance = %self.instance))]
    pub async fn set_node_field(&mut self, node_id: NodeId, key: &str, value: Value) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let Some(node) = self.graph.node(node_id) else {
            return;
        };
        let bag = NodeConfig::for_node(node)
            .and_then(|config| config.set_field(key, value))
            .map_err(|err| ApiError::InvalidInput(format!("invalid node field edit: {err}")));
        match bag {
            Ok(bag) => self.update_node_data(node_id, bag).await,
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Records a drag-stop position and persists it fire-and-forget.
    ///
    /// The local position changes immediately (it mirrors what the drag
    /// widget already shows); the write is tracked in the pending-move
    /// set and its outcome lands on the next [`Workbench::pump`]. A
    /// failed save surfaces an error but never reverts the position.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn move_node(&mut self, node_id: NodeId, x: f64, y: f64) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let position = Position::new(x, y);
        self.graph.apply_moved(node_id, position);
        self.dispatch_move(node_id, position);
    }

    /// Re-dispatches every pending position write that previously failed.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn retry_pending_moves(&mut self) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let failed = self.graph.pending_moves().failed();
        for (node_id, position) in failed {
            self.dispatch_move(node_id, position);
        }
    }

    /// Deletes a node; its local edges, selection, and pending writes go
    /// with it.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn remove_node(&mut self, node_id: NodeId) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let deleted = {
            let _busy = self.signals.begin_busy();
            self.api.delete_node(node_id).await
        };
        match deleted {
            Ok(()) => {
                self.graph.apply_node_removed(node_id);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Creates an edge between two nodes of the active workflow.
    ///
    /// No local self-loop or duplicate check: acceptance is the server's
    /// call, and its rejection surfaces through the error channel.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn connect(&mut self, source: NodeId, target: NodeId) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let Some(workflow_id) = self.workflows.active() else {
            return;
        };
        let payload = EdgeCreate {
            workflow_id,
            source_node_id: source,
            target_node_id: target,
        };
        let created = {
            let _busy = self.signals.begin_busy();
            self.api.create_edge(&payload).await
        };
        match created {
            Ok(record) => {
                self.graph.apply_edge_created(record);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Deletes an edge.
    #[instrument(skip(self), fields(instance = %self.instance))]
    pub async fn disconnect_edge(&mut self, edge_id: EdgeId) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let deleted = {
            let _busy = self.signals.begin_busy();
            self.api.delete_edge(edge_id).await
        };
        match deleted {
            Ok(()) => {
                self.graph.apply_edge_removed(edge_id);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Sets or clears the node selection (local only).
    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        self.graph.select(node_id);
    }

    // ---- execution ----

    /// Triggers a run of the active workflow with the given raw JSON
    /// payload (trimmed-empty means no input).
    ///
    /// The single synchronous response becomes the last execution; its
    /// status is whatever the server said, verbatim. No polling.
    #[instrument(skip(self, raw_input), fields(instance = %self.instance))]
    pub async fn run(&mut self, raw_input: &str) {
        self.pump().await;
        if !self.session.is_authenticated() {
            return;
        }
        let Some(workflow_id) = self.workflows.active() else {
            return;
        };
        let request = match execution::build_request(workflow_id, raw_input) {
            Ok(request) => request,
            Err(err) => {
                self.absorb(&err).await;
                return;
            }
        };
        let created = {
            let _busy = self.signals.begin_busy();
            self.api.create_execution(&request).await
        };
        match created {
            Ok(record) => {
                debug!(id = %record.id, status = %record.status, "execution created");
                self.last_execution = Some(record);
                self.signals.clear_error();
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    // ---- background outcomes ----

    /// Applies every background move outcome that has arrived.
    ///
    /// Runs implicitly at the start of each operation; call it directly
    /// from a UI tick to observe failures of fire-and-forget saves
    /// promptly.
    pub async fn pump(&mut self) {
        while let Ok(outcome) = self.move_rx.try_recv() {
            match outcome.result {
                Ok(()) => {
                    self.graph
                        .pending_moves_mut()
                        .resolve_success(outcome.node_id, outcome.position);
                }
                Err(err) => {
                    warn!(node = %outcome.node_id, %err, "position save failed");
                    self.graph.pending_moves_mut().resolve_failure(
                        outcome.node_id,
                        outcome.position,
                        err.to_string(),
                    );
                    self.absorb(&err).await;
                }
            }
        }
    }

    // ---- internals ----

    fn dispatch_move(&mut self, node_id: NodeId, position: Position) {
        self.graph
            .pending_moves_mut()
            .record_dispatch(node_id, position);
        let api = self.api.clone();
        let tx = self.move_tx.clone();
        tokio::spawn(async move {
            let result = api
                .update_node(node_id, &NodeUpdate::position(position))
                .await
                .map(|_| ());
            let _ = tx.send(MoveOutcome {
                node_id,
                position,
                result,
            });
        });
    }

    /// Fetches profile and workflow list together (session start), then
    /// the active graph.
    async fn refresh_session_state(&mut self) {
        let (profile, listed) = {
            let _busy = self.signals.begin_busy();
            futures_util::future::join(
                self.session.refresh_profile(),
                self.api.list_workflows(),
            )
            .await
        };
        if let Err(err) = profile {
            self.absorb(&err).await;
        }
        if !self.session.is_authenticated() {
            return;
        }
        match listed {
            Ok(items) => {
                self.workflows.apply_listed(items);
                self.signals.clear_error();
                self.sync_graph().await;
            }
            Err(err) => self.absorb(&err).await,
        }
    }

    /// Loads the graph for the current active workflow, or clears it.
    ///
    /// Both fetches are always attempted together and the replacement is
    /// all-or-nothing: an error in either leaves the previous graph
    /// untouched. The captured generation discards completions that a
    /// later switch has already superseded.
    async fn sync_graph(&mut self) {
        let Some(workflow_id) = self.workflows.active() else {
            self.graph.clear();
            return;
        };
        let generation = self.graph.begin_load();
        let (nodes, edges) = {
            let _busy = self.signals.begin_busy();
            futures_util::future::join(
                self.api.list_nodes(workflow_id),
                self.api.list_edges(workflow_id),
            )
            .await
        };
        match (nodes, edges) {
            (Ok(nodes), Ok(edges)) => {
                if self.graph.apply_loaded(generation, nodes, edges) {
                    self.signals.clear_error();
                } else {
                    debug!(%workflow_id, generation, "discarded stale graph load");
                }
            }
            (Err(err), _) | (_, Err(err)) => self.absorb(&err).await,
        }
    }

    /// Routes a failure through the error channel; an authentication
    /// failure triggers the total reset.
    async fn absorb(&mut self, err: &ApiError) {
        if self.signals.absorb(err) == FailureDisposition::SessionRevoked {
            warn!("session revoked by the server, resetting");
            self.reset_session().await;
        }
    }

    /// The total reset: token, lists, graph, selection, execution, error.
    async fn reset_session(&mut self) {
        self.session.logout().await;
        self.workflows.clear();
        self.graph.clear();
        self.last_execution = None;
        self.signals.clear_error();
    }
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("instance", &self.instance)
            .field("phase", &self.session.phase())
            .field("workflows", &self.workflows.items().len())
            .field("nodes", &self.graph.nodes().len())
            .field("edges", &self.graph.edges().len())
            .finish()
    }
}
