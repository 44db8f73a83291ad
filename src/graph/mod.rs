//! Local graph state for the active workflow.
//!
//! The store owns the node and edge collections for exactly one workflow
//! at a time. Every method here is a pure, synchronous transition: the
//! workbench issues the remote call, and only a confirmed response (or an
//! explicitly optimistic move) is applied. Switching workflows discards
//! the previous graph wholesale; there is no cross-workflow cache.
//!
//! # Load generations
//!
//! Graph loads are not cancelled when the active workflow changes
//! mid-flight. Instead every load captures a generation number at issue
//! time; a completion whose generation no longer matches is discarded
//! rather than applied, so a slow fetch for a previously selected
//! workflow can never overwrite the graph of the current one.

pub mod pending;

use serde_json::{Map, Value};

use crate::api::payloads::{EdgeRecord, NodeRecord};
use crate::types::{EdgeId, NodeId, NodeType, Position, WorkflowId};
use self::pending::PendingMoves;

/// Base offset for the first node spawned on an empty canvas.
pub const SPAWN_BASE: f64 = 120.0;
/// Per-node offset so sequentially added nodes cascade instead of stacking.
pub const SPAWN_STEP: f64 = 36.0;

/// A node as the canvas sees it: server record plus label defaulting.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
    pub id: NodeId,
    pub workflow_id: WorkflowId,
    pub node_type: NodeType,
    pub data: Map<String, Value>,
    pub position: Position,
}

impl CanvasNode {
    /// Builds a canvas node from a server record, installing the default
    /// `label` when the data bag carries none.
    #[must_use]
    pub fn from_record(record: NodeRecord) -> Self {
        let position = record.position();
        let mut data = record.data;
        data.entry("label".to_string())
            .or_insert_with(|| Value::String(record.node_type.default_label()));
        Self {
            id: record.id,
            workflow_id: record.workflow_id,
            node_type: record.node_type,
            data,
            position,
        }
    }

    /// The display label (always present after construction).
    #[must_use]
    pub fn label(&self) -> &str {
        self.data
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// A directed edge between two nodes of the active workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl From<EdgeRecord> for CanvasEdge {
    fn from(record: EdgeRecord) -> Self {
        Self {
            id: record.id,
            source: record.source_node_id,
            target: record.target_node_id,
        }
    }
}

/// Node/edge state for the active workflow, plus selection and pending
/// position writes.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    selected: Option<NodeId>,
    generation: u64,
    pending: PendingMoves,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in server list order (creation order).
    #[must_use]
    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    /// Edges in server list order.
    #[must_use]
    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    /// The selected node id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The selected node, if any.
    #[must_use]
    pub fn selected_node(&self) -> Option<&CanvasNode> {
        let id = self.selected?;
        self.node(id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// The pending position-write set.
    #[must_use]
    pub fn pending_moves(&self) -> &PendingMoves {
        &self.pending
    }

    pub(crate) fn pending_moves_mut(&mut self) -> &mut PendingMoves {
        &mut self.pending
    }

    /// Default position for the next spawned node.
    ///
    /// Offset grows with the node count in both axes, so sequential adds
    /// cascade diagonally and never start at an identical position.
    #[must_use]
    pub fn next_spawn_position(&self) -> Position {
        let offset = SPAWN_BASE + self.nodes.len() as f64 * SPAWN_STEP;
        Position::new(offset, offset)
    }

    /// The generation a load issued right now would carry.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new load window and returns its generation.
    ///
    /// Any load still in flight from an earlier window is implicitly
    /// invalidated: its completion will no longer match.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Replaces the graph wholesale with a completed load.
    ///
    /// Returns `false` (and applies nothing) when the load's generation
    /// is stale. Selection survives a same-workflow reload only if the
    /// selected node is still present.
    pub fn apply_loaded(
        &mut self,
        generation: u64,
        nodes: Vec<NodeRecord>,
        edges: Vec<EdgeRecord>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.nodes = nodes.into_iter().map(CanvasNode::from_record).collect();
        self.edges = edges.into_iter().map(CanvasEdge::from).collect();
        self.selected = self
            .selected
            .filter(|id| self.nodes.iter().any(|node| node.id == *id));
        self.pending.clear();
        true
    }

    /// Empties the graph (no active workflow, or total reset).
    ///
    /// Also opens a new generation so in-flight loads are discarded.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.nodes.clear();
        self.edges.clear();
        self.selected = None;
        self.pending.clear();
    }

    /// Appends a server-confirmed node and selects it.
    pub fn apply_node_created(&mut self, record: NodeRecord) {
        let node = CanvasNode::from_record(record);
        self.selected = Some(node.id);
        self.nodes.push(node);
    }

    /// Replaces a node's data bag with a server-confirmed update.
    ///
    /// A previously-set label survives a response that omits one, and the
    /// node's type tag is kept as-is for display.
    pub fn apply_node_data(&mut self, record: NodeRecord) {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == record.id) else {
            return;
        };
        let previous_label = node.data.get("label").cloned();
        node.data = record.data;
        if !node.data.contains_key("label") {
            let label = previous_label
                .unwrap_or_else(|| Value::String(node.node_type.default_label()));
            node.data.insert("label".to_string(), label);
        }
    }

    /// Applies a drag-stop position locally, mirroring the widget.
    pub fn apply_moved(&mut self, node_id: NodeId, position: Position) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == node_id) {
            node.position = position;
        }
    }

    /// Removes a server-confirmed deleted node.
    ///
    /// Every local edge touching the node goes with it (the view must
    /// never show an edge whose endpoint is gone), and a selection
    /// pointing at it is cleared.
    pub fn apply_node_removed(&mut self, node_id: NodeId) {
        self.nodes.retain(|node| node.id != node_id);
        self.edges
            .retain(|edge| edge.source != node_id && edge.target != node_id);
        if self.selected == Some(node_id) {
            self.selected = None;
        }
        self.pending.forget(node_id);
    }

    /// Appends a server-confirmed edge.
    pub fn apply_edge_created(&mut self, record: EdgeRecord) {
        self.edges.push(CanvasEdge::from(record));
    }

    /// Removes a server-confirmed deleted edge.
    pub fn apply_edge_removed(&mut self, edge_id: EdgeId) {
        self.edges.retain(|edge| edge.id != edge_id);
    }

    /// Sets or clears the selection. Ids not present in the node set are
    /// treated as a clear, upholding the selection invariant.
    pub fn select(&mut self, node_id: Option<NodeId>) {
        self.selected = node_id.filter(|id| self.nodes.iter().any(|node| node.id == *id));
    }
}
