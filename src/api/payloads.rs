//! Wire payload types for the backend API.
//!
//! Shapes mirror the backend schemas field for field; request bodies only
//! carry what the corresponding endpoint accepts, and optional fields are
//! skipped when absent so PATCH bodies stay partial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{EdgeId, ExecutionId, NodeId, NodeType, Position, WorkflowId};

/// Login / registration credentials.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
}

/// The authenticated user's profile.
#[derive(Clone, Debug, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A workflow as the server reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub owner_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /workflows`.
#[derive(Clone, Debug, Serialize)]
pub struct WorkflowCreate {
    pub name: String,
}

/// Body for `PATCH /workflows/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct WorkflowUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A node as the server reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub workflow_id: WorkflowId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: Map<String, Value>,
    pub position_x: f64,
    pub position_y: f64,
}

impl NodeRecord {
    /// The node's canvas position.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.position_x, self.position_y)
    }
}

/// Body for `POST /nodes`.
#[derive(Clone, Debug, Serialize)]
pub struct NodeCreate {
    pub workflow_id: WorkflowId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: Map<String, Value>,
    pub position_x: f64,
    pub position_y: f64,
}

/// Body for `PATCH /nodes/{id}`; only set fields are sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
}

impl NodeUpdate {
    /// An update replacing the node's data bag.
    #[must_use]
    pub fn data(data: Map<String, Value>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// An update moving the node.
    #[must_use]
    pub fn position(position: Position) -> Self {
        Self {
            position_x: Some(position.x),
            position_y: Some(position.y),
            ..Self::default()
        }
    }
}

/// An edge as the server reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub workflow_id: WorkflowId,
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
}

/// Body for `POST /edges`.
#[derive(Clone, Debug, Serialize)]
pub struct EdgeCreate {
    pub workflow_id: WorkflowId,
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
}

/// An execution as the server reports it.
///
/// The status string is displayed verbatim; the client does not interpret
/// or poll it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub status: String,
    #[serde(default)]
    pub input_data: Option<Value>,
    #[serde(default)]
    pub output_data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Body for `POST /executions`.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionCreate {
    pub workflow_id: WorkflowId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<Value>,
}

/// Error body shape the backend uses for rejections.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
