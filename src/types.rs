//! Core identifier and domain types shared across the flowdeck engine.
//!
//! These are the vocabulary types of the synchronized graph model: typed
//! node kinds, server-assigned entity ids, and canvas positions. Wire
//! payload shapes built from them live in [`crate::api::payloads`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a workflow node, fixed at creation time.
///
/// Node types determine which configuration fields the inspector exposes
/// (see [`crate::inspector::NodeConfig`]) and how the remote execution
/// engine treats the node. The type tag never changes after the node is
/// created.
///
/// # Examples
///
/// ```
/// use flowdeck::types::NodeType;
///
/// let t = NodeType::Llm;
/// assert_eq!(t.as_str(), "LLM");
/// assert_eq!(t.default_label(), "LLM node");
/// assert_eq!(NodeType::from("INPUT"), NodeType::Input);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Entry node carrying sample input for the workflow.
    #[serde(rename = "INPUT")]
    Input,
    /// Model invocation node with prompt and sampling configuration.
    #[serde(rename = "LLM")]
    Llm,
    /// Terminal node naming the key the run result is published under.
    #[serde(rename = "OUTPUT")]
    Output,
}

impl NodeType {
    /// The wire/display form of the type tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Input => "INPUT",
            NodeType::Llm => "LLM",
            NodeType::Output => "OUTPUT",
        }
    }

    /// Default `label` installed in a node's data bag when the server
    /// response carries none.
    #[must_use]
    pub fn default_label(&self) -> String {
        format!("{} node", self.as_str())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        match s {
            "LLM" => NodeType::Llm,
            "OUTPUT" => NodeType::Output,
            _ => NodeType::Input,
        }
    }
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Server-assigned workflow identifier.
    WorkflowId
);
id_type!(
    /// Server-assigned node identifier, unique within a workflow.
    NodeId
);
id_type!(
    /// Server-assigned edge identifier, unique within a workflow.
    EdgeId
);
id_type!(
    /// Server-assigned execution identifier.
    ExecutionId
);

/// A node's position on the canvas, in widget coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
