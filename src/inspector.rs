//! Typed view over a node's configuration bag.
//!
//! The wire keeps node configuration as an opaque JSON object whose shape
//! depends on the node type. The inspector adapter gives that bag a
//! tagged-union representation (one strongly-typed variant per node type,
//! with unknown fields carried along untouched) so field editing is an
//! exhaustive match instead of optional-field probing. Persistence is not
//! handled here: the workbench forwards the rebuilt bag to the node
//! update operation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::CanvasNode;
use crate::types::NodeType;

/// Default sampling temperature for LLM nodes.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Configuration fields of an INPUT node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sample_input: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration fields of an LLM node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration fields of an OUTPUT node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub output_key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node's configuration, keyed by its type tag.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeConfig {
    Input(InputConfig),
    Llm(LlmConfig),
    Output(OutputConfig),
}

impl NodeConfig {
    /// Decodes a data bag under the given type tag.
    pub fn from_bag(
        node_type: NodeType,
        bag: &Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let value = Value::Object(bag.clone());
        Ok(match node_type {
            NodeType::Input => NodeConfig::Input(serde_json::from_value(value)?),
            NodeType::Llm => NodeConfig::Llm(serde_json::from_value(value)?),
            NodeType::Output => NodeConfig::Output(serde_json::from_value(value)?),
        })
    }

    /// Decodes the configuration of a canvas node.
    pub fn for_node(node: &CanvasNode) -> Result<Self, serde_json::Error> {
        Self::from_bag(node.node_type, &node.data)
    }

    /// The node type this configuration belongs to.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeConfig::Input(_) => NodeType::Input,
            NodeConfig::Llm(_) => NodeType::Llm,
            NodeConfig::Output(_) => NodeType::Output,
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            NodeConfig::Input(config) => &config.label,
            NodeConfig::Llm(config) => &config.label,
            NodeConfig::Output(config) => &config.label,
        }
    }

    /// Replaces one field, returning the rebuilt full data bag.
    ///
    /// Typed fields reject values of the wrong JSON type; keys outside
    /// the variant's schema land in the additive `extra` map and survive
    /// round trips untouched.
    pub fn set_field(mut self, key: &str, value: Value) -> Result<Map<String, Value>, serde_json::Error> {
        match &mut self {
            NodeConfig::Input(config) => match key {
                "label" => config.label = serde_json::from_value(value)?,
                "sample_input" => config.sample_input = serde_json::from_value(value)?,
                other => {
                    config.extra.insert(other.to_string(), value);
                }
            },
            NodeConfig::Llm(config) => match key {
                "label" => config.label = serde_json::from_value(value)?,
                "model" => config.model = serde_json::from_value(value)?,
                "prompt" => config.prompt = serde_json::from_value(value)?,
                "temperature" => config.temperature = serde_json::from_value(value)?,
                other => {
                    config.extra.insert(other.to_string(), value);
                }
            },
            NodeConfig::Output(config) => match key {
                "label" => config.label = serde_json::from_value(value)?,
                "output_key" => config.output_key = serde_json::from_value(value)?,
                other => {
                    config.extra.insert(other.to_string(), value);
                }
            },
        }
        self.into_bag()
    }

    /// Serializes the configuration back into a full data bag.
    pub fn into_bag(self) -> Result<Map<String, Value>, serde_json::Error> {
        let value = match self {
            NodeConfig::Input(config) => serde_json::to_value(config)?,
            NodeConfig::Llm(config) => serde_json::to_value(config)?,
            NodeConfig::Output(config) => serde_json::to_value(config)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            // flattened structs always serialize to objects
            _ => unreachable!("node config serialized to a non-object"),
        }
    }
}

/// Widget kind for one editable field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Number { min: f64, max: f64, step: f64 },
}

/// Description of one editable field, for widget construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
}

const INPUT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "label",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "sample_input",
        kind: FieldKind::MultilineText,
    },
];

const LLM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "label",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "model",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "prompt",
        kind: FieldKind::MultilineText,
    },
    FieldSpec {
        key: "temperature",
        kind: FieldKind::Number {
            min: 0.0,
            max: 2.0,
            step: 0.1,
        },
    },
];

const OUTPUT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "label",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "output_key",
        kind: FieldKind::Text,
    },
];

/// The editable fields for a node type, in display order.
///
/// Numeric bounds are advisory: they size the input widget, they are not
/// enforced beyond it.
#[must_use]
pub fn field_specs(node_type: NodeType) -> &'static [FieldSpec] {
    match node_type {
        NodeType::Input => INPUT_FIELDS,
        NodeType::Llm => LLM_FIELDS,
        NodeType::Output => OUTPUT_FIELDS,
    }
}
