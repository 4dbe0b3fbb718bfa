//! Stored automation document
//!
//! What gets persisted: metadata, the compiled rule lists (the executable
//! artifact) and the editor layout (round-trip state for the designer).
//! The rule lists alone cannot rebuild the graph since compilation drops
//! wiring and uncompiled node types, so both are stored side by side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compiler::RuleSet;
use crate::graph::FlowGraph;
use crate::node_config::NodeConfig;

/// Name, description and enabled flag from the designer's header fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Default for AutomationMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            enabled: true,
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A persisted automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationDocument {
    /// Assigned by the store; absent until first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub meta: AutomationMeta,
    #[serde(flatten)]
    pub rules: RuleSet,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "flow")]
    pub layout: Option<Layout>,
}

/// Editor layout: every node (compiled or not) and every connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub nodes: Vec<LayoutNode>,
    #[serde(default)]
    pub connections: Vec<LayoutConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub x: f64,
    pub y: f64,
    /// The node's config fields
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConnection {
    pub from: String,
    #[serde(default)]
    pub from_port: usize,
    pub to: String,
    #[serde(default)]
    pub to_port: usize,
}

impl Layout {
    /// Snapshot a graph
    pub fn capture(graph: &FlowGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| LayoutNode {
                id: node.id.to_string(),
                type_id: node.type_id().to_string(),
                x: node.position.x,
                y: node.position.y,
                data: config_data(&node.config),
            })
            .collect();
        let connections = graph
            .connections()
            .iter()
            .map(|conn| LayoutConnection {
                from: conn.from_node.to_string(),
                from_port: conn.from_port,
                to: conn.to_node.to_string(),
                to_port: conn.to_port,
            })
            .collect();
        Self { nodes, connections }
    }
}

impl LayoutNode {
    /// Typed config for this node; missing fields take their defaults
    pub fn config(&self) -> serde_json::Result<NodeConfig> {
        let data = match &self.data {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        serde_json::from_value(serde_json::json!({ "type": self.type_id, "data": data }))
    }
}

/// The `data` half of a config's `{type, data}` form
fn config_data(config: &NodeConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(Value::Object(mut tagged)) => tagged
            .remove("data")
            .unwrap_or_else(|| Value::Object(Map::new())),
        _ => Value::Object(Map::new()),
    }
}
