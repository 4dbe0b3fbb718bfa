//! Load path: stored automation -> editor graph
//!
//! Nothing here fails. Bad input degrades to fewer nodes plus a warning per
//! dropped item, and a payload that is not an automation at all yields an
//! empty graph.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{decompile, to_automation, Action, CompiledRule, Condition, RuleSet, Trigger};
use crate::automation::{AutomationDocument, AutomationMeta, LayoutConnection, LayoutNode};
use crate::constants::layout;
use crate::geometry::Point;
use crate::graph::FlowGraph;
use crate::registry::NodeTypeRegistry;
use crate::types::NodeId;

/// Result of loading a stored automation
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub id: Option<String>,
    pub meta: AutomationMeta,
    pub graph: FlowGraph,
    /// Rule lists as stored (after dropping unreadable entries)
    pub rules: RuleSet,
    /// User-visible notes about anything that was dropped
    pub warnings: Vec<String>,
}

impl LoadOutcome {
    fn empty(warning: String) -> Self {
        log::warn!("{}", warning);
        Self {
            id: None,
            meta: AutomationMeta::default(),
            graph: FlowGraph::new(),
            rules: RuleSet::default(),
            warnings: vec![warning],
        }
    }
}

/// Rebuild a graph from a typed document
pub fn from_document(document: &AutomationDocument, registry: &NodeTypeRegistry) -> LoadOutcome {
    match serde_json::to_value(document) {
        Ok(payload) => from_automation(&payload, registry),
        Err(e) => LoadOutcome::empty(format!("Automation could not be read: {}", e)),
    }
}

/// Rebuild a graph from a raw automation payload.
///
/// A present layout is authoritative; otherwise one node per understood
/// rule entry is placed on a per-category grid.
pub fn from_automation(payload: &Value, registry: &NodeTypeRegistry) -> LoadOutcome {
    let Some(object) = payload.as_object() else {
        return LoadOutcome::empty("Automation payload is not an object; starting empty".to_string());
    };

    let mut warnings = Vec::new();
    let id = match object.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let meta = AutomationMeta {
        name: str_field(payload, "name"),
        description: str_field(payload, "description"),
        enabled: payload
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    };
    let rules = RuleSet {
        triggers: parse_entries::<Trigger>(payload, "triggers", &mut warnings),
        conditions: parse_entries::<Condition>(payload, "conditions", &mut warnings),
        actions: parse_entries::<Action>(payload, "actions", &mut warnings),
    };

    let layout = object
        .get("layout")
        .or_else(|| object.get("flow"))
        .filter(|v| !v.is_null());
    let graph = match layout {
        Some(Value::Object(layout)) => {
            let graph = graph_from_layout(layout, registry, &mut warnings);
            if to_automation(&graph) != rules {
                log::warn!(
                    "Stored rules for '{}' differ from its layout; the layout wins",
                    meta.name
                );
            }
            graph
        }
        Some(_) => {
            warnings.push("Layout is malformed; rebuilt nodes from rules".to_string());
            graph_from_rules(&rules, registry)
        }
        None => graph_from_rules(&rules, registry),
    };

    for warning in &warnings {
        log::warn!("Load: {}", warning);
    }
    LoadOutcome {
        id,
        meta,
        graph,
        rules,
        warnings,
    }
}

fn str_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse each entry of a rule list on its own, dropping the unreadable ones
fn parse_entries<T: DeserializeOwned>(
    payload: &Value,
    key: &str,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    let entries = match payload.get(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            warnings.push(format!("'{}' is not a list; ignored", key));
            return Vec::new();
        }
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warnings.push(format!("Dropped {} entry {}: {}", key, i, e));
                None
            }
        })
        .collect()
}

fn graph_from_layout(
    layout: &serde_json::Map<String, Value>,
    registry: &NodeTypeRegistry,
    warnings: &mut Vec<String>,
) -> FlowGraph {
    let mut graph = FlowGraph::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();

    let nodes: Vec<LayoutNode> = parse_entries(&Value::Object(layout.clone()), "nodes", warnings);
    for node in nodes {
        if !registry.has_node_type(&node.type_id) {
            warnings.push(format!(
                "Dropped node '{}' of unknown type '{}'",
                node.id, node.type_id
            ));
            continue;
        }
        let config = match node.config() {
            Ok(config) => config,
            Err(e) => {
                warnings.push(format!(
                    "Node '{}' has unreadable settings ({}); using defaults",
                    node.id, e
                ));
                match crate::node_config::NodeConfig::default_for(&node.type_id) {
                    Some(config) => config,
                    None => continue,
                }
            }
        };
        let preferred = node.id.parse::<NodeId>().ok();
        match graph.restore_node(registry, preferred, Point::new(node.x, node.y), config) {
            Ok(id) => {
                ids.insert(node.id, id);
            }
            Err(e) => warnings.push(format!("Dropped node '{}': {}", node.id, e)),
        }
    }

    let connections: Vec<LayoutConnection> =
        parse_entries(&Value::Object(layout.clone()), "connections", warnings);
    for conn in connections {
        let (Some(&from), Some(&to)) = (ids.get(&conn.from), ids.get(&conn.to)) else {
            warnings.push(format!(
                "Dropped connection {} -> {}: endpoint missing",
                conn.from, conn.to
            ));
            continue;
        };
        if let Err(e) = graph.add_connection(registry, from, conn.from_port, to, conn.to_port) {
            warnings.push(format!(
                "Dropped connection {} -> {}: {}",
                conn.from, conn.to, e
            ));
        }
    }
    graph
}

/// One node per rule entry: triggers, conditions and actions each get a column
fn graph_from_rules(rules: &RuleSet, registry: &NodeTypeRegistry) -> FlowGraph {
    let mut graph = FlowGraph::new();
    let columns: [(f64, Vec<CompiledRule>); 3] = [
        (
            layout::TRIGGER_COLUMN_X,
            rules.triggers.iter().cloned().map(CompiledRule::Trigger).collect(),
        ),
        (
            layout::CONDITION_COLUMN_X,
            rules
                .conditions
                .iter()
                .cloned()
                .map(CompiledRule::Condition)
                .collect(),
        ),
        (
            layout::ACTION_COLUMN_X,
            rules.actions.iter().cloned().map(CompiledRule::Action).collect(),
        ),
    ];
    for (x, entries) in columns {
        for (row, rule) in entries.iter().enumerate() {
            let position = Point::new(x, layout::FIRST_ROW_Y + row as f64 * layout::ROW_SPACING);
            if let Err(e) = graph.restore_node(registry, None, position, decompile(rule)) {
                log::warn!("Could not place node for {:?}: {}", rule, e);
            }
        }
    }
    graph
}
