//! Advisory graph validation
//!
//! Reports structural problems before save. Nothing here blocks saving; the
//! compiler ignores wiring, so these are hints for the author.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::compiler::has_compiled_semantics;
use crate::descriptor::{NodeCategory, PortDirection};
use crate::graph::FlowGraph;
use crate::registry::NodeTypeRegistry;
use crate::types::{ConnectionId, NodeId};

/// A problem found in a graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Connection '{connection_id}' references missing node '{node_id}'")]
    DanglingEndpoint {
        connection_id: ConnectionId,
        node_id: NodeId,
    },

    #[error("Connection '{connection_id}' uses {direction} port {index} but the node has {count}")]
    PortOutOfRange {
        connection_id: ConnectionId,
        direction: PortDirection,
        index: usize,
        count: usize,
    },

    #[error("Connection '{connection_id}' loops node '{node_id}' back to itself")]
    SelfLoop {
        connection_id: ConnectionId,
        node_id: NodeId,
    },

    #[error("Connections form a cycle")]
    CycleDetected,

    #[error("Automation has no trigger")]
    MissingTrigger,

    #[error("Automation has no action")]
    MissingAction,

    /// Only reported once the graph uses wiring at all
    #[error("Node '{node_id}' has no connections")]
    OrphanedNode { node_id: NodeId },

    #[error("Node '{node_id}' has unknown type '{type_id}'")]
    UnknownNodeType { node_id: NodeId, type_id: String },

    /// Saved in the layout only; produces no rule entry
    #[error("Node '{node_id}' ({type_id}) is not compiled into the automation")]
    NotCompiled { node_id: NodeId, type_id: String },
}

/// Validate a graph against a registry
///
/// Returns all issues found (not just the first).
pub fn validate_graph(graph: &FlowGraph, registry: &NodeTypeRegistry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_connections(graph, registry, &mut issues);
    detect_cycles(graph, &mut issues);
    validate_categories(graph, registry, &mut issues);
    detect_orphans(graph, &mut issues);
    validate_node_types(graph, registry, &mut issues);

    issues
}

/// Endpoints exist, ports are in range, no self-loops
fn validate_connections(
    graph: &FlowGraph,
    registry: &NodeTypeRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    for conn in graph.connections() {
        let mut dangling = false;
        for node_id in [conn.from_node, conn.to_node] {
            if graph.node(node_id).is_none() {
                dangling = true;
                issues.push(ValidationIssue::DanglingEndpoint {
                    connection_id: conn.id,
                    node_id,
                });
            }
        }
        if conn.from_node == conn.to_node {
            issues.push(ValidationIssue::SelfLoop {
                connection_id: conn.id,
                node_id: conn.from_node,
            });
        }
        if dangling {
            continue;
        }

        for (node_id, direction, index) in [
            (conn.from_node, PortDirection::Output, conn.from_port),
            (conn.to_node, PortDirection::Input, conn.to_port),
        ] {
            let Some(node) = graph.node(node_id) else {
                continue;
            };
            let Ok(descriptor) = registry.describe(node.type_id()) else {
                continue;
            };
            let count = descriptor.port_count(direction);
            if index >= count {
                issues.push(ValidationIssue::PortOutOfRange {
                    connection_id: conn.id,
                    direction,
                    index,
                    count,
                });
            }
        }
    }
}

/// Detect cycles using Kahn's algorithm (topological sort)
fn detect_cycles(graph: &FlowGraph, issues: &mut Vec<ValidationIssue>) {
    let mut in_degree: HashMap<NodeId, usize> = graph.nodes().map(|n| (n.id, 0)).collect();
    for conn in graph.connections() {
        if let Some(deg) = in_degree.get_mut(&conn.to_node) {
            *deg += 1;
        }
    }

    let mut queue: VecDeque<NodeId> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(node_id) = queue.pop_front() {
        visited += 1;
        for conn in graph.connections() {
            if conn.from_node == node_id {
                if let Some(deg) = in_degree.get_mut(&conn.to_node) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(conn.to_node);
                    }
                }
            }
        }
    }

    if visited < in_degree.len() {
        issues.push(ValidationIssue::CycleDetected);
    }
}

/// An automation needs something to start it and something to do
fn validate_categories(
    graph: &FlowGraph,
    registry: &NodeTypeRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    let categories: HashSet<NodeCategory> = graph
        .nodes()
        .filter_map(|n| registry.describe(n.type_id()).ok())
        .map(|d| d.category)
        .collect();
    if !categories.contains(&NodeCategory::Trigger) {
        issues.push(ValidationIssue::MissingTrigger);
    }
    if !categories.contains(&NodeCategory::Action) {
        issues.push(ValidationIssue::MissingAction);
    }
}

fn detect_orphans(graph: &FlowGraph, issues: &mut Vec<ValidationIssue>) {
    if graph.connections().is_empty() {
        return;
    }
    let wired: HashSet<NodeId> = graph
        .connections()
        .iter()
        .flat_map(|c| [c.from_node, c.to_node])
        .collect();
    for node in graph.nodes() {
        if !wired.contains(&node.id) {
            issues.push(ValidationIssue::OrphanedNode { node_id: node.id });
        }
    }
}

fn validate_node_types(
    graph: &FlowGraph,
    registry: &NodeTypeRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    for node in graph.nodes() {
        let type_id = node.type_id();
        if !registry.has_node_type(type_id) {
            issues.push(ValidationIssue::UnknownNodeType {
                node_id: node.id,
                type_id: type_id.to_string(),
            });
        } else if !has_compiled_semantics(type_id) {
            issues.push(ValidationIssue::NotCompiled {
                node_id: node.id,
                type_id: type_id.to_string(),
            });
        }
    }
}
