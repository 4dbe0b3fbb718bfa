//! Flow graph model
//!
//! Owns nodes and connections for one designer session. Every construction
//! checks the registry first, so the graph never holds a node of an unknown
//! type or a connection to a port its type does not declare.

use std::collections::BTreeMap;

use crate::descriptor::PortDirection;
use crate::error::{DesignerError, Result};
use crate::geometry::Point;
use crate::node_config::NodeConfig;
use crate::registry::NodeTypeRegistry;
use crate::types::{Connection, ConnectionId, Node, NodeId};

/// Nodes and connections of one automation
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    /// Keyed by id; iteration order is creation order, which is also paint order
    nodes: BTreeMap<NodeId, Node>,
    connections: Vec<Connection>,
    next_node: u64,
    next_connection: u64,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            connections: Vec::new(),
            next_node: 1,
            next_connection: 1,
        }
    }

    /// Nodes in paint order (bottom first)
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Place a new node of `type_id` with its default config
    pub fn add_node(
        &mut self,
        registry: &NodeTypeRegistry,
        type_id: &str,
        position: Point,
    ) -> Result<NodeId> {
        let descriptor = registry.describe(type_id)?;
        let id = self.allocate_node_id();
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                size: descriptor.size,
                config: descriptor.default_config.clone(),
            },
        );
        Ok(id)
    }

    /// Insert a node with an existing config, keeping `preferred_id` when it is free.
    ///
    /// Used when rebuilding a graph from a stored automation.
    pub fn restore_node(
        &mut self,
        registry: &NodeTypeRegistry,
        preferred_id: Option<NodeId>,
        position: Point,
        config: NodeConfig,
    ) -> Result<NodeId> {
        let descriptor = registry.describe(config.type_id())?;
        let id = match preferred_id {
            Some(id) if !self.nodes.contains_key(&id) => {
                if let Some(next) = id.0.checked_add(1) {
                    self.next_node = self.next_node.max(next);
                }
                id
            }
            _ => self.allocate_node_id(),
        };
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                size: descriptor.size,
                config,
            },
        );
        Ok(id)
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the number of connections removed, or `None` if the node did
    /// not exist (no-op).
    pub fn delete_node(&mut self, id: NodeId) -> Option<usize> {
        self.nodes.remove(&id)?;
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        Some(before - self.connections.len())
    }

    /// Connect an output port to an input port.
    ///
    /// Rejected when either node is missing, a port index is out of range for
    /// its direction, the endpoints are the same node, or an identical
    /// connection exists. Several connections may share one input port.
    pub fn add_connection(
        &mut self,
        registry: &NodeTypeRegistry,
        from: NodeId,
        from_port: usize,
        to: NodeId,
        to_port: usize,
    ) -> Result<ConnectionId> {
        self.check_port(registry, from, PortDirection::Output, from_port)?;
        self.check_port(registry, to, PortDirection::Input, to_port)?;

        if from == to {
            return Err(DesignerError::SelfLoop(from));
        }
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.same_endpoints(from, from_port, to, to_port))
        {
            return Err(DesignerError::DuplicateConnection(existing.id));
        }

        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections.push(Connection {
            id,
            from_node: from,
            from_port,
            to_node: to,
            to_port,
        });
        Ok(id)
    }

    /// Remove a connection; returns whether it existed
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        before != self.connections.len()
    }

    /// Move a node's top-left corner
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(DesignerError::NodeNotFound(id))?;
        node.position = position;
        Ok(())
    }

    /// Replace a node's config. The new config must be for the node's own type.
    pub fn set_config(&mut self, id: NodeId, config: NodeConfig) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(DesignerError::NodeNotFound(id))?;
        if node.type_id() != config.type_id() {
            return Err(DesignerError::invalid_field(
                "type",
                format!("config for '{}'", node.type_id()),
            ));
        }
        node.config = config;
        Ok(())
    }

    /// Push a connection without any checks, for exercising validation
    #[cfg(test)]
    pub(crate) fn insert_unchecked_connection(
        &mut self,
        from_node: NodeId,
        from_port: usize,
        to_node: NodeId,
        to_port: usize,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections.push(Connection {
            id,
            from_node,
            from_port,
            to_node,
            to_port,
        });
        id
    }

    /// Remove everything; ids keep counting up
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
    }

    /// Centre of a port in graph space.
    ///
    /// Inputs sit on the left edge, outputs on the right, spread evenly over
    /// the node height.
    pub fn port_position(
        &self,
        registry: &NodeTypeRegistry,
        node_id: NodeId,
        direction: PortDirection,
        index: usize,
    ) -> Result<Point> {
        let count = self.check_port(registry, node_id, direction, index)?;
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(DesignerError::NodeNotFound(node_id))?;
        Ok(port_anchor(node, direction, index, count))
    }

    /// Validates the port and returns the port count for its direction
    fn check_port(
        &self,
        registry: &NodeTypeRegistry,
        node_id: NodeId,
        direction: PortDirection,
        index: usize,
    ) -> Result<usize> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(DesignerError::NodeNotFound(node_id))?;
        let count = registry.describe(node.type_id())?.port_count(direction);
        if index >= count {
            return Err(DesignerError::PortOutOfRange {
                node_id,
                direction,
                index,
                count,
            });
        }
        Ok(count)
    }

    /// Next unused id; restored nodes may already hold ids past the counter
    fn allocate_node_id(&mut self) -> NodeId {
        while self.nodes.contains_key(&NodeId(self.next_node)) {
            self.next_node = self.next_node.wrapping_add(1);
        }
        let id = NodeId(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        id
    }
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Port centre for a node whose type declares `count` ports in `direction`
pub fn port_anchor(node: &Node, direction: PortDirection, index: usize, count: usize) -> Point {
    let x = match direction {
        PortDirection::Input => node.position.x,
        PortDirection::Output => node.position.x + node.size.width,
    };
    let y = node.position.y + node.size.height * (index + 1) as f64 / (count + 1) as f64;
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_config::FieldValue;

    fn registry() -> NodeTypeRegistry {
        NodeTypeRegistry::with_builtins()
    }

    #[test]
    fn test_add_node_seeds_default_config() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let id = graph
            .add_node(&registry, "timeTrigger", Point::new(10.0, 20.0))
            .unwrap();
        assert_eq!(id, NodeId(1));

        let node = graph.node(id).unwrap();
        assert_eq!(node.type_id(), "timeTrigger");
        assert_eq!(node.position, Point::new(10.0, 20.0));
        assert_eq!(node.config, NodeConfig::default_for("timeTrigger").unwrap());
    }

    #[test]
    fn test_add_node_unknown_type() {
        let mut graph = FlowGraph::new();
        let result = graph.add_node(&registry(), "teleport", Point::default());
        assert_eq!(
            result,
            Err(DesignerError::UnknownNodeType("teleport".to_string()))
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_cascade_delete_removes_exactly_touching_connections() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let trigger = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let gate = graph.add_node(&registry, "andGate", Point::default()).unwrap();
        let other = graph.add_node(&registry, "sunsetTrigger", Point::default()).unwrap();
        let action = graph.add_node(&registry, "sceneAction", Point::default()).unwrap();

        graph.add_connection(&registry, trigger, 0, gate, 0).unwrap();
        graph.add_connection(&registry, other, 0, gate, 1).unwrap();
        let kept = graph.add_connection(&registry, gate, 0, action, 0).unwrap();
        let direct = graph.add_connection(&registry, other, 0, action, 0).unwrap();

        assert_eq!(graph.delete_node(trigger), Some(1));
        assert_eq!(graph.connections().len(), 3);

        assert_eq!(graph.delete_node(other), Some(2));
        let remaining: Vec<_> = graph.connections().iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![kept]);
        assert!(graph.connection(direct).is_none());

        // idempotent
        assert_eq!(graph.delete_node(other), None);
    }

    #[test]
    fn test_delete_source_keeps_target_config() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let b = graph.add_node(&registry, "deviceAction", Point::default()).unwrap();

        let mut config = graph.node(b).unwrap().config.clone();
        config
            .set_field("device", FieldValue::Text("light.hall".into()))
            .unwrap();
        graph.set_config(b, config.clone()).unwrap();

        graph.add_connection(&registry, a, 0, b, 0).unwrap();
        graph.delete_node(a);

        assert!(graph.connections().is_empty());
        assert_eq!(graph.node(b).unwrap().config, config);
    }

    #[test]
    fn test_port_range_rejection_leaves_connections_unchanged() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let trigger = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let condition = graph
            .add_node(&registry, "timeCondition", Point::default())
            .unwrap();
        let action = graph.add_node(&registry, "sceneAction", Point::default()).unwrap();
        graph.add_connection(&registry, trigger, 0, condition, 0).unwrap();
        let before = graph.connections().to_vec();

        let cases = [
            (trigger, 1, condition, 0, PortDirection::Output),
            (condition, 2, action, 0, PortDirection::Output),
            (condition, 0, action, 1, PortDirection::Input),
            // actions have no outputs at all
            (action, 0, condition, 0, PortDirection::Output),
        ];
        for (from, fp, to, tp, direction) in cases {
            match graph.add_connection(&registry, from, fp, to, tp) {
                Err(DesignerError::PortOutOfRange { direction: d, .. }) => assert_eq!(d, direction),
                other => panic!("expected port rejection, got {:?}", other),
            }
        }
        assert_eq!(graph.connections(), before.as_slice());
    }

    #[test]
    fn test_self_loop_and_duplicate_rejected() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let not = graph.add_node(&registry, "notGate", Point::default()).unwrap();
        let trigger = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();

        assert_eq!(
            graph.add_connection(&registry, not, 0, not, 0),
            Err(DesignerError::SelfLoop(not))
        );
        let first = graph.add_connection(&registry, trigger, 0, not, 0).unwrap();
        assert_eq!(
            graph.add_connection(&registry, trigger, 0, not, 0),
            Err(DesignerError::DuplicateConnection(first))
        );
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_fan_in_allowed() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let b = graph.add_node(&registry, "sunsetTrigger", Point::default()).unwrap();
        let action = graph.add_node(&registry, "sceneAction", Point::default()).unwrap();

        graph.add_connection(&registry, a, 0, action, 0).unwrap();
        graph.add_connection(&registry, b, 0, action, 0).unwrap();
        assert_eq!(graph.connections().len(), 2);
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        assert_eq!(
            graph.add_connection(&registry, a, 0, NodeId(99), 0),
            Err(DesignerError::NodeNotFound(NodeId(99)))
        );
    }

    #[test]
    fn test_delete_connection_idempotent() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let b = graph.add_node(&registry, "sceneAction", Point::default()).unwrap();
        let conn = graph.add_connection(&registry, a, 0, b, 0).unwrap();

        assert!(graph.delete_connection(conn));
        assert!(!graph.delete_connection(conn));
    }

    #[test]
    fn test_move_node() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        graph.move_node(a, Point::new(40.0, 60.0)).unwrap();
        assert_eq!(graph.node(a).unwrap().position, Point::new(40.0, 60.0));
        assert_eq!(
            graph.move_node(NodeId(42), Point::default()),
            Err(DesignerError::NodeNotFound(NodeId(42)))
        );
    }

    #[test]
    fn test_set_config_rejects_other_type() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let a = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        let wrong = NodeConfig::default_for("sceneAction").unwrap();
        assert!(graph.set_config(a, wrong).is_err());
    }

    #[test]
    fn test_port_positions_spread_over_height() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let cond = graph
            .add_node(&registry, "timeCondition", Point::new(100.0, 100.0))
            .unwrap();

        let input = graph
            .port_position(&registry, cond, PortDirection::Input, 0)
            .unwrap();
        assert_eq!(input, Point::new(100.0, 140.0));

        let true_out = graph
            .port_position(&registry, cond, PortDirection::Output, 0)
            .unwrap();
        let false_out = graph
            .port_position(&registry, cond, PortDirection::Output, 1)
            .unwrap();
        assert_eq!(true_out.x, 280.0);
        assert!((true_out.y - (100.0 + 80.0 / 3.0)).abs() < 1e-9);
        assert!((false_out.y - (100.0 + 160.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_restore_node_keeps_free_ids() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let config = NodeConfig::default_for("sceneAction").unwrap();
        let id = graph
            .restore_node(&registry, Some(NodeId(7)), Point::default(), config.clone())
            .unwrap();
        assert_eq!(id, NodeId(7));

        let taken = graph
            .restore_node(&registry, Some(NodeId(7)), Point::default(), config)
            .unwrap();
        assert_eq!(taken, NodeId(8));

        let fresh = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        assert_eq!(fresh, NodeId(9));
    }

    #[test]
    fn test_restore_node_at_id_ceiling() {
        let registry = registry();
        let mut graph = FlowGraph::new();
        let config = NodeConfig::default_for("sceneAction").unwrap();
        let last = graph
            .restore_node(&registry, Some(NodeId(u64::MAX)), Point::default(), config.clone())
            .unwrap();
        assert_eq!(last, NodeId(u64::MAX));

        let fresh = graph.add_node(&registry, "timeTrigger", Point::default()).unwrap();
        assert_ne!(fresh, last);
        let again = graph
            .restore_node(&registry, Some(NodeId(u64::MAX)), Point::default(), config)
            .unwrap();
        assert_ne!(again, last);
        assert_ne!(again, fresh);
        assert_eq!(graph.node_count(), 3);
    }
}
