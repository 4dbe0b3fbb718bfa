//! Pointer/keyboard state machine
//!
//! Translates raw input into graph mutations and view changes. Positions on
//! incoming events are in screen space; everything is converted to graph
//! space before hit-testing. Construction failures are reported as
//! `InteractionEffect::ConnectionRejected` and never propagate.

use serde::{Deserialize, Serialize};

use crate::config::DesignerConfig;
use crate::error::DesignerError;
use crate::geometry::Point;
use crate::graph::FlowGraph;
use crate::hit_test::{hit_test, HitTarget};
use crate::registry::NodeTypeRegistry;
use crate::types::{ConnectionId, NodeId};
use crate::view::{DragState, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Delete,
    Escape,
}

/// Raw input from the host surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown { position: Point, button: PointerButton },
    PointerMove { position: Point },
    PointerUp { position: Point, button: PointerButton },
    /// Negative `delta_y` zooms in
    #[serde(rename_all = "camelCase")]
    Wheel { position: Point, delta_y: f64 },
    DoubleClick { position: Point },
    /// Right-click
    ContextMenu { position: Point },
    Key { key: Key },
}

/// Observable result of one input event
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    NodeMoved(NodeId),
    NodeDeleted {
        node_id: NodeId,
        connections_removed: usize,
    },
    ConnectionAdded(ConnectionId),
    ConnectionDeleted(ConnectionId),
    ConnectionRejected(DesignerError),
    /// Double-click asked for the node's field-editing form
    OpenForm(NodeId),
    SelectionChanged,
    ViewChanged,
}

/// Borrowed view of everything the state machine reads and mutates
pub struct Interaction<'a> {
    pub graph: &'a mut FlowGraph,
    pub view: &'a mut ViewState,
    pub registry: &'a NodeTypeRegistry,
    pub config: &'a DesignerConfig,
}

impl Interaction<'_> {
    /// Feed one input event through the state machine
    pub fn handle(&mut self, event: InputEvent) -> Vec<InteractionEffect> {
        let mut effects = Vec::new();
        match event {
            InputEvent::PointerDown { position, button } => {
                self.pointer_down(position, button, &mut effects)
            }
            InputEvent::PointerMove { position } => self.pointer_move(position, &mut effects),
            InputEvent::PointerUp { position, .. } => self.pointer_up(position, &mut effects),
            InputEvent::Wheel { position, delta_y } => {
                let factor = if delta_y < 0.0 {
                    self.config.zoom_step
                } else if delta_y > 0.0 {
                    1.0 / self.config.zoom_step
                } else {
                    return effects;
                };
                if self
                    .view
                    .zoom_at(position, factor, self.config.zoom_min, self.config.zoom_max)
                {
                    effects.push(InteractionEffect::ViewChanged);
                }
            }
            InputEvent::DoubleClick { position } => {
                if let Some(node_id) = self.hit(position).node_id() {
                    effects.push(InteractionEffect::OpenForm(node_id));
                }
            }
            InputEvent::ContextMenu { position } => {
                let target = self.hit(position);
                self.cancel_drag(&mut effects);
                match target {
                    HitTarget::Connection { connection_id } => {
                        self.delete_connection(connection_id, &mut effects)
                    }
                    other => {
                        if let Some(node_id) = other.node_id() {
                            self.delete_node(node_id, &mut effects);
                        }
                    }
                }
            }
            InputEvent::Key { key: Key::Delete } => {
                if let Some(node_id) = self.view.selected_node {
                    self.delete_node(node_id, &mut effects);
                } else if let Some(connection_id) = self.view.selected_connection {
                    self.delete_connection(connection_id, &mut effects);
                }
            }
            InputEvent::Key { key: Key::Escape } => self.cancel_drag(&mut effects),
        }
        effects
    }

    fn hit(&mut self, screen: Point) -> HitTarget {
        let point = self.view.screen_to_graph(screen);
        self.view.pointer = Some(point);
        hit_test(self.graph, self.registry, self.config, self.view.zoom, point)
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        effects: &mut Vec<InteractionEffect>,
    ) {
        match button {
            PointerButton::Middle => {
                self.view.drag = DragState::Panning { last: position };
                log::debug!("drag: Idle -> Panning");
                return;
            }
            PointerButton::Secondary => return,
            PointerButton::Primary => {}
        }

        let target = self.hit(position);
        match target {
            HitTarget::OutputPort {
                node_id,
                port_index,
            } => {
                self.view.drag = DragState::ConnectingFrom {
                    node_id,
                    port_index,
                };
                log::debug!("drag: Idle -> ConnectingFrom({}, {})", node_id, port_index);
                effects.push(InteractionEffect::ViewChanged);
            }
            HitTarget::InputPort { node_id, .. } | HitTarget::Node { node_id } => {
                let Some(node) = self.graph.node(node_id) else {
                    return;
                };
                let pointer = self.view.screen_to_graph(position);
                self.view.drag = DragState::DraggingNode {
                    node_id,
                    grab_offset: pointer.sub(node.position),
                };
                self.select(Some(node_id), None, effects);
                log::debug!("drag: Idle -> DraggingNode({})", node_id);
            }
            HitTarget::Connection { connection_id } => {
                self.select(None, Some(connection_id), effects);
            }
            HitTarget::Canvas => self.select(None, None, effects),
        }
    }

    fn pointer_move(&mut self, position: Point, effects: &mut Vec<InteractionEffect>) {
        let pointer = self.view.screen_to_graph(position);
        self.view.pointer = Some(pointer);
        match self.view.drag {
            DragState::DraggingNode {
                node_id,
                grab_offset,
            } => {
                let target = pointer.sub(grab_offset);
                if self.graph.move_node(node_id, target).is_ok() {
                    effects.push(InteractionEffect::NodeMoved(node_id));
                } else {
                    self.view.drag = DragState::Idle;
                }
            }
            DragState::ConnectingFrom { .. } => effects.push(InteractionEffect::ViewChanged),
            DragState::Panning { last } => {
                self.view.pan_by(position.x - last.x, position.y - last.y);
                self.view.drag = DragState::Panning { last: position };
                effects.push(InteractionEffect::ViewChanged);
            }
            DragState::Idle => {}
        }
    }

    fn pointer_up(&mut self, position: Point, effects: &mut Vec<InteractionEffect>) {
        let drag = std::mem::take(&mut self.view.drag);
        let DragState::ConnectingFrom {
            node_id: from,
            port_index: from_port,
        } = drag
        else {
            if drag != DragState::Idle {
                log::debug!("drag: {:?} -> Idle", drag);
            }
            return;
        };

        if let HitTarget::InputPort {
            node_id: to,
            port_index: to_port,
        } = self.hit(position)
        {
            match self
                .graph
                .add_connection(self.registry, from, from_port, to, to_port)
            {
                Ok(id) => effects.push(InteractionEffect::ConnectionAdded(id)),
                Err(e) => {
                    log::warn!("Connection rejected: {}", e);
                    effects.push(InteractionEffect::ConnectionRejected(e));
                }
            }
        } else {
            log::debug!("Pending connection from {} discarded", from);
        }
        effects.push(InteractionEffect::ViewChanged);
    }

    fn select(
        &mut self,
        node: Option<NodeId>,
        connection: Option<ConnectionId>,
        effects: &mut Vec<InteractionEffect>,
    ) {
        if self.view.selected_node != node || self.view.selected_connection != connection {
            self.view.selected_node = node;
            self.view.selected_connection = connection;
            effects.push(InteractionEffect::SelectionChanged);
        }
    }

    fn cancel_drag(&mut self, effects: &mut Vec<InteractionEffect>) {
        if self.view.drag != DragState::Idle {
            log::debug!("drag: {:?} cancelled", self.view.drag);
            self.view.drag = DragState::Idle;
            effects.push(InteractionEffect::ViewChanged);
        }
    }

    fn delete_node(&mut self, node_id: NodeId, effects: &mut Vec<InteractionEffect>) {
        if let Some(connections_removed) = self.graph.delete_node(node_id) {
            self.view.forget_node(node_id);
            if let Some(conn) = self.view.selected_connection {
                if self.graph.connection(conn).is_none() {
                    self.view.selected_connection = None;
                }
            }
            effects.push(InteractionEffect::NodeDeleted {
                node_id,
                connections_removed,
            });
        }
    }

    fn delete_connection(&mut self, id: ConnectionId, effects: &mut Vec<InteractionEffect>) {
        if self.graph.delete_connection(id) {
            if self.view.selected_connection == Some(id) {
                self.view.selected_connection = None;
            }
            effects.push(InteractionEffect::ConnectionDeleted(id));
        }
    }
}
