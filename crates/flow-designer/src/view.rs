//! Transient view state
//!
//! Pan/zoom, selection and the in-progress drag. Nothing here is persisted;
//! the whole struct is discarded when the session closes.

use serde::Serialize;

use crate::constants::canvas;
use crate::geometry::{Point, Size};
use crate::types::{ConnectionId, NodeId};

/// What the pointer is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragState {
    #[default]
    Idle,
    /// Moving a node; `grab_offset` is pointer minus node origin in graph space
    #[serde(rename_all = "camelCase")]
    DraggingNode { node_id: NodeId, grab_offset: Point },
    /// Drawing a rubber-band connection from an output port
    #[serde(rename_all = "camelCase")]
    ConnectingFrom { node_id: NodeId, port_index: usize },
    /// Panning; `last` is the previous pointer position in screen space
    Panning { last: Point },
}

/// Pan/zoom transform plus selection and drag state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: f64,
    /// Screen-space offset of the graph origin
    pub pan: Point,
    pub selected_node: Option<NodeId>,
    pub selected_connection: Option<ConnectionId>,
    pub drag: DragState,
    /// Last known pointer position in graph space
    pub pointer: Option<Point>,
    /// Drawing surface size in screen pixels
    pub surface_size: Size,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
            selected_node: None,
            selected_connection: None,
            drag: DragState::Idle,
            pointer: None,
            surface_size: Size::new(canvas::DEFAULT_WIDTH, canvas::DEFAULT_HEIGHT),
        }
    }
}

impl ViewState {
    /// `graph = (screen - pan) / zoom`
    pub fn screen_to_graph(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// `screen = graph * zoom + pan`
    pub fn graph_to_screen(&self, graph: Point) -> Point {
        Point::new(
            graph.x * self.zoom + self.pan.x,
            graph.y * self.zoom + self.pan.y,
        )
    }

    /// Centre of the drawing surface in screen space
    pub fn viewport_center(&self) -> Point {
        Point::new(self.surface_size.width / 2.0, self.surface_size.height / 2.0)
    }

    /// Visible region in graph space as (top-left, bottom-right)
    pub fn visible_graph_bounds(&self) -> (Point, Point) {
        let top_left = self.screen_to_graph(Point::default());
        let bottom_right = self.screen_to_graph(Point::new(
            self.surface_size.width,
            self.surface_size.height,
        ));
        (top_left, bottom_right)
    }

    /// Multiply zoom by `factor`, clamped to `[min, max]`, keeping the graph
    /// point under `anchor` (screen space) fixed. Returns whether zoom changed.
    ///
    /// Inverted bounds do not panic; `max` wins.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, min: f64, max: f64) -> bool {
        let new_zoom = (self.zoom * factor).max(min).min(max);
        if new_zoom == self.zoom {
            return false;
        }
        let anchored = self.screen_to_graph(anchor);
        self.zoom = new_zoom;
        self.pan = Point::new(
            anchor.x - anchored.x * new_zoom,
            anchor.y - anchored.y * new_zoom,
        );
        true
    }

    /// Shift the pan offset by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.offset(dx, dy);
    }

    /// Back to zoom 1 with the graph origin at the top-left corner
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }

    pub fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_connection = None;
    }

    /// Drop any selection or drag that refers to a node that no longer exists
    pub fn forget_node(&mut self, node_id: NodeId) {
        if self.selected_node == Some(node_id) {
            self.selected_node = None;
        }
        let dragging_it = match self.drag {
            DragState::DraggingNode { node_id: n, .. } | DragState::ConnectingFrom { node_id: n, .. } => {
                n == node_id
            }
            _ => false,
        };
        if dragging_it {
            self.drag = DragState::Idle;
        }
    }
}
