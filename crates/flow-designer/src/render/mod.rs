//! Renderer
//!
//! A pure read-and-paint pass over the graph and view state. Paint order is
//! grid, connections, pending rubber band, then nodes in creation order so
//! later nodes sit on top (matching hit-testing's topmost-first rule).

mod frame_loop;
mod surface;

pub use frame_loop::{run_timer, FrameLoop, FrameOutcome};
pub use surface::{DrawCommand, Font, RecordingSurface, Stroke, Surface};

use crate::config::DesignerConfig;
use crate::constants::colors;
use crate::descriptor::PortDirection;
use crate::geometry::Point;
use crate::graph::{port_anchor, FlowGraph};
use crate::hit_test::connection_curve;
use crate::registry::NodeTypeRegistry;
use crate::types::Node;
use crate::view::{DragState, ViewState};

const LABEL_FONT: Font = Font::new("Arial", 12.0);
const PREVIEW_FONT: Font = Font::new("Arial", 10.0);
const ICON_FONT: Font = Font::new("FontAwesome", 20.0);

/// Horizontal padding subtracted from the node width when wrapping labels
const LABEL_PADDING: f64 = 20.0;
const LABEL_LINE_HEIGHT: f64 = 15.0;
const PREVIEW_MAX_CHARS: usize = 20;

/// Everything one frame reads
pub struct Renderer<'a> {
    pub graph: &'a FlowGraph,
    pub registry: &'a NodeTypeRegistry,
    pub view: &'a ViewState,
    pub config: &'a DesignerConfig,
}

impl Renderer<'_> {
    /// Paint one full frame
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.view.surface_size);
        surface.save();
        surface.set_transform(self.view.zoom, self.view.pan);

        self.draw_grid(surface);
        for connection in self.graph.connections() {
            let Some(curve) =
                connection_curve(self.graph, self.registry, connection, self.config.curve_control_offset)
            else {
                continue;
            };
            let stroke = if self.view.selected_connection == Some(connection.id) {
                Stroke::new(colors::CONNECTION_SELECTED, 3.0)
            } else {
                Stroke::new(colors::CONNECTION, 2.0)
            };
            surface.stroke_bezier(&curve, stroke);
        }
        self.draw_pending_connection(surface);
        for node in self.graph.nodes() {
            self.draw_node(surface, node);
        }

        surface.restore();
    }

    /// Grid lines covering the visible viewport, aligned to the grid size
    fn draw_grid<S: Surface + ?Sized>(&self, surface: &mut S) {
        let grid = self.config.grid_size;
        let (top_left, bottom_right) = self.view.visible_graph_bounds();
        let start_x = (top_left.x / grid).floor() * grid;
        let start_y = (top_left.y / grid).floor() * grid;
        let end_x = bottom_right.x + grid;
        let end_y = bottom_right.y + grid;
        let stroke = Stroke::new(colors::GRID, 1.0);

        let mut x = start_x;
        while x < end_x {
            surface.stroke_line(Point::new(x, start_y), Point::new(x, end_y), stroke);
            x += grid;
        }
        let mut y = start_y;
        while y < end_y {
            surface.stroke_line(Point::new(start_x, y), Point::new(end_x, y), stroke);
            y += grid;
        }
    }

    fn draw_pending_connection<S: Surface + ?Sized>(&self, surface: &mut S) {
        let DragState::ConnectingFrom {
            node_id,
            port_index,
        } = self.view.drag
        else {
            return;
        };
        let (Some(pointer), Ok(origin)) = (
            self.view.pointer,
            self.graph
                .port_position(self.registry, node_id, PortDirection::Output, port_index),
        ) else {
            return;
        };
        surface.set_line_dash(&[5.0, 5.0]);
        surface.stroke_line(origin, pointer, Stroke::new(colors::PENDING_CONNECTION, 2.0));
        surface.set_line_dash(&[]);
    }

    fn draw_node<S: Surface + ?Sized>(&self, surface: &mut S, node: &Node) {
        let Ok(descriptor) = self.registry.describe(node.type_id()) else {
            return;
        };
        let bounds = node.bounds();
        let center_x = bounds.center().x;
        let selected = self.view.selected_node == Some(node.id);

        surface.fill_rect(bounds, descriptor.color);
        let border = if selected {
            Stroke::new(colors::NODE_BORDER_SELECTED, 3.0)
        } else {
            Stroke::new(colors::NODE_BORDER, 2.0)
        };
        surface.stroke_rect(bounds, border);

        surface.fill_text(
            &icon_glyph(descriptor.icon).to_string(),
            Point::new(center_x, node.position.y + 25.0),
            ICON_FONT,
            colors::NODE_TEXT,
        );

        let lines = wrap_label(
            surface,
            descriptor.label,
            node.size.width - LABEL_PADDING,
            LABEL_FONT,
        );
        for (i, line) in lines.iter().enumerate() {
            let y = node.position.y + 45.0 + i as f64 * LABEL_LINE_HEIGHT;
            surface.fill_text(line, Point::new(center_x, y), LABEL_FONT, colors::NODE_TEXT);
        }

        if let Some(preview) = node.config.preview(PREVIEW_MAX_CHARS) {
            surface.fill_text(
                &preview,
                Point::new(center_x, node.position.y + node.size.height - 10.0),
                PREVIEW_FONT,
                colors::NODE_PREVIEW_TEXT,
            );
        }

        let port_stroke = Stroke::new(colors::PORT_STROKE, 1.0);
        for (direction, count) in [
            (PortDirection::Input, descriptor.input_ports),
            (PortDirection::Output, descriptor.output_ports),
        ] {
            for index in 0..count {
                let center = port_anchor(node, direction, index, count);
                surface.fill_circle(center, self.config.port_radius, colors::PORT_FILL);
                surface.stroke_circle(center, self.config.port_radius, port_stroke);
            }
        }
    }
}

/// Greedy word wrap against the surface's text metrics.
///
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_label<S: Surface + ?Sized>(
    surface: &S,
    label: &str,
    max_width: f64,
    font: Font,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in label.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", line, word);
        if surface.measure_text(&candidate, font) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Icon-font glyph for a Font Awesome class name
pub fn icon_glyph(icon: &str) -> char {
    match icon {
        "fa-plug" => '\u{f1e6}',
        "fa-clock" => '\u{f017}',
        "fa-play" => '\u{f04b}',
        "fa-bell" => '\u{f0f3}',
        "fa-code-branch" => '\u{f126}',
        "fa-sun" => '\u{f185}',
        "fa-moon" => '\u{f186}',
        "fa-calendar" => '\u{f133}',
        "fa-redo" => '\u{f01e}',
        "fa-bolt" => '\u{f0e7}',
        "fa-database" => '\u{f1c0}',
        "fa-microchip" => '\u{f2db}',
        "fa-palette" => '\u{f53f}',
        "fa-paper-plane" => '\u{f1d8}',
        "fa-eye" => '\u{f06e}',
        _ => '\u{f128}',
    }
}
