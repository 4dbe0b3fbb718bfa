//! Drawing surface abstraction
//!
//! The renderer paints through `Surface`, which mirrors the subset of a 2D
//! canvas API it needs. Hosts back it with their real canvas; tests and
//! headless hosts use `RecordingSurface`, which captures a display list.

use serde::{Deserialize, Serialize};

use crate::geometry::{CubicBezier, Point, Rect, Size};

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

impl<'a> Stroke<'a> {
    pub const fn new(color: &'a str, width: f64) -> Self {
        Self { color, width }
    }
}

/// Font face and pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: &'static str,
    pub size: f64,
}

impl Font {
    pub const fn new(family: &'static str, size: f64) -> Self {
        Self { family, size }
    }

    /// CSS shorthand, e.g. `12px Arial`
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

/// A 2D drawing target
///
/// Text is drawn centred (horizontally and vertically) on the given point.
pub trait Surface {
    /// Clear the whole surface in screen space
    fn clear(&mut self, size: Size);
    fn save(&mut self);
    fn restore(&mut self);
    /// Translate by `pan`, then scale by `zoom`
    fn set_transform(&mut self, zoom: f64, pan: Point);
    /// Dash pattern for subsequent strokes; empty for solid lines
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>);
    fn stroke_bezier(&mut self, curve: &CubicBezier, stroke: Stroke<'_>);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>);
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str);
    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>);
    fn fill_text(&mut self, text: &str, at: Point, font: Font, color: &str);
    /// Rendered width of `text` in the current font
    fn measure_text(&self, text: &str, font: Font) -> f64;
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Save,
    Restore,
    SetTransform {
        zoom: f64,
        pan: Point,
    },
    SetLineDash {
        pattern: Vec<f64>,
    },
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    Bezier {
        curve: CubicBezier,
        color: String,
        width: f64,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: String,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: String,
        width: f64,
    },
    Text {
        text: String,
        at: Point,
        font: String,
        color: String,
    },
}

/// Surface that records every call into a display list
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

/// Approximate glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f64 = 0.55;

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded commands, leaving the list empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All recorded text, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, size: Size) {
        self.commands.push(DrawCommand::Clear {
            width: size.width,
            height: size.height,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, zoom: f64, pan: Point) {
        self.commands.push(DrawCommand::SetTransform { zoom, pan });
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(DrawCommand::SetLineDash {
            pattern: pattern.to_vec(),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn stroke_bezier(&mut self, curve: &CubicBezier, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::Bezier {
            curve: *curve,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, font: Font, color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            font: font.css(),
            color: color.to_string(),
        });
    }

    fn measure_text(&self, text: &str, font: Font) -> f64 {
        text.chars().count() as f64 * font.size * GLYPH_ADVANCE
    }
}
