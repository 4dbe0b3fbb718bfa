//! Designer-wide constants
//!
//! Single source of truth for canvas geometry, zoom limits and palette colors.

/// Canvas and viewport defaults
pub mod canvas {
    /// Background grid spacing in graph units
    pub const GRID_SIZE: f64 = 20.0;
    /// Lower zoom bound
    pub const ZOOM_MIN: f64 = 0.5;
    /// Upper zoom bound
    pub const ZOOM_MAX: f64 = 2.0;
    /// Multiplicative zoom change per wheel notch or toolbar click
    pub const ZOOM_STEP: f64 = 1.2;
    /// Fallback surface size when the host has not reported one yet
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 600.0;
}

/// Node and port geometry
pub mod geometry {
    /// Width of every placed node in graph units
    pub const NODE_WIDTH: f64 = 180.0;
    /// Height of every placed node in graph units
    pub const NODE_HEIGHT: f64 = 80.0;
    /// Drawn port marker radius
    pub const PORT_RADIUS: f64 = 6.0;
    /// Port pick radius (graph units)
    pub const PORT_HIT_RADIUS: f64 = 8.0;
    /// Connection pick tolerance in screen pixels
    pub const CONNECTION_HIT_TOLERANCE: f64 = 5.0;
    /// Horizontal offset of bezier control points from each endpoint
    pub const CURVE_CONTROL_OFFSET: f64 = 50.0;
    /// Segments used to flatten a connection curve for picking
    pub const CURVE_SEGMENTS: usize = 24;
    /// Cascade step for click-to-place nodes
    pub const PLACEMENT_CASCADE: f64 = 20.0;
}

/// Fallback layout used when a loaded automation carries no layout
pub mod layout {
    pub const TRIGGER_COLUMN_X: f64 = 50.0;
    pub const CONDITION_COLUMN_X: f64 = 300.0;
    pub const ACTION_COLUMN_X: f64 = 550.0;
    pub const FIRST_ROW_Y: f64 = 50.0;
    pub const ROW_SPACING: f64 = 120.0;
}

/// Frame loop defaults
pub mod timing {
    /// Frame interval for the timer-driven loop (~60 Hz)
    pub const FRAME_INTERVAL_MS: u64 = 16;
}

/// Colors used by the renderer
pub mod colors {
    pub const GRID: &str = "#e0e0e0";
    pub const CONNECTION: &str = "#34495e";
    pub const CONNECTION_SELECTED: &str = "#e74c3c";
    pub const PENDING_CONNECTION: &str = "#3498db";
    pub const NODE_BORDER: &str = "#34495e";
    pub const NODE_BORDER_SELECTED: &str = "#2c3e50";
    pub const NODE_TEXT: &str = "#ffffff";
    pub const NODE_PREVIEW_TEXT: &str = "rgba(255,255,255,0.7)";
    pub const PORT_FILL: &str = "#ecf0f1";
    pub const PORT_STROKE: &str = "#34495e";
}

/// Config file name inside the designer data directory
pub const CONFIG_FILE: &str = "designer.json";
