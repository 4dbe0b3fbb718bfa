//! Node type descriptors
//!
//! A descriptor is the immutable registry entry for one node type: its
//! category, presentation metadata, port cardinality and default config.
//! Built-in descriptors are registered at link time:
//!
//! ```ignore
//! inventory::submit!(flow_designer::DescriptorFn(time_trigger));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::geometry;
use crate::geometry::Size;
use crate::node_config::NodeConfig;

/// Category of a node type; drives palette grouping, port defaults and compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeCategory {
    Trigger,
    Condition,
    Action,
    Logic,
    State,
}

impl NodeCategory {
    /// Palette order
    pub const ALL: [NodeCategory; 5] = [
        Self::Trigger,
        Self::Condition,
        Self::Action,
        Self::Logic,
        Self::State,
    ];

    /// Palette section heading
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trigger => "Triggers",
            Self::Condition => "Conditions",
            Self::Action => "Actions",
            Self::Logic => "Logic",
            Self::State => "State Management",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Trigger => "fa-bolt",
            Self::Condition => "fa-code-branch",
            Self::Action => "fa-play",
            Self::Logic => "fa-microchip",
            Self::State => "fa-database",
        }
    }

    /// Node fill color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Trigger => "#3498db",
            Self::Condition => "#f39c12",
            Self::Action => "#27ae60",
            Self::Logic => "#9b59b6",
            Self::State => "#e74c3c",
        }
    }

    /// Default (inputs, outputs) for node types of this category
    pub fn default_ports(&self) -> (usize, usize) {
        match self {
            Self::Trigger => (0, 1),
            Self::Condition => (1, 2),
            Self::Action => (1, 0),
            Self::Logic | Self::State => (1, 1),
        }
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Immutable registry entry for one node type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDescriptor {
    pub category: NodeCategory,
    pub type_id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub input_ports: usize,
    pub output_ports: usize,
    pub size: Size,
    /// Seed for the config of newly placed nodes
    pub default_config: NodeConfig,
}

impl NodeTypeDescriptor {
    /// Descriptor with the category's presentation and port defaults.
    /// The type id is taken from `default_config`.
    pub fn new(
        category: NodeCategory,
        default_config: NodeConfig,
        label: &'static str,
        description: &'static str,
    ) -> Self {
        let (input_ports, output_ports) = category.default_ports();
        Self {
            category,
            type_id: default_config.type_id(),
            label,
            icon: category.icon(),
            color: category.color(),
            description,
            input_ports,
            output_ports,
            size: Size::new(geometry::NODE_WIDTH, geometry::NODE_HEIGHT),
            default_config,
        }
    }

    /// Override the port cardinality
    pub fn with_ports(mut self, inputs: usize, outputs: usize) -> Self {
        self.input_ports = inputs;
        self.output_ports = outputs;
        self
    }

    /// Override the icon
    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    /// Number of ports in a direction
    pub fn port_count(&self, direction: PortDirection) -> usize {
        match direction {
            PortDirection::Input => self.input_ports,
            PortDirection::Output => self.output_ports,
        }
    }
}

/// Link-time registration of a built-in node type
pub struct DescriptorFn(pub fn() -> NodeTypeDescriptor);

inventory::collect!(DescriptorFn);
