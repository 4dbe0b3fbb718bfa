//! Flow Designer - visual authoring of home automation rules
//!
//! Users place typed nodes (triggers, conditions, actions, logic, state) on
//! a pan/zoom canvas, wire output ports to input ports and edit each node's
//! fields. The graph compiles to the flat trigger/condition/action rule lists
//! the automation engine runs, and a stored automation loads back into a
//! graph.
//!
//! # Architecture
//!
//! - `NodeTypeRegistry`: palette of node types, collected via `inventory`
//! - `FlowGraph`: nodes and connections with construction invariants
//! - `Interaction`: pointer/keyboard state machine over graph + `ViewState`
//! - `Renderer`: paints a frame onto any `Surface`; `FrameLoop` schedules it
//! - `compiler`: graph to rules (`to_automation`) and back (`from_automation`)
//! - `DesignerSession`: one open designer, reporting through an `EventSink`
//!   and saving through an `AutomationStore`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flow_designer::{DesignerConfig, DesignerSession, NodeTypeRegistry, NullEventSink};
//!
//! let mut session = DesignerSession::new(
//!     Arc::new(NodeTypeRegistry::with_builtins()),
//!     DesignerConfig::default(),
//!     Arc::new(NullEventSink),
//! );
//! session.place_node("deviceStateTrigger");
//! session.place_node("deviceAction");
//! let rules = flow_designer::to_automation(session.graph());
//! ```

pub mod automation;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod form;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod node_config;
pub mod nodes;
pub mod registry;
pub mod render;
pub mod session;
pub mod store;
pub mod types;
pub mod validation;
pub mod view;

// Re-export key types
pub use automation::{AutomationDocument, AutomationMeta, Layout};
pub use compiler::{from_automation, from_document, to_automation, LoadOutcome, RuleSet};
pub use config::{ConfigError, DesignerConfig};
pub use descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor, PortDirection};
pub use error::{DesignerError, Result};
pub use events::{DesignerEvent, EventSink, NullEventSink, ToastLevel, VecEventSink};
pub use graph::FlowGraph;
pub use interaction::{InputEvent, Interaction, InteractionEffect};
pub use node_config::{FieldValue, NodeConfig};
pub use registry::NodeTypeRegistry;
pub use render::{FrameLoop, FrameOutcome, RecordingSurface, Renderer, Surface};
pub use session::DesignerSession;
pub use store::{AutomationStore, MemoryAutomationStore, SaveRequest, StoreError};
pub use types::{Connection, ConnectionId, Node, NodeId};
pub use validation::{validate_graph, ValidationIssue};
pub use view::ViewState;
