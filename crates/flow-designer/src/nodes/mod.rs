//! Built-in node types
//!
//! Each submodule registers its descriptors via `inventory`, so
//! `NodeTypeRegistry::with_builtins()` picks them up without a central list.
//!
//! - **Triggers**: device, event, time and state triggers (no inputs)
//! - **Conditions**: predicates with true/false outputs
//! - **Actions**: device commands, events, state writes (no outputs)
//! - **Logic**: gates, switch, counter, timer
//! - **State**: key-value store reads and writes

pub mod actions;
pub mod conditions;
pub mod logic;
pub mod state;
pub mod triggers;
