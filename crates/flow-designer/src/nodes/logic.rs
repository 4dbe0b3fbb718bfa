//! Logic node types
//!
//! Port counts vary per gate: AND/OR join two inputs, the switch routes one
//! input to three outputs.

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::node_config::{
    AndGateConfig, CounterNodeConfig, NodeConfig, NotGateConfig, OrGateConfig, SwitchNodeConfig,
    TimerNodeConfig,
};

/// Outputs exposed by the switch node
pub const SWITCH_OUTPUTS: usize = 3;

fn logic(
    config: NodeConfig,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor::new(NodeCategory::Logic, config, label, description).with_icon(icon)
}

pub fn and_gate() -> NodeTypeDescriptor {
    logic(
        NodeConfig::AndGate(AndGateConfig::default()),
        "AND Gate",
        "fa-align-center",
        "All inputs must be true",
    )
    .with_ports(2, 1)
}

pub fn or_gate() -> NodeTypeDescriptor {
    logic(
        NodeConfig::OrGate(OrGateConfig::default()),
        "OR Gate",
        "fa-align-justify",
        "Any input must be true",
    )
    .with_ports(2, 1)
}

pub fn not_gate() -> NodeTypeDescriptor {
    logic(
        NodeConfig::NotGate(NotGateConfig::default()),
        "NOT Gate",
        "fa-exclamation",
        "Inverts the input",
    )
}

pub fn switch_node() -> NodeTypeDescriptor {
    logic(
        NodeConfig::SwitchNode(SwitchNodeConfig::default()),
        "Switch",
        "fa-random",
        "Route based on value",
    )
    .with_ports(1, SWITCH_OUTPUTS)
}

pub fn counter_node() -> NodeTypeDescriptor {
    logic(
        NodeConfig::CounterNode(CounterNodeConfig::default()),
        "Counter",
        "fa-sort-numeric-up",
        "Count events",
    )
}

pub fn timer_node() -> NodeTypeDescriptor {
    logic(
        NodeConfig::TimerNode(TimerNodeConfig::default()),
        "Timer",
        "fa-stopwatch",
        "Time-based logic",
    )
}

inventory::submit!(DescriptorFn(and_gate));
inventory::submit!(DescriptorFn(or_gate));
inventory::submit!(DescriptorFn(not_gate));
inventory::submit!(DescriptorFn(switch_node));
inventory::submit!(DescriptorFn(counter_node));
inventory::submit!(DescriptorFn(timer_node));
