//! State management node types
//!
//! Reads and comparisons pass through (1 in, 1 out); writes terminate (1 in, 0 out).

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::node_config::{
    AppendStateNodeConfig, CompareStateNodeConfig, GetStateNodeConfig, IncrementStateNodeConfig,
    NodeConfig, SetStateNodeConfig, WatchStateNodeConfig,
};

fn state(
    config: NodeConfig,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor::new(NodeCategory::State, config, label, description).with_icon(icon)
}

pub fn get_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::GetStateNode(GetStateNodeConfig::default()),
        "Get State",
        "fa-download",
        "Read value from KV store",
    )
}

pub fn set_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::SetStateNode(SetStateNodeConfig::default()),
        "Set State",
        "fa-upload",
        "Write value to KV store",
    )
    .with_ports(1, 0)
}

pub fn watch_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::WatchStateNode(WatchStateNodeConfig::default()),
        "Watch State",
        "fa-eye",
        "Monitor state changes",
    )
}

pub fn compare_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::CompareStateNode(CompareStateNodeConfig::default()),
        "Compare State",
        "fa-balance-scale",
        "Compare state values",
    )
}

pub fn increment_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::IncrementStateNode(IncrementStateNodeConfig::default()),
        "Increment State",
        "fa-plus-circle",
        "Increment numeric state",
    )
    .with_ports(1, 0)
}

pub fn append_state_node() -> NodeTypeDescriptor {
    state(
        NodeConfig::AppendStateNode(AppendStateNodeConfig::default()),
        "Append to List",
        "fa-list-ul",
        "Append to state list",
    )
    .with_ports(1, 0)
}

inventory::submit!(DescriptorFn(get_state_node));
inventory::submit!(DescriptorFn(set_state_node));
inventory::submit!(DescriptorFn(watch_state_node));
inventory::submit!(DescriptorFn(compare_state_node));
inventory::submit!(DescriptorFn(increment_state_node));
inventory::submit!(DescriptorFn(append_state_node));
