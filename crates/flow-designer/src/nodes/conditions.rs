//! Condition node types
//!
//! Conditions take one input and expose true/false outputs (port 0 and 1).

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::node_config::{
    DayOfWeekConditionConfig, DeviceStateConditionConfig, NodeConfig, NumericConditionConfig,
    PresenceConditionConfig, SunConditionConfig, TimeConditionConfig, ZoneConditionConfig,
};

fn condition(
    config: NodeConfig,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor::new(NodeCategory::Condition, config, label, description).with_icon(icon)
}

pub fn device_state_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::DeviceStateCondition(DeviceStateConditionConfig::default()),
        "Device State Is",
        "fa-plug",
        "Check device state",
    )
}

pub fn time_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::TimeCondition(TimeConditionConfig::default()),
        "Time Between",
        "fa-clock",
        "Check if time is in range",
    )
}

pub fn day_of_week_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::DayOfWeekCondition(DayOfWeekConditionConfig::default()),
        "Day of Week",
        "fa-calendar-day",
        "Check day of week",
    )
}

pub fn numeric_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::NumericCondition(NumericConditionConfig::default()),
        "Numeric Compare",
        "fa-greater-than-equal",
        "Compare numeric values",
    )
}

pub fn sun_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::SunCondition(SunConditionConfig::default()),
        "Sun Position",
        "fa-sun",
        "Check if sun is up/down",
    )
}

pub fn presence_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::PresenceCondition(PresenceConditionConfig::default()),
        "Presence",
        "fa-user-check",
        "Check if someone is home",
    )
}

pub fn zone_condition() -> NodeTypeDescriptor {
    condition(
        NodeConfig::ZoneCondition(ZoneConditionConfig::default()),
        "Zone",
        "fa-map-marker-alt",
        "Check if in zone",
    )
}

inventory::submit!(DescriptorFn(device_state_condition));
inventory::submit!(DescriptorFn(time_condition));
inventory::submit!(DescriptorFn(day_of_week_condition));
inventory::submit!(DescriptorFn(numeric_condition));
inventory::submit!(DescriptorFn(sun_condition));
inventory::submit!(DescriptorFn(presence_condition));
inventory::submit!(DescriptorFn(zone_condition));
