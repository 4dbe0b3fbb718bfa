//! Trigger node types

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::node_config::{
    DeviceStateTriggerConfig, IntervalTriggerConfig, NatsEventTriggerConfig, NodeConfig,
    ScheduleTriggerConfig, StateChangeTriggerConfig, SunriseTriggerConfig, SunsetTriggerConfig,
    TimeTriggerConfig,
};

fn trigger(
    config: NodeConfig,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor::new(NodeCategory::Trigger, config, label, description).with_icon(icon)
}

pub fn device_state_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::DeviceStateTrigger(DeviceStateTriggerConfig::default()),
        "Device State Changed",
        "fa-plug",
        "Triggers when device state changes",
    )
}

pub fn nats_event_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::NatsEventTrigger(NatsEventTriggerConfig::default()),
        "NATS Event",
        "fa-stream",
        "Listen for NATS events on a subject",
    )
}

pub fn time_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::TimeTrigger(TimeTriggerConfig::default()),
        "Time",
        "fa-clock",
        "Triggers at specific time",
    )
}

pub fn schedule_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::ScheduleTrigger(ScheduleTriggerConfig::default()),
        "Schedule",
        "fa-calendar",
        "Triggers on schedule (cron)",
    )
}

pub fn sunrise_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::SunriseTrigger(SunriseTriggerConfig::default()),
        "Sunrise",
        "fa-sun",
        "Triggers at sunrise",
    )
}

pub fn sunset_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::SunsetTrigger(SunsetTriggerConfig::default()),
        "Sunset",
        "fa-moon",
        "Triggers at sunset",
    )
}

pub fn interval_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::IntervalTrigger(IntervalTriggerConfig::default()),
        "Interval",
        "fa-redo",
        "Triggers at regular intervals",
    )
}

pub fn state_change_trigger() -> NodeTypeDescriptor {
    trigger(
        NodeConfig::StateChangeTrigger(StateChangeTriggerConfig::default()),
        "State Changed",
        "fa-database",
        "Triggers when KV state changes",
    )
}

inventory::submit!(DescriptorFn(device_state_trigger));
inventory::submit!(DescriptorFn(nats_event_trigger));
inventory::submit!(DescriptorFn(time_trigger));
inventory::submit!(DescriptorFn(schedule_trigger));
inventory::submit!(DescriptorFn(sunrise_trigger));
inventory::submit!(DescriptorFn(sunset_trigger));
inventory::submit!(DescriptorFn(interval_trigger));
inventory::submit!(DescriptorFn(state_change_trigger));
