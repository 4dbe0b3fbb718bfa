//! Action node types

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::node_config::{
    DelayActionConfig, DeviceActionConfig, NodeConfig, NotificationActionConfig,
    PublishEventActionConfig, SceneActionConfig, ScriptActionConfig, UpdateStateActionConfig,
};

fn action(
    config: NodeConfig,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor::new(NodeCategory::Action, config, label, description).with_icon(icon)
}

pub fn device_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::DeviceAction(DeviceActionConfig::default()),
        "Control Device",
        "fa-play",
        "Control a device",
    )
}

pub fn publish_event_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::PublishEventAction(PublishEventActionConfig::default()),
        "Publish NATS Event",
        "fa-paper-plane",
        "Publish event to NATS subject",
    )
}

pub fn update_state_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::UpdateStateAction(UpdateStateActionConfig::default()),
        "Update State",
        "fa-database",
        "Update KV state store",
    )
}

pub fn scene_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::SceneAction(SceneActionConfig::default()),
        "Activate Scene",
        "fa-palette",
        "Activate a scene",
    )
}

pub fn notification_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::NotificationAction(NotificationActionConfig::default()),
        "Send Notification",
        "fa-bell",
        "Send a notification",
    )
}

pub fn delay_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::DelayAction(DelayActionConfig::default()),
        "Delay",
        "fa-hourglass-half",
        "Wait for specified time",
    )
}

pub fn script_action() -> NodeTypeDescriptor {
    action(
        NodeConfig::ScriptAction(ScriptActionConfig::default()),
        "Run Script",
        "fa-code",
        "Execute a script",
    )
}

inventory::submit!(DescriptorFn(device_action));
inventory::submit!(DescriptorFn(publish_event_action));
inventory::submit!(DescriptorFn(update_state_action));
inventory::submit!(DescriptorFn(scene_action));
inventory::submit!(DescriptorFn(notification_action));
inventory::submit!(DescriptorFn(delay_action));
inventory::submit!(DescriptorFn(script_action));
