//! Automation rule schema
//!
//! The executable side of an automation: ordered trigger, condition and
//! action lists as consumed by the rule engine. Field names are snake_case
//! on the wire; optional fields are omitted when empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What starts an automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    DeviceState {
        device_id: String,
        attribute: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    NatsEvent {
        subject: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<String>,
    },
    Time {
        time: String,
    },
    Schedule {
        cron: String,
    },
    Sunrise {
        #[serde(default)]
        offset: i64,
    },
    Sunset {
        #[serde(default)]
        offset: i64,
    },
    Interval {
        interval: i64,
        unit: String,
    },
    StateChange {
        bucket: String,
        key: String,
    },
}

/// A predicate that must hold for the actions to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    DeviceState {
        device_id: String,
        attribute: String,
        operator: String,
        value: String,
    },
    TimeBetween {
        after: String,
        before: String,
    },
    DayOfWeek {
        #[serde(default)]
        days: Vec<u8>,
    },
    StateValue {
        bucket: String,
        key: String,
    },
    StateCompare {
        bucket: String,
        key: String,
        operator: String,
        value: String,
    },
}

/// Something the automation does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    DeviceCommand {
        device_id: String,
        command: String,
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        parameters: Map<String, Value>,
    },
    PublishEvent {
        subject: String,
        payload: String,
    },
    UpdateState {
        bucket: String,
        key: String,
        value: String,
        #[serde(default)]
        ttl: i64,
    },
    ActivateScene {
        scene_id: String,
    },
    Notification {
        title: String,
        message: String,
        priority: String,
    },
    Delay {
        delay: i64,
        unit: String,
    },
    SetState {
        bucket: String,
        key: String,
        value: String,
    },
    IncrementState {
        bucket: String,
        key: String,
        increment: i64,
    },
    AppendState {
        bucket: String,
        key: String,
        value: String,
    },
}

/// Compiled rule lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty() && self.conditions.is_empty() && self.actions.is_empty()
    }

    /// Total number of entries across all three lists
    pub fn len(&self) -> usize {
        self.triggers.len() + self.conditions.len() + self.actions.len()
    }
}
