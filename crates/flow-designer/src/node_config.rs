//! Typed per-node configuration
//!
//! Every node type carries its own config struct. `NodeConfig` is the tagged
//! union over all of them, serialized as `{"type": "<typeId>", "data": {...}}`.
//! The field list exposed by each struct is what the node form edits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DesignerError, Result};

/// Shape of an editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Bool,
    /// Days of week, 0 = Sunday .. 6 = Saturday
    Days,
    /// Free-form JSON object
    Object,
    /// Free-form JSON list
    List,
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "an integer",
            Self::Bool => "true or false",
            Self::Days => "a list of weekdays 0-6",
            Self::Object => "a JSON object",
            Self::List => "a JSON list",
        }
    }
}

/// A field value as seen by the node form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Days(Vec<u8>),
    Object(Map<String, Value>),
    List(Vec<Value>),
}

impl FieldValue {
    /// Parse raw form input for a field of the given kind
    pub fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        let raw_trimmed = raw.trim();
        match kind {
            FieldKind::Text => Some(Self::Text(raw.to_string())),
            FieldKind::Integer => raw_trimmed.parse().ok().map(Self::Integer),
            FieldKind::Bool => raw_trimmed.parse().ok().map(Self::Bool),
            FieldKind::Days => {
                if raw_trimmed.is_empty() {
                    return Some(Self::Days(Vec::new()));
                }
                raw_trimmed
                    .split(',')
                    .map(|d| d.trim().parse::<u8>().ok().filter(|d| *d <= 6))
                    .collect::<Option<Vec<_>>>()
                    .map(Self::Days)
            }
            FieldKind::Object => match serde_json::from_str(raw_trimmed) {
                Ok(Value::Object(map)) => Some(Self::Object(map)),
                _ => None,
            },
            FieldKind::List => match serde_json::from_str(raw_trimmed) {
                Ok(Value::Array(items)) => Some(Self::List(items)),
                _ => None,
            },
        }
    }

    /// One-line text rendering, used for previews and form inputs
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Days(days) => days
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(map) => Value::Object(map.clone()).to_string(),
            Self::List(items) => Value::Array(items.clone()).to_string(),
        }
    }
}

/// Conversion between a config field's Rust type and `FieldValue`
pub trait FieldType: Sized {
    const KIND: FieldKind;
    fn to_field(&self) -> FieldValue;
    fn from_field(value: FieldValue) -> Option<Self>;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::Integer;
    fn to_field(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;
    fn to_field(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldType for Vec<u8> {
    const KIND: FieldKind = FieldKind::Days;
    fn to_field(&self) -> FieldValue {
        FieldValue::Days(self.clone())
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Days(mut days) if days.iter().all(|d| *d <= 6) => {
                days.sort_unstable();
                days.dedup();
                Some(days)
            }
            _ => None,
        }
    }
}

impl FieldType for Map<String, Value> {
    const KIND: FieldKind = FieldKind::Object;
    fn to_field(&self) -> FieldValue {
        FieldValue::Object(self.clone())
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl FieldType for Vec<Value> {
    const KIND: FieldKind = FieldKind::List;
    fn to_field(&self) -> FieldValue {
        FieldValue::List(self.clone())
    }
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// One editable field of a node's config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
}

/// Declares one config struct per node type plus the `NodeConfig` union.
macro_rules! node_configs {
    ($(
        $variant:ident($config:ident) = $type_id:literal {
            $( $field:ident : $ty:ty = $default:expr => $label:literal ),* $(,)?
        }
    )+) => {
        $(
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            #[serde(default)]
            pub struct $config {
                $( pub $field: $ty, )*
            }

            impl Default for $config {
                fn default() -> Self {
                    Self { $( $field: $default, )* }
                }
            }

            impl $config {
                pub const TYPE_ID: &'static str = $type_id;

                /// Editable fields in form order
                pub fn fields(&self) -> Vec<ConfigField> {
                    vec![$(
                        ConfigField {
                            name: stringify!($field),
                            label: $label,
                            kind: <$ty as FieldType>::KIND,
                            value: FieldType::to_field(&self.$field),
                        },
                    )*]
                }

                /// Replace one field, type-checking the value
                #[allow(unused_variables)]
                pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
                    $(
                        if name == stringify!($field) {
                            self.$field = <$ty as FieldType>::from_field(value).ok_or_else(|| {
                                DesignerError::invalid_field(
                                    name,
                                    <$ty as FieldType>::KIND.describe(),
                                )
                            })?;
                            return Ok(());
                        }
                    )*
                    Err(DesignerError::UnknownField {
                        type_id: $type_id.to_string(),
                        field: name.to_string(),
                    })
                }
            }
        )+

        /// Configuration of a placed node, keyed by node type id
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "data")]
        pub enum NodeConfig {
            $(
                #[serde(rename = $type_id)]
                $variant($config),
            )+
        }

        impl NodeConfig {
            /// Every type id with a config shape
            pub const TYPE_IDS: &'static [&'static str] = &[$( $type_id ),+];

            /// Default config for a type id
            pub fn default_for(type_id: &str) -> Option<Self> {
                match type_id {
                    $( $type_id => Some(Self::$variant($config::default())), )+
                    _ => None,
                }
            }

            /// The node type id this config belongs to
            pub fn type_id(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => $type_id, )+
                }
            }

            /// Editable fields in form order
            pub fn fields(&self) -> Vec<ConfigField> {
                match self {
                    $( Self::$variant(c) => c.fields(), )+
                }
            }

            /// Replace one field, type-checking the value
            pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
                match self {
                    $( Self::$variant(c) => c.set_field(name, value), )+
                }
            }
        }
    };
}

const STATE_BUCKET: &str = "automation-state";

fn text(s: &str) -> String {
    s.to_string()
}

node_configs! {
    // Triggers
    DeviceStateTrigger(DeviceStateTriggerConfig) = "deviceStateTrigger" {
        device: String = String::new() => "Device ID",
        attribute: String = text("state") => "Attribute",
        from: String = String::new() => "From State (optional)",
        to: String = String::new() => "To State (optional)",
    }
    NatsEventTrigger(NatsEventTriggerConfig) = "natsEventTrigger" {
        subject: String = text("events.") => "NATS Subject",
        queue: String = String::new() => "Queue Group (optional)",
    }
    TimeTrigger(TimeTriggerConfig) = "timeTrigger" {
        time: String = text("00:00") => "Time",
    }
    ScheduleTrigger(ScheduleTriggerConfig) = "scheduleTrigger" {
        cron: String = text("0 0 * * *") => "Cron Expression",
    }
    SunriseTrigger(SunriseTriggerConfig) = "sunriseTrigger" {
        offset: i64 = 0 => "Offset (minutes)",
    }
    SunsetTrigger(SunsetTriggerConfig) = "sunsetTrigger" {
        offset: i64 = 0 => "Offset (minutes)",
    }
    IntervalTrigger(IntervalTriggerConfig) = "intervalTrigger" {
        interval: i64 = 60 => "Interval",
        unit: String = text("seconds") => "Unit",
    }
    StateChangeTrigger(StateChangeTriggerConfig) = "stateChangeTrigger" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key to Watch",
    }

    // Conditions
    DeviceStateCondition(DeviceStateConditionConfig) = "deviceStateCondition" {
        device: String = String::new() => "Device ID",
        attribute: String = text("state") => "Attribute",
        operator: String = text("equals") => "Operator",
        value: String = String::new() => "Value",
    }
    TimeCondition(TimeConditionConfig) = "timeCondition" {
        after: String = text("00:00") => "After",
        before: String = text("23:59") => "Before",
    }
    DayOfWeekCondition(DayOfWeekConditionConfig) = "dayOfWeekCondition" {
        days: Vec<u8> = Vec::new() => "Days of Week",
    }
    NumericCondition(NumericConditionConfig) = "numericCondition" {
        value1: String = String::new() => "Left Value",
        operator: String = text(">") => "Operator",
        value2: String = String::new() => "Right Value",
    }
    SunCondition(SunConditionConfig) = "sunCondition" {
        condition: String = text("above_horizon") => "Sun Position",
    }
    PresenceCondition(PresenceConditionConfig) = "presenceCondition" {
        person: String = String::new() => "Person",
    }
    ZoneCondition(ZoneConditionConfig) = "zoneCondition" {
        device: String = String::new() => "Device ID",
        zone: String = String::new() => "Zone",
    }

    // Actions
    DeviceAction(DeviceActionConfig) = "deviceAction" {
        device: String = String::new() => "Device ID",
        command: String = text("turn_on") => "Command",
        parameters: Map<String, Value> = Map::new() => "Parameters (JSON)",
    }
    PublishEventAction(PublishEventActionConfig) = "publishEventAction" {
        subject: String = text("events.") => "NATS Subject",
        payload: String = text("{}") => "Payload (JSON)",
    }
    UpdateStateAction(UpdateStateActionConfig) = "updateStateAction" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
        value: String = String::new() => "Value",
        ttl: i64 = 0 => "TTL (seconds, 0 = no expiry)",
    }
    SceneAction(SceneActionConfig) = "sceneAction" {
        scene: String = String::new() => "Scene ID",
    }
    NotificationAction(NotificationActionConfig) = "notificationAction" {
        title: String = text("Alert") => "Title",
        message: String = String::new() => "Message",
        priority: String = text("normal") => "Priority",
    }
    DelayAction(DelayActionConfig) = "delayAction" {
        delay: i64 = 5 => "Delay",
        unit: String = text("seconds") => "Unit",
    }
    ScriptAction(ScriptActionConfig) = "scriptAction" {
        script: String = String::new() => "Script",
    }

    // Logic
    AndGate(AndGateConfig) = "andGate" {}
    OrGate(OrGateConfig) = "orGate" {}
    NotGate(NotGateConfig) = "notGate" {}
    SwitchNode(SwitchNodeConfig) = "switchNode" {
        property: String = String::new() => "Property",
        rules: Vec<Value> = Vec::new() => "Rules (JSON)",
    }
    CounterNode(CounterNodeConfig) = "counterNode" {
        threshold: i64 = 5 => "Threshold",
        reset: bool = true => "Reset on Threshold",
    }
    TimerNode(TimerNodeConfig) = "timerNode" {
        duration: i64 = 60 => "Duration",
        unit: String = text("seconds") => "Unit",
    }

    // State management
    GetStateNode(GetStateNodeConfig) = "getStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
    }
    SetStateNode(SetStateNodeConfig) = "setStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
        value: String = String::new() => "Value",
    }
    WatchStateNode(WatchStateNodeConfig) = "watchStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key to Watch",
    }
    CompareStateNode(CompareStateNodeConfig) = "compareStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
        operator: String = text("equals") => "Operator",
        value: String = String::new() => "Compare Value",
    }
    IncrementStateNode(IncrementStateNodeConfig) = "incrementStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
        increment: i64 = 1 => "Increment By",
    }
    AppendStateNode(AppendStateNodeConfig) = "appendStateNode" {
        bucket: String = text(STATE_BUCKET) => "KV Bucket",
        key: String = String::new() => "Key",
        value: String = String::new() => "Value to Append",
    }
}

impl NodeConfig {
    /// Short preview of the primary (first) field, if it is non-empty text
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let first = self.fields().into_iter().next()?;
        let FieldValue::Text(text) = first.value else {
            return None;
        };
        if text.is_empty() {
            return None;
        }
        if text.chars().count() <= max_chars {
            return Some(text);
        }
        let keep = max_chars.saturating_sub(3);
        Some(format!("{}...", text.chars().take(keep).collect::<String>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_seeded_per_type() {
        let config = NodeConfig::default_for("deviceStateTrigger").unwrap();
        match &config {
            NodeConfig::DeviceStateTrigger(c) => {
                assert_eq!(c.attribute, "state");
                assert!(c.device.is_empty());
            }
            other => panic!("unexpected config {:?}", other),
        }
        assert_eq!(config.type_id(), "deviceStateTrigger");
        assert!(NodeConfig::default_for("noSuchNode").is_none());
    }

    #[test]
    fn test_every_type_id_has_default() {
        for type_id in NodeConfig::TYPE_IDS {
            let config = NodeConfig::default_for(type_id).unwrap();
            assert_eq!(config.type_id(), *type_id);
        }
    }

    #[test]
    fn test_set_field_type_checks() {
        let mut config = NodeConfig::default_for("delayAction").unwrap();
        config.set_field("delay", FieldValue::Integer(30)).unwrap();
        assert_eq!(
            config.set_field("delay", FieldValue::Text("soon".into())),
            Err(DesignerError::invalid_field("delay", "an integer"))
        );
        assert!(matches!(
            config.set_field("colour", FieldValue::Text("red".into())),
            Err(DesignerError::UnknownField { .. })
        ));
        match config {
            NodeConfig::DelayAction(c) => assert_eq!(c.delay, 30),
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_days_are_normalized() {
        let mut config = NodeConfig::default_for("dayOfWeekCondition").unwrap();
        config
            .set_field("days", FieldValue::Days(vec![5, 1, 5, 3]))
            .unwrap();
        assert!(config.set_field("days", FieldValue::Days(vec![7])).is_err());
        let fields = config.fields();
        assert_eq!(fields[0].value, FieldValue::Days(vec![1, 3, 5]));
    }

    #[test]
    fn test_parse_form_input() {
        assert_eq!(
            FieldValue::parse(FieldKind::Integer, " 42 "),
            Some(FieldValue::Integer(42))
        );
        assert_eq!(FieldValue::parse(FieldKind::Integer, "x"), None);
        assert_eq!(
            FieldValue::parse(FieldKind::Days, "1, 2,6"),
            Some(FieldValue::Days(vec![1, 2, 6]))
        );
        assert_eq!(FieldValue::parse(FieldKind::Days, "1,9"), None);
        assert!(matches!(
            FieldValue::parse(FieldKind::Object, r#"{"brightness": 80}"#),
            Some(FieldValue::Object(_))
        ));
        assert_eq!(FieldValue::parse(FieldKind::Object, "[1]"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let mut config = NodeConfig::default_for("sceneAction").unwrap();
        config
            .set_field("scene", FieldValue::Text("evening".into()))
            .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "sceneAction", "data": {"scene": "evening"}})
        );

        let partial: NodeConfig = serde_json::from_value(
            serde_json::json!({"type": "intervalTrigger", "data": {"interval": 5}}),
        )
        .unwrap();
        match partial {
            NodeConfig::IntervalTrigger(c) => {
                assert_eq!(c.interval, 5);
                assert_eq!(c.unit, "seconds");
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_preview_truncates() {
        let mut config = NodeConfig::default_for("deviceAction").unwrap();
        assert_eq!(config.preview(20), None);
        config
            .set_field(
                "device",
                FieldValue::Text("light.living_room_ceiling_main".into()),
            )
            .unwrap();
        assert_eq!(config.preview(20).unwrap(), "light.living_room...");
        assert_eq!(NodeConfig::default_for("andGate").unwrap().preview(20), None);
    }
}
