//! Graph <-> rule compiler
//!
//! `to_automation` flattens the graph into trigger/condition/action lists;
//! `load` rebuilds a graph from a stored automation. Compilation is
//! topology-blind: every node lands in its category's list regardless of how
//! it is wired. That policy lives entirely behind `RuleCompiler`, so a
//! wiring-aware compiler can replace `FlatCategoryCompiler` without touching
//! the graph model or the renderer.

mod load;
mod rules;

pub use load::{from_automation, from_document, LoadOutcome};
pub use rules::{Action, Condition, RuleSet, Trigger};

use crate::graph::FlowGraph;
use crate::node_config::*;

/// Converts a graph into rule lists
pub trait RuleCompiler {
    fn compile(&self, graph: &FlowGraph) -> RuleSet;
}

/// Flattens every node into its category's list in node order, ignoring
/// connections. Node types without compiled semantics are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatCategoryCompiler;

impl RuleCompiler for FlatCategoryCompiler {
    fn compile(&self, graph: &FlowGraph) -> RuleSet {
        let mut rules = RuleSet::default();
        for node in graph.nodes() {
            match compile_node(&node.config) {
                Some(CompiledRule::Trigger(t)) => rules.triggers.push(t),
                Some(CompiledRule::Condition(c)) => rules.conditions.push(c),
                Some(CompiledRule::Action(a)) => rules.actions.push(a),
                None => log::debug!("{} ({}) has no rule form", node.id, node.type_id()),
            }
        }
        rules
    }
}

/// Compile with the default, topology-blind policy
pub fn to_automation(graph: &FlowGraph) -> RuleSet {
    FlatCategoryCompiler.compile(graph)
}

/// One compiled rule entry
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledRule {
    Trigger(Trigger),
    Condition(Condition),
    Action(Action),
}

/// Whether nodes of `type_id` produce a rule entry
pub fn has_compiled_semantics(type_id: &str) -> bool {
    NodeConfig::default_for(type_id)
        .map(|config| compile_node(&config).is_some())
        .unwrap_or(false)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Map one node's config to its rule entry
pub fn compile_node(config: &NodeConfig) -> Option<CompiledRule> {
    use CompiledRule as R;

    let rule = match config {
        NodeConfig::DeviceStateTrigger(c) => R::Trigger(Trigger::DeviceState {
            device_id: c.device.clone(),
            attribute: c.attribute.clone(),
            from: non_empty(&c.from),
            to: non_empty(&c.to),
        }),
        NodeConfig::NatsEventTrigger(c) => R::Trigger(Trigger::NatsEvent {
            subject: c.subject.clone(),
            queue: non_empty(&c.queue),
        }),
        NodeConfig::TimeTrigger(c) => R::Trigger(Trigger::Time {
            time: c.time.clone(),
        }),
        NodeConfig::ScheduleTrigger(c) => R::Trigger(Trigger::Schedule {
            cron: c.cron.clone(),
        }),
        NodeConfig::SunriseTrigger(c) => R::Trigger(Trigger::Sunrise { offset: c.offset }),
        NodeConfig::SunsetTrigger(c) => R::Trigger(Trigger::Sunset { offset: c.offset }),
        NodeConfig::IntervalTrigger(c) => R::Trigger(Trigger::Interval {
            interval: c.interval,
            unit: c.unit.clone(),
        }),
        NodeConfig::StateChangeTrigger(c) => R::Trigger(Trigger::StateChange {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
        }),

        NodeConfig::DeviceStateCondition(c) => R::Condition(Condition::DeviceState {
            device_id: c.device.clone(),
            attribute: c.attribute.clone(),
            operator: c.operator.clone(),
            value: c.value.clone(),
        }),
        NodeConfig::TimeCondition(c) => R::Condition(Condition::TimeBetween {
            after: c.after.clone(),
            before: c.before.clone(),
        }),
        NodeConfig::DayOfWeekCondition(c) => R::Condition(Condition::DayOfWeek {
            days: c.days.clone(),
        }),
        NodeConfig::GetStateNode(GetStateNodeConfig { bucket, key })
        | NodeConfig::WatchStateNode(WatchStateNodeConfig { bucket, key }) => {
            R::Condition(Condition::StateValue {
                bucket: bucket.clone(),
                key: key.clone(),
            })
        }
        NodeConfig::CompareStateNode(c) => R::Condition(Condition::StateCompare {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
            operator: c.operator.clone(),
            value: c.value.clone(),
        }),

        NodeConfig::DeviceAction(c) => R::Action(Action::DeviceCommand {
            device_id: c.device.clone(),
            command: c.command.clone(),
            parameters: c.parameters.clone(),
        }),
        NodeConfig::PublishEventAction(c) => R::Action(Action::PublishEvent {
            subject: c.subject.clone(),
            payload: c.payload.clone(),
        }),
        NodeConfig::UpdateStateAction(c) => R::Action(Action::UpdateState {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
            value: c.value.clone(),
            ttl: c.ttl,
        }),
        NodeConfig::SceneAction(c) => R::Action(Action::ActivateScene {
            scene_id: c.scene.clone(),
        }),
        NodeConfig::NotificationAction(c) => R::Action(Action::Notification {
            title: c.title.clone(),
            message: c.message.clone(),
            priority: c.priority.clone(),
        }),
        NodeConfig::DelayAction(c) => R::Action(Action::Delay {
            delay: c.delay,
            unit: c.unit.clone(),
        }),
        NodeConfig::SetStateNode(c) => R::Action(Action::SetState {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
            value: c.value.clone(),
        }),
        NodeConfig::IncrementStateNode(c) => R::Action(Action::IncrementState {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
            increment: c.increment,
        }),
        NodeConfig::AppendStateNode(c) => R::Action(Action::AppendState {
            bucket: c.bucket.clone(),
            key: c.key.clone(),
            value: c.value.clone(),
        }),

        NodeConfig::NumericCondition(_)
        | NodeConfig::SunCondition(_)
        | NodeConfig::PresenceCondition(_)
        | NodeConfig::ZoneCondition(_)
        | NodeConfig::ScriptAction(_)
        | NodeConfig::AndGate(_)
        | NodeConfig::OrGate(_)
        | NodeConfig::NotGate(_)
        | NodeConfig::SwitchNode(_)
        | NodeConfig::CounterNode(_)
        | NodeConfig::TimerNode(_) => return None,
    };
    Some(rule)
}

/// Node config that compiles to `rule`.
///
/// This inverts `compile_node` for every compiled type except one:
/// `watchStateNode` and `getStateNode` both compile to a `state_value`
/// condition, which always comes back as `getStateNode`. A watch node
/// therefore keeps its type only when the stored layout is present; a
/// rules-only reload turns it into a get node with the same bucket and key.
pub fn decompile(rule: &CompiledRule) -> NodeConfig {
    match rule.clone() {
        CompiledRule::Trigger(trigger) => match trigger {
            Trigger::DeviceState {
                device_id,
                attribute,
                from,
                to,
            } => NodeConfig::DeviceStateTrigger(DeviceStateTriggerConfig {
                device: device_id,
                attribute,
                from: from.unwrap_or_default(),
                to: to.unwrap_or_default(),
            }),
            Trigger::NatsEvent { subject, queue } => {
                NodeConfig::NatsEventTrigger(NatsEventTriggerConfig {
                    subject,
                    queue: queue.unwrap_or_default(),
                })
            }
            Trigger::Time { time } => NodeConfig::TimeTrigger(TimeTriggerConfig { time }),
            Trigger::Schedule { cron } => {
                NodeConfig::ScheduleTrigger(ScheduleTriggerConfig { cron })
            }
            Trigger::Sunrise { offset } => {
                NodeConfig::SunriseTrigger(SunriseTriggerConfig { offset })
            }
            Trigger::Sunset { offset } => NodeConfig::SunsetTrigger(SunsetTriggerConfig { offset }),
            Trigger::Interval { interval, unit } => {
                NodeConfig::IntervalTrigger(IntervalTriggerConfig { interval, unit })
            }
            Trigger::StateChange { bucket, key } => {
                NodeConfig::StateChangeTrigger(StateChangeTriggerConfig { bucket, key })
            }
        },
        CompiledRule::Condition(condition) => match condition {
            Condition::DeviceState {
                device_id,
                attribute,
                operator,
                value,
            } => NodeConfig::DeviceStateCondition(DeviceStateConditionConfig {
                device: device_id,
                attribute,
                operator,
                value,
            }),
            Condition::TimeBetween { after, before } => {
                NodeConfig::TimeCondition(TimeConditionConfig { after, before })
            }
            Condition::DayOfWeek { days } => {
                NodeConfig::DayOfWeekCondition(DayOfWeekConditionConfig { days })
            }
            Condition::StateValue { bucket, key } => {
                NodeConfig::GetStateNode(GetStateNodeConfig { bucket, key })
            }
            Condition::StateCompare {
                bucket,
                key,
                operator,
                value,
            } => NodeConfig::CompareStateNode(CompareStateNodeConfig {
                bucket,
                key,
                operator,
                value,
            }),
        },
        CompiledRule::Action(action) => match action {
            Action::DeviceCommand {
                device_id,
                command,
                parameters,
            } => NodeConfig::DeviceAction(DeviceActionConfig {
                device: device_id,
                command,
                parameters,
            }),
            Action::PublishEvent { subject, payload } => {
                NodeConfig::PublishEventAction(PublishEventActionConfig { subject, payload })
            }
            Action::UpdateState {
                bucket,
                key,
                value,
                ttl,
            } => NodeConfig::UpdateStateAction(UpdateStateActionConfig {
                bucket,
                key,
                value,
                ttl,
            }),
            Action::ActivateScene { scene_id } => {
                NodeConfig::SceneAction(SceneActionConfig { scene: scene_id })
            }
            Action::Notification {
                title,
                message,
                priority,
            } => NodeConfig::NotificationAction(NotificationActionConfig {
                title,
                message,
                priority,
            }),
            Action::Delay { delay, unit } => NodeConfig::DelayAction(DelayActionConfig { delay, unit }),
            Action::SetState { bucket, key, value } => {
                NodeConfig::SetStateNode(SetStateNodeConfig { bucket, key, value })
            }
            Action::IncrementState {
                bucket,
                key,
                increment,
            } => NodeConfig::IncrementStateNode(IncrementStateNodeConfig {
                bucket,
                key,
                increment,
            }),
            Action::AppendState { bucket, key, value } => {
                NodeConfig::AppendStateNode(AppendStateNodeConfig { bucket, key, value })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::registry::NodeTypeRegistry;
    use crate::types::NodeId;
    use serde_json::json;

    fn place(
        graph: &mut FlowGraph,
        registry: &NodeTypeRegistry,
        type_id: &str,
        fields: &[(&str, FieldValue)],
    ) -> NodeId {
        let id = graph.add_node(registry, type_id, Point::default()).unwrap();
        let mut config = graph.node(id).unwrap().config.clone();
        for (name, value) in fields {
            config.set_field(name, value.clone()).unwrap();
        }
        graph.set_config(id, config).unwrap();
        id
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_trigger_and_action_without_connection() {
        let registry = NodeTypeRegistry::with_builtins();
        let mut graph = FlowGraph::new();
        place(
            &mut graph,
            &registry,
            "deviceStateTrigger",
            &[
                ("device", text("light.kitchen")),
                ("attribute", text("state")),
                ("to", text("on")),
            ],
        );
        place(
            &mut graph,
            &registry,
            "deviceAction",
            &[("device", text("light.hall")), ("command", text("turn_on"))],
        );

        let rules = to_automation(&graph);
        assert_eq!(
            serde_json::to_value(&rules).unwrap(),
            json!({
                "triggers": [{"type": "device_state", "device_id": "light.kitchen", "attribute": "state", "to": "on"}],
                "conditions": [],
                "actions": [{"type": "device_command", "device_id": "light.hall", "command": "turn_on"}]
            })
        );
    }

    #[test]
    fn test_uncompiled_types_skipped() {
        let registry = NodeTypeRegistry::with_builtins();
        let mut graph = FlowGraph::new();
        place(&mut graph, &registry, "andGate", &[]);
        place(&mut graph, &registry, "scriptAction", &[]);
        place(&mut graph, &registry, "sunCondition", &[]);
        assert!(to_automation(&graph).is_empty());
    }

    #[test]
    fn test_state_nodes_split_between_lists() {
        let registry = NodeTypeRegistry::with_builtins();
        let mut graph = FlowGraph::new();
        place(&mut graph, &registry, "watchStateNode", &[("key", text("mode"))]);
        place(&mut graph, &registry, "compareStateNode", &[("key", text("mode"))]);
        place(
            &mut graph,
            &registry,
            "incrementStateNode",
            &[("key", text("count")), ("increment", FieldValue::Integer(2))],
        );

        let rules = to_automation(&graph);
        assert_eq!(
            rules.conditions[0],
            Condition::StateValue {
                bucket: "automation-state".into(),
                key: "mode".into()
            }
        );
        assert!(matches!(rules.conditions[1], Condition::StateCompare { .. }));
        assert_eq!(
            rules.actions,
            vec![Action::IncrementState {
                bucket: "automation-state".into(),
                key: "count".into(),
                increment: 2
            }]
        );
    }

    #[test]
    fn test_compile_ignores_connections() {
        let registry = NodeTypeRegistry::with_builtins();
        let mut graph = FlowGraph::new();
        let t = place(&mut graph, &registry, "timeTrigger", &[]);
        let a = place(&mut graph, &registry, "sceneAction", &[]);
        let unwired = to_automation(&graph);
        graph.add_connection(&registry, t, 0, a, 0).unwrap();
        assert_eq!(to_automation(&graph), unwired);
    }

    #[test]
    fn test_decompile_inverts_compile() {
        for type_id in NodeConfig::TYPE_IDS {
            let config = NodeConfig::default_for(type_id).unwrap();
            if let Some(rule) = compile_node(&config) {
                let expected = if *type_id == "watchStateNode" {
                    NodeConfig::default_for("getStateNode").unwrap()
                } else {
                    config
                };
                assert_eq!(decompile(&rule), expected, "{}", type_id);
            }
        }
    }

    #[test]
    fn test_has_compiled_semantics() {
        assert!(has_compiled_semantics("sceneAction"));
        assert!(has_compiled_semantics("watchStateNode"));
        assert!(!has_compiled_semantics("orGate"));
        assert!(!has_compiled_semantics("unknown"));
    }
}
