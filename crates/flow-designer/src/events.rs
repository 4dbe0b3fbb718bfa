//! Designer events
//!
//! Emitted by a `DesignerSession` to whatever hosts it (a UI shell, a test,
//! a log) to report graph edits, toasts and save progress.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::types::{ConnectionId, NodeId};

/// Trait for delivering designer events
///
/// Abstracts over the transport (UI channel, mpsc, collector).
pub trait EventSink: Send + Sync {
    /// Deliver an event; fails if the receiver is gone
    fn send(&self, event: DesignerEvent) -> Result<(), EventError>;
}

/// Error when delivering events fails
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Event error: {message}")]
pub struct EventError {
    pub message: String,
}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

/// Events emitted by a designer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DesignerEvent {
    /// A session was opened, empty or from a stored automation
    #[serde(rename_all = "camelCase")]
    SessionOpened {
        session_id: String,
        automation_id: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    SessionClosed { session_id: String },

    #[serde(rename_all = "camelCase")]
    NodeAdded {
        session_id: String,
        node_id: NodeId,
        type_id: String,
    },

    /// A node and its connections were removed
    #[serde(rename_all = "camelCase")]
    NodeDeleted {
        session_id: String,
        node_id: NodeId,
        connections_removed: usize,
    },

    #[serde(rename_all = "camelCase")]
    NodeConfigUpdated { session_id: String, node_id: NodeId },

    #[serde(rename_all = "camelCase")]
    ConnectionAdded {
        session_id: String,
        connection_id: ConnectionId,
    },

    #[serde(rename_all = "camelCase")]
    ConnectionDeleted {
        session_id: String,
        connection_id: ConnectionId,
    },

    /// A connection attempt was refused; the graph is unchanged
    #[serde(rename_all = "camelCase")]
    ConnectionRejected { session_id: String, reason: String },

    /// Pan or zoom changed
    #[serde(rename_all = "camelCase")]
    ViewChanged {
        session_id: String,
        zoom: f64,
        pan: Point,
    },

    /// A notice for the user
    #[serde(rename_all = "camelCase")]
    Toast {
        session_id: String,
        level: ToastLevel,
        message: String,
    },

    #[serde(rename_all = "camelCase")]
    SaveStarted { session_id: String },

    #[serde(rename_all = "camelCase")]
    Saved {
        session_id: String,
        automation_id: String,
    },

    /// The store refused or failed; the graph is unchanged
    #[serde(rename_all = "camelCase")]
    SaveFailed { session_id: String, error: String },
}

impl DesignerEvent {
    /// Create a toast event
    pub fn toast(session_id: &str, level: ToastLevel, message: impl Into<String>) -> Self {
        Self::Toast {
            session_id: session_id.to_string(),
            level,
            message: message.into(),
        }
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: DesignerEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for tests and for hosts that poll.
pub struct VecEventSink {
    events: Mutex<Vec<DesignerEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<DesignerEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages of collected toasts at `level`
    pub fn toasts(&self, level: ToastLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DesignerEvent::Toast {
                    level: l, message, ..
                } if l == level => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: DesignerEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = DesignerEvent::NodeDeleted {
            session_id: "s1".into(),
            node_id: NodeId(3),
            connections_removed: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "nodeDeleted");
        assert_eq!(json["nodeId"], "node_3");
        assert_eq!(json["connectionsRemoved"], 2);

        let back: DesignerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_toast_level_wire_name() {
        let json = serde_json::to_value(DesignerEvent::toast("s1", ToastLevel::Warning, "careful"))
            .unwrap();
        assert_eq!(json["type"], "toast");
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "careful");
    }

    #[test]
    fn test_vec_sink_collects() {
        let sink = VecEventSink::new();
        sink.send(DesignerEvent::toast("s", ToastLevel::Error, "boom"))
            .unwrap();
        sink.send(DesignerEvent::SaveStarted {
            session_id: "s".into(),
        })
        .unwrap();
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.toasts(ToastLevel::Error), vec!["boom".to_string()]);
        assert!(sink.toasts(ToastLevel::Info).is_empty());

        sink.clear();
        assert!(sink.events().is_empty());
        assert!(NullEventSink
            .send(DesignerEvent::SessionClosed {
                session_id: "s".into()
            })
            .is_ok());
    }
}
