//! Error types for the flow designer

use thiserror::Error;

use crate::descriptor::PortDirection;
use crate::types::{ConnectionId, NodeId};

/// Result type alias using DesignerError
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Errors that can occur while building or editing a flow graph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignerError {
    /// The type id is not in the node type registry
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// A referenced node does not exist in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// A referenced connection does not exist in the graph
    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    /// Port index is not declared by the node's type
    #[error("Node '{node_id}' has {count} {direction} port(s); index {index} is out of range")]
    PortOutOfRange {
        node_id: NodeId,
        direction: PortDirection,
        index: usize,
        count: usize,
    },

    /// Source and target are the same node
    #[error("Cannot connect node '{0}' to itself")]
    SelfLoop(NodeId),

    /// An identical connection already exists
    #[error("Connection already exists as '{0}'")]
    DuplicateConnection(ConnectionId),

    /// Config field name is not declared for this node type
    #[error("Node type '{type_id}' has no field '{field}'")]
    UnknownField { type_id: String, field: String },

    /// Config field value has the wrong shape
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidFieldValue { field: String, expected: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The designer session was already closed
    #[error("Designer session is closed")]
    SessionClosed,
}

impl DesignerError {
    /// Create an invalid field value error
    pub fn invalid_field(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

impl From<serde_json::Error> for DesignerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
