//! Core graph types
//!
//! Nodes, connections and their identifiers. Ids are monotonic per graph and
//! render as `node_<n>` / `conn_<n>`, which is also their wire form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::node_config::NodeConfig;

macro_rules! graph_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub u64);

        impl $name {
            pub const PREFIX: &'static str = $prefix;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.strip_prefix($prefix)
                    .and_then(|n| n.parse().ok())
                    .map(Self)
                    .ok_or_else(|| format!("invalid {} '{}'", stringify!($name), s))
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

graph_id!(
    /// Identifier of a node within one graph
    NodeId,
    "node_"
);

graph_id!(
    /// Identifier of a connection within one graph
    ConnectionId,
    "conn_"
);

/// A placed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner in graph space
    pub position: Point,
    pub size: Size,
    pub config: NodeConfig,
}

impl Node {
    pub fn type_id(&self) -> &'static str {
        self.config.type_id()
    }

    /// Bounding rectangle in graph space
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node: NodeId,
    pub from_port: usize,
    pub to_node: NodeId,
    pub to_port: usize,
}

impl Connection {
    /// Whether either endpoint is `node_id`
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Whether this connection joins the same ports as the given tuple
    pub fn same_endpoints(&self, from: NodeId, from_port: usize, to: NodeId, to_port: usize) -> bool {
        self.from_node == from
            && self.from_port == from_port
            && self.to_node == to
            && self.to_port == to_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        assert_eq!(NodeId(7).to_string(), "node_7");
        assert_eq!("node_12".parse::<NodeId>(), Ok(NodeId(12)));
        assert!("conn_1".parse::<NodeId>().is_err());
        assert!("node_x".parse::<NodeId>().is_err());
        assert_eq!(ConnectionId(3).to_string(), "conn_3");
    }

    #[test]
    fn test_connection_serialization() {
        let conn = Connection {
            id: ConnectionId(1),
            from_node: NodeId(1),
            from_port: 0,
            to_node: NodeId(2),
            to_port: 1,
        };
        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["id"], "conn_1");
        assert_eq!(json["fromNode"], "node_1");
        assert_eq!(json["toPort"], 1);

        let back: Connection = serde_json::from_value(json).unwrap();
        assert_eq!(back, conn);
    }
}
