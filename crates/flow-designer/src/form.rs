//! Node field-editing form
//!
//! Opened by double-clicking a node. Edits are buffered and written back in
//! one step on commit; if any edit fails its type check nothing is applied.

use std::collections::BTreeMap;

use crate::error::{DesignerError, Result};
use crate::graph::FlowGraph;
use crate::node_config::{ConfigField, FieldValue, NodeConfig};
use crate::types::NodeId;

/// Buffered edits against one node's config
#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    node_id: NodeId,
    type_id: &'static str,
    fields: Vec<ConfigField>,
    edits: BTreeMap<String, FieldValue>,
}

impl NodeForm {
    /// Snapshot the node's current fields
    pub fn open(graph: &FlowGraph, node_id: NodeId) -> Result<Self> {
        let node = graph
            .node(node_id)
            .ok_or(DesignerError::NodeNotFound(node_id))?;
        Ok(Self {
            node_id,
            type_id: node.type_id(),
            fields: node.config.fields(),
            edits: BTreeMap::new(),
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn type_id(&self) -> &'static str {
        self.type_id
    }

    /// Fields with pending edits applied, in form order
    pub fn fields(&self) -> Vec<ConfigField> {
        self.fields
            .iter()
            .map(|field| match self.edits.get(field.name) {
                Some(value) => ConfigField {
                    value: value.clone(),
                    ..field.clone()
                },
                None => field.clone(),
            })
            .collect()
    }

    /// Buffer a typed edit. Only the field name is checked here.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        if !self.fields.iter().any(|f| f.name == name) {
            return Err(DesignerError::UnknownField {
                type_id: self.type_id.to_string(),
                field: name.to_string(),
            });
        }
        self.edits.insert(name.to_string(), value);
        Ok(())
    }

    /// Buffer raw text input, parsed according to the field's kind.
    ///
    /// Unparseable input is kept as text and fails at commit.
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<()> {
        let kind = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.kind)
            .ok_or_else(|| DesignerError::UnknownField {
                type_id: self.type_id.to_string(),
                field: name.to_string(),
            })?;
        let value = FieldValue::parse(kind, raw).unwrap_or_else(|| FieldValue::Text(raw.to_string()));
        self.set(name, value)
    }

    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Apply every buffered edit to the node, all or nothing
    pub fn commit(self, graph: &mut FlowGraph) -> Result<NodeConfig> {
        let node = graph
            .node(self.node_id)
            .ok_or(DesignerError::NodeNotFound(self.node_id))?;
        let mut config = node.config.clone();
        for (name, value) in self.edits {
            config.set_field(&name, value)?;
        }
        graph.set_config(self.node_id, config.clone())?;
        Ok(config)
    }
}
