//! Node type registry
//!
//! Maps type ids to their descriptors. The registry is the single source of
//! truth for which node types exist and what ports they expose; every graph
//! construction goes through `describe` first.
//!
//! # Usage
//!
//! ```ignore
//! use flow_designer::NodeTypeRegistry;
//!
//! let registry = NodeTypeRegistry::with_builtins();
//! let trigger = registry.describe("deviceStateTrigger")?;
//! assert_eq!(trigger.input_ports, 0);
//! ```

use std::collections::HashMap;

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::error::{DesignerError, Result};
use crate::node_config::NodeConfig;

/// Registry of node type descriptors
#[derive(Debug, Clone)]
pub struct NodeTypeRegistry {
    entries: HashMap<String, NodeTypeDescriptor>,
}

impl NodeTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry containing every built-in node type registered via `inventory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor_fn in inventory::iter::<DescriptorFn> {
            registry.register((descriptor_fn.0)());
        }
        log::debug!("Registered {} built-in node types", registry.entries.len());
        registry
    }

    /// Register a descriptor, replacing any entry with the same type id
    pub fn register(&mut self, descriptor: NodeTypeDescriptor) {
        self.entries
            .insert(descriptor.type_id.to_string(), descriptor);
    }

    /// Look up a node type
    pub fn describe(&self, type_id: &str) -> Result<&NodeTypeDescriptor> {
        self.entries
            .get(type_id)
            .ok_or_else(|| DesignerError::UnknownNodeType(type_id.to_string()))
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    /// All descriptors in palette order
    pub fn all(&self) -> Vec<&NodeTypeDescriptor> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by_key(|d| palette_key(d));
        all
    }

    /// Descriptors grouped by category, categories and entries in palette order.
    /// Empty categories are omitted.
    pub fn by_category(&self) -> Vec<(NodeCategory, Vec<&NodeTypeDescriptor>)> {
        let all = self.all();
        NodeCategory::ALL
            .iter()
            .filter_map(|category| {
                let entries: Vec<_> = all
                    .iter()
                    .copied()
                    .filter(|d| d.category == *category)
                    .collect();
                (!entries.is_empty()).then_some((*category, entries))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` if they share the same type id.
    pub fn merge(&mut self, other: NodeTypeRegistry) {
        self.entries.extend(other.entries);
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Category first, then catalog order, then type id for anything registered
/// from outside the built-in catalog
fn palette_key(descriptor: &NodeTypeDescriptor) -> (NodeCategory, usize, &'static str) {
    let catalog_index = NodeConfig::TYPE_IDS
        .iter()
        .position(|id| *id == descriptor.type_id)
        .unwrap_or(usize::MAX);
    (descriptor.category, catalog_index, descriptor.type_id)
}
