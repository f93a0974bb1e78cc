//! Node type registry
//!
//! Maps node type strings to their [`NodeDefinition`] templates. A registry
//! is an explicit object: an editor session builds one (usually with
//! [`NodeRegistry::with_builtins`]), wraps it in an `Arc`, and hands the same
//! instance to the graph engine and the compiler.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use visual_graph::{GraphEngine, NodeRegistry};
//!
//! let mut registry = NodeRegistry::with_builtins();
//! registry.register(my_plugin_definition())?;
//!
//! let engine = GraphEngine::new(Arc::new(registry));
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::definition::NodeDefinition;
use crate::error::{GraphError, Result};
use crate::types::NodeCategory;

/// Link-time registration of a builtin node definition
///
/// Builtins submit a function pointer producing their definition:
///
/// ```ignore
/// inventory::submit!(visual_graph::BuiltinNodeFn(button_definition));
/// ```
pub struct BuiltinNodeFn(pub fn() -> NodeDefinition);

inventory::collect!(BuiltinNodeFn);

/// Registry of node types and their definitions
///
/// Registration is append/overwrite only; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    definitions: HashMap<String, NodeDefinition>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin node definition
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in inventory::iter::<BuiltinNodeFn> {
            let definition = (builtin.0)();
            if let Err(e) = registry.register(definition) {
                log::warn!("Skipping builtin node definition: {}", e);
            }
        }
        log::debug!("Registered {} builtin node types", registry.len());
        registry
    }

    /// Register a definition under an explicit type tag
    ///
    /// The definition's own `node_type` is overwritten with `node_type`.
    /// An existing entry for the same tag is replaced.
    pub fn register_node(
        &mut self,
        node_type: impl Into<String>,
        mut definition: NodeDefinition,
    ) -> Result<()> {
        definition.node_type = node_type.into();
        self.register(definition)
    }

    /// Register a definition under its own `node_type`
    pub fn register(&mut self, definition: NodeDefinition) -> Result<()> {
        if let Some(port_id) = definition.duplicate_port() {
            return Err(GraphError::DuplicatePort {
                node_type: definition.node_type.clone(),
                port_id: port_id.to_string(),
            });
        }

        if self.definitions.contains_key(&definition.node_type) {
            log::debug!("Overriding node type '{}'", definition.node_type);
        }
        self.definitions
            .insert(definition.node_type.clone(), definition);
        Ok(())
    }

    /// Get the definition for a node type
    pub fn get(&self, node_type: &str) -> Option<&NodeDefinition> {
        self.definitions.get(node_type)
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.definitions.contains_key(node_type)
    }

    /// Snapshot of every registered definition, ordered by type tag
    ///
    /// Editors use this to build their palette; the snapshot is detached
    /// from the registry.
    pub fn registered_nodes(&self) -> BTreeMap<String, NodeDefinition> {
        self.definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Definitions grouped by category, each group ordered by type tag
    pub fn by_category(&self) -> BTreeMap<NodeCategory, Vec<&NodeDefinition>> {
        let mut grouped: BTreeMap<NodeCategory, Vec<&NodeDefinition>> = BTreeMap::new();
        for definition in self.definitions.values() {
            grouped.entry(definition.category).or_default().push(definition);
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        }
        grouped
    }

    /// List all registered node type strings, sorted
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` if they share the same node_type.
    pub fn merge(&mut self, other: NodeRegistry) {
        self.definitions.extend(other.definitions);
    }
}
