//! Fluent builder for visual projects
//!
//! Builds a [`VisualProject`] directly, without the engine's connection
//! checks. Fixtures use it to express graphs the engine would refuse, such
//! as cycles or lattice-incompatible edges loaded from old documents.

use serde_json::Value;

use crate::definition::NodeDefinition;
use crate::types::{
    Edge, EdgeKind, Node, NodeCategory, NodeMetadata, Port, Position, ProjectFramework, Size,
    VisualProject,
};

/// Fluent builder for constructing projects
///
/// # Example
///
/// ```ignore
/// let registry = NodeRegistry::with_builtins();
/// let project = ProjectBuilder::new("Login")
///     .add_node("btn", registry.get("button").unwrap(), (0.0, 0.0))
///     .with_label("Sign In")
///     .add_node("handler", registry.get("event-handler").unwrap(), (0.0, 120.0))
///     .add_edge("btn", "click", "handler", "trigger")
///     .build();
/// ```
pub struct ProjectBuilder {
    project: VisualProject,
    edge_counter: usize,
}

impl ProjectBuilder {
    /// Start an empty project with a fixed id derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let mut project = VisualProject::new(name);
        project.id = format!("project-{}", project.name.to_lowercase().replace(' ', "-"));
        Self {
            project,
            edge_counter: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.project.description = description.into();
        self
    }

    pub fn with_framework(mut self, framework: ProjectFramework) -> Self {
        self.project.metadata.framework = framework;
        self
    }

    pub fn emotion_enabled(mut self, enabled: bool) -> Self {
        self.project.metadata.emotion_enabled = enabled;
        self
    }

    pub fn ai_enabled(mut self, enabled: bool) -> Self {
        self.project.metadata.ai_enabled = enabled;
        self
    }

    /// Add a node instantiated from a definition
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        definition: &NodeDefinition,
        position: (f64, f64),
    ) -> Self {
        let node = definition.instantiate(id, Position::new(position.0, position.1));
        self.project.nodes.push(node);
        self
    }

    /// Add a bare node with no ports, categorised as data
    ///
    /// Use the `with_*` methods to shape it.
    pub fn add_raw_node(
        mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        position: (f64, f64),
    ) -> Self {
        let node_type = node_type.into();
        self.project.nodes.push(Node {
            id: id.into(),
            label: node_type.clone(),
            node_type,
            category: NodeCategory::Data,
            position: Position::new(position.0, position.1),
            size: Size::default(),
            properties: Default::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            metadata: NodeMetadata::default(),
        });
        self
    }

    /// Set the label of the most recently added node
    pub fn with_label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.map_last(|node| node.label = label)
    }

    /// Set the category of the most recently added node
    pub fn with_category(self, category: NodeCategory) -> Self {
        self.map_last(|node| node.category = category)
    }

    /// Set a property on the most recently added node
    pub fn with_property(self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        self.map_last(|node| {
            node.properties.insert(key, value);
        })
    }

    /// Append an input port to the most recently added node
    pub fn with_input(self, port: Port) -> Self {
        self.map_last(|node| node.inputs.push(port))
    }

    /// Append an output port to the most recently added node
    pub fn with_output(self, port: Port) -> Self {
        self.map_last(|node| node.outputs.push(port))
    }

    /// Add a data edge (auto-generates edge ID)
    pub fn add_edge(
        self,
        source: impl Into<String>,
        source_port: impl Into<String>,
        target: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        self.add_typed_edge(source, source_port, target, target_port, EdgeKind::Data)
    }

    /// Add an edge of an explicit kind (auto-generates edge ID)
    pub fn add_typed_edge(
        mut self,
        source: impl Into<String>,
        source_port: impl Into<String>,
        target: impl Into<String>,
        target_port: impl Into<String>,
        kind: EdgeKind,
    ) -> Self {
        self.edge_counter += 1;
        self.project.edges.push(Edge {
            id: format!("edge-{}", self.edge_counter),
            source_node_id: source.into(),
            source_port_id: source_port.into(),
            target_node_id: target.into(),
            target_port_id: target_port.into(),
            kind,
        });
        self
    }

    /// Build the project without validation
    pub fn build(self) -> VisualProject {
        self.project
    }

    fn map_last(mut self, f: impl FnOnce(&mut Node)) -> Self {
        if let Some(node) = self.project.nodes.last_mut() {
            f(node);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeRegistry;
    use crate::types::PortType;

    #[test]
    fn test_builder_from_definitions() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Login Form")
            .add_node("btn", registry.get("button").unwrap(), (10.0, 20.0))
            .with_label("Sign In")
            .add_node("handler", registry.get("event-handler").unwrap(), (10.0, 140.0))
            .add_edge("btn", "click", "handler", "trigger")
            .build();

        assert_eq!(project.id, "project-login-form");
        assert_eq!(project.nodes.len(), 2);
        assert_eq!(project.nodes[0].label, "Sign In");
        assert_eq!(project.nodes[0].category, NodeCategory::Ui);
        assert_eq!(project.edges[0].id, "edge-1");
    }

    #[test]
    fn test_raw_nodes() {
        let project = ProjectBuilder::new("Raw")
            .emotion_enabled(false)
            .add_raw_node("a", "custom", (0.0, 0.0))
            .with_category(NodeCategory::Logic)
            .with_output(Port::optional("out", "Out", PortType::Object))
            .with_property("state_count", serde_json::json!(3))
            .build();

        let node = &project.nodes[0];
        assert_eq!(node.category, NodeCategory::Logic);
        assert_eq!(node.outputs.len(), 1);
        assert_eq!(node.properties["state_count"], 3);
        assert!(!project.metadata.emotion_enabled);
    }
}
