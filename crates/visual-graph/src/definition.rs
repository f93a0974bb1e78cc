//! Node definitions
//!
//! A `NodeDefinition` is the immutable template every node of a type is
//! instantiated from: its ports, default properties, documentation and the
//! extra imports generated code needs when the type is used.

use serde::{Deserialize, Serialize};

use crate::types::{Node, NodeCategory, NodeMetadata, Port, Position, Properties, Size};

/// Import statements a node type contributes, per target framework
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkImports {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub react: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vue: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vanilla: Vec<String>,
}

/// Template for constructing nodes of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    /// Unique type identifier (e.g., "emotion-detector")
    pub node_type: String,
    /// Default label for new instances
    pub label: String,
    pub category: NodeCategory,
    pub description: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub examples: Vec<String>,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    #[serde(default)]
    pub default_properties: Properties,
    #[serde(default)]
    pub imports: FrameworkImports,
}

impl NodeDefinition {
    /// Start a definition with no ports or properties
    pub fn new(
        node_type: impl Into<String>,
        label: impl Into<String>,
        category: NodeCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            category,
            description: description.into(),
            documentation: String::new(),
            examples: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            default_properties: Properties::new(),
            imports: FrameworkImports::default(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// Add a default property copied onto every new instance
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.default_properties.insert(key.into(), value);
        self
    }

    pub fn react_import(mut self, statement: impl Into<String>) -> Self {
        self.imports.react.push(statement.into());
        self
    }

    pub fn vue_import(mut self, statement: impl Into<String>) -> Self {
        self.imports.vue.push(statement.into());
        self
    }

    pub fn vanilla_import(mut self, statement: impl Into<String>) -> Self {
        self.imports.vanilla.push(statement.into());
        self
    }

    /// Build a node of this type with the given id
    ///
    /// Ports, default properties and documentation are copied, so later
    /// edits to the node never touch the definition.
    pub fn instantiate(&self, id: impl Into<String>, position: Position) -> Node {
        Node {
            id: id.into(),
            node_type: self.node_type.clone(),
            label: self.label.clone(),
            category: self.category,
            position,
            size: Size::default(),
            properties: self.default_properties.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            metadata: NodeMetadata {
                description: self.description.clone(),
                documentation: self.documentation.clone(),
                examples: self.examples.clone(),
            },
        }
    }

    /// Check that port ids are unique within inputs and within outputs
    pub fn has_unique_ports(&self) -> bool {
        self.duplicate_port().is_none()
    }

    /// First port id declared twice on the same side, if any
    pub fn duplicate_port(&self) -> Option<&str> {
        fn first_duplicate(ports: &[Port]) -> Option<&str> {
            let mut seen = std::collections::HashSet::new();
            ports
                .iter()
                .find(|p| !seen.insert(p.id.as_str()))
                .map(|p| p.id.as_str())
        }
        first_duplicate(&self.inputs).or_else(|| first_duplicate(&self.outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortType;

    #[test]
    fn test_definition_builder() {
        let def = NodeDefinition::new("slider", "Slider", NodeCategory::Ui, "Numeric slider")
            .input(Port::optional("value", "Value", PortType::Number))
            .output(Port::optional("change", "Changed", PortType::Function))
            .property("min", serde_json::json!(0))
            .react_import("import { Slider } from '@/components/ui/slider';");

        assert_eq!(def.inputs.len(), 1);
        assert_eq!(def.outputs.len(), 1);
        assert_eq!(def.default_properties["min"], 0);
        assert_eq!(def.imports.react.len(), 1);
        assert!(def.imports.vue.is_empty());
        assert!(def.has_unique_ports());
    }

    #[test]
    fn test_duplicate_ports_detected() {
        let def = NodeDefinition::new("dup", "Dup", NodeCategory::Logic, "")
            .input(Port::optional("a", "A", PortType::String))
            .input(Port::optional("a", "A again", PortType::String));
        assert!(!def.has_unique_ports());
    }

    #[test]
    fn test_instantiate_copies_template() {
        let def = NodeDefinition::new("card", "Card", NodeCategory::Ui, "A card")
            .with_examples(["Profile"])
            .input(Port::optional("content", "Content", PortType::String))
            .property("title", serde_json::json!("Hello"));

        let node = def.instantiate("n1", Position::new(10.0, 20.0));
        assert_eq!(node.node_type, "card");
        assert_eq!(node.label, "Card");
        assert_eq!(node.size, Size::default());
        assert_eq!(node.properties["title"], "Hello");
        assert_eq!(node.inputs, def.inputs);
        assert_eq!(node.metadata.examples, vec!["Profile".to_string()]);
    }

    #[test]
    fn test_definition_serialization() {
        let def = NodeDefinition::new("card", "Card", NodeCategory::Ui, "A card");
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["nodeType"], "card");
        assert_eq!(json["category"], "ui");
        assert!(json["defaultProperties"].is_object());
    }
}
