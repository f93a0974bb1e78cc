//! Core types for visual application graphs
//!
//! These types define the structure of a visual project: nodes, the typed
//! ports they expose, the edges wiring ports together, and project metadata.
//! They are plain data; all mutation goes through [`crate::GraphEngine`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Unique identifier for a port (unique within its node)
pub type PortId = String;

/// Node property bag. Ordered so that code generation is deterministic.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Property keys with this prefix declare component state.
pub const STATE_PROPERTY_PREFIX: &str = "state_";

/// The data type carried by a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    Emotion,
    AiResponse,
}

impl PortType {
    /// Check whether a value of this type may flow into a port of `target` type.
    ///
    /// The lattice is directional and lossy: numbers and booleans
    /// stringify, most things widen to `object`, an emotion may feed an AI
    /// response. Identity is always allowed; every other pair is rejected.
    pub fn can_flow_into(self, target: PortType) -> bool {
        use PortType::*;

        if self == target {
            return true;
        }

        matches!(
            (self, target),
            (String, Object)
                | (Number, String)
                | (Number, Object)
                | (Boolean, String)
                | (Boolean, Object)
                | (Array, Object)
                | (Emotion, Object)
                | (Emotion, AiResponse)
                | (AiResponse, Object)
                | (AiResponse, String)
        )
    }

    /// Wire spelling of the type (`ai-response`, `string`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::String => "string",
            PortType::Number => "number",
            PortType::Boolean => "boolean",
            PortType::Object => "object",
            PortType::Array => "array",
            PortType::Function => "function",
            PortType::Emotion => "emotion",
            PortType::AiResponse => "ai-response",
        }
    }
}

impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, named slot on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Identifier, unique within the owning node's inputs or outputs
    pub id: PortId,
    /// Human-readable name
    pub name: String,
    /// Data type of the port
    #[serde(rename = "type")]
    pub port_type: PortType,
    /// Whether an input must be satisfied by an edge or a default
    pub required: bool,
    /// Value used when nothing is connected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl Port {
    /// Create a required port
    pub fn required(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: true,
            default_value: None,
        }
    }

    /// Create an optional port
    pub fn optional(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: false,
            default_value: None,
        }
    }

    /// Set a default value for this port
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// Visible widgets (buttons, inputs, cards, ...)
    Ui,
    /// Event handlers and control logic
    Logic,
    /// State and data sources
    Data,
    /// Emotion detection capabilities
    Emotion,
    /// AI assistant capabilities
    Ai,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Ui => "ui",
            NodeCategory::Logic => "logic",
            NodeCategory::Data => "data",
            NodeCategory::Emotion => "emotion",
            NodeCategory::Ai => "ai",
        }
    }
}

/// Kind of an edge, inferred from its endpoints when the edge is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Data,
    Event,
    Emotion,
    AiFlow,
}

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas size of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 100.0,
        }
    }
}

/// Documentation copied onto a node from its definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub description: String,
    pub documentation: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A node instance in a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Node type (references a registered `NodeDefinition`)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display label, also the basis for generated identifiers
    pub label: String,
    pub category: NodeCategory,
    pub position: Position,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl Node {
    /// Find an input port by ID
    pub fn input(&self, port_id: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == port_id)
    }

    /// Find an output port by ID
    pub fn output(&self, port_id: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id == port_id)
    }

    /// Properties following the `state_` naming convention, with the prefix stripped
    pub fn state_properties(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.properties.iter().filter_map(|(key, value)| {
            key.strip_prefix(STATE_PROPERTY_PREFIX)
                .filter(|name| !name.is_empty())
                .map(|name| (name, value))
        })
    }

    /// String property, if present and a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

/// A directed connection from an output port to an input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source_node_id: NodeId,
    pub source_port_id: PortId,
    pub target_node_id: NodeId,
    pub target_port_id: PortId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    /// Whether this edge touches the given node on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

/// Target framework recorded on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFramework {
    #[default]
    React,
    Vue,
    Angular,
    Vanilla,
}

impl ProjectFramework {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectFramework::React => "react",
            ProjectFramework::Vue => "vue",
            ProjectFramework::Angular => "angular",
            ProjectFramework::Vanilla => "vanilla",
        }
    }
}

/// Project-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub version: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub author: String,
    pub framework: ProjectFramework,
    pub emotion_enabled: bool,
    pub ai_enabled: bool,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: "1.0.0".to_string(),
            created: now,
            modified: now,
            author: "anonymous".to_string(),
            framework: ProjectFramework::React,
            emotion_enabled: true,
            ai_enabled: true,
        }
    }
}

/// A complete visual project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

impl VisualProject {
    /// Create a new empty project with a generated ID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: ProjectMetadata::default(),
        }
    }

    /// The default project an editor starts with
    pub fn empty() -> Self {
        Self::new("Untitled Project")
    }

    /// Parse a project from its JSON document form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the project as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target_node_id == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source_node_id == node_id)
    }

    /// Nodes of a given category, in insertion order
    pub fn nodes_in<'a>(&'a self, category: NodeCategory) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.category == category)
    }
}

impl Default for VisualProject {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_identity() {
        for t in [
            PortType::String,
            PortType::Number,
            PortType::Boolean,
            PortType::Object,
            PortType::Array,
            PortType::Function,
            PortType::Emotion,
            PortType::AiResponse,
        ] {
            assert!(t.can_flow_into(t), "{} should connect to itself", t);
        }
    }

    #[test]
    fn test_lattice_widening() {
        assert!(PortType::Number.can_flow_into(PortType::String));
        assert!(PortType::Boolean.can_flow_into(PortType::Object));
        assert!(PortType::Emotion.can_flow_into(PortType::AiResponse));
        assert!(PortType::AiResponse.can_flow_into(PortType::String));
        assert!(PortType::Array.can_flow_into(PortType::Object));
    }

    #[test]
    fn test_lattice_is_asymmetric() {
        assert!(PortType::String.can_flow_into(PortType::Object));
        assert!(!PortType::Object.can_flow_into(PortType::String));
        assert!(!PortType::String.can_flow_into(PortType::Number));
        assert!(!PortType::Object.can_flow_into(PortType::Number));
        assert!(!PortType::Function.can_flow_into(PortType::Object));
        assert!(!PortType::AiResponse.can_flow_into(PortType::Emotion));
    }

    #[test]
    fn test_port_type_wire_names() {
        let json = serde_json::to_string(&PortType::AiResponse).unwrap();
        assert_eq!(json, "\"ai-response\"");
        let kind: EdgeKind = serde_json::from_str("\"ai-flow\"").unwrap();
        assert_eq!(kind, EdgeKind::AiFlow);
    }

    #[test]
    fn test_state_properties() {
        let mut properties = Properties::new();
        properties.insert("state_count".to_string(), serde_json::json!(0));
        properties.insert("label".to_string(), serde_json::json!("x"));
        properties.insert("state_".to_string(), serde_json::json!(1));
        let node = Node {
            id: "n1".to_string(),
            node_type: "state".to_string(),
            label: "Counter".to_string(),
            category: NodeCategory::Data,
            position: Position::default(),
            size: Size::default(),
            properties,
            inputs: vec![],
            outputs: vec![],
            metadata: NodeMetadata::default(),
        };

        let state: Vec<_> = node.state_properties().collect();
        assert_eq!(state, vec![("count", &serde_json::json!(0))]);
    }

    #[test]
    fn test_project_json_shape() {
        let project = VisualProject::new("Demo");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["metadata"]["framework"], "react");
        assert_eq!(json["metadata"]["emotionEnabled"], true);
        assert!(json["metadata"]["created"].is_string());

        let restored = VisualProject::from_json(&project.to_json_pretty().unwrap()).unwrap();
        assert_eq!(restored, project);
    }
}
