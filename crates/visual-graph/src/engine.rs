//! Graph engine: the single mutation surface over a project
//!
//! The engine owns one [`VisualProject`], instantiates nodes from a shared
//! [`NodeRegistry`], validates connections before they exist, and publishes
//! a [`GraphEvent`] after every successful mutation. It assumes a single
//! writer; hosts serialize calls on one thread.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{GraphError, Result};
use crate::events::{EventBus, EventKind, EventSink, GraphEvent, SubscriptionId};
use crate::registry::NodeRegistry;
use crate::types::{
    Edge, EdgeKind, Node, NodeCategory, Port, PortType, Position, Properties, VisualProject,
};
use crate::history::EditHistory;

/// Why a proposed connection was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionRejection {
    #[error("source node '{0}' does not exist")]
    MissingSourceNode(String),

    #[error("target node '{0}' does not exist")]
    MissingTargetNode(String),

    #[error("source node has no output port '{0}'")]
    MissingSourcePort(String),

    #[error("target node has no input port '{0}'")]
    MissingTargetPort(String),

    #[error("cannot connect {source_type} to {target_type}")]
    IncompatibleTypes {
        source_type: PortType,
        target_type: PortType,
    },
}

/// Pick the kind of a new edge from its endpoints
///
/// Emotion wins over AI, AI over event, and everything else carries data.
pub fn infer_edge_kind(source: &Node, source_port: &Port, target: &Node) -> EdgeKind {
    let either = |category| source.category == category || target.category == category;

    if either(NodeCategory::Emotion) {
        EdgeKind::Emotion
    } else if either(NodeCategory::Ai) {
        EdgeKind::AiFlow
    } else if source_port.port_type == PortType::Function {
        EdgeKind::Event
    } else {
        EdgeKind::Data
    }
}

/// Mutation API over a single project
pub struct GraphEngine {
    registry: Arc<NodeRegistry>,
    project: VisualProject,
    events: EventBus,
    history: Option<EditHistory>,
}

impl GraphEngine {
    /// Create an engine holding the default empty project
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self::with_project(registry, VisualProject::empty())
    }

    /// Create an engine around an existing project
    pub fn with_project(registry: Arc<NodeRegistry>, project: VisualProject) -> Self {
        Self {
            registry,
            project,
            events: EventBus::new(),
            history: None,
        }
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// The live project
    pub fn project(&self) -> &VisualProject {
        &self.project
    }

    /// Detached copy of the project, safe to hand to a compile
    pub fn snapshot(&self) -> VisualProject {
        self.project.clone()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Subscribe to one kind of event
    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&GraphEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.on(kind, handler)
    }

    /// Attach a sink that receives every event
    pub fn attach_sink(&mut self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        self.events.attach(sink)
    }

    /// Remove a subscription or sink
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    // ------------------------------------------------------------------
    // Project lifecycle
    // ------------------------------------------------------------------

    /// Replace the project; resets undo history to the loaded state
    pub fn load_project(&mut self, project: VisualProject) {
        self.project = project;
        if let Some(history) = self.history.as_mut() {
            if let Err(e) = history.reset(&self.project) {
                log::warn!("Failed to reset undo history: {}", e);
                self.history = None;
            }
        }
        log::info!(
            "Loaded project '{}' ({} nodes, {} edges)",
            self.project.id,
            self.project.nodes.len(),
            self.project.edges.len()
        );
        self.events.emit(&GraphEvent::ProjectLoaded {
            project_id: self.project.id.clone(),
        });
    }

    /// Stamp `modified` and announce the save; returns the saved document
    pub fn save_project(&mut self) -> &VisualProject {
        self.project.metadata.modified = chrono::Utc::now();
        self.events.emit(&GraphEvent::ProjectSaved {
            project_id: self.project.id.clone(),
        });
        &self.project
    }

    /// Read a project document from disk and load it
    pub fn load_project_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let project = VisualProject::from_json(&content).map_err(|e| {
            log::warn!("Failed to parse project from {:?}: {}", path, e);
            e
        })?;
        self.load_project(project);
        Ok(())
    }

    /// Save the project and write it to disk as pretty JSON
    pub fn save_project_to_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.save_project().to_json_pretty()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        log::info!("Saved project '{}' to {:?}", self.project.id, path);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Instantiate a registered node type at a position
    pub fn add_node(&mut self, node_type: &str, position: Position) -> Result<Node> {
        let definition = self
            .registry
            .get(node_type)
            .ok_or_else(|| GraphError::UnknownNodeType(node_type.to_string()))?;

        let node = definition.instantiate(uuid::Uuid::new_v4().to_string(), position);
        log::debug!("Added node '{}' of type '{}'", node.id, node.node_type);

        self.project.nodes.push(node.clone());
        self.checkpoint(EventKind::NodeAdded);
        self.events.emit(&GraphEvent::NodeAdded { node: node.clone() });
        Ok(node)
    }

    /// Remove a node and every edge touching it
    ///
    /// Returns the removed node. Unknown ids are a silent no-op.
    pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
        let index = self.project.nodes.iter().position(|n| n.id == node_id)?;
        let node = self.project.nodes.remove(index);

        let mut removed_edges = Vec::new();
        self.project.edges.retain(|edge| {
            if edge.touches(node_id) {
                removed_edges.push(edge.id.clone());
                false
            } else {
                true
            }
        });
        log::debug!(
            "Removed node '{}' and {} connected edges",
            node_id,
            removed_edges.len()
        );

        self.checkpoint(EventKind::NodeRemoved);
        self.events.emit(&GraphEvent::NodeRemoved {
            node_id: node.id.clone(),
            removed_edges,
        });
        Some(node)
    }

    /// Shallow-merge properties into a node
    pub fn update_node_properties(&mut self, node_id: &str, properties: Properties) -> Result<Node> {
        let node = self
            .project
            .find_node_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.properties.extend(properties);
        let node = node.clone();

        self.checkpoint(EventKind::NodeUpdated);
        self.events.emit(&GraphEvent::NodeUpdated { node: node.clone() });
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Check a proposed connection without creating it
    ///
    /// Order of checks: both nodes exist, both ports exist on the correct
    /// side, then the port types satisfy the compatibility lattice. On
    /// success the kind the edge would get is returned.
    pub fn check_connection(
        &self,
        source_node_id: &str,
        source_port_id: &str,
        target_node_id: &str,
        target_port_id: &str,
    ) -> std::result::Result<EdgeKind, ConnectionRejection> {
        let source = self
            .project
            .find_node(source_node_id)
            .ok_or_else(|| ConnectionRejection::MissingSourceNode(source_node_id.to_string()))?;
        let target = self
            .project
            .find_node(target_node_id)
            .ok_or_else(|| ConnectionRejection::MissingTargetNode(target_node_id.to_string()))?;

        let source_port = source
            .output(source_port_id)
            .ok_or_else(|| ConnectionRejection::MissingSourcePort(source_port_id.to_string()))?;
        let target_port = target
            .input(target_port_id)
            .ok_or_else(|| ConnectionRejection::MissingTargetPort(target_port_id.to_string()))?;

        if !source_port.port_type.can_flow_into(target_port.port_type) {
            return Err(ConnectionRejection::IncompatibleTypes {
                source_type: source_port.port_type,
                target_type: target_port.port_type,
            });
        }

        Ok(infer_edge_kind(source, source_port, target))
    }

    /// Connect an output port to an input port
    ///
    /// Invalid connections are refused without an error or event: editors
    /// drop rejected drags silently. Use [`Self::check_connection`] to learn
    /// why a connection was refused.
    pub fn add_edge(
        &mut self,
        source_node_id: &str,
        source_port_id: &str,
        target_node_id: &str,
        target_port_id: &str,
    ) -> Option<Edge> {
        let kind = match self.check_connection(
            source_node_id,
            source_port_id,
            target_node_id,
            target_port_id,
        ) {
            Ok(kind) => kind,
            Err(rejection) => {
                log::debug!(
                    "Rejected edge {}.{} -> {}.{}: {}",
                    source_node_id,
                    source_port_id,
                    target_node_id,
                    target_port_id,
                    rejection
                );
                return None;
            }
        };

        let edge = Edge {
            id: uuid::Uuid::new_v4().to_string(),
            source_node_id: source_node_id.to_string(),
            source_port_id: source_port_id.to_string(),
            target_node_id: target_node_id.to_string(),
            target_port_id: target_port_id.to_string(),
            kind,
        };
        log::debug!("Added {:?} edge '{}'", edge.kind, edge.id);

        self.project.edges.push(edge.clone());
        self.checkpoint(EventKind::EdgeAdded);
        self.events.emit(&GraphEvent::EdgeAdded { edge: edge.clone() });
        Some(edge)
    }

    /// Remove an edge; unknown ids are a silent no-op
    pub fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        let index = self.project.edges.iter().position(|e| e.id == edge_id)?;
        let edge = self.project.edges.remove(index);

        self.checkpoint(EventKind::EdgeRemoved);
        self.events.emit(&GraphEvent::EdgeRemoved {
            edge_id: edge.id.clone(),
        });
        Some(edge)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Start recording undo history from the current project
    ///
    /// At most `depth` steps can be undone. Mutations that leave the
    /// document unchanged do not add a step.
    pub fn enable_history(&mut self, depth: usize) -> Result<()> {
        self.history = Some(EditHistory::new(&self.project, depth)?);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.next_undo().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_redo().is_some()
    }

    /// Kind of mutation [`Self::undo`] would revert, for menu labels
    pub fn next_undo(&self) -> Option<EventKind> {
        self.history.as_ref().and_then(EditHistory::next_undo)
    }

    /// Kind of mutation [`Self::redo`] would re-apply
    pub fn next_redo(&self) -> Option<EventKind> {
        self.history.as_ref().and_then(EditHistory::next_redo)
    }

    /// Revert the last recorded mutation; returns whether anything changed
    pub fn undo(&mut self) -> Result<bool> {
        let Some(history) = self.history.as_mut() else {
            return Ok(false);
        };
        match history.undo()? {
            Some(restored) => {
                log::debug!("Undid {}", restored.mutation.as_str());
                self.restore(restored.project);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the last undone mutation; returns whether anything changed
    pub fn redo(&mut self) -> Result<bool> {
        let Some(history) = self.history.as_mut() else {
            return Ok(false);
        };
        match history.redo()? {
            Some(restored) => {
                log::debug!("Redid {}", restored.mutation.as_str());
                self.restore(restored.project);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn restore(&mut self, project: VisualProject) {
        self.project = project;
        self.events.emit(&GraphEvent::ProjectLoaded {
            project_id: self.project.id.clone(),
        });
    }

    fn checkpoint(&mut self, cause: EventKind) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        match history.record(&self.project, cause) {
            Ok(true) => {}
            Ok(false) => log::debug!("{} left the project unchanged; no undo step", cause.as_str()),
            Err(e) => log::warn!("Failed to record undo checkpoint: {}", e),
        }
    }
}

impl std::fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEngine")
            .field("project", &self.project.id)
            .field("nodes", &self.project.nodes.len())
            .field("edges", &self.project.edges.len())
            .field("events", &self.events)
            .finish()
    }
}
