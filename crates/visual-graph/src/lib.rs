//! Visual Graph - typed application graphs for the visual editor
//!
//! This crate holds everything an editor session needs before compilation:
//!
//! - `NodeRegistry`: catalogue of node type templates, with builtins
//! - `VisualProject`: the serializable graph document
//! - `GraphEngine`: validated mutations with a synchronous event bus
//! - `EditHistory`: undo/redo checkpoints tagged with their mutation
//! - `GraphIndex`: id-keyed adjacency, cycle detection and depth
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use visual_graph::{GraphEngine, NodeRegistry, Position};
//!
//! let mut engine = GraphEngine::new(Arc::new(NodeRegistry::with_builtins()));
//! let button = engine.add_node("button", Position::new(0.0, 0.0))?;
//! let handler = engine.add_node("event-handler", Position::new(0.0, 120.0))?;
//! engine.add_edge(&button.id, "click", &handler.id, "trigger");
//! ```

pub mod builder;
pub mod builtins;
pub mod definition;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod registry;
pub mod topology;
pub mod types;

pub use builder::ProjectBuilder;
pub use definition::{FrameworkImports, NodeDefinition};
pub use engine::{infer_edge_kind, ConnectionRejection, GraphEngine};
pub use error::{GraphError, Result};
pub use events::{
    EventBus, EventKind, EventSink, GraphEvent, NullEventSink, SubscriptionId, VecEventSink,
};
pub use history::{Checkpoint, EditHistory, Restored};
pub use registry::{BuiltinNodeFn, NodeRegistry};
pub use topology::GraphIndex;
pub use types::{
    Edge, EdgeId, EdgeKind, Node, NodeCategory, NodeId, NodeMetadata, Port, PortId, PortType,
    Position, ProjectFramework, ProjectMetadata, Properties, Size, VisualProject,
    STATE_PROPERTY_PREFIX,
};
