//! Error types for the graph engine

use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while mutating or persisting a project
#[derive(Debug, Error)]
pub enum GraphError {
    /// `add_node` referenced a type missing from the registry
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// A definition declares the same port id twice on one side
    #[error("Node type '{node_type}' declares duplicate port '{port_id}'")]
    DuplicatePort { node_type: String, port_id: String },

    /// An operation referenced a node that is not in the project
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Stable diagnostic code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownNodeType(_) => "UNKNOWN_NODE_TYPE",
            Self::DuplicatePort { .. } => "DUPLICATE_PORT",
            Self::NodeNotFound(_) => "NODE_NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Compression(_) => "COMPRESSION_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}
