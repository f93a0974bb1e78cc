//! Error types for code generation and transformation
//!
//! Neither error escapes [`crate::Compiler::compile`]; the pipeline folds
//! them into the result's diagnostics.

use thiserror::Error;

/// Failure while emitting source text
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure while transforming generated source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The source could not be parsed; positions are 1-based
    #[error("{message} ({line}:{column})")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("{0}")]
    Failed(String),
}

impl TransformError {
    pub fn syntax(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Line and column of a syntax error
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            Self::Syntax { line, column, .. } => Some((*line, *column)),
            Self::Failed(_) => None,
        }
    }
}

pub type CodegenResult<T> = std::result::Result<T, CodegenError>;
