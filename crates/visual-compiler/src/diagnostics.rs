//! Compile diagnostics
//!
//! Two tiers: warnings never stop a compile, errors raised during
//! validation abort before code generation. `TRANSFORM_ERROR` is error
//! shaped but degrades instead of aborting.

use serde::{Deserialize, Serialize};

/// Kind of a non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    TypeMismatch,
    MissingRequiredInput,
    UnusedOutput,
    FrameworkMismatch,
    FeatureDisabled,
}

impl WarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::MissingRequiredInput => "MISSING_REQUIRED_INPUT",
            Self::UnusedOutput => "UNUSED_OUTPUT",
            Self::FrameworkMismatch => "FRAMEWORK_MISMATCH",
            Self::FeatureDisabled => "FEATURE_DISABLED",
        }
    }
}

/// Kind of an error-shaped diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidConnection,
    InvalidPort,
    CyclicDependency,
    CompilationError,
    TransformError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidConnection => "INVALID_CONNECTION",
            Self::InvalidPort => "INVALID_PORT",
            Self::CyclicDependency => "CYCLIC_DEPENDENCY",
            Self::CompilationError => "COMPILATION_ERROR",
            Self::TransformError => "TRANSFORM_ERROR",
        }
    }

    /// Whether this kind stops the pipeline before code generation
    pub fn aborts(self) -> bool {
        !matches!(self, Self::TransformError)
    }
}

/// Ordinal weight of a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " at {}:{}", line, column)?;
        }
        Ok(())
    }
}

/// Accumulator shared by the pipeline stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<CompileWarning>,
    pub errors: Vec<CompileError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        kind: WarningKind,
        severity: Severity,
        message: impl Into<String>,
        node_id: Option<&str>,
    ) {
        self.warnings.push(CompileWarning {
            kind,
            message: message.into(),
            node_id: node_id.map(str::to_string),
            severity,
        });
    }

    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, node_id: Option<&str>) {
        self.errors.push(CompileError {
            kind,
            message: message.into(),
            node_id: node_id.map(str::to_string),
            line: None,
            column: None,
        });
    }

    pub fn push_error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Whether any recorded error stops the pipeline
    pub fn is_fatal(&self) -> bool {
        self.errors.iter().any(|e| e.kind.aborts())
    }

    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &CompileWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &CompileError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}
