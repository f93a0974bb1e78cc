//! Visual Compiler - turns visual application graphs into source code
//!
//! A [`Compiler`] takes a `VisualProject` from `visual-graph` and produces a
//! single component file for one of three targets:
//!
//! - React function components (JSX or TSX)
//! - Vue 3 single-file components
//! - Vanilla ES modules that build their own DOM
//!
//! # Pipeline
//!
//! Validation, dependency analysis, code generation, the transform stage
//! and performance estimation run in order. Validation errors abort the
//! compile; every later failure degrades into a diagnostic on the
//! [`CompileResult`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use visual_compiler::{CompileOptions, Compiler, TargetFramework};
//! use visual_graph::NodeRegistry;
//!
//! let compiler = Compiler::new(Arc::new(NodeRegistry::with_builtins()));
//! let options = CompileOptions::default().with_framework(TargetFramework::Vue);
//! let result = compiler.compile(&project, &options).await;
//! println!("{}", result.code);
//! ```

pub mod codegen;
pub mod compiler;
pub mod constants;
pub mod dependencies;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod performance;
pub mod transform;
pub mod validation;

pub use compiler::{CompileMetadata, CompileResult, Compiler};
pub use dependencies::analyze_dependencies;
pub use diagnostics::{
    CompileError, CompileWarning, Diagnostics, ErrorKind, Severity, WarningKind,
};
pub use error::{CodegenError, CodegenResult, TransformError};
pub use options::{CompileOptions, Optimization, TargetFramework};
pub use performance::PerformanceMetrics;
pub use transform::{PresetTransform, SourceTransform, TransformConfig};
