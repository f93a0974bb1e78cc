//! Compile pipeline
//!
//! `Validate -> AnalyzeDependencies -> GenerateCode -> TransformCode ->
//! AnalyzePerformance -> AssembleResult`. Only validation errors abort;
//! every later stage contributes to the result even when it degrades.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use visual_graph::{NodeRegistry, VisualProject};

use crate::codegen::{self, naming, source_map};
use crate::dependencies::analyze_dependencies;
use crate::diagnostics::{CompileError, CompileWarning, Diagnostics, ErrorKind};
use crate::error::CodegenError;
use crate::options::CompileOptions;
use crate::performance::{self, PerformanceMetrics};
use crate::transform::{PresetTransform, SourceTransform, TransformConfig};
use crate::validation;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileMetadata {
    /// Wall-clock milliseconds
    pub compile_time: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub complexity: u32,
    pub performance: PerformanceMetrics,
}

/// Everything a compile produces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
    pub dependencies: Vec<String>,
    pub warnings: Vec<CompileWarning>,
    pub errors: Vec<CompileError>,
    pub metadata: CompileMetadata,
    #[serde(skip)]
    file_name: String,
}

impl CompileResult {
    /// Suggested download name, e.g. `TodoApp.tsx`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// True when code was produced
    pub fn is_success(&self) -> bool {
        !self.errors.iter().any(|e| e.kind.aborts())
    }

    fn failed(
        project: &VisualProject,
        diagnostics: Diagnostics,
        started: Instant,
        file_name: String,
    ) -> Self {
        Self {
            code: String::new(),
            source_map: None,
            dependencies: Vec::new(),
            warnings: diagnostics.warnings,
            errors: diagnostics.errors,
            metadata: CompileMetadata {
                compile_time: elapsed_ms(started),
                node_count: project.nodes.len(),
                edge_count: project.edges.len(),
                complexity: 0,
                performance: PerformanceMetrics::default(),
            },
            file_name,
        }
    }
}

fn record_codegen_error(diagnostics: &mut Diagnostics, err: &CodegenError) {
    diagnostics.error(ErrorKind::CompilationError, err.to_string(), None);
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Compiles projects against a shared node registry
#[derive(Clone)]
pub struct Compiler {
    registry: Arc<NodeRegistry>,
    transformer: Arc<dyn SourceTransform>,
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("node_types", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Compiler {
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self {
            registry,
            transformer: Arc::new(PresetTransform::new()),
        }
    }

    /// Replace the transform stage
    pub fn with_transformer(mut self, transformer: Arc<dyn SourceTransform>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Compile `project` with `options`
    ///
    /// The project is copied before this returns; edits made while the
    /// future is pending do not affect the result. Failures never surface
    /// as `Err`, they are reported in [`CompileResult::errors`].
    pub fn compile(
        &self,
        project: &VisualProject,
        options: &CompileOptions,
    ) -> impl Future<Output = CompileResult> + Send + 'static {
        let snapshot = project.clone();
        let options = options.clone();
        let registry = Arc::clone(&self.registry);
        let transformer = Arc::clone(&self.transformer);
        async move { run_pipeline(snapshot, options, registry, transformer).await }
    }
}

async fn run_pipeline(
    project: VisualProject,
    options: CompileOptions,
    registry: Arc<NodeRegistry>,
    transformer: Arc<dyn SourceTransform>,
) -> CompileResult {
    let started = Instant::now();
    let file_name = format!(
        "{}.{}",
        naming::component_name(&project.name),
        options.framework.extension(options.typescript)
    );
    log::info!(
        "Compiling '{}' for {} ({} nodes, {} edges)",
        project.name,
        options.framework,
        project.nodes.len(),
        project.edges.len()
    );

    let mut diagnostics = Diagnostics::new();
    validation::validate(&project, &options, &mut diagnostics);
    if diagnostics.is_fatal() {
        log::info!(
            "Validation failed with {} error(s); skipping code generation",
            diagnostics.errors.len()
        );
        return CompileResult::failed(&project, diagnostics, started, file_name);
    }
    log::info!("Validation passed with {} warning(s)", diagnostics.warnings.len());

    let dependencies = analyze_dependencies(&project, options.framework);

    let generated = match codegen::generate(&project, &registry, &options) {
        Ok(generated) => generated,
        Err(err) => {
            log::warn!("Code generation failed: {}", err);
            record_codegen_error(&mut diagnostics, &err);
            return CompileResult::failed(&project, diagnostics, started, file_name);
        }
    };
    log::info!("Generated {} lines", generated.line_count());

    let config = TransformConfig::from_options(&options);
    let (code, lines_intact) = if config.is_identity() {
        (generated.code.clone(), true)
    } else {
        match transformer.transform(&generated.code, &config).await {
            Ok(code) => {
                let intact = config.retain_lines && code.lines().count() == generated.line_count();
                (code, intact)
            }
            Err(err) => {
                log::warn!("Transform failed, returning untransformed code: {}", err);
                let (line, column) = err.position().unzip();
                diagnostics.push_error(CompileError {
                    kind: ErrorKind::TransformError,
                    message: err.to_string(),
                    node_id: None,
                    line,
                    column,
                });
                (generated.code.clone(), true)
            }
        }
    };

    let source_map = if options.source_maps && lines_intact {
        match source_map::build_source_map(
            &project,
            &file_name,
            generated.line_count(),
            &generated.line_nodes,
        ) {
            Ok(map) => Some(map),
            Err(err) => {
                log::warn!("Source map generation failed: {}", err);
                None
            }
        }
    } else {
        if options.source_maps {
            log::debug!("Source map dropped; the transform collapsed lines");
        }
        None
    };

    let complexity = performance::complexity(&project);
    let metrics = PerformanceMetrics::estimate(&project);

    let result = CompileResult {
        code,
        source_map,
        dependencies,
        warnings: diagnostics.warnings,
        errors: diagnostics.errors,
        metadata: CompileMetadata {
            compile_time: elapsed_ms(started),
            node_count: project.nodes.len(),
            edge_count: project.edges.len(),
            complexity,
            performance: metrics,
        },
        file_name,
    };
    log::info!(
        "Compiled {} in {:.1}ms ({} warning(s), {} error(s))",
        result.file_name,
        result.metadata.compile_time,
        result.warnings.len(),
        result.errors.len()
    );
    result
}
