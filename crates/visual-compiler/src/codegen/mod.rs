//! Code generation
//!
//! A [`ComponentModel`] is derived from the project once, then handed to
//! the [`Emitter`] for the target framework. Emitters write through a
//! [`CodeWriter`] so every generated line can be traced back to the node
//! that produced it.

pub mod model;
pub mod naming;
pub mod react;
pub mod source_map;
pub mod styles;
pub mod vanilla;
pub mod vue;
pub mod widgets;
pub mod writer;

use visual_graph::{NodeRegistry, VisualProject};

use self::writer::emit;
use crate::error::CodegenResult;
use crate::options::{CompileOptions, TargetFramework};

pub use model::ComponentModel;
pub use react::ReactEmitter;
pub use vanilla::VanillaEmitter;
pub use vue::VueEmitter;
pub use writer::CodeWriter;

/// Renders a component model as source text for one framework
pub trait Emitter {
    fn emit(&self, model: &ComponentModel<'_>, w: &mut CodeWriter) -> CodegenResult<()>;
}

/// Emitted source plus the node that produced each line
#[derive(Debug, Clone, Default)]
pub struct GeneratedCode {
    pub code: String,
    /// (0-based line, node id)
    pub line_nodes: Vec<(usize, String)>,
}

impl GeneratedCode {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

/// Generate untransformed source for `options.framework`
pub fn generate(
    project: &VisualProject,
    registry: &NodeRegistry,
    options: &CompileOptions,
) -> CodegenResult<GeneratedCode> {
    let model = ComponentModel::build(project, registry, options);
    let emitter: &dyn Emitter = match options.framework {
        TargetFramework::React => &ReactEmitter,
        TargetFramework::Vue => &VueEmitter,
        TargetFramework::Vanilla => &VanillaEmitter,
    };

    let mut writer = CodeWriter::new();
    emitter.emit(&model, &mut writer)?;
    let (code, line_nodes) = writer.finish();

    log::debug!(
        "Generated {} lines for {} ({} state fields, {} handlers, {} widgets)",
        code.lines().count(),
        options.framework,
        model.state.len(),
        model.handlers.len(),
        model.widgets.len()
    );
    Ok(GeneratedCode { code, line_nodes })
}

/// TypeScript declarations shared by the React and Vue emitters
pub(crate) fn write_type_declarations(
    model: &ComponentModel<'_>,
    w: &mut CodeWriter,
) -> CodegenResult<()> {
    if model.uses_ts_type("Callback") {
        emit!(w, "type Callback = (...args: unknown[]) => void;");
    }
    if model.uses_ts_type("Payload") {
        emit!(w, "type Payload = Record<string, unknown>;");
    }
    if model.uses_ts_type("EmotionSignal") {
        emit!(w, "interface EmotionSignal {{");
        emit!(w, "  emotion: string;");
        emit!(w, "  confidence: number;");
        emit!(w, "}}");
    }
    if model.uses_ts_type("AIResponse") {
        emit!(w, "interface AIResponse {{");
        emit!(w, "  text: string;");
        emit!(w, "}}");
    }

    emit!(w, "interface {}Props {{", model.name);
    emit!(w, "  className?: string;");
    emit!(w, "  onInit?: () => void;");
    emit!(w, "}}");

    if !model.state.is_empty() {
        emit!(w, "interface AppState {{");
        for field in &model.state {
            emit!(w, "  {}: {};", field.name, field.ts_type());
        }
        emit!(w, "}}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use visual_graph::ProjectBuilder;

    #[test]
    fn test_generation_is_deterministic() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Same")
            .add_node("btn", registry.get("button").unwrap(), (0.0, 0.0))
            .add_node("h", registry.get("event-handler").unwrap(), (0.0, 100.0))
            .add_edge("btn", "click", "h", "trigger")
            .build();

        for framework in [TargetFramework::React, TargetFramework::Vue, TargetFramework::Vanilla] {
            let options = CompileOptions::default().with_framework(framework);
            let first = generate(&project, &registry, &options).unwrap();
            let second = generate(&project, &registry, &options).unwrap();
            assert_eq!(first.code, second.code);
            assert_eq!(first.line_nodes, second.line_nodes);
        }
    }

    #[test]
    fn test_lines_attributed_to_nodes() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Traced")
            .add_node("count", registry.get("state").unwrap(), (0.0, 0.0))
            .with_property("state_value", json!(1))
            .add_node("label", registry.get("text").unwrap(), (0.0, 100.0))
            .build();

        let generated = generate(&project, &registry, &CompileOptions::default()).unwrap();
        let lines: Vec<&str> = generated.code.lines().collect();
        let state_line = generated
            .line_nodes
            .iter()
            .find(|(_, node)| node == "count")
            .map(|(line, _)| *line)
            .unwrap();
        assert!(lines[state_line].contains("useState(1)"));
        assert!(generated.line_nodes.iter().any(|(_, node)| node == "label"));
    }

    #[test]
    fn test_named_types_only_when_used() {
        let registry = NodeRegistry::with_builtins();
        let project = ProjectBuilder::new("Types")
            .add_node("emo", registry.get("emotion-detector").unwrap(), (0.0, 0.0))
            .add_node("h", registry.get("event-handler").unwrap(), (0.0, 100.0))
            .add_edge("emo", "emotion", "h", "payload")
            .build();

        let options = CompileOptions::default().with_typescript(true);
        let code = generate(&project, &registry, &options).unwrap().code;
        assert!(code.contains("interface EmotionSignal {"));
        assert!(!code.contains("interface AIResponse"));
        assert!(!code.contains("type Callback"));
        assert!(!code.contains("interface AppState"));
    }
}
