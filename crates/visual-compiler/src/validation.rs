//! Static validation of a project snapshot
//!
//! Four independent passes, each appending to the shared diagnostics. A
//! pass never stops the others; the pipeline decides afterwards whether
//! the recorded errors abort the compile.

use std::collections::HashSet;

use visual_graph::{GraphIndex, NodeCategory, VisualProject};

use crate::diagnostics::{Diagnostics, ErrorKind, Severity, WarningKind};
use crate::options::{CompileOptions, TargetFramework};

/// Framework keywords a node type may carry to signal affinity
const FRAMEWORK_KEYWORDS: &[(&str, &str)] = &[("react", "React"), ("vue", "Vue"), ("angular", "Angular")];

/// Run every validation pass
pub fn validate(project: &VisualProject, options: &CompileOptions, diagnostics: &mut Diagnostics) {
    validate_connections(project, diagnostics);
    validate_cycles(project, diagnostics);
    validate_dataflow(project, diagnostics);
    validate_compatibility(project, options.framework, diagnostics);
}

/// Re-check that every edge references existing nodes and ports
///
/// Edges created through the engine always pass; documents edited by hand
/// or loaded from older versions may not. A lattice violation on an
/// existing edge is only a warning.
pub fn validate_connections(project: &VisualProject, diagnostics: &mut Diagnostics) {
    for edge in &project.edges {
        let (Some(source), Some(target)) = (
            project.find_node(&edge.source_node_id),
            project.find_node(&edge.target_node_id),
        ) else {
            diagnostics.error(
                ErrorKind::InvalidConnection,
                "Connection references non-existent node",
                Some(&edge.source_node_id),
            );
            continue;
        };

        let (Some(source_port), Some(target_port)) = (
            source.output(&edge.source_port_id),
            target.input(&edge.target_port_id),
        ) else {
            diagnostics.error(
                ErrorKind::InvalidPort,
                "Connection references non-existent port",
                Some(&source.id),
            );
            continue;
        };

        if !source_port.port_type.can_flow_into(target_port.port_type) {
            diagnostics.warn(
                WarningKind::TypeMismatch,
                Severity::Medium,
                format!("Type mismatch: {} -> {}", source_port.port_type, target_port.port_type),
                Some(&source.id),
            );
        }
    }
}

/// One error per cycle-closing edge, attributed to the edge's source node
pub fn validate_cycles(project: &VisualProject, diagnostics: &mut Diagnostics) {
    for edge in GraphIndex::new(project).back_edges() {
        diagnostics.error(
            ErrorKind::CyclicDependency,
            "Cyclic dependency detected in node graph",
            Some(&edge.source_node_id),
        );
    }
}

/// Required inputs must be wired or defaulted; outputs should be used
pub fn validate_dataflow(project: &VisualProject, diagnostics: &mut Diagnostics) {
    let wired_inputs: HashSet<(&str, &str)> = project
        .edges
        .iter()
        .map(|e| (e.target_node_id.as_str(), e.target_port_id.as_str()))
        .collect();
    let wired_outputs: HashSet<(&str, &str)> = project
        .edges
        .iter()
        .map(|e| (e.source_node_id.as_str(), e.source_port_id.as_str()))
        .collect();

    for node in &project.nodes {
        for input in node.inputs.iter().filter(|p| p.required) {
            if !wired_inputs.contains(&(node.id.as_str(), input.id.as_str()))
                && input.default_value.is_none()
            {
                diagnostics.warn(
                    WarningKind::MissingRequiredInput,
                    Severity::High,
                    format!(
                        "Required input '{}' is not connected and has no default value",
                        input.name
                    ),
                    Some(&node.id),
                );
            }
        }
    }

    for node in &project.nodes {
        for output in &node.outputs {
            if !wired_outputs.contains(&(node.id.as_str(), output.id.as_str())) {
                diagnostics.warn(
                    WarningKind::UnusedOutput,
                    Severity::Low,
                    format!("Output '{}' is not connected", output.name),
                    Some(&node.id),
                );
            }
        }
    }
}

/// Framework affinity and disabled-feature checks
pub fn validate_compatibility(
    project: &VisualProject,
    framework: TargetFramework,
    diagnostics: &mut Diagnostics,
) {
    for node in &project.nodes {
        let foreign = FRAMEWORK_KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword != framework.as_str() && node.node_type.contains(keyword));
        if let Some((_, name)) = foreign {
            diagnostics.warn(
                WarningKind::FrameworkMismatch,
                Severity::Medium,
                format!("{}-specific component used in {} project", name, framework),
                Some(&node.id),
            );
        }

        if node.category == NodeCategory::Emotion && !project.metadata.emotion_enabled {
            diagnostics.warn(
                WarningKind::FeatureDisabled,
                Severity::Medium,
                "Emotion component used but emotion feature is disabled",
                Some(&node.id),
            );
        }

        if node.category == NodeCategory::Ai && !project.metadata.ai_enabled {
            diagnostics.warn(
                WarningKind::FeatureDisabled,
                Severity::Medium,
                "AI component used but AI feature is disabled",
                Some(&node.id),
            );
        }
    }
}
