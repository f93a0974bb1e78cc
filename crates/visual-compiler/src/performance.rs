//! Heuristic performance estimates
//!
//! Nothing here is measured; every figure is a weighted count over the
//! project's shape using [`crate::constants::weights`].

use serde::{Deserialize, Serialize};
use visual_graph::{GraphIndex, NodeCategory, VisualProject};

use crate::constants::weights;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// KB
    pub estimated_bundle_size: f64,
    pub render_complexity: f64,
    /// MB
    pub memory_usage: f64,
    /// ms
    pub execution_time: f64,
}

impl PerformanceMetrics {
    pub fn estimate(project: &VisualProject) -> Self {
        let index = GraphIndex::new(project);
        let nodes = project.nodes.len() as f64;
        let edges = project.edges.len() as f64;
        let ui_nodes = project.nodes_in(NodeCategory::Ui).count() as f64;

        let bundle: f64 = project
            .nodes
            .iter()
            .map(|node| match node.category {
                NodeCategory::Ui => weights::UI_NODE_KB,
                NodeCategory::Emotion => weights::EMOTION_NODE_KB,
                NodeCategory::Ai => weights::AI_NODE_KB,
                NodeCategory::Logic => weights::LOGIC_NODE_KB,
                NodeCategory::Data => weights::DATA_NODE_KB,
            })
            .sum();

        let render = weights::RENDER_BASE
            + weights::RENDER_PER_UI_NODE * ui_nodes
            + weights::RENDER_PER_EDGE * edges
            + weights::RENDER_PER_DEPTH * index.max_depth() as f64;

        Self {
            estimated_bundle_size: weights::BASE_BUNDLE_KB + bundle,
            render_complexity: round1(render),
            memory_usage: round2(
                weights::MEMORY_PER_NODE_MB * nodes + weights::MEMORY_PER_EDGE_MB * edges,
            ),
            execution_time: (weights::EXECUTION_PER_NODE_MS * nodes
                + weights::EXECUTION_PER_EDGE_MS * edges)
                .max(weights::MIN_EXECUTION_MS),
        }
    }
}

/// `1 + logic nodes + 2 * cycle-closing edges`
pub fn complexity(project: &VisualProject) -> u32 {
    let logic = project.nodes_in(NodeCategory::Logic).count() as u32;
    let loops = GraphIndex::new(project).back_edges().len() as u32;
    1 + logic + weights::COMPLEXITY_PER_LOOP * loops
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
