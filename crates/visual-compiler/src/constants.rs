//! Compiler constants
//!
//! Defaults for [`crate::CompileOptions`], the performance heuristics, and
//! the package names the dependency analyzer reports.

/// Default compile options
pub mod defaults {
    use crate::options::{Optimization, TargetFramework};

    pub const FRAMEWORK: TargetFramework = TargetFramework::React;
    pub const TYPESCRIPT: bool = false;
    pub const MINIFY: bool = false;
    pub const SOURCE_MAPS: bool = false;
    pub const OPTIMIZATION: Optimization = Optimization::Basic;

    /// Component name used when the project name has no usable characters
    pub const COMPONENT_NAME: &str = "VisualApp";

    /// JSX factory used when lowering JSX
    pub const JSX_PRAGMA: &str = "React.createElement";
}

/// Performance estimator weights
pub mod weights {
    /// Base bundle size in KB
    pub const BASE_BUNDLE_KB: f64 = 50.0;
    pub const UI_NODE_KB: f64 = 5.0;
    pub const EMOTION_NODE_KB: f64 = 20.0;
    pub const AI_NODE_KB: f64 = 30.0;
    pub const LOGIC_NODE_KB: f64 = 2.0;
    pub const DATA_NODE_KB: f64 = 3.0;

    pub const RENDER_BASE: f64 = 1.0;
    pub const RENDER_PER_UI_NODE: f64 = 0.5;
    pub const RENDER_PER_EDGE: f64 = 0.2;
    pub const RENDER_PER_DEPTH: f64 = 0.3;

    /// Memory estimate in MB
    pub const MEMORY_PER_NODE_MB: f64 = 0.1;
    pub const MEMORY_PER_EDGE_MB: f64 = 0.05;

    /// Execution time estimate in ms
    pub const MIN_EXECUTION_MS: f64 = 10.0;
    pub const EXECUTION_PER_NODE_MS: f64 = 2.0;
    pub const EXECUTION_PER_EDGE_MS: f64 = 1.0;

    pub const COMPLEXITY_PER_LOOP: u32 = 2;
}

/// Package and module specifiers reported by the dependency analyzer
pub mod packages {
    pub const REACT: &str = "react";
    pub const REACT_DOM: &str = "react-dom";
    pub const VUE: &str = "vue";

    pub const UI_KIT: &str = "@/components/ui";
    pub const EMOTION_PLATFORM: &str = "@yyc3/emotion-sound-platform";
    pub const EMOTION_HOOK: &str = "@/hooks/use-emotion-detection";
    pub const AI_HOOK: &str = "@/hooks/use-ai";
    pub const AI_SERVICE: &str = "@/services/ai";

    pub const RECHARTS: &str = "recharts";
    pub const REACT_LEAFLET: &str = "react-leaflet";
    pub const VUE_CHARTJS: &str = "vue-chartjs";
    pub const CHART_JS: &str = "chart.js";
    pub const VUE_LEAFLET: &str = "@vue-leaflet/vue-leaflet";
    pub const LEAFLET: &str = "leaflet";
}
