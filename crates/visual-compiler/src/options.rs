//! Compile configuration

use serde::{Deserialize, Serialize};
use visual_graph::{ProjectFramework, VisualProject};

use crate::constants::defaults;

/// Framework the generated code targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFramework {
    #[default]
    React,
    Vue,
    Vanilla,
}

impl TargetFramework {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Vanilla => "vanilla",
        }
    }

    /// The compilable target for a project framework, if there is one
    pub fn from_project(framework: ProjectFramework) -> Option<Self> {
        match framework {
            ProjectFramework::React => Some(Self::React),
            ProjectFramework::Vue => Some(Self::Vue),
            ProjectFramework::Vanilla => Some(Self::Vanilla),
            ProjectFramework::Angular => None,
        }
    }

    /// File extension of the generated component
    pub fn extension(self, typescript: bool) -> &'static str {
        match (self, typescript) {
            (Self::React, false) => "jsx",
            (Self::React, true) => "tsx",
            (Self::Vue, _) => "vue",
            // vanilla output carries JSDoc types, never TypeScript syntax
            (Self::Vanilla, _) => "js",
        }
    }
}

impl std::fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimization tier applied by the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimization {
    None,
    #[default]
    Basic,
    Advanced,
}

/// Options for a single compile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub framework: TargetFramework,
    /// Emit type declarations
    pub typescript: bool,
    pub minify: bool,
    pub source_maps: bool,
    pub optimization: Optimization,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            framework: defaults::FRAMEWORK,
            typescript: defaults::TYPESCRIPT,
            minify: defaults::MINIFY,
            source_maps: defaults::SOURCE_MAPS,
            optimization: defaults::OPTIMIZATION,
        }
    }
}

impl CompileOptions {
    /// Defaults, targeting the framework recorded on the project
    ///
    /// Projects recorded as `angular` keep the default target.
    pub fn for_project(project: &VisualProject) -> Self {
        let mut options = Self::default();
        if let Some(framework) = TargetFramework::from_project(project.metadata.framework) {
            options.framework = framework;
        }
        options
    }

    pub fn with_framework(mut self, framework: TargetFramework) -> Self {
        self.framework = framework;
        self
    }

    pub fn with_typescript(mut self, typescript: bool) -> Self {
        self.typescript = typescript;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_source_maps(mut self, source_maps: bool) -> Self {
        self.source_maps = source_maps;
        self
    }

    pub fn with_optimization(mut self, optimization: Optimization) -> Self {
        self.optimization = optimization;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert_eq!(options.framework, TargetFramework::React);
        assert!(!options.typescript);
        assert!(!options.minify);
        assert!(!options.source_maps);
        assert_eq!(options.optimization, Optimization::Basic);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"framework":"vue","sourceMaps":true}"#).unwrap();
        assert_eq!(options.framework, TargetFramework::Vue);
        assert!(options.source_maps);
        assert_eq!(options.optimization, Optimization::Basic);
    }

    #[test]
    fn test_for_project() {
        let mut project = VisualProject::new("Demo");
        project.metadata.framework = ProjectFramework::Vanilla;
        assert_eq!(CompileOptions::for_project(&project).framework, TargetFramework::Vanilla);

        project.metadata.framework = ProjectFramework::Angular;
        assert_eq!(CompileOptions::for_project(&project).framework, TargetFramework::React);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(TargetFramework::React.extension(true), "tsx");
        assert_eq!(TargetFramework::Vue.extension(true), "vue");
        assert_eq!(TargetFramework::Vanilla.extension(false), "js");
        assert_eq!(TargetFramework::Vanilla.extension(true), "js");
    }
}
