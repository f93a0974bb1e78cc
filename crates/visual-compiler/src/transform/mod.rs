//! Post-generation transform stage
//!
//! Generated source passes through the presets for its target (JSX and
//! TypeScript, React only), then the configured plugins, then the
//! optimization passes, each working on a tree-sitter parse of its input
//! (see [`syntax`]). [`SourceTransform`] is the seam: the compiler
//! holds an `Arc<dyn SourceTransform>` and [`PresetTransform`] is the
//! built-in implementation.

pub mod jsx;
pub mod optimize;
pub mod plugins;
pub mod syntax;
pub mod typescript;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::TransformError;
use crate::options::{CompileOptions, Optimization, TargetFramework};

pub use plugins::Plugin;

/// Syntax presets applied before plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    TypeScript,
    Jsx,
}

/// Settings for one transform run, derived from [`CompileOptions`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub framework: TargetFramework,
    /// Applied in order
    pub presets: Vec<Preset>,
    pub plugins: Vec<Plugin>,
    /// Keep every generated line on its original line number
    pub retain_lines: bool,
    pub pragma: String,
    pub strip_comments: bool,
    pub collapse_whitespace: bool,
    pub minify: bool,
}

impl TransformConfig {
    pub fn from_options(options: &CompileOptions) -> Self {
        let react = options.framework == TargetFramework::React;

        let mut presets = Vec::new();
        if react && options.typescript {
            presets.push(Preset::TypeScript);
        }
        if react {
            presets.push(Preset::Jsx);
        }

        let mut plugins = Vec::new();
        if react && options.optimization == Optimization::Advanced {
            plugins.push(Plugin::DropEmptyEffects);
        }
        if react && options.optimization >= Optimization::Basic {
            plugins.push(Plugin::PruneUnusedImports);
        }

        let advanced = options.optimization == Optimization::Advanced;
        Self {
            framework: options.framework,
            presets,
            plugins,
            retain_lines: !advanced && !options.minify,
            pragma: defaults::JSX_PRAGMA.to_string(),
            strip_comments: advanced,
            collapse_whitespace: advanced,
            minify: options.minify,
        }
    }

    /// Whether the transform does anything at all
    pub fn is_identity(&self) -> bool {
        self.presets.is_empty()
            && self.plugins.is_empty()
            && !self.strip_comments
            && !self.collapse_whitespace
            && !self.minify
    }
}

/// Rewrites generated source
#[async_trait]
pub trait SourceTransform: Send + Sync {
    async fn transform(&self, source: &str, config: &TransformConfig) -> Result<String, TransformError>;
}

/// Built-in transform: presets, plugins, then optimization
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetTransform;

impl PresetTransform {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, source: &str, config: &TransformConfig) -> Result<String, TransformError> {
        let mut code = source.to_string();

        for preset in &config.presets {
            code = match preset {
                Preset::TypeScript => typescript::strip_types(&code)?,
                Preset::Jsx => jsx::lower_jsx(&code, &config.pragma)?,
            };
        }
        for plugin in &config.plugins {
            code = plugin.apply(&code)?;
            log::debug!("Applied transform plugin {}", plugin.name());
        }

        let optimize = |text: &str| -> Result<String, TransformError> {
            let mut text = text.to_string();
            if config.strip_comments {
                text = optimize::strip_comments(&text)?;
            }
            if config.collapse_whitespace {
                text = optimize::collapse_whitespace(&text)?;
            }
            if config.minify {
                text = optimize::minify(&text)?;
            }
            Ok(text)
        };
        if config.strip_comments || config.collapse_whitespace || config.minify {
            code = match config.framework {
                // template and style blocks are not JavaScript
                TargetFramework::Vue => optimize::within_script(&code, optimize)?,
                _ => optimize(&code)?,
            };
        }
        Ok(code)
    }
}

#[async_trait]
impl SourceTransform for PresetTransform {
    async fn transform(&self, source: &str, config: &TransformConfig) -> Result<String, TransformError> {
        self.run(source, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_options() {
        let config = TransformConfig::from_options(&CompileOptions::default());
        assert_eq!(config.presets, vec![Preset::Jsx]);
        assert_eq!(config.plugins, vec![Plugin::PruneUnusedImports]);
        assert!(config.retain_lines);
        assert_eq!(config.pragma, "React.createElement");

        let typed = CompileOptions::default()
            .with_typescript(true)
            .with_optimization(Optimization::Advanced);
        let config = TransformConfig::from_options(&typed);
        assert_eq!(config.presets, vec![Preset::TypeScript, Preset::Jsx]);
        assert_eq!(
            config.plugins,
            vec![Plugin::DropEmptyEffects, Plugin::PruneUnusedImports]
        );
        assert!(!config.retain_lines);
    }

    #[test]
    fn test_non_react_targets_skip_presets() {
        let vue = CompileOptions::default()
            .with_framework(TargetFramework::Vue)
            .with_typescript(true)
            .with_optimization(Optimization::None);
        let config = TransformConfig::from_options(&vue);
        assert!(config.presets.is_empty());
        assert!(config.plugins.is_empty());
        assert!(config.is_identity());
    }

    #[tokio::test]
    async fn test_preset_transform_lowers_and_prunes() {
        let source = "import React, { useState, useMemo } from 'react';\nexport default function App(props: AppProps) {\n  const [n, setN] = useState<number>(0);\n  return (\n    <p className=\"mb-4\">{n}</p>\n  );\n}\n";
        let options = CompileOptions::default().with_typescript(true);
        let config = TransformConfig::from_options(&options);

        let code = PresetTransform::new().transform(source, &config).await.unwrap();
        assert_eq!(code.lines().count(), source.lines().count());
        assert!(code.starts_with("import React, { useState } from 'react';\n"));
        assert!(code.contains("export default function App(props) {"));
        assert!(code.contains("useState(0)"));
        assert!(code.contains("React.createElement(\"p\", { className: \"mb-4\" }, n)"));
    }

    #[tokio::test]
    async fn test_syntax_error_surfaces() {
        let config = TransformConfig::from_options(&CompileOptions::default());
        let err = PresetTransform
            .transform("const a = (\n  <div>\n);\n", &config)
            .await
            .unwrap_err();
        assert!(err.position().is_some());
    }
}
