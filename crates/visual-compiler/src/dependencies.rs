//! Dependency analysis
//!
//! Derives the package list a generated component needs from the target
//! framework and the categories and types of the project's nodes.

use visual_graph::{NodeCategory, VisualProject};

use crate::constants::packages;
use crate::options::TargetFramework;

/// Insertion-ordered set of package specifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    packages: Vec<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package; returns false if it was already present
    pub fn insert(&mut self, package: &str) -> bool {
        if self.contains(package) {
            return false;
        }
        self.packages.push(package.to_string());
        true
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.packages
    }
}

/// Packages for a project compiled to `framework`
///
/// Framework base packages come first, then per-node packages in node
/// order. The result is deduplicated and identical across runs.
pub fn analyze_dependencies(project: &VisualProject, framework: TargetFramework) -> Vec<String> {
    let mut dependencies = DependencySet::new();

    match framework {
        TargetFramework::React => {
            dependencies.insert(packages::REACT);
            dependencies.insert(packages::REACT_DOM);
        }
        TargetFramework::Vue => {
            dependencies.insert(packages::VUE);
        }
        TargetFramework::Vanilla => {}
    }

    for node in &project.nodes {
        match node.category {
            NodeCategory::Ui => {
                dependencies.insert(packages::UI_KIT);
            }
            NodeCategory::Emotion => {
                dependencies.insert(packages::EMOTION_PLATFORM);
                dependencies.insert(packages::EMOTION_HOOK);
            }
            NodeCategory::Ai => {
                dependencies.insert(packages::AI_HOOK);
                dependencies.insert(packages::AI_SERVICE);
            }
            _ => {}
        }

        for package in type_packages(&node.node_type, framework) {
            dependencies.insert(package);
        }
    }

    log::debug!(
        "Resolved {} dependencies for {} target",
        dependencies.len(),
        framework
    );
    dependencies.into_vec()
}

/// Extra packages a specific node type pulls in
fn type_packages(node_type: &str, framework: TargetFramework) -> &'static [&'static str] {
    match (node_type, framework) {
        ("chart", TargetFramework::React) => &[packages::RECHARTS],
        ("chart", TargetFramework::Vue) => &[packages::VUE_CHARTJS, packages::CHART_JS],
        ("chart", TargetFramework::Vanilla) => &[packages::CHART_JS],
        ("map", TargetFramework::React) => &[packages::REACT_LEAFLET],
        ("map", TargetFramework::Vue) => &[packages::VUE_LEAFLET, packages::LEAFLET],
        ("map", TargetFramework::Vanilla) => &[packages::LEAFLET],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_graph::{NodeRegistry, ProjectBuilder};

    fn dashboard() -> VisualProject {
        let registry = NodeRegistry::with_builtins();
        ProjectBuilder::new("Dashboard")
            .add_node("chart", registry.get("chart").unwrap(), (0.0, 0.0))
            .add_node("btn", registry.get("button").unwrap(), (0.0, 100.0))
            .add_node("chart2", registry.get("chart").unwrap(), (0.0, 200.0))
            .add_node("emo", registry.get("emotion-detector").unwrap(), (0.0, 300.0))
            .add_node("ai", registry.get("ai-assistant").unwrap(), (0.0, 400.0))
            .add_node("map", registry.get("map").unwrap(), (0.0, 500.0))
            .build()
    }

    #[test]
    fn test_react_dependencies_ordered_and_deduped() {
        let deps = analyze_dependencies(&dashboard(), TargetFramework::React);
        assert_eq!(
            deps,
            vec![
                "react",
                "react-dom",
                "@/components/ui",
                "recharts",
                "@yyc3/emotion-sound-platform",
                "@/hooks/use-emotion-detection",
                "@/hooks/use-ai",
                "@/services/ai",
                "react-leaflet",
            ]
        );
    }

    #[test]
    fn test_stable_across_runs() {
        let project = dashboard();
        for framework in [TargetFramework::React, TargetFramework::Vue, TargetFramework::Vanilla] {
            assert_eq!(
                analyze_dependencies(&project, framework),
                analyze_dependencies(&project, framework)
            );
        }
    }

    #[test]
    fn test_vue_and_vanilla_packages() {
        let vue = analyze_dependencies(&dashboard(), TargetFramework::Vue);
        assert_eq!(vue[0], "vue");
        assert!(vue.contains(&"vue-chartjs".to_string()));
        assert!(vue.contains(&"@vue-leaflet/vue-leaflet".to_string()));
        assert!(!vue.contains(&"react".to_string()));

        let vanilla = analyze_dependencies(&dashboard(), TargetFramework::Vanilla);
        assert_eq!(
            vanilla,
            vec![
                "@/components/ui",
                "chart.js",
                "@yyc3/emotion-sound-platform",
                "@/hooks/use-emotion-detection",
                "@/hooks/use-ai",
                "@/services/ai",
                "leaflet",
            ]
        );
    }

    #[test]
    fn test_empty_project() {
        let project = ProjectBuilder::new("Empty").build();
        assert_eq!(
            analyze_dependencies(&project, TargetFramework::React),
            vec!["react", "react-dom"]
        );
        assert!(analyze_dependencies(&project, TargetFramework::Vanilla).is_empty());
    }

    #[test]
    fn test_dependency_set() {
        let mut set = DependencySet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert!(set.insert("b"));
        assert_eq!(set.into_vec(), vec!["a", "b"]);
    }
}
