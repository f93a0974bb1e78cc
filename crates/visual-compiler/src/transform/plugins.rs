//! Source plugins run after the presets

use std::collections::HashSet;

use tree_sitter::Node;

use super::syntax::{self, Edit};
use crate::error::TransformError;

/// A line-preserving rewrite of lowered source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plugin {
    /// Drop import bindings nothing references
    PruneUnusedImports,
    /// Remove `useEffect` calls whose body is only comments
    DropEmptyEffects,
}

impl Plugin {
    pub fn name(self) -> &'static str {
        match self {
            Self::PruneUnusedImports => "prune-unused-imports",
            Self::DropEmptyEffects => "drop-empty-effects",
        }
    }

    pub fn apply(self, source: &str) -> Result<String, TransformError> {
        match self {
            Self::PruneUnusedImports => prune_unused_imports(source),
            Self::DropEmptyEffects => drop_empty_effects(source),
        }
    }
}

/// Bindings introduced by one `import` declaration
#[derive(Debug, Default, PartialEq)]
struct ImportBindings<'s> {
    default: Option<&'s str>,
    namespace: Option<&'s str>,
    /// (imported, local)
    named: Vec<(&'s str, &'s str)>,
}

impl<'s> ImportBindings<'s> {
    /// `None` for side-effect and type-only imports
    fn of(source: &'s str, import: Node<'_>) -> Option<Self> {
        let mut cursor = import.walk();
        let type_only = import.children(&mut cursor).any(|c| c.kind() == "type");
        if type_only {
            return None;
        }
        let clause = syntax::named_children(import)
            .into_iter()
            .find(|c| c.kind() == "import_clause")?;

        let mut bindings = Self::default();
        for part in syntax::named_children(clause) {
            match part.kind() {
                "identifier" => bindings.default = Some(syntax::text(source, part)),
                "namespace_import" => {
                    bindings.namespace = part.named_child(0).map(|n| syntax::text(source, n));
                }
                "named_imports" => {
                    for specifier in syntax::named_children(part) {
                        let Some(name) = specifier.child_by_field_name("name") else {
                            continue;
                        };
                        let imported = syntax::text(source, name);
                        let local = specifier
                            .child_by_field_name("alias")
                            .map_or(imported, |alias| syntax::text(source, alias));
                        bindings.named.push((imported, local));
                    }
                }
                _ => {}
            }
        }
        Some(bindings)
    }

    fn len(&self) -> usize {
        self.named.len() + usize::from(self.default.is_some()) + usize::from(self.namespace.is_some())
    }

    fn retain(&mut self, used: &HashSet<&str>) {
        self.default = self.default.filter(|name| used.contains(name));
        self.namespace = self.namespace.filter(|name| used.contains(name));
        self.named.retain(|(_, local)| used.contains(local));
    }

    fn render(&self, module: &str) -> String {
        let mut clause = Vec::new();
        if let Some(default) = self.default {
            clause.push(default.to_string());
        }
        if let Some(namespace) = self.namespace {
            clause.push(format!("* as {}", namespace));
        }
        if !self.named.is_empty() {
            let named: Vec<String> = self
                .named
                .iter()
                .map(|(imported, local)| {
                    if imported == local {
                        imported.to_string()
                    } else {
                        format!("{} as {}", imported, local)
                    }
                })
                .collect();
            clause.push(format!("{{ {} }}", named.join(", ")));
        }
        format!("import {} from {};", clause.join(", "), module)
    }
}

/// Every name referenced outside the import declarations
fn referenced_names<'s>(source: &'s str, root: Node<'_>) -> HashSet<&'s str> {
    let mut used = HashSet::new();
    syntax::walk(root, &mut |node| match node.kind() {
        "import_statement" => false,
        "identifier" | "shorthand_property_identifier" | "type_identifier" => {
            used.insert(syntax::text(source, node));
            false
        }
        _ => true,
    });
    used
}

fn prune_unused_imports(source: &str) -> Result<String, TransformError> {
    let tree = syntax::parse(source)?;
    let root = tree.root_node();
    let used = referenced_names(source, root);

    let mut edits = Vec::new();
    for import in syntax::named_children(root) {
        if import.kind() != "import_statement" {
            continue;
        }
        let Some(mut bindings) = ImportBindings::of(source, import) else {
            continue;
        };
        let Some(module) = import.child_by_field_name("source") else {
            continue;
        };
        let module = syntax::text(source, module);

        let declared = bindings.len();
        bindings.retain(&used);
        if bindings.len() == declared {
            continue;
        }
        if bindings.len() == 0 {
            log::debug!("Pruned unused import from {}", module);
            edits.push(Edit::remove_lines(source, import.byte_range()));
        } else {
            edits.push(Edit::replace(import.byte_range(), bindings.render(module)));
        }
    }
    Ok(syntax::apply(source, edits))
}

/// `useEffect(() => { /* comments only */ }, deps);`
fn is_empty_effect(source: &str, statement: Node<'_>) -> bool {
    let Some(call) = statement.named_child(0).filter(|n| n.kind() == "call_expression") else {
        return false;
    };
    let callee = call.child_by_field_name("function");
    if callee.map(|n| syntax::text(source, n)) != Some("useEffect") {
        return false;
    }
    let Some(callback) = call
        .child_by_field_name("arguments")
        .and_then(|args| syntax::named_children(args).into_iter().next())
        .filter(|n| matches!(n.kind(), "arrow_function" | "function_expression"))
    else {
        return false;
    };
    callback
        .child_by_field_name("body")
        .filter(|body| body.kind() == "statement_block")
        .is_some_and(|body| syntax::named_children(body).is_empty())
}

fn drop_empty_effects(source: &str) -> Result<String, TransformError> {
    let tree = syntax::parse(source)?;
    let mut edits = Vec::new();
    syntax::walk(tree.root_node(), &mut |node| {
        if node.kind() == "expression_statement" && is_empty_effect(source, node) {
            edits.push(Edit::remove_lines(source, node.byte_range()));
            return false;
        }
        true
    });
    Ok(syntax::apply(source, edits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_line_count() {
        let source = "import React, { useState, useMemo } from 'react';\nimport { Card } from '@/ui';\nimport 'side-effect';\nconst [a] = useState(0);\nReact.createElement(\"div\", null);\n";
        let pruned = Plugin::PruneUnusedImports.apply(source).unwrap();
        assert_eq!(
            pruned,
            "import React, { useState } from 'react';\n\nimport 'side-effect';\nconst [a] = useState(0);\nReact.createElement(\"div\", null);\n"
        );
    }

    #[test]
    fn test_string_mentions_do_not_count() {
        let source = "import { Button } from '@/ui';\nconst s = \"Button\";\nconst o = { label: x.Button };\n";
        let pruned = Plugin::PruneUnusedImports.apply(source).unwrap();
        assert_eq!(pruned, "\nconst s = \"Button\";\nconst o = { label: x.Button };\n");
    }

    #[test]
    fn test_aliases_and_namespaces() {
        let source = "import * as L from 'leaflet';\nimport * as Unused from 'x';\nimport { a as b, c } from 'm';\nimport type { T } from 't';\nL.map({ b });\n";
        let pruned = Plugin::PruneUnusedImports.apply(source).unwrap();
        assert_eq!(
            pruned,
            "import * as L from 'leaflet';\n\nimport { a as b } from 'm';\nimport type { T } from 't';\nL.map({ b });\n"
        );
    }

    #[test]
    fn test_drop_empty_effects() {
        let source = "  useEffect(() => {\n    // Component initialization\n  }, []);\n  useEffect(() => {\n    if (x) {\n    }\n  }, [x]);\n";
        let dropped = Plugin::DropEmptyEffects.apply(source).unwrap();
        assert_eq!(
            dropped,
            "\n\n\n  useEffect(() => {\n    if (x) {\n    }\n  }, [x]);\n"
        );
        assert_eq!(Plugin::DropEmptyEffects.name(), "drop-empty-effects");
    }

    #[test]
    fn test_nested_empty_effect_dropped() {
        let source = "function App() {\n  useEffect(function () { /* later */ }, []);\n  return null;\n}\n";
        assert_eq!(
            Plugin::DropEmptyEffects.apply(source).unwrap(),
            "function App() {\n\n  return null;\n}\n"
        );
    }
}
