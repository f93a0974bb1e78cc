//! TypeScript preset
//!
//! Erases type syntax from the parse tree: `interface` and `type`
//! declarations, annotations, optional markers, generic arguments and
//! parameters, `as`/`satisfies` casts and non-null assertions. Removed
//! text keeps its line breaks, so line numbers hold.

use tree_sitter::Node;

use super::syntax::{self, Edit};
use crate::error::TransformError;

pub fn strip_types(source: &str) -> Result<String, TransformError> {
    let tree = syntax::parse(source)?;
    let mut edits = Vec::new();
    syntax::walk(tree.root_node(), &mut |node| type_edit(source, node, &mut edits));
    Ok(syntax::apply(source, edits))
}

/// Queue the erasure for `node`; returns whether to look inside it
fn type_edit(source: &str, node: Node<'_>, edits: &mut Vec<Edit>) -> bool {
    match node.kind() {
        "interface_declaration" | "type_alias_declaration" => {
            let declaration = node
                .parent()
                .filter(|parent| parent.kind() == "export_statement")
                .unwrap_or(node);
            edits.push(Edit::remove_lines(source, declaration.byte_range()));
            false
        }
        "import_statement" if has_token(node, "type") => {
            edits.push(Edit::remove_lines(source, node.byte_range()));
            false
        }
        "type_annotation" | "type_arguments" | "type_parameters" => {
            edits.push(Edit::remove(source, node.byte_range()));
            false
        }
        "as_expression" | "satisfies_expression" => {
            if let Some(expression) = node.named_child(0) {
                edits.push(Edit::remove(source, expression.end_byte()..node.end_byte()));
            }
            true
        }
        "non_null_expression" => {
            if let Some(bang) = last_child(node).filter(|n| n.kind() == "!") {
                edits.push(Edit::remove(source, bang.byte_range()));
            }
            true
        }
        "optional_parameter" => {
            let mut cursor = node.walk();
            let marker = node.children(&mut cursor).find(|n| n.kind() == "?");
            if let Some(marker) = marker {
                edits.push(Edit::remove(source, marker.byte_range()));
            }
            true
        }
        _ => true,
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == token);
    found
}

fn last_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let last = node.children(&mut cursor).last();
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_become_blank_lines() {
        let source = "type Payload = Record<string, unknown>;\ninterface AppProps {\n  className?: string;\n  onInit?: () => void;\n}\nconst a = 1;\n";
        let stripped = strip_types(source).unwrap();
        assert_eq!(stripped, "\n\n\n\n\nconst a = 1;\n");
    }

    #[test]
    fn test_annotations_removed() {
        let source = "export default function App(props: AppProps) {\n  const [n, setN] = useState<number>(0);\n  const h = useCallback((value: string, rows: unknown[]) => {}, []);\n}\n";
        let stripped = strip_types(source).unwrap();
        assert_eq!(
            stripped,
            "export default function App(props) {\n  const [n, setN] = useState(0);\n  const h = useCallback((value, rows) => {}, []);\n}\n"
        );
    }

    #[test]
    fn test_casts_and_optional_parameters() {
        let source = "function f(a?: string): void {\n  const b = (a as unknown) as string;\n  return el!.focus();\n}\n";
        assert_eq!(
            strip_types(source).unwrap(),
            "function f(a) {\n  const b = (a);\n  return el.focus();\n}\n"
        );
    }

    #[test]
    fn test_exported_and_indented_declarations() {
        let source = "export interface A {\n  a: string;\n}\n  export type B = A;\nimport type { C } from './c';\nconst d = 1;\n";
        assert_eq!(strip_types(source).unwrap(), "\n\n\n\n\nconst d = 1;\n");
    }

    #[test]
    fn test_literals_untouched() {
        let source = "const s = \"interface x: y\";\nconst t = `type A = B;`;\ncall(a, \"b: c\");\n";
        assert_eq!(strip_types(source).unwrap(), source);
    }

    #[test]
    fn test_jsx_not_mistaken_for_generics() {
        let source = "return (\n  <div className=\"x\">{a}</div>\n);\n";
        assert_eq!(strip_types(source).unwrap(), source);
    }

    #[test]
    fn test_unterminated_interface() {
        let err = strip_types("interface A {\n  a: string;\n").unwrap_err();
        assert!(matches!(err, TransformError::Syntax { .. }));
    }
}
