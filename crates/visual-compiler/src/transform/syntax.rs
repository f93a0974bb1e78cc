//! Parse front end shared by the transform passes
//!
//! Every pass parses its input with the tree-sitter TSX grammar, which
//! accepts plain JavaScript, JSX and TypeScript, then rewrites the source
//! through byte-range [`Edit`]s computed from the tree. Text outside an
//! edit is copied verbatim.

use std::ops::Range;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::TransformError;

/// Parse `source`, failing on the first syntax error in the tree
pub fn parse(source: &str) -> Result<Tree, TransformError> {
    let language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| TransformError::Failed(format!("Failed to load TSX grammar: {}", e)))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TransformError::Failed("Parser produced no tree".to_string()))?;

    if let Some(node) = first_error(tree.root_node()) {
        let message = if node.is_missing() {
            format!("Expected `{}`", node.kind())
        } else {
            let snippet: String = text(source, node)
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(24)
                .collect();
            if snippet.is_empty() {
                "Unexpected end of input".to_string()
            } else {
                format!("Unexpected `{}`", snippet)
            }
        };
        return Err(error_at(source, node.start_byte(), message));
    }
    Ok(tree)
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Pre-order walk; `visit` returns whether to descend into the node
pub fn walk<'t, F>(node: Node<'t>, visit: &mut F)
where
    F: FnMut(Node<'t>) -> bool,
{
    if !visit(node) {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, visit);
    }
}

/// Named children other than comments
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub fn text<'s>(source: &'s str, node: Node<'_>) -> &'s str {
    &source[node.byte_range()]
}

/// 1-based line and column of a byte offset
pub fn position(source: &str, offset: usize) -> (u32, u32) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line as u32, column as u32)
}

pub fn error_at(source: &str, offset: usize, message: impl Into<String>) -> TransformError {
    let (line, column) = position(source, offset);
    TransformError::syntax(message, line, column)
}

/// Replacement of one source byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Delete `range` but keep its line breaks
    pub fn remove(source: &str, range: Range<usize>) -> Self {
        let breaks = source[range.clone()].matches('\n').count();
        Self::replace(range, "\n".repeat(breaks))
    }

    /// Delete `range` along with the blanks that would be left alone on its lines
    pub fn remove_lines(source: &str, range: Range<usize>) -> Self {
        let bytes = source.as_bytes();
        let blank = |b: u8| b == b' ' || b == b'\t';

        let mut start = range.start;
        while start > 0 && blank(bytes[start - 1]) {
            start -= 1;
        }
        if start > 0 && bytes[start - 1] != b'\n' {
            start = range.start;
        }

        let mut end = range.end;
        while end < bytes.len() && blank(bytes[end]) {
            end += 1;
        }
        if end < bytes.len() && bytes[end] != b'\n' {
            end = range.end;
        }
        Self::remove(source, start..end)
    }
}

/// Apply edits in source order; an edit inside an earlier one is dropped
pub fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    for edit in edits {
        if edit.range.start < copied {
            continue;
        }
        out.push_str(&source[copied..edit.range.start]);
        out.push_str(&edit.text);
        copied = edit.range.end;
    }
    out.push_str(&source[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_position() {
        let err = parse("const a = 1;\nconst b = (;\n").unwrap_err();
        let (line, _) = err.position().unwrap();
        assert_eq!(line, 2);
    }

    #[test]
    fn test_parse_accepts_jsx_and_types() {
        let tree = parse("const a: number = 1;\nconst b = <p title=\"C:\\x\\\">{a}</p>;\n").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_apply_skips_nested_edits() {
        let source = "abcdef";
        let edits = vec![
            Edit::replace(3..4, "X"),
            Edit::replace(1..5, "-"),
            Edit::replace(0..1, "A"),
        ];
        assert_eq!(apply(source, edits), "A-f");
    }

    #[test]
    fn test_remove_lines_takes_indentation() {
        let source = "a;\n  b;\nc;";
        assert_eq!(apply(source, vec![Edit::remove_lines(source, 5..7)]), "a;\n\nc;");
        // code before the range on the same line stays put
        assert_eq!(apply(source, vec![Edit::remove_lines(source, 1..2)]), "a\n  b;\nc;");
    }

    #[test]
    fn test_position_counts_chars() {
        assert_eq!(position("é\nxé", 5), (2, 3));
    }
}
