//! Token-level optimization passes
//!
//! Each pass parses its input and rewrites only the whitespace between
//! tokens, so string, template and regex literals are copied through
//! untouched. These are heuristics, not a bundler.

use tree_sitter::Node;

use super::syntax::{self, Edit};
use crate::error::TransformError;

/// Punctuation whose surrounding whitespace is insignificant
const TIGHT: &[u8] = b"{}();,=:";

/// Nodes copied whole, never split into their inner tokens
const ATOMIC: &[&str] = &["string", "template_string", "regex", "comment", "jsx_text"];

/// Remove comments; line comments keep their newline
pub fn strip_comments(source: &str) -> Result<String, TransformError> {
    let tree = syntax::parse(source)?;
    let mut edits = Vec::new();
    syntax::walk(tree.root_node(), &mut |node| {
        if node.kind() != "comment" {
            return true;
        }
        let text = syntax::text(source, node);
        edits.push(if text.starts_with("//") {
            Edit::replace(node.byte_range(), "")
        } else if text.contains('\n') {
            Edit::remove(source, node.byte_range())
        } else {
            // a block comment still separates the tokens around it
            Edit::replace(node.byte_range(), " ")
        });
        false
    });
    Ok(syntax::apply(source, edits))
}

/// Drop indentation, trailing spaces and blank lines outside literals
pub fn collapse_whitespace(source: &str) -> Result<String, TransformError> {
    rewrite_gaps(source, |gap, _, _| {
        if gap.is_empty() {
            ""
        } else if gap.contains('\n') {
            "\n"
        } else {
            " "
        }
    })
}

/// Compact whitespace next to punctuation and join lines
///
/// Comments are stripped first; a line comment would otherwise swallow
/// the code joined onto its line.
pub fn minify(source: &str) -> Result<String, TransformError> {
    let stripped = strip_comments(source)?;
    rewrite_gaps(&stripped, |gap, before, after| {
        if gap.is_empty() || TIGHT.contains(&before) || TIGHT.contains(&after) {
            ""
        } else {
            " "
        }
    })
}

/// Leaf tokens in source order, with [`ATOMIC`] nodes as single tokens
fn tokens<'t>(root: Node<'t>) -> Vec<Node<'t>> {
    let mut tokens = Vec::new();
    syntax::walk(root, &mut |node| {
        if ATOMIC.contains(&node.kind()) || node.child_count() == 0 {
            if node.start_byte() < node.end_byte() {
                tokens.push(node);
            }
            return false;
        }
        true
    });
    tokens
}

/// Replace the whitespace between tokens with `replace(gap, byte_before, byte_after)`
///
/// Whitespace before the first token and after the last one is removed.
fn rewrite_gaps<F>(source: &str, replace: F) -> Result<String, TransformError>
where
    F: Fn(&str, u8, u8) -> &'static str,
{
    let tree = syntax::parse(source)?;
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());

    let mut previous: Option<usize> = None;
    for token in tokens(tree.root_node()) {
        if let Some(end) = previous {
            let gap = &source[end..token.start_byte()];
            out.push_str(replace(gap, bytes[end - 1], bytes[token.start_byte()]));
        }
        out.push_str(syntax::text(source, token));
        previous = Some(token.end_byte());
    }

    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Apply `pass` to the `<script>` body of a single-file component only
pub fn within_script<F>(source: &str, pass: F) -> Result<String, TransformError>
where
    F: Fn(&str) -> Result<String, TransformError>,
{
    let Some(open) = source.find("<script") else {
        return Ok(source.to_string());
    };
    let Some(open_end) = source[open..].find('>').map(|n| open + n + 1) else {
        return Ok(source.to_string());
    };
    let Some(close) = source[open_end..].find("</script>").map(|n| open_end + n) else {
        return Ok(source.to_string());
    };

    let body = pass(&source[open_end..close])?;
    let mut out = String::with_capacity(source.len());
    out.push_str(&source[..open_end]);
    out.push('\n');
    out.push_str(body.trim_start_matches('\n'));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&source[close..]);
    Ok(out)
}
