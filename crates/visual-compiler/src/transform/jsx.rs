//! JSX preset
//!
//! Lowers JSX elements in the parse tree to factory calls
//! (`React.createElement` by default). Output keeps every source line in
//! place: each argument is written on the line its JSX piece started on,
//! so a source map built for the JSX still describes the lowered code.
//! Attribute strings are taken raw, as JSX defines them; only character
//! references are decoded.

use tree_sitter::Node;

use super::syntax;
use crate::codegen::naming::js_string;
use crate::error::TransformError;

pub fn lower_jsx(source: &str, pragma: &str) -> Result<String, TransformError> {
    let tree = syntax::parse(source)?;
    let fragment = match pragma.rsplit_once('.') {
        Some((namespace, _)) => format!("{}.Fragment", namespace),
        None => "Fragment".to_string(),
    };
    let mut lowering = Lowering {
        source,
        pragma,
        fragment,
        line_starts: std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect(),
        out: String::with_capacity(source.len() * 2),
        out_line: 0,
    };
    lowering.copy_range(tree.root_node(), 0, source.len())?;
    Ok(lowering.out)
}

fn is_element(node: Node<'_>) -> bool {
    matches!(node.kind(), "jsx_element" | "jsx_self_closing_element")
}

/// Outermost elements at or below `node`, in source order
fn outermost_elements<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    syntax::walk(node, &mut |n| {
        if is_element(n) {
            found.push(n);
            false
        } else {
            true
        }
    });
    found
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    syntax::named_children(node).into_iter().find(|c| c.kind() == kind)
}

/// Expression held by a `{...}` container, if any
fn contained_expression(container: Node<'_>) -> Option<Node<'_>> {
    syntax::named_children(container).into_iter().next()
}

struct Lowering<'s> {
    source: &'s str,
    pragma: &'s str,
    fragment: String,
    line_starts: Vec<usize>,
    out: String,
    /// 0-based line the output cursor is on
    out_line: usize,
}

impl Lowering<'_> {
    fn line_of(&self, pos: usize) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    fn indentation(&self, line: usize) -> &str {
        let rest = &self.source[self.line_starts[line]..];
        &rest[..rest.len() - rest.trim_start_matches([' ', '\t']).len()]
    }

    fn push(&mut self, text: &str) {
        self.out_line += text.matches('\n').count();
        self.out.push_str(text);
    }

    /// Break lines until output reaches the source line of `pos`
    fn pad_to(&mut self, pos: usize) -> bool {
        let line = self.line_of(pos);
        if self.out_line >= line {
            return false;
        }
        while self.out_line < line {
            self.out.push('\n');
            self.out_line += 1;
        }
        let source = self.source;
        let start = self.line_starts[line];
        let indent = &source[start..start + self.indentation(line).len()];
        self.out.push_str(indent);
        true
    }

    /// `,` followed by a line break or a space
    fn separator(&mut self, next: usize) {
        self.push(",");
        if !self.pad_to(next) {
            self.push(" ");
        }
    }

    /// Copy `node` with every element inside it lowered
    fn copy(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        self.copy_range(node, node.start_byte(), node.end_byte())
    }

    fn copy_range(&mut self, within: Node<'_>, start: usize, end: usize) -> Result<(), TransformError> {
        let source = self.source;
        let mut copied = start;
        for element in outermost_elements(within) {
            self.push(&source[copied..element.start_byte()]);
            self.element(element)?;
            self.pad_to(element.end_byte());
            copied = element.end_byte();
        }
        self.push(&source[copied..end]);
        Ok(())
    }

    fn element(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        let source = self.source;
        let (opening, closing) = if node.kind() == "jsx_self_closing_element" {
            (node, None)
        } else {
            let opening = child_of_kind(node, "jsx_opening_element").ok_or_else(|| {
                syntax::error_at(source, node.start_byte(), "Expected opening tag")
            })?;
            (opening, child_of_kind(node, "jsx_closing_element"))
        };

        let name = opening.child_by_field_name("name");
        let tag = match name {
            None => self.fragment.clone(),
            Some(name) => {
                let text = syntax::text(source, name);
                let intrinsic = name.kind() == "jsx_namespace_name"
                    || (name.kind() == "identifier"
                        && (text.starts_with(|c: char| c.is_ascii_lowercase()) || text.contains('-')));
                if intrinsic {
                    js_string(text)
                } else {
                    text.to_string()
                }
            }
        };

        if let Some(closing) = closing {
            let opened = name.map_or("", |n| syntax::text(source, n));
            let closed = closing
                .child_by_field_name("name")
                .map_or("", |n| syntax::text(source, n));
            if opened != closed {
                return Err(syntax::error_at(
                    source,
                    closing.start_byte(),
                    format!("Expected closing tag for <{}>, found </{}>", opened, closed),
                ));
            }
        }

        let attributes: Vec<Node<'_>> = syntax::named_children(opening)
            .into_iter()
            .filter(|c| matches!(c.kind(), "jsx_attribute" | "jsx_expression"))
            .collect();

        self.push(&format!("{}({}, ", self.pragma, tag));
        if attributes.is_empty() {
            self.push("null");
        } else {
            self.push("{ ");
            for (i, attribute) in attributes.iter().enumerate() {
                if i > 0 {
                    self.separator(attribute.start_byte());
                } else {
                    self.pad_to(attribute.start_byte());
                }
                self.attribute(*attribute)?;
            }
            self.push(" }");
        }

        if let Some(closing) = closing {
            self.children(node)?;
            self.pad_to(closing.start_byte());
        }
        self.push(")");
        Ok(())
    }

    fn attribute(&mut self, attribute: Node<'_>) -> Result<(), TransformError> {
        let source = self.source;
        let invalid = |message: &str| syntax::error_at(source, attribute.start_byte(), message);

        if attribute.kind() == "jsx_expression" {
            let argument = contained_expression(attribute)
                .filter(|n| n.kind() == "spread_element")
                .and_then(|spread| spread.named_child(0))
                .ok_or_else(|| invalid("Expected attribute name"))?;
            self.push("...");
            return self.copy(argument);
        }

        let mut parts = syntax::named_children(attribute).into_iter();
        let name = parts.next().ok_or_else(|| invalid("Expected attribute name"))?;
        let key = syntax::text(source, name);
        if key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            self.push(&format!("{}: ", key));
        } else {
            self.push(&format!("{}: ", js_string(key)));
        }

        let Some(value) = parts.next() else {
            self.push("true");
            return Ok(());
        };
        match value.kind() {
            "string" => {
                let raw = syntax::text(source, value);
                let body = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
                self.push(&js_string(&decode_references(body)));
                Ok(())
            }
            "jsx_expression" => {
                let expression =
                    contained_expression(value).ok_or_else(|| invalid("Empty attribute expression"))?;
                self.copy(expression)
            }
            _ if is_element(value) => self.element(value),
            _ => Err(invalid("Expected attribute value")),
        }
    }

    fn children(&mut self, element: Node<'_>) -> Result<(), TransformError> {
        let source = self.source;
        let children: Vec<Node<'_>> = syntax::named_children(element)
            .into_iter()
            .filter(|c| !matches!(c.kind(), "jsx_opening_element" | "jsx_closing_element"))
            .collect();

        let mut i = 0;
        while i < children.len() {
            let child = children[i];
            match child.kind() {
                "jsx_text" | "html_character_reference" => {
                    // one text run may be split around character references
                    let start = child.start_byte();
                    let mut end = child.end_byte();
                    while let Some(next) = children
                        .get(i + 1)
                        .filter(|n| matches!(n.kind(), "jsx_text" | "html_character_reference"))
                    {
                        end = next.end_byte();
                        i += 1;
                    }
                    let raw = &source[start..end];
                    let text = jsx_text(&decode_references(raw));
                    if !text.is_empty() {
                        self.separator(start + (raw.len() - raw.trim_start().len()));
                        self.push(&js_string(&text));
                    }
                }
                "jsx_expression" => {
                    if let Some(expression) = contained_expression(child) {
                        self.separator(expression.start_byte());
                        match expression.kind() {
                            "spread_element" => {
                                self.push("...");
                                if let Some(argument) = expression.named_child(0) {
                                    self.copy(argument)?;
                                }
                            }
                            _ => self.copy(expression)?,
                        }
                    }
                }
                _ if is_element(child) => {
                    self.separator(child.start_byte());
                    self.element(child)?;
                }
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }
}

/// JSX text with line-leading and trailing whitespace removed
fn jsx_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode HTML character references (`&amp;`, `&#123;`, `&#x7B;`)
fn decode_references(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRAGMA: &str = "React.createElement";

    fn lower(source: &str) -> String {
        lower_jsx(source, PRAGMA).unwrap()
    }

    #[test]
    fn test_self_closing_and_props() {
        assert_eq!(
            lower("const a = <Input placeholder=\"Name\" disabled />;"),
            "const a = React.createElement(Input, { placeholder: \"Name\", disabled: true });"
        );
    }

    #[test]
    fn test_attribute_strings_are_raw() {
        assert_eq!(
            lower(r#"a = <Input placeholder="C:\Users\" variant="{x}" title="Tom &amp; Jerry" />;"#),
            r#"a = React.createElement(Input, { placeholder: "C:\\Users\\", variant: "{x}", title: "Tom & Jerry" });"#
        );
    }

    #[test]
    fn test_nested_children_keep_lines() {
        let source = "return (\n  <div className=\"visual-app\">\n    <p className=\"mb-4\">{text}</p>\n  </div>\n);";
        let lowered = lower(source);
        assert_eq!(lowered.lines().count(), source.lines().count());
        assert_eq!(
            lowered,
            "return (\n  React.createElement(\"div\", { className: \"visual-app\" },\n    React.createElement(\"p\", { className: \"mb-4\" }, text)\n  )\n);"
        );
    }

    #[test]
    fn test_multiline_props_keep_lines() {
        let source = "x = (\n  <Button\n    onClick={go}\n    size=\"sm\"\n  >\n    {label}\n  </Button>\n);";
        let lowered = lower(source);
        assert_eq!(lowered.lines().count(), source.lines().count());
        assert!(lowered.contains("React.createElement(Button, { \n    onClick: go,\n    size: \"sm\" },"));
    }

    #[test]
    fn test_comment_children_dropped() {
        let source = "x = <div data-node-type=\"map\">{/* Unsupported */}</div>;";
        assert_eq!(
            lower(source),
            "x = React.createElement(\"div\", { \"data-node-type\": \"map\" });"
        );
    }

    #[test]
    fn test_expression_attributes_are_lowered() {
        let source = "x = <A render={() => <B />} onClick={() => {}} {...rest} />;";
        assert_eq!(
            lower(source),
            "x = React.createElement(A, { render: () => React.createElement(B, null), onClick: () => {}, ...rest });"
        );
    }

    #[test]
    fn test_fragment_text_and_member_tags() {
        assert_eq!(
            lower("x = <>\n  Hello   there\n</>;"),
            "x = React.createElement(React.Fragment, null,\n  \"Hello   there\"\n);"
        );
        assert_eq!(
            lower("x = <ui.Card>a &lt; b</ui.Card>;"),
            "x = React.createElement(ui.Card, null, \"a < b\");"
        );
    }

    #[test]
    fn test_comparisons_left_alone() {
        let source = "if (a < b && c<d) { f(); }";
        assert_eq!(lower(source), source);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = lower_jsx("x = (\n  <Card>\n  </Cart>\n);", PRAGMA).unwrap_err();
        assert_eq!(err.position().map(|(line, _)| line), Some(3));
    }
}
