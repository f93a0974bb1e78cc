//! Identifier and literal helpers for generated code

use std::collections::HashSet;

use crate::constants::defaults;

/// Words that cannot be used as JavaScript binding names
const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// `submit button` / `submit-button` / `submit_button` -> `SubmitButton`
///
/// Characters that are not alphanumeric separate words; the rest of each
/// word keeps its case.
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `Submit Button` -> `submitButton`
pub fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Component name from a project name, `VisualApp` when nothing usable remains
pub fn component_name(project_name: &str) -> String {
    let cleaned: String = project_name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    let name: String = to_pascal_case(&cleaned)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    match name.chars().next() {
        None => defaults::COMPONENT_NAME.to_string(),
        Some(first) if first.is_ascii_digit() => format!("{}{}", defaults::COMPONENT_NAME, name),
        Some(_) => name,
    }
}

/// Make an arbitrary string a valid JavaScript identifier
pub fn sanitize_identifier(input: &str) -> String {
    let mut ident: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if ident.is_empty() {
        ident.push_str("value");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Hands out unique identifiers within one generated module
#[derive(Debug, Clone, Default)]
pub struct IdentAllocator {
    used: HashSet<String>,
}

impl IdentAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark names that generated code already binds
    pub fn reserve<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.used.extend(names.into_iter().map(str::to_string));
    }

    /// Claim `base`, or `base2`, `base3`, ... if it is taken
    pub fn allocate(&mut self, base: &str) -> String {
        let base = sanitize_identifier(base);
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}

/// Text safe to place inside a `//` or `/* */` comment
pub fn comment_text(input: &str) -> String {
    input
        .replace("*/", "* /")
        .replace(['\n', '\r'], " ")
}

/// JavaScript string literal (JSON encoding is a subset)
pub fn js_string(input: &str) -> String {
    serde_json::Value::String(input.to_string()).to_string()
}

/// Single-quoted JavaScript string literal
pub fn js_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('\'');
    for c in input.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Escape text for HTML content and attribute values
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_pascal_case("submit button"), "SubmitButton");
        assert_eq!(to_pascal_case("api-source_v2"), "ApiSourceV2");
        assert_eq!(to_pascal_case("  "), "");
        assert_eq!(to_camel_case("Submit Button"), "submitButton");
        assert_eq!(to_camel_case("URL"), "uRL");
    }

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("My Login Form!"), "MyLoginForm");
        assert_eq!(component_name("!!!"), "VisualApp");
        assert_eq!(component_name("2048 game"), "VisualApp2048Game");
        assert_eq!(component_name("Untitled Project"), "UntitledProject");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("user-name"), "username");
        assert_eq!(sanitize_identifier("1st"), "_1st");
        assert_eq!(sanitize_identifier("default"), "default_");
        assert_eq!(sanitize_identifier(""), "value");
    }

    #[test]
    fn test_allocator_deduplicates() {
        let mut idents = IdentAllocator::new();
        idents.reserve(["React"]);
        assert_eq!(idents.allocate("count"), "count");
        assert_eq!(idents.allocate("count"), "count2");
        assert_eq!(idents.allocate("count"), "count3");
        assert_eq!(idents.allocate("React"), "React2");
        assert!(idents.is_used("count2"));
    }

    #[test]
    fn test_literals() {
        assert_eq!(js_string("say \"hi\""), r#""say \"hi\"""#);
        assert_eq!(js_single_quoted("it's"), r"'it\'s'");
        assert_eq!(html_escape("<b>{x}</b>"), "&lt;b&gt;&#123;x&#125;&lt;/b&gt;");
        assert_eq!(comment_text("a */\nb"), "a * / b");
    }
}
