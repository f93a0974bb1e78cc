//! Line-oriented code writer
//!
//! Tracks indentation and, for source maps, which node produced each
//! emitted line.

use std::fmt::Write;

use crate::error::CodegenResult;

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
    line: usize,
    node: Option<String>,
    /// (0-based generated line, node id)
    mappings: Vec<(usize, String)>,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one indented line
    pub fn line(&mut self, args: std::fmt::Arguments<'_>) -> CodegenResult<()> {
        let text = args.to_string();
        for part in text.split('\n') {
            if part.is_empty() {
                self.buf.push('\n');
            } else {
                writeln!(self.buf, "{}{}", INDENT.repeat(self.depth), part)?;
            }
            if let Some(node) = &self.node {
                self.mappings.push((self.line, node.clone()));
            }
            self.line += 1;
        }
        Ok(())
    }

    /// Write a line without indentation
    pub fn raw(&mut self, text: &str) -> CodegenResult<()> {
        let depth = std::mem::take(&mut self.depth);
        let result = self.line(format_args!("{}", text));
        self.depth = depth;
        result
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
        self.line += 1;
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Attribute the lines written by `f` to `node_id`
    pub fn for_node<F>(&mut self, node_id: &str, f: F) -> CodegenResult<()>
    where
        F: FnOnce(&mut Self) -> CodegenResult<()>,
    {
        let outer = self.node.replace(node_id.to_string());
        let result = f(self);
        self.node = outer;
        result
    }

    /// Current 0-based line
    pub fn current_line(&self) -> usize {
        self.line
    }

    pub fn finish(self) -> (String, Vec<(usize, String)>) {
        (self.buf, self.mappings)
    }
}

/// `writer.line(format_args!(...))?` shorthand
macro_rules! emit {
    ($w:expr) => {
        $w.blank()
    };
    ($w:expr, $($arg:tt)*) => {
        $w.line(format_args!($($arg)*))?
    };
}

pub(crate) use emit;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CodegenResult<CodeWriter> {
        let mut w = CodeWriter::new();
        emit!(w, "function a() {{");
        w.indent();
        w.for_node("n1", |w| {
            emit!(w, "// first");
            emit!(w, "call({});", 1);
            Ok(())
        })?;
        w.dedent();
        emit!(w, "}}");
        emit!(w);
        emit!(w, "x;\ny;");
        Ok(w)
    }

    #[test]
    fn test_indentation_and_mappings() {
        let (code, mappings) = sample().unwrap().finish();
        assert_eq!(code, "function a() {\n  // first\n  call(1);\n}\n\nx;\ny;\n");
        assert_eq!(mappings, vec![(1, "n1".to_string()), (2, "n1".to_string())]);
    }
}
