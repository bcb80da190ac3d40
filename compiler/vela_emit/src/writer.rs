//! Indenting source writer.

/// Accumulates host source text with brace-scoped indentation.
///
/// Four-space indents, `\n` line endings, no trailing whitespace: the
/// output must be byte-identical across runs, so every formatting decision
/// lives here and nowhere else.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buf: String,
    indent: usize,
}

impl SourceWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one indented line.
    pub fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.blank();
            return;
        }
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write a blank line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write `header {` and indent.
    pub fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
    }

    /// Dedent and write the closing brace.
    pub fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    /// Current indent depth, for assertions.
    pub fn depth(&self) -> usize {
        self.indent
    }

    /// Finish, returning the accumulated source.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_blocks() {
        let mut w = SourceWriter::new();
        w.open("namespace UIKit");
        w.open("public partial class UIView");
        w.line("public int Tag;");
        w.close();
        w.close();
        assert_eq!(
            w.finish(),
            "namespace UIKit {\n    public partial class UIView {\n        public int Tag;\n    }\n}\n"
        );
    }

    #[test]
    fn test_close_never_underflows() {
        let mut w = SourceWriter::new();
        w.close();
        assert_eq!(w.depth(), 0);
        assert_eq!(w.finish(), "}\n");
    }
}
