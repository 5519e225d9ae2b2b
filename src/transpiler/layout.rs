//! Clause emission for the two layouts.
//!
//! Renderers produce the text of each clause body; `SqlWriter` decides
//! where the line breaks and indentation go.

use crate::transpiler::dialect::Layout;

const INDENT: &str = "    ";

pub struct SqlWriter {
    layout: Layout,
    buffer: String,
}

impl SqlWriter {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            buffer: String::new(),
        }
    }

    fn separate(&mut self) {
        if !self.buffer.is_empty() {
            match self.layout {
                Layout::Compact => self.buffer.push(' '),
                Layout::Block => self.buffer.push('\n'),
            }
        }
    }

    /// `HEAD a, b` or, in block layout, the head on its own line followed by
    /// one indented entry per line.
    pub fn list(&mut self, head: &str, items: &[String]) {
        self.separate();
        self.buffer.push_str(head);
        match self.layout {
            Layout::Compact => {
                self.buffer.push(' ');
                self.buffer.push_str(&items.join(", "));
            }
            Layout::Block => {
                let body: Vec<String> = items.iter().map(|i| indent_lines(i)).collect();
                self.buffer.push('\n');
                self.buffer.push_str(&body.join(",\n"));
            }
        }
    }

    pub fn single(&mut self, head: &str, body: String) {
        self.list(head, &[body]);
    }

    /// A clause kept on one line in both layouts (`UPDATE t`, `INNER JOIN ...`).
    pub fn line(&mut self, text: &str) {
        self.separate();
        self.buffer.push_str(text);
    }

    /// `HEAD (a, b)`, or `HEAD (` / entries / `)` in block layout.
    pub fn tuple(&mut self, head: &str, items: &[String]) {
        self.separate();
        self.buffer.push_str(head);
        match self.layout {
            Layout::Compact => {
                self.buffer.push_str(" (");
                self.buffer.push_str(&items.join(", "));
                self.buffer.push(')');
            }
            Layout::Block => {
                let body: Vec<String> = items.iter().map(|i| indent_lines(i)).collect();
                self.buffer.push_str(" (\n");
                self.buffer.push_str(&body.join(",\n"));
                self.buffer.push_str("\n)");
            }
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Indent every line of `text` by one level.
pub fn indent_lines(text: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parenthesize a nested query's text.
pub fn wrap_nested(layout: Layout, inner: &str) -> String {
    match layout {
        Layout::Compact => format!("({})", inner),
        Layout::Block => format!("(\n{}\n)", indent_lines(inner)),
    }
}
