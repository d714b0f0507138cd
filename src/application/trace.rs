//! Human readable request/response traces written to the control sink.

/// Ordered lines of one trace block, each rendered behind `prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    prefix: &'static str,
    lines: Vec<String>,
}

impl Trace {
    /// Lines describing what is sent.
    pub fn request() -> Self {
        Self::new(">")
    }

    /// Lines describing what came back.
    pub fn response() -> Self {
        Self::new("<")
    }

    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            lines: Vec::new(),
        }
    }

    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Adds one `Name: Value` line per pair.
    pub fn headers<'a, I>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in headers {
            self.lines.push(format!("{name}: {value}"));
        }
        self
    }

    /// Joins the prefixed lines and closes the block with an empty line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(self.prefix);
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}
