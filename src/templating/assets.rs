//! Script and stylesheet includes collected for a page.
//!
//! Each entry is either a reference (a URL or path) or a literal inline block.
//! Rendering wraps references in the matching HTML tag and passes literal
//! blocks through untouched, one entry per line, in insertion order.

/// Which kind of asset an [`IncludeList`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Script,
    Style,
}

impl IncludeKind {
    /// Prefix that marks an entry as a literal block (compared case-insensitively).
    pub const fn literal_prefix(self) -> &'static str {
        match self {
            IncludeKind::Script => "<script",
            IncludeKind::Style => "<style",
        }
    }

    fn is_literal(self, entry: &str) -> bool {
        let prefix = self.literal_prefix();
        entry.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    fn tag_for(self, reference: &str) -> String {
        match self {
            IncludeKind::Script => format!(r#"<script src="{reference}"></script>"#),
            IncludeKind::Style => {
                format!(r#"<link rel="stylesheet" type="text/css" href="{reference}">"#)
            }
        }
    }
}

/// Ordered list of asset includes of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeList {
    kind: IncludeKind,
    entries: Vec<String>,
}

impl IncludeList {
    pub const fn new(kind: IncludeKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub const fn kind(&self) -> IncludeKind {
        self.kind
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn prepend(&mut self, entry: impl Into<String>) {
        self.entries.insert(0, entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry as HTML, each followed by a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if self.kind.is_literal(entry) {
                out.push_str(entry);
            } else {
                out.push_str(&self.kind.tag_for(entry));
            }
            out.push('\n');
        }
        out
    }
}
