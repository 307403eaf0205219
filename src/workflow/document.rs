//! Level-2 section view of a markdown document.
//!
//! A document is split at every `## ` heading outside fenced code blocks.
//! Text before the first heading is the preamble. Sections keep their exact
//! bytes, so rendering an unmodified document reproduces the input.

use std::fmt;

/// One `## ` section: its heading line and everything up to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    heading: String,
    /// Section content after the heading line
    pub body: String,
}

impl Section {
    /// Heading text without the `## ` prefix or line ending.
    pub fn title(&self) -> &str {
        self.heading.trim_end_matches(['\n', '\r']).trim_start_matches("## ")
    }

    /// Full heading line without its line ending.
    pub fn heading(&self) -> &str {
        self.heading.trim_end_matches(['\n', '\r'])
    }

    /// Replace the heading text, keeping the original line ending.
    pub fn set_title(&mut self, title: &str) {
        let ending = &self.heading[self.heading.trim_end_matches(['\n', '\r']).len()..];
        self.heading = format!("## {title}{ending}");
    }

    fn matches(&self, prefix: &str) -> bool {
        self.heading.starts_with(prefix)
    }
}

/// A markdown document split into level-2 sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    /// Text before the first `## ` heading
    pub preamble: String,
    sections: Vec<Section>,
}

impl MarkdownDocument {
    /// Split `content` into sections.
    pub fn parse(content: &str) -> Self {
        let mut doc = Self::default();
        let mut in_fence = false;

        for line in content.split_inclusive('\n') {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
            }

            if !in_fence && line.starts_with("## ") {
                doc.sections.push(Section { heading: line.to_string(), body: String::new() });
                continue;
            }

            match doc.sections.last_mut() {
                Some(section) => section.body.push_str(line),
                None => doc.preamble.push_str(line),
            }
        }

        doc
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section whose heading line starts with `prefix` (e.g. `"## Tasks ("`).
    pub fn section(&self, prefix: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.matches(prefix))
    }

    /// Mutable access to the first section whose heading starts with `prefix`.
    pub fn section_mut(&mut self, prefix: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.matches(prefix))
    }

    /// Reassemble the document.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preamble)?;
        for section in &self.sections {
            f.write_str(&section.heading)?;
            f.write_str(&section.body)?;
        }
        Ok(())
    }
}
