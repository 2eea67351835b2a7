//! Document assembly
//!
//! This module accumulates converted sections in source order, builds the
//! table of contents from every collected heading, and renders the final
//! document: YAML frontmatter, document title, TOC, then the concatenated
//! section bodies. The document is built once in memory and written once.

use crate::WriteError;
use std::fs;
use std::path::Path;

/// One heading collected during conversion
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingEntry {
    /// Heading text as it appears in the document
    pub text: String,

    /// Markdown heading level (1-6), after any page-level shift
    pub level: u8,

    /// Document-unique anchor slug
    pub anchor: String,
}

/// The converted markdown for one source page
///
/// Immutable once produced; sections are appended to the assembler in
/// URL-list order and never reordered.
#[derive(Debug, Clone)]
pub struct MarkdownSection {
    pub headings: Vec<HeadingEntry>,
    pub body: String,
}

/// Frontmatter metadata for the assembled document
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,

    /// Formatted date (YYYY-MM-DD); injected by the driver so assembly
    /// stays a pure function of its inputs
    pub date: String,
}

/// Accumulates sections and renders the final document
///
/// # Example
///
/// ```
/// use docstitch::assemble::{Assembler, DocumentMeta, HeadingEntry, MarkdownSection};
///
/// let mut assembler = Assembler::new(DocumentMeta {
///     title: "Example Reference".to_string(),
///     date: "2026-08-27".to_string(),
/// });
/// assembler.add_section(MarkdownSection {
///     headings: vec![HeadingEntry {
///         text: "Border".to_string(),
///         level: 2,
///         anchor: "border".to_string(),
///     }],
///     body: "## Border {#border}\n\nText".to_string(),
/// });
/// let document = assembler.finalize();
/// assert!(document.contains("- [Border](#border)"));
/// ```
#[derive(Debug)]
pub struct Assembler {
    meta: DocumentMeta,
    sections: Vec<MarkdownSection>,
}

impl Assembler {
    pub fn new(meta: DocumentMeta) -> Self {
        Self {
            meta,
            sections: Vec::new(),
        }
    }

    /// Appends a section; call order fixes document order
    pub fn add_section(&mut self, section: MarkdownSection) {
        self.sections.push(section);
    }

    /// Number of sections accumulated so far
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Renders the final document
    ///
    /// Pure over the accumulated state: calling it twice yields identical
    /// output. Layout: frontmatter, `# title`, `## Table of Contents`,
    /// horizontal rule, then section bodies separated by rules.
    pub fn finalize(&self) -> String {
        let mut doc = String::new();

        // Frontmatter
        doc.push_str("---\n");
        doc.push_str(&format!("title: {}\n", self.meta.title));
        doc.push_str(&format!("date: {}\n", self.meta.date));
        doc.push_str("---\n\n");

        // Document title
        doc.push_str(&format!("# {}\n\n", self.meta.title));

        // Table of contents
        doc.push_str("## Table of Contents\n\n");
        doc.push_str(&self.render_toc());
        doc.push_str("\n---\n\n");

        // Section bodies
        for (index, section) in self.sections.iter().enumerate() {
            doc.push_str(&section.body);
            doc.push('\n');
            if index + 1 < self.sections.len() {
                doc.push_str("\n---\n\n");
            }
        }

        doc
    }

    /// Renders the TOC as a nested bullet list mirroring heading levels
    ///
    /// Indentation is relative to the shallowest collected heading, so a
    /// document whose top headings are `##` still starts at zero indent.
    fn render_toc(&self) -> String {
        let headings: Vec<&HeadingEntry> =
            self.sections.iter().flat_map(|s| &s.headings).collect();

        let min_level = headings.iter().map(|h| h.level).min().unwrap_or(1);

        let mut toc = String::new();
        for heading in headings {
            let indent = "  ".repeat((heading.level - min_level) as usize);
            toc.push_str(&format!(
                "{}- [{}](#{})\n",
                indent, heading.text, heading.anchor
            ));
        }

        toc
    }
}

/// Writes the assembled document to disk
///
/// Creates the parent directory if absent, then writes the whole document in
/// a single operation. A failure here is fatal to the run.
///
/// # Arguments
///
/// * `document` - The rendered markdown
/// * `path` - Destination file path
pub fn write_document(document: &str, path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, document).map_err(|source| WriteError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
