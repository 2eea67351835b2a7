//! Markdown conversion
//!
//! This module renders the extracted block model as markdown. Every heading
//! receives a document-unique anchor from the shared [`Slugger`], and links
//! that point at other pages collected in the same run are rewritten to
//! in-document anchors so the stitched file stays navigable offline.

mod slug;

pub use slug::{slugify, Slugger};

use crate::assemble::{HeadingEntry, MarkdownSection};
use crate::extract::{Block, Inline, ListItem};
use std::collections::HashMap;
use url::Url;

/// Per-page context for a conversion
pub struct ConvertContext<'a> {
    /// URL of the page being converted; relative links resolve against it
    pub page_url: &'a Url,

    /// Amount every heading level is shifted down, so page content nests
    /// under the page's lead heading
    pub level_offset: u8,

    /// Normalized page URL -> section anchor, for link rewriting
    pub link_index: &'a HashMap<String, String>,
}

/// Converts extracted blocks into a markdown section
///
/// Headings are collected (with anchors assigned in document order) alongside
/// the rendered body, so the assembler can later build the table of contents.
///
/// # Arguments
///
/// * `blocks` - The extracted content blocks, in document order
/// * `slugger` - The document-wide anchor allocator
/// * `ctx` - Page URL, heading offset, and link-rewrite index
pub fn convert_blocks(
    blocks: &[Block],
    slugger: &mut Slugger,
    ctx: &ConvertContext<'_>,
) -> MarkdownSection {
    let mut body = String::new();
    let mut headings = Vec::new();

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let level = (level + ctx.level_offset).min(6);
                let anchor = slugger.anchor(text);
                body.push_str(&render_heading(level, text, &anchor));
                body.push('\n');
                headings.push(HeadingEntry {
                    text: text.clone(),
                    level,
                    anchor,
                });
            }
            Block::Paragraph(inlines) => {
                let text = render_inlines(inlines, ctx);
                if !text.is_empty() {
                    body.push_str(&text);
                    body.push_str("\n\n");
                }
            }
            Block::Code { language, code } => {
                body.push_str("```");
                if let Some(lang) = language {
                    body.push_str(lang);
                }
                body.push('\n');
                body.push_str(code);
                body.push_str("\n```\n\n");
            }
            Block::Table { headers, rows } => {
                body.push_str(&render_table(headers, rows));
                body.push('\n');
            }
            Block::List { ordered, items } => {
                render_list(&mut body, *ordered, items, 0, ctx);
                body.push('\n');
            }
        }
    }

    MarkdownSection {
        headings,
        body: clean_markdown(&body),
    }
}

/// Renders a single markdown heading line with an explicit anchor
///
/// The `{#anchor}` attribute form keeps the anchor stable regardless of how
/// a renderer would slug the heading text itself.
pub fn render_heading(level: u8, text: &str, anchor: &str) -> String {
    format!(
        "{} {} {{#{}}}\n",
        "#".repeat(level as usize),
        text,
        anchor
    )
}

/// Renders a table as pipe-delimited markdown
///
/// Every emitted row has exactly as many columns as the header: short rows
/// are padded with empty cells and long rows truncated. Literal pipes in
/// cell content are escaped so they cannot break column alignment.
fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut out = String::new();

    out.push_str("| ");
    out.push_str(
        &headers
            .iter()
            .map(|h| escape_cell(h))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    out.push_str(" |\n");

    out.push_str("| ");
    out.push_str(&vec!["---"; columns].join(" | "));
    out.push_str(" |\n");

    for row in rows {
        let mut cells: Vec<String> = row.iter().take(columns).map(|c| escape_cell(c)).collect();
        while cells.len() < columns {
            cells.push(String::new());
        }
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }

    out
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Renders a list with two spaces of indentation per nesting level
///
/// Ordered lists number their items per level; unordered lists use `-`.
fn render_list(
    out: &mut String,
    ordered: bool,
    items: &[ListItem],
    depth: usize,
    ctx: &ConvertContext<'_>,
) {
    let indent = "  ".repeat(depth);

    for (index, item) in items.iter().enumerate() {
        let marker = if ordered {
            format!("{}.", index + 1)
        } else {
            "-".to_string()
        };

        let text = render_inlines(&item.inlines, ctx);
        out.push_str(&format!("{}{} {}\n", indent, marker, text));

        for nested in &item.nested {
            if let Block::List {
                ordered: nested_ordered,
                items: nested_items,
            } = nested
            {
                render_list(out, *nested_ordered, nested_items, depth + 1, ctx);
            }
        }
    }
}

/// Renders inline content to markdown, collapsing HTML whitespace runs
fn render_inlines(inlines: &[Inline], ctx: &ConvertContext<'_>) -> String {
    let mut out = String::new();

    for inline in inlines {
        match inline {
            Inline::Text(text) => push_collapsed(&mut out, text),
            Inline::Bold(inner) => {
                let inner = render_inlines(inner, ctx);
                if !inner.is_empty() {
                    push_separator(&mut out);
                    out.push_str(&format!("**{}**", inner));
                }
            }
            Inline::Italic(inner) => {
                let inner = render_inlines(inner, ctx);
                if !inner.is_empty() {
                    push_separator(&mut out);
                    out.push_str(&format!("*{}*", inner));
                }
            }
            Inline::Code(code) => {
                push_separator(&mut out);
                out.push_str(&format!("`{}`", code.trim()));
            }
            Inline::Link { text, href } => {
                let label = render_inlines(text, ctx);
                if label.is_empty() {
                    continue;
                }
                push_separator(&mut out);
                out.push_str(&format!("[{}]({})", label, rewrite_link(href, ctx)));
            }
        }
    }

    out.trim().to_string()
}

/// Appends text with whitespace runs collapsed to single spaces
fn push_collapsed(out: &mut String, text: &str) {
    let leading = text.starts_with(char::is_whitespace);
    let mut first = true;

    for word in text.split_whitespace() {
        if first {
            if leading && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            first = false;
        } else {
            out.push(' ');
        }
        out.push_str(word);
    }

    if text.ends_with(char::is_whitespace) && !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

/// Ensures adjacent inline elements do not run together after collapsing
fn push_separator(out: &mut String) {
    if out.is_empty() || out.ends_with(' ') || out.ends_with('(') {
        return;
    }
    // Punctuation directly before an inline element keeps its spacing
    if out.ends_with(|c: char| c.is_alphanumeric()) {
        out.push(' ');
    }
}

/// Rewrites a link target for the stitched document
///
/// Targets resolving to a page collected in this run become in-document
/// anchors; everything else is emitted as the absolute resolved URL. Targets
/// that fail to resolve are passed through untouched.
fn rewrite_link(href: &str, ctx: &ConvertContext<'_>) -> String {
    let resolved = match ctx.page_url.join(href) {
        Ok(url) => url,
        Err(_) => return href.to_string(),
    };

    if let Some(anchor) = ctx.link_index.get(&normalize_page_url(&resolved)) {
        return format!("#{}", anchor);
    }

    resolved.to_string()
}

/// Canonical key for a page URL: fragment stripped, trailing slash ignored
pub fn normalize_page_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}

/// Cleans rendered markdown: strips trailing whitespace per line and
/// collapses runs of blank lines into a single blank line
pub fn clean_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim_matches('\n').to_string()
}
