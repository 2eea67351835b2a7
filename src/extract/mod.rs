//! Content extraction
//!
//! This module locates the main documentation content region inside a fetched
//! page and lifts it into an owned block model. Navigation bars, sidebars,
//! footers, and script/style elements never enter the model because only the
//! configured container subtree is walked and only semantic elements are kept.
//!
//! The block model is scoped to one page's processing and is never shared
//! across pages.

use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// A block-level content element extracted from a page
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A heading h1-h6; text is trimmed with permalink pilcrows removed
    Heading { level: u8, text: String },

    /// A paragraph of inline content
    Paragraph(Vec<Inline>),

    /// A preformatted code block, with optional language hint
    Code {
        language: Option<String>,
        code: String,
    },

    /// A table: header cells plus body rows
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },

    /// An ordered or unordered list
    List { ordered: bool, items: Vec<ListItem> },
}

/// One list item: its inline content plus any nested lists
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub inlines: Vec<Inline>,
    pub nested: Vec<Block>,
}

/// Inline content within a paragraph, list item, or link
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Code(String),
    Link { text: Vec<Inline>, href: String },
}

/// Extracts the semantic content blocks from a page's raw HTML
///
/// Finds the content container via `content_selector`, then walks its subtree
/// collecting headings, paragraphs, code blocks, tables, and lists. Wrapper
/// elements (div, section, ...) are descended through transparently; anything
/// else is discarded.
///
/// # Arguments
///
/// * `html` - The raw HTML of the page
/// * `content_selector` - CSS selector for the content container
///
/// # Returns
///
/// * `Ok(Vec<Block>)` - Blocks in document order
/// * `Err(ExtractError)` - Container absent or empty
pub fn extract_content(html: &str, content_selector: &str) -> Result<Vec<Block>, ExtractError> {
    let document = Html::parse_document(html);

    let selector =
        Selector::parse(content_selector).map_err(|_| ExtractError::ContainerMissing {
            selector: content_selector.to_string(),
        })?;

    let container = document
        .select(&selector)
        .next()
        .ok_or_else(|| ExtractError::ContainerMissing {
            selector: content_selector.to_string(),
        })?;

    let blocks = collect_blocks(container);

    if blocks.is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    Ok(blocks)
}

/// Collects content blocks from the children of an element
///
/// Captured elements (headings, p, pre, lists, tables) are converted whole;
/// unknown elements are descended through so content wrapped in divs is not
/// lost. Nav, aside, footer, script, and style subtrees are pruned.
fn collect_blocks(element: ElementRef) -> Vec<Block> {
    let mut blocks = Vec::new();

    for child in element.children() {
        let el = match ElementRef::wrap(child) {
            Some(el) => el,
            None => continue,
        };

        match el.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = el.value().name().as_bytes()[1] - b'0';
                let text = heading_text(el);
                if !text.is_empty() {
                    blocks.push(Block::Heading { level, text });
                }
            }
            "p" => {
                let inlines = parse_inlines(el);
                if !inlines_are_blank(&inlines) {
                    blocks.push(Block::Paragraph(inlines));
                }
            }
            "pre" => {
                let code = el.text().collect::<String>();
                let code = code.trim_matches('\n').trim_end().to_string();
                if !code.is_empty() {
                    blocks.push(Block::Code {
                        language: code_language(el),
                        code,
                    });
                }
            }
            "ul" | "ol" => {
                let ordered = el.value().name() == "ol";
                let items = collect_list_items(el);
                if !items.is_empty() {
                    blocks.push(Block::List { ordered, items });
                }
            }
            "table" => {
                if let Some(table) = collect_table(el) {
                    blocks.push(table);
                }
            }
            "script" | "style" | "nav" | "aside" | "footer" => {}
            _ => blocks.extend(collect_blocks(el)),
        }
    }

    blocks
}

/// Extracts heading text, trimming whitespace and trailing permalink pilcrows
///
/// MkDocs-style sites append an anchor link rendered as "¶" to every heading.
fn heading_text(el: ElementRef) -> String {
    let text = el.text().collect::<String>();
    text.trim().trim_end_matches('¶').trim_end().to_string()
}

/// Determines the language hint of a code block from class attributes
///
/// Looks for a `language-*` class on the `pre` element or a nested `code`
/// element, e.g. `<pre><code class="language-python">`.
fn code_language(el: ElementRef) -> Option<String> {
    if let Some(lang) = language_from_classes(el) {
        return Some(lang);
    }

    let code_selector = Selector::parse("code").ok()?;
    el.select(&code_selector).next().and_then(language_from_classes)
}

fn language_from_classes(el: ElementRef) -> Option<String> {
    el.value()
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .map(|lang| lang.to_string())
}

/// Collects the direct items of a list element
///
/// Each `li` contributes its inline content; nested `ul`/`ol` children become
/// nested blocks so list depth survives into the markdown output.
fn collect_list_items(list: ElementRef) -> Vec<ListItem> {
    let mut items = Vec::new();

    for child in list.children() {
        let el = match ElementRef::wrap(child) {
            Some(el) => el,
            None => continue,
        };

        if el.value().name() != "li" {
            continue;
        }

        let mut inlines = Vec::new();
        let mut nested = Vec::new();

        for li_child in el.children() {
            if let Some(li_el) = ElementRef::wrap(li_child) {
                match li_el.value().name() {
                    "ul" | "ol" => {
                        let ordered = li_el.value().name() == "ol";
                        let sub_items = collect_list_items(li_el);
                        if !sub_items.is_empty() {
                            nested.push(Block::List {
                                ordered,
                                items: sub_items,
                            });
                        }
                    }
                    _ => inlines.extend(parse_inline_element(li_el)),
                }
            } else if let Some(text) = li_child.value().as_text() {
                push_text(&mut inlines, text);
            }
        }

        if !inlines_are_blank(&inlines) || !nested.is_empty() {
            items.push(ListItem { inlines, nested });
        }
    }

    items
}

/// Collects a table into header cells and body rows
///
/// Headers come from `th` cells; body rows are the `td` cells of each `tr`.
/// Returns None for tables with no header row, matching the source sites
/// where layout tables carry no `th` elements.
fn collect_table(table: ElementRef) -> Option<Block> {
    let th_selector = Selector::parse("th").ok()?;
    let tr_selector = Selector::parse("tr").ok()?;
    let td_selector = Selector::parse("td").ok()?;

    let headers: Vec<String> = table
        .select(&th_selector)
        .map(|th| cell_text(th))
        .collect();

    if headers.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    for tr in table.select(&tr_selector) {
        let row: Vec<String> = tr.select(&td_selector).map(|td| cell_text(td)).collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Some(Block::Table { headers, rows })
}

/// Flattens a table cell to single-line text
fn cell_text(el: ElementRef) -> String {
    let text = el.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the inline content of an element (paragraph, list item, link text)
fn parse_inlines(el: ElementRef) -> Vec<Inline> {
    let mut inlines = Vec::new();

    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            inlines.extend(parse_inline_element(child_el));
        } else if let Some(text) = child.value().as_text() {
            push_text(&mut inlines, text);
        }
    }

    inlines
}

/// Parses a single inline element into the inline model
///
/// Unknown elements (span and friends) are spliced transparently.
fn parse_inline_element(el: ElementRef) -> Vec<Inline> {
    match el.value().name() {
        "strong" | "b" => vec![Inline::Bold(parse_inlines(el))],
        "em" | "i" => vec![Inline::Italic(parse_inlines(el))],
        "code" => {
            let code = el.text().collect::<String>();
            vec![Inline::Code(code)]
        }
        "a" => match el.value().attr("href") {
            Some(href) => vec![Inline::Link {
                text: parse_inlines(el),
                href: href.to_string(),
            }],
            None => parse_inlines(el),
        },
        "br" => vec![Inline::Text(" ".to_string())],
        "script" | "style" => Vec::new(),
        _ => parse_inlines(el),
    }
}

fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        inlines.push(Inline::Text(text.to_string()));
    }
}

fn inlines_are_blank(inlines: &[Inline]) -> bool {
    inlines.iter().all(|inline| match inline {
        Inline::Text(text) => text.trim().is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECTOR: &str = "article.md-content__inner";

    fn wrap(body: &str) -> String {
        format!(
            r#"<html><body><nav>ignored</nav><article class="md-content__inner">{}</article><footer>ignored</footer></body></html>"#,
            body
        )
    }

    #[test]
    fn test_container_missing() {
        let html = "<html><body><p>loose</p></body></html>";
        let result = extract_content(html, SELECTOR);
        assert!(matches!(
            result,
            Err(ExtractError::ContainerMissing { .. })
        ));
    }

    #[test]
    fn test_empty_container() {
        let html = wrap("<div></div>");
        let result = extract_content(&html, SELECTOR);
        assert!(matches!(result, Err(ExtractError::EmptyContent)));
    }

    #[test]
    fn test_extract_heading_and_paragraph() {
        let html = wrap("<h2>Border</h2><p>Text</p>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                text: "Border".to_string()
            }
        );
        assert_eq!(
            blocks[1],
            Block::Paragraph(vec![Inline::Text("Text".to_string())])
        );
    }

    #[test]
    fn test_heading_pilcrow_stripped() {
        let html = wrap(r##"<h2>Border<a class="headerlink" href="#border">¶</a></h2>"##);
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                text: "Border".to_string()
            }
        );
    }

    #[test]
    fn test_content_inside_wrapper_div() {
        let html = wrap("<div class=\"wrapper\"><h3>Nested</h3></div>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn test_nav_and_script_pruned() {
        let html = wrap("<nav><p>menu</p></nav><script>alert(1)</script><p>kept</p>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0],
            Block::Paragraph(vec![Inline::Text("kept".to_string())])
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let html = wrap(r#"<pre><code class="language-python">print("hi")</code></pre>"#);
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(
            blocks[0],
            Block::Code {
                language: Some("python".to_string()),
                code: "print(\"hi\")".to_string()
            }
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let html = wrap("<pre>plain code</pre>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(
            blocks[0],
            Block::Code {
                language: None,
                code: "plain code".to_string()
            }
        );
    }

    #[test]
    fn test_table_extraction() {
        let html = wrap(
            "<table>\
             <tr><th>Name</th><th>Type</th></tr>\
             <tr><td>border</td><td>Border</td></tr>\
             <tr><td>color</td><td>Color</td></tr>\
             </table>",
        );
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(
            blocks[0],
            Block::Table {
                headers: vec!["Name".to_string(), "Type".to_string()],
                rows: vec![
                    vec!["border".to_string(), "Border".to_string()],
                    vec!["color".to_string(), "Color".to_string()],
                ],
            }
        );
    }

    #[test]
    fn test_headerless_table_dropped() {
        let html = wrap("<table><tr><td>layout</td></tr></table><p>kept</p>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_nested_list() {
        let html = wrap(
            "<ul>\
             <li>Outer\
               <ul><li>Inner</li></ul>\
             </li>\
             </ul>",
        );
        let blocks = extract_content(&html, SELECTOR).unwrap();

        let Block::List { ordered, items } = &blocks[0] else {
            panic!("expected list");
        };
        assert!(!ordered);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].nested.len(), 1);

        let Block::List { items: inner, .. } = &items[0].nested[0] else {
            panic!("expected nested list");
        };
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_ordered_list() {
        let html = wrap("<ol><li>First</li><li>Second</li></ol>");
        let blocks = extract_content(&html, SELECTOR).unwrap();
        let Block::List { ordered, items } = &blocks[0] else {
            panic!("expected list");
        };
        assert!(*ordered);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_inline_formatting() {
        let html = wrap(r#"<p><strong>bold</strong> and <em>italic</em> and <code>x = 1</code></p>"#);
        let blocks = extract_content(&html, SELECTOR).unwrap();

        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inlines[0], Inline::Bold(vec![Inline::Text("bold".to_string())]));
        assert_eq!(inlines[2], Inline::Italic(vec![Inline::Text("italic".to_string())]));
        assert_eq!(inlines[4], Inline::Code("x = 1".to_string()));
    }

    #[test]
    fn test_inline_link() {
        let html = wrap(r#"<p>See <a href="/reference/color/">Color</a>.</p>"#);
        let blocks = extract_content(&html, SELECTOR).unwrap();

        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            inlines[1],
            Inline::Link {
                text: vec![Inline::Text("Color".to_string())],
                href: "/reference/color/".to_string(),
            }
        );
    }

    #[test]
    fn test_span_spliced_transparently() {
        let html = wrap(r#"<p><span class="hl">highlighted</span> text</p>"#);
        let blocks = extract_content(&html, SELECTOR).unwrap();
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inlines[0], Inline::Text("highlighted".to_string()));
    }
}
