//! HTML to plain text conversion that keeps paragraph structure.

use scraper::{ElementRef, Html, Node};

/// Tags whose entire subtree is ignored.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg", "head", "template"];

/// Tags that start a new paragraph in the extracted text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Extract readable text from an HTML document.
///
/// Block elements are separated by blank lines, `<br>` becomes a line break,
/// and runs of whitespace inside a line collapse to one space.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    normalize(&raw)
}

fn collect_text(element: ElementRef, out: &mut String) {
    let tag = element.value().name();
    if SKIP_TAGS.contains(&tag) {
        return;
    }
    if tag == "br" {
        out.push('\n');
        return;
    }

    let is_block = BLOCK_TAGS.contains(&tag);
    let is_cell = tag == "td" || tag == "th";
    if is_block {
        out.push_str("\n\n");
    } else if is_cell {
        out.push(' ');
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }

    if is_block {
        out.push_str("\n\n");
    } else if is_cell {
        out.push(' ');
    }
}

/// Collapse intra-line whitespace and keep at most one blank line between paragraphs.
fn normalize(raw: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}
