//! Paragraph extraction from HTML extracts.
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Get the text of every `<p>` element of `html`, in document order.
///
/// Newlines of the markup are removed before parsing. In the extracted text,
/// non-breaking spaces and line breaks (including entity-encoded ones) are replaced by regular spaces,
/// so that a paragraph always fits on a single line.
/// Whitespace-only paragraphs are discarded.
pub fn paragraphs(html: &str) -> Vec<String> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let cleaned = html.replace('\u{a0}', " ").replace('\n', "");
    let dom = parse_document(RcDom::default(), Default::default()).one(cleaned);

    let mut found = Vec::new();
    find_paragraphs(&dom.document, &mut found);
    found
}

fn find_paragraphs(node: &Handle, found: &mut Vec<String>) {
    if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == "p" {
            let mut text = String::new();
            push_text(node, &mut text);
            let text = text.replace(['\u{a0}', '\n', '\r'], " ");
            if !text.trim().is_empty() {
                found.push(text);
            }
            return;
        }
    }

    for child in node.children.borrow().iter() {
        find_paragraphs(child, found);
    }
}

/// Append the text content of `node` and its descendants to `text`.
fn push_text(node: &Handle, text: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        text.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        push_text(child, text);
    }
}
