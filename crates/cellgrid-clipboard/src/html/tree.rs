//! Lenient HTML tree builder over quick-xml events
//!
//! Clipboard HTML is rarely well-formed XML: attributes go unquoted, void elements are
//! never closed, end tags get dropped or misnested and HTML entities appear everywhere.
//! The reader runs with end-name checks off and HTML attribute parsing, and the builder
//! repairs nesting itself. A syntax error ends the parse early and keeps what was built.
//! Elements nested deeper than [`MAX_DEPTH`] are kept, but flattened into the element at
//! that depth, so walking the tree never recurses without bound.

use super::HtmlNode;
use lazy_regex::regex;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Tag of the synthetic root returned by [`parse_fragment`]
pub const DOCUMENT_TAG: &str = "#document";

/// Deepest element nesting kept, counting the synthetic root
pub const MAX_DEPTH: usize = 512;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text never renders
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "title"];

/// A node of the parsed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with lowercase tag and attribute names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub nodes: Vec<Node>,
}

impl Element {
    fn new(tag: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag,
            attributes,
            nodes: Vec::new(),
        }
    }

    /// Concatenated text of every descendant, untouched (for `<style>` bodies)
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => out.push_str(&el.raw_text()),
            }
        }
        out
    }

    fn render_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                Node::Text(text) => {
                    for c in text.chars() {
                        if c.is_ascii_whitespace() {
                            if !out.ends_with(' ') && !out.ends_with('\n') && !out.is_empty() {
                                out.push(' ');
                            }
                        } else {
                            out.push(if c == '\u{a0}' { ' ' } else { c });
                        }
                    }
                }
                Node::Element(el) if el.tag == "br" => {
                    while out.ends_with(' ') {
                        out.pop();
                    }
                    out.push('\n');
                }
                Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.tag.as_str()) => {}
                Node::Element(el) => el.render_text(out),
            }
        }
    }
}

impl HtmlNode for Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn children(&self) -> Vec<&Self> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Element(el) => Some(el),
                Node::Text(_) => None,
            })
            .collect()
    }

    fn inner_text(&self) -> String {
        let mut out = String::new();
        self.render_text(&mut out);
        out.trim_end_matches(' ').to_string()
    }
}

/// Parse an HTML fragment into a tree under a synthetic [`DOCUMENT_TAG`] root
pub fn parse_fragment(html: &str) -> Element {
    // Office conditional markers (`<![if !vml]>`) are not comments and stop the reader
    let html = regex!(r"<!\[(?:end)?if[^\]]*\]>").replace_all(html, "");

    let mut reader = Reader::from_str(&html);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut stack = vec![Element::new(DOCUMENT_TAG.to_string(), Vec::new())];
    let mut flattened = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let el = element_from(&e);
                close_implied(&mut stack, &el.tag);
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    append(&mut stack, Node::Element(el));
                } else if stack.len() >= MAX_DEPTH {
                    flattened += 1;
                    append(&mut stack, Node::Element(el));
                } else {
                    stack.push(el);
                }
            }
            Ok(Event::Empty(e)) => {
                let el = element_from(&e);
                close_implied(&mut stack, &el.tag);
                append(&mut stack, Node::Element(el));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if let Some(depth) = stack.iter().rposition(|el| el.tag == name) {
                    while stack.len() > depth.max(1) {
                        close_top(&mut stack);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(&e);
                append(&mut stack, Node::Text(decode_entities(&raw)));
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append(&mut stack, Node::Text(text));
            }
            // Office wraps its stylesheet in a comment
            Ok(Event::Comment(e)) if stack.last().map_or(false, |el| el.tag == "style") => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append(&mut stack, Node::Text(text));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "Malformed clipboard HTML at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
        }
    }

    if flattened > 0 {
        log::warn!(
            "Clipboard HTML nested deeper than {} elements, flattened {} elements",
            MAX_DEPTH,
            flattened
        );
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().unwrap_or_default()
}

fn element_from(e: &BytesStart) -> Element {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let attributes = e
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = decode_entities(&String::from_utf8_lossy(&attr.value));
            (key, value)
        })
        .collect();
    Element::new(tag, attributes)
}

/// Resolve character and HTML5 named references, keeping the raw text when invalid
fn decode_entities(raw: &str) -> String {
    match unescape(raw) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Close elements an opening `tag` ends implicitly (`<td>` after an unclosed `<td>`)
fn close_implied(stack: &mut Vec<Element>, tag: &str) {
    let closes: &[&str] = match tag {
        "td" | "th" => &["td", "th"],
        "tr" => &["td", "th", "tr"],
        "tbody" | "thead" | "tfoot" => &["td", "th", "tr", "tbody", "thead", "tfoot"],
        "p" => &["p"],
        _ => return,
    };
    while stack.len() > 1 && stack.last().map_or(false, |el| closes.contains(&el.tag.as_str())) {
        close_top(stack);
    }
}

fn close_top(stack: &mut Vec<Element>) {
    if let Some(el) = stack.pop() {
        append(stack, Node::Element(el));
    }
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.nodes.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{find_all, find_first};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unquoted_attributes_and_void_elements() {
        let doc = parse_fragment(
            "<html><head><meta name=ProgId content=Excel.Sheet></head>\
             <body><table><col width=64 span=2><tr><td class=xl65 x:num>1</td></tr></table></body></html>",
        );
        let meta = find_first(&doc, "meta").unwrap();
        assert_eq!(meta.attribute("content"), Some("Excel.Sheet"));
        let col = find_first(&doc, "col").unwrap();
        assert_eq!(col.attribute("span"), Some("2"));
        let td = find_first(&doc, "td").unwrap();
        assert_eq!(td.attribute("class"), Some("xl65"));
        assert_eq!(td.attribute("x:num"), Some(""));
        assert_eq!(td.inner_text(), "1");
    }

    #[test]
    fn test_entities_and_whitespace() {
        let doc = parse_fragment("<td>  Fish &amp;\n   chips&nbsp;&#39;n&#x27; <b>peas</b> </td>");
        assert_eq!(find_first(&doc, "td").unwrap().inner_text(), "Fish & chips 'n' peas");
    }

    #[test]
    fn test_br_is_a_line_break() {
        let doc = parse_fragment("<td>one<br>two<br/>three</td>");
        assert_eq!(find_first(&doc, "td").unwrap().inner_text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_missing_end_tags_are_repaired() {
        let doc = parse_fragment("<table><tr><td>a<td>b<tr><td>c</table><p>after");
        let rows = find_all(&doc, "tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].children().len(), 2);
        assert_eq!(rows[1].children().len(), 1);
        assert_eq!(find_first(&doc, "p").unwrap().inner_text(), "after");
    }

    #[test]
    fn test_style_comment_is_kept_as_text() {
        let doc = parse_fragment("<style><!--.xl65 {font-weight:700;}--></style><td>x</td>");
        let style = find_first(&doc, "style").unwrap();
        assert_eq!(style.raw_text(), ".xl65 {font-weight:700;}");
        assert_eq!(doc.inner_text(), "x");
    }

    #[test]
    fn test_office_conditionals_are_skipped() {
        let doc = parse_fragment("<![if !supportMisalignedColumns]><tr><td>x</td></tr><![endif]>");
        assert_eq!(find_all(&doc, "td").len(), 1);
    }

    fn depth(el: &Element) -> usize {
        1 + el.children().into_iter().map(depth).max().unwrap_or(0)
    }

    #[test]
    fn test_deep_nesting_is_flattened() {
        let html = format!("{}<td>deep</td>{}", "<div>".repeat(100_000), "</div>".repeat(100_000));
        let doc = parse_fragment(&html);

        assert_eq!(depth(&doc), MAX_DEPTH + 1);
        assert_eq!(doc.inner_text(), "deep");
        assert!(find_first(&doc, "td").is_some());
    }

    #[test]
    fn test_stray_ampersand_is_kept() {
        let doc = parse_fragment("<td>R&D</td>");
        assert_eq!(find_first(&doc, "td").unwrap().inner_text(), "R&D");
    }
}
