//! Minimal HTML tree interface
//!
//! The paste algorithms only ever need a tag name, attribute lookup, element children
//! and the rendered text of a node. [`HtmlNode`] captures exactly that, so span
//! normalization, style lookup and dialect detection work over any tree that
//! implements it. [`parse_fragment`] builds the crate's own tree from clipboard HTML.

mod tree;

pub use tree::{parse_fragment, Element, Node};

/// Read-only view of an HTML element
pub trait HtmlNode {
    /// Lowercase tag name
    fn tag_name(&self) -> &str;

    /// Attribute value by lowercase name
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element children in document order
    fn children(&self) -> Vec<&Self>;

    /// Rendered text: whitespace collapsed, `<br>` as a newline
    fn inner_text(&self) -> String;

    /// Whether the element has the given tag name
    fn is(&self, tag: &str) -> bool {
        self.tag_name() == tag
    }

    /// Integer attribute, 1 when absent or unparseable (the HTML span default)
    fn span_attribute(&self, name: &str) -> usize {
        self.attribute(name)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(1)
    }
}

/// First descendant (depth-first, pre-order) with the given tag
pub fn find_first<'a, N: HtmlNode>(node: &'a N, tag: &str) -> Option<&'a N> {
    for child in node.children() {
        if child.is(tag) {
            return Some(child);
        }
        if let Some(found) = find_first(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Every descendant with the given tag, in document order
pub fn find_all<'a, N: HtmlNode>(node: &'a N, tag: &str) -> Vec<&'a N> {
    let mut found = Vec::new();
    collect(node, &mut |n| n.is(tag), &mut found);
    found
}

/// First descendant satisfying `predicate`
pub fn find_where<'a, N, F>(node: &'a N, predicate: F) -> Option<&'a N>
where
    N: HtmlNode,
    F: Fn(&N) -> bool,
{
    let mut found = Vec::new();
    collect(node, &mut |n| predicate(n), &mut found);
    found.into_iter().next()
}

fn collect<'a, N: HtmlNode>(node: &'a N, predicate: &mut dyn FnMut(&N) -> bool, out: &mut Vec<&'a N>) {
    for child in node.children() {
        if predicate(child) {
            out.push(child);
        }
        collect(child, predicate, out);
    }
}

/// Rows of a table in document order, through `<thead>`, `<tbody>` and `<tfoot>` sections
pub fn table_rows<N: HtmlNode>(table: &N) -> Vec<&N> {
    table
        .children()
        .into_iter()
        .flat_map(|child| {
            if child.is("thead") || child.is("tbody") || child.is("tfoot") {
                child.children().into_iter().filter(|c| c.is("tr")).collect()
            } else if child.is("tr") {
                vec![child]
            } else {
                Vec::new()
            }
        })
        .collect()
}

/// `<td>` and `<th>` children of a row
pub fn row_cells<N: HtmlNode>(row: &N) -> Vec<&N> {
    row.children()
        .into_iter()
        .filter(|c| c.is("td") || c.is("th"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_helpers() {
        let doc = parse_fragment(
            "<div><table><tbody><tr><td>a</td><td>b</td></tr></tbody></table><p>x</p></div>",
        );
        let table = find_first(&doc, "table").unwrap();
        let rows = table_rows(table);
        assert_eq!(rows.len(), 1);
        assert_eq!(row_cells(rows[0]).len(), 2);
        assert_eq!(find_all(&doc, "td").len(), 2);
        assert_eq!(find_where(&doc, |n| n.inner_text() == "x").unwrap().tag_name(), "p");
    }

    #[test]
    fn test_rows_without_tbody() {
        let doc = parse_fragment("<table><tr><td>a</td></tr><tr><td>b</td></tr></table>");
        let table = find_first(&doc, "table").unwrap();
        assert_eq!(table_rows(table).len(), 2);
    }

    #[test]
    fn test_rows_across_sections() {
        let doc = parse_fragment(
            "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>a</td></tr></tbody>\
             <tfoot><tr><td>f</td></tr></tfoot></table>",
        );
        let rows = table_rows(find_first(&doc, "table").unwrap());
        let texts: Vec<String> = rows.iter().map(|r| r.inner_text()).collect();
        assert_eq!(texts, vec!["h", "a", "f"]);
    }

    #[test]
    fn test_span_attribute_defaults_to_one() {
        let doc = parse_fragment("<td colspan=3 rowspan=0>a</td>");
        let td = find_first(&doc, "td").unwrap();
        assert_eq!(td.span_attribute("colspan"), 3);
        assert_eq!(td.span_attribute("rowspan"), 1);
        assert_eq!(td.span_attribute("missing"), 1);
    }
}
