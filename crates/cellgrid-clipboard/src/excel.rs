//! Excel HTML clipboard
//!
//! Excel styles cells through classes in a `<style>` block (`.xl65 { ... }`), stores
//! raw values in `x:num`/`x:str` attributes and number formats in the
//! `mso-number-format` property. Text that overflows into empty neighbours is written as a
//! `colspan` with `mso-ignore:colspan`, which is not a merge.

use crate::css::{declaration, declarations_to_attributes, StyleSheet};
use crate::html::{find_all, find_first, find_where, parse_fragment, Element, HtmlNode};
use crate::model::ClipboardCell;
use crate::parse::{dense_cells, Spans};
use crate::values::coerce_value;
use cellgrid_core::attributes::{self, join_number_format};
use cellgrid_core::format_number;
use lazy_regex::regex;
use std::borrow::Cow;

/// Whether a parsed document was written by Excel (`<meta name=ProgId content=Excel.Sheet>`)
pub fn is_excel_document<N: HtmlNode>(doc: &N) -> bool {
    find_where(doc, |n| {
        n.is("meta")
            && n.attribute("name")
                .map_or(false, |name| name.eq_ignore_ascii_case("ProgId"))
            && n.attribute("content")
                .map_or(false, |content| content.starts_with("Excel"))
    })
    .is_some()
}

/// Remove drawings and pictures Excel embeds next to the cells
pub fn strip_graphics(html: &str) -> Cow<'_, str> {
    let shapes = regex!(r"(?is)<v:shapetype\b.*?</v:shapetype>|<v:shape\b.*?</v:shape>");
    let images = regex!(r"(?i)<img\b[^>]*>");

    match shapes.replace_all(html, "") {
        Cow::Borrowed(html) => images.replace_all(html, ""),
        Cow::Owned(html) => Cow::Owned(images.replace_all(&html, "").into_owned()),
    }
}

/// Parse Excel HTML into a dense block, `None` when it holds no table
pub fn parse_excel(html: &str) -> Option<Vec<Vec<Option<ClipboardCell>>>> {
    let doc = parse_fragment(&strip_graphics(html));

    let css: String = find_all(&doc, "style")
        .iter()
        .map(|style| style.raw_text())
        .collect::<Vec<_>>()
        .join("\n");
    let sheet = StyleSheet::parse(&css);
    log::debug!("Excel stylesheet has {} classes", sheet.class_count());

    let table = find_first(&doc, "table")?;
    let cells = dense_cells(table, |node, _, spans| decode_cell(&sheet, node, spans));
    (!cells.is_empty()).then_some(cells)
}

fn decode_cell(sheet: &StyleSheet, node: &Element, spans: Spans) -> ClipboardCell {
    let decls = sheet.resolve("td", node.attribute("class"), node.attribute("style"));
    let mut attrs = declarations_to_attributes(&decls);
    let text = node.inner_text();
    let coerced = coerce_value(&text);

    let number_format = declaration(&decls, "mso-number-format")
        .and_then(excel_number_format)
        .or_else(|| coerced.number_format.clone());

    // Formulas are kept as written for the copied location
    let expression = if let Some(formula) = node.attribute("x:fmla") {
        formula.to_string()
    } else if let Some(raw) = node.attribute("x:num") {
        match raw.trim().parse::<f64>() {
            Ok(n) if !raw.trim().is_empty() => format_number(n),
            _ => coerced.expression,
        }
    } else if let Some(raw) = node.attribute("x:str") {
        if raw.is_empty() {
            text.clone()
        } else {
            raw.to_string()
        }
    } else {
        coerced.expression
    };

    if let Some(align) = node.attribute("align").map(str::to_ascii_lowercase) {
        if matches!(align.as_str(), "left" | "center" | "right") {
            attrs.entry(attributes::ALIGN.to_string()).or_insert(align);
        }
    }

    let is_text = node.attribute("x:str").is_some();
    if let Some(format) = number_format.filter(|_| !is_text) {
        attrs.insert(attributes::NUMBER_FORMAT.to_string(), format);
    }

    let mut cell = ClipboardCell {
        value: Some(text),
        expression,
        attributes: attrs,
        ..Default::default()
    };

    let overflow = declaration(&decls, "mso-ignore").map_or(false, |v| v.contains("colspan"));
    if !overflow {
        spans.apply(&mut cell);
    }
    cell
}

/// Map an `mso-number-format` value onto a stored number format
fn excel_number_format(raw: &str) -> Option<String> {
    let pattern = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .replace("\\0022", "\"")
        .replace('\\', "");
    let lower = pattern.to_ascii_lowercase();

    let format = match lower.as_str() {
        "general" | "" => return None,
        "@" => return Some(join_number_format("text", None)),
        "percent" => return Some(join_number_format("percent", None)),
        "fixed" | "standard" => return Some(join_number_format("number", Some(&pattern))),
        "short date" | "medium date" | "long date" => {
            return Some(join_number_format("date", None))
        }
        "short time" | "medium time" | "long time" => {
            return Some(join_number_format("time", None))
        }
        _ if pattern.contains('%') => "percent",
        _ if ['$', '€', '£', '¥'].iter().any(|s| pattern.contains(*s)) => "currency",
        _ if lower.contains("yy") || lower.contains("dd") => "date",
        _ if lower.contains("h:mm") => "time",
        _ if pattern.contains('0') || pattern.contains('#') => "number",
        _ => return None,
    };
    Some(join_number_format(format, Some(&pattern)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEAD: &str = "<html xmlns:v=\"urn:schemas-microsoft-com:vml\" \
        xmlns:x=\"urn:schemas-microsoft-com:office:excel\"><head>\
        <meta name=ProgId content=Excel.Sheet><meta name=Generator content=\"Microsoft Excel 15\">\
        <style><!--table {mso-displayed-decimal-separator:\"\\.\";}\n\
        .xl65 {font-weight:700; mso-number-format:\"\\@\";}\n\
        .xl66 {mso-number-format:Percent; text-align:center;}\n\
        .xl67 {mso-number-format:\"\\0022$\\0022\\#\\,\\#\\#0\\.00\";}\n\
        .xl68 {mso-ignore:colspan;}\n\
        --></style></head><body>";

    fn excel(body: &str) -> String {
        format!("{}{}</body></html>", HEAD, body)
    }

    #[test]
    fn test_detects_excel() {
        assert!(is_excel_document(&parse_fragment(&excel("<table></table>"))));
        assert!(!is_excel_document(&parse_fragment("<meta name=Generator content=Other><table></table>")));
    }

    #[test]
    fn test_merged_block_is_dense() {
        let html = excel(
            "<table><col width=64 span=2>\
             <tr><td colspan=2 rowspan=2 class=xl65>a</td></tr><tr></tr></table>",
        );
        let cells = parse_excel(&html).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].len(), 2);
        let root = cells[0][0].as_ref().unwrap();
        assert_eq!(root.expression, "a");
        assert_eq!((root.row_span, root.col_span), (Some(2), Some(2)));
        assert!(attributes::is_set(&root.attributes, attributes::BOLD));
        assert_eq!(cells[0][1], None);
        assert_eq!(cells[1][0], None);
        assert_eq!(cells[1][1], None);
    }

    #[test]
    fn test_overflow_is_not_a_merge() {
        let html = excel(
            "<table><tr><td colspan=2 class=xl68>long text</td><td>x</td></tr></table>",
        );
        let cells = parse_excel(&html).unwrap();
        assert_eq!(cells[0].len(), 3);
        assert_eq!(cells[0][0].as_ref().unwrap().row_span, None);
        assert_eq!(cells[0][1].as_ref().unwrap().expression, "");
        assert_eq!(cells[0][2].as_ref().unwrap().expression, "x");
    }

    #[test]
    fn test_raw_values_and_formats() {
        let html = excel(
            "<table><tr>\
             <td class=xl66 x:num=\"0.25\">25%</td>\
             <td class=xl67 x:num=\"1234.5\">$1,234.50</td>\
             <td class=xl65 x:str=\"007\">007</td>\
             <td x:num x:fmla=\"=SUM(A1:B1)\">1234.75</td>\
             </tr></table>",
        );
        let cells = parse_excel(&html).unwrap();
        let row: Vec<_> = cells[0].iter().map(|c| c.as_ref().unwrap()).collect();

        assert_eq!(row[0].expression, "0.25");
        assert_eq!(
            row[0].attributes.get(attributes::NUMBER_FORMAT).map(String::as_str),
            Some("percent")
        );
        assert_eq!(row[0].attributes.get(attributes::ALIGN).map(String::as_str), Some("center"));

        assert_eq!(row[1].expression, "1234.5");
        assert_eq!(
            row[1].attributes.get(attributes::NUMBER_FORMAT).map(String::as_str),
            Some("currency:\"$\"#,##0.00")
        );

        assert_eq!(row[2].expression, "007");
        assert_eq!(row[2].attributes.get(attributes::NUMBER_FORMAT), None);

        assert_eq!(row[3].expression, "=SUM(A1:B1)");
        assert_eq!(row[3].value.as_deref(), Some("1234.75"));
    }

    #[test]
    fn test_graphics_are_stripped() {
        let html = "<td><v:shapetype id=t75><v:path/></v:shapetype>\
                    <v:shape id=p1><v:imagedata src=x.png/></v:shape><img src=x.png>1</td>";
        assert_eq!(strip_graphics(html), "<td>1</td>");
        assert!(matches!(strip_graphics("<td>1</td>"), Cow::Borrowed(_)));
    }
}
