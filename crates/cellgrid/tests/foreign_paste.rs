//! Pasting clipboard content written by other applications

use cellgrid::{attributes, validate_merges};
use cellgrid::prelude::*;
use pretty_assertions::assert_eq;

fn shape(parsed: &ParsedClipboard) -> Vec<Vec<Option<String>>> {
    parsed
        .cells
        .iter()
        .map(|row| row.iter().map(|c| c.as_ref().map(|c| c.expression.clone())).collect())
        .collect()
}

fn number_format(parsed: &ParsedClipboard, row: usize, col: usize) -> Option<&str> {
    parsed
        .cell(row, col)?
        .attributes
        .get(attributes::NUMBER_FORMAT)
        .map(String::as_str)
}

const EXCEL_MERGED: &str = r##"<html xmlns:v="urn:schemas-microsoft-com:vml"
xmlns:o="urn:schemas-microsoft-com:office:office"
xmlns:x="urn:schemas-microsoft-com:office:excel"
xmlns="http://www.w3.org/TR/REC-html40">
<head>
<meta http-equiv=Content-Type content="text/html; charset=utf-8">
<meta name=ProgId content=Excel.Sheet>
<meta name=Generator content="Microsoft Excel 15">
<style>
<!--table
	{mso-displayed-decimal-separator:"\.";
	mso-displayed-thousand-separator:"\,";}
.xl65
	{text-align:center;
	vertical-align:middle;
	border:.5pt solid windowtext;}
-->
</style>
</head>
<body link="#0563C1" vlink="#954F72">
<table border=0 cellpadding=0 cellspacing=0 width=128 style='border-collapse:
 collapse;width:96pt'>
<!--StartFragment-->
 <col width=64 span=2 style='width:48pt'>
 <tr height=20 style='height:15.0pt'>
  <td colspan=2 rowspan=2 height=40 class=xl65 width=128 style='height:30.0pt;
  width:96pt'>Merged</td>
 </tr>
 <tr height=20 style='height:15.0pt'>
 </tr>
<!--EndFragment-->
</table>
</body>
</html>"##;

/// A 2x2 Excel merge becomes a dense 2x2 block with three covered slots
#[test]
fn test_excel_merged_block() {
    let parsed = parse_clipboard(Some(EXCEL_MERGED), Some("Merged\t\n\t\n"), &PasteOptions::default());

    assert_eq!(parsed.source, ClipboardSource::Excel);
    assert_eq!(
        shape(&parsed),
        vec![vec![Some("Merged".to_string()), None], vec![None, None]]
    );

    let root = parsed.cell(0, 0).unwrap();
    assert_eq!((root.row_span, root.col_span), (Some(2), Some(2)));
    assert_eq!(root.attributes.get(attributes::ALIGN).map(String::as_str), Some("center"));
    assert_eq!(
        root.attributes.get(attributes::VERTICAL_ALIGN).map(String::as_str),
        Some("middle")
    );
    for border in attributes::BORDERS {
        assert!(attributes::is_set(&root.attributes, border), "{}", border);
    }

    let mut grid = Grid::new(3, 3);
    grid.paste(&parsed, CellAddress::new(1, 1)).unwrap();
    assert!(validate_merges(&grid).is_ok());
    assert_eq!(grid.cell(2, 2).unwrap().merged_into, Some(CellAddress::new(1, 1)));
}

const EXCEL_VALUES: &str = r##"<html xmlns:x="urn:schemas-microsoft-com:office:excel">
<head><meta name=ProgId content=Excel.Sheet>
<style><!--
.xl66 {mso-number-format:"Short Date";}
.xl67 {mso-number-format:0%;}
.xl68 {font-weight:700;}
--></style></head><body><table>
 <tr>
  <td class=xl68>Item</td>
  <td class=xl66 align=right x:num="45292">1/1/2024</td>
  <td class=xl67 align=right x:num="0.125">13%</td>
 </tr>
 <tr>
  <td>Widget<img src="file:///C:/clip_image001.png"></td>
  <td x:str="007">007</td>
  <td align=right x:num="6" x:fmla="=B2*2">6</td>
 </tr>
</table></body></html>"##;

#[test]
fn test_excel_values_and_formulas() {
    let parsed = parse_clipboard(Some(EXCEL_VALUES), None, &PasteOptions::at(CellAddress::new(4, 9)));

    assert_eq!(parsed.source, ClipboardSource::Excel);
    assert_eq!(
        shape(&parsed),
        vec![
            vec![Some("Item".into()), Some("45292".into()), Some("0.125".into())],
            vec![Some("Widget".into()), Some("007".into()), Some("=B2*2".into())],
        ]
    );
    assert!(attributes::is_set(&parsed.cell(0, 0).unwrap().attributes, attributes::BOLD));
    assert_eq!(number_format(&parsed, 0, 1), Some("date"));
    assert_eq!(number_format(&parsed, 0, 2), Some("percent:0%"));
    assert_eq!(number_format(&parsed, 1, 1), None);
    assert_eq!(
        parsed.cell(1, 2).unwrap().attributes.get(attributes::ALIGN).map(String::as_str),
        Some("right")
    );
}

const GOOGLE_SHEETS: &str = r##"<meta charset="utf-8"><google-sheets-html-origin><style type="text/css"><!--td {border: 1px solid #cccccc;}br {mso-data-placement:same-cell;}--></style><table xmlns="http://www.w3.org/1999/xhtml" cellspacing="0" cellpadding="0" dir="ltr" border="1" style="table-layout:fixed;font-size:10pt;font-family:Arial;width:0px;border-collapse:collapse;border:none"><colgroup><col width="100"/><col width="100"/></colgroup><tbody><tr style="height:21px;"><td style="overflow:hidden;padding:2px 3px 2px 3px;vertical-align:bottom;font-weight:bold;" data-sheets-value="{&quot;1&quot;:2,&quot;2&quot;:&quot;Price&quot;}">Price</td><td style="overflow:hidden;padding:2px 3px 2px 3px;vertical-align:bottom;" data-sheets-value="{&quot;1&quot;:2,&quot;2&quot;:&quot;Double&quot;}">Double</td></tr><tr style="height:21px;"><td style="overflow:hidden;padding:2px 3px 2px 3px;vertical-align:bottom;text-align:right;" data-sheets-value="{&quot;1&quot;:3,&quot;3&quot;:1.5}" data-sheets-numberformat="{&quot;1&quot;:4,&quot;2&quot;:&quot;\&quot;$\&quot;#,##0.00&quot;,&quot;3&quot;:1}">$1.50</td><td style="overflow:hidden;padding:2px 3px 2px 3px;vertical-align:bottom;text-align:right;" data-sheets-value="{&quot;1&quot;:3,&quot;3&quot;:3}" data-sheets-formula="=R[0]C[-1]*2">3</td></tr></tbody></table></google-sheets-html-origin>"##;

#[test]
fn test_google_sheets_formulas_land_relative_to_paste() {
    let parsed = parse_clipboard(Some(GOOGLE_SHEETS), None, &PasteOptions::at("E10".parse().unwrap()));

    assert_eq!(parsed.source, ClipboardSource::Html);
    assert_eq!(
        shape(&parsed),
        vec![
            vec![Some("Price".into()), Some("Double".into())],
            vec![Some("1.5".into()), Some("=E11*2".into())],
        ]
    );
    assert!(attributes::is_set(&parsed.cell(0, 0).unwrap().attributes, attributes::BOLD));
    assert_eq!(number_format(&parsed, 1, 0), Some("currency:\"$\"#,##0.00"));
    assert_eq!(
        parsed.cell(1, 0).unwrap().attributes.get(attributes::ALIGN).map(String::as_str),
        Some("right")
    );
}

#[test]
fn test_broken_r1c1_only_affects_its_cell() {
    let html = r##"<google-sheets-html-origin><table><tr>
        <td data-sheets-formula="=R[-5]C[0]">1</td>
        <td data-sheets-formula="=SUM(R[0]C[-1]:R[0]C[-1])">2</td>
    </tr></table></google-sheets-html-origin>"##;
    let parsed = parse_clipboard(Some(html), None, &PasteOptions::at("B2".parse().unwrap()));
    assert_eq!(
        shape(&parsed),
        vec![vec![Some("#REF!".into()), Some("=SUM(B2:B2)".into())]]
    );
}

/// LibreOffice and web pages: plain tables with rendered values only
#[test]
fn test_generic_html_table() {
    let html = "<html><body><table>\
        <thead><tr><th>Name</th><th>Share</th></tr></thead>\
        <tbody><tr><td>Ann</td><td>12.5%</td></tr>\
        <tr><td>Bo &amp; Co</td><td>(1,200)</td></tr></tbody></table></body></html>";
    let parsed = parse_clipboard(Some(html), None, &PasteOptions::default());

    assert_eq!(parsed.source, ClipboardSource::Html);
    assert_eq!(
        shape(&parsed),
        vec![
            vec![Some("Name".into()), Some("Share".into())],
            vec![Some("Ann".into()), Some("0.125".into())],
            vec![Some("Bo & Co".into()), Some("-1200".into())],
        ]
    );
    assert_eq!(number_format(&parsed, 1, 1), Some("percent"));
}

#[test]
fn test_word_paragraphs() {
    let html = "<html><body><p class=MsoNormal>First line<o:p></o:p></p>\
                <p class=MsoNormal>Second&nbsp;line<o:p></o:p></p></body></html>";
    let parsed = parse_clipboard(Some(html), Some("First line\r\nSecond line"), &PasteOptions::default());

    assert_eq!(parsed.source, ClipboardSource::Paragraphs);
    assert_eq!(
        shape(&parsed),
        vec![vec![Some("First line".into())], vec![Some("Second line".into())]]
    );
}

#[test]
fn test_empty_clipboard_is_a_no_op() {
    let parsed = parse_clipboard(None, None, &PasteOptions::default());
    assert_eq!(parsed.source, ClipboardSource::Empty);

    let mut grid = Grid::from_expressions(&[&["keep"]]);
    let updates = grid.paste(&parsed, CellAddress::new(0, 0)).unwrap();
    assert!(updates.value_updates.is_empty());
    assert_eq!(grid.cell(0, 0).unwrap().expression, "keep");
}
