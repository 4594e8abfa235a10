//! R1C1 to A1 formula translation
//!
//! Some spreadsheet clipboards carry formulas in R1C1 notation. Per axis, `R[n]`/`C[n]`
//! is an offset from the cell the formula lands in, `Rn`/`Cn` is an absolute 1-based
//! index and a bare `R`/`C` means the landing cell's own row or column.

use cellgrid_core::{format_address, CellAddress, REF_ERROR};
use lazy_regex::regex;

/// Translate every R1C1 reference in `formula`, resolved against the cell at `at`.
///
/// A malformed reference, or one resolving above or left of the sheet, turns the whole
/// formula into `#REF!`.
///
/// ```
/// use cellgrid_clipboard::translate_r1c1;
/// use cellgrid_core::CellAddress;
///
/// let at = CellAddress::new(2, 4); // C5
/// assert_eq!(translate_r1c1("=R[-1]C*2+R1C1", at), "=C4*2+$A$1");
/// assert_eq!(translate_r1c1("=R[x]C1", at), "#REF!");
/// ```
pub fn translate_r1c1(formula: &str, at: CellAddress) -> String {
    match try_translate_r1c1(formula, at) {
        Some(translated) => translated,
        None => {
            log::warn!("Untranslatable R1C1 formula '{}' at {}", formula, at);
            REF_ERROR.to_string()
        }
    }
}

/// [`translate_r1c1`] reporting failure as `None`
pub fn try_translate_r1c1(formula: &str, at: CellAddress) -> Option<String> {
    let mut out = String::with_capacity(formula.len());

    // Odd segments sit inside string literals
    for (i, segment) in formula.split('"').enumerate() {
        if i > 0 {
            out.push('"');
        }
        if i % 2 == 1 {
            out.push_str(segment);
        } else {
            out.push_str(&translate_segment(segment, at)?);
        }
    }

    Some(out)
}

fn translate_segment(segment: &str, at: CellAddress) -> Option<String> {
    let pattern = regex!(r"(?i)R(\[[^\]]*\]|[0-9]+)?C(\[[^\]]*\]|[0-9]+)?");
    let mut out = String::with_capacity(segment.len());
    let mut last = 0;

    for caps in pattern.captures_iter(segment) {
        let Some(whole) = caps.get(0) else { continue };
        if !is_standalone(segment, whole.start(), whole.end()) {
            continue;
        }

        let (row, row_absolute) = resolve_axis(caps.get(1).map(|m| m.as_str()), at.row)?;
        let (col, col_absolute) = resolve_axis(caps.get(2).map(|m| m.as_str()), at.col)?;

        out.push_str(&segment[last..whole.start()]);
        out.push_str(&format_address(col, row, col_absolute, row_absolute));
        last = whole.end();
    }

    out.push_str(&segment[last..]);
    Some(out)
}

/// Resolve one axis part to a 0-based index and whether it was absolute
fn resolve_axis(part: Option<&str>, position: u32) -> Option<(u32, bool)> {
    let Some(part) = part else {
        return Some((position, false));
    };

    if let Some(inner) = part.strip_prefix('[').and_then(|p| p.strip_suffix(']')) {
        let offset: i64 = inner.trim().parse().ok()?;
        let index = position as i64 + offset;
        return u32::try_from(index).ok().map(|i| (i, false));
    }

    let value: u32 = part.parse().ok()?;
    value.checked_sub(1).map(|i| (i, true))
}

/// Not glued to an identifier on either side and not a function name
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let glued_before = before.map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    let glued_after = after.map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '(');
    !glued_before && !glued_after
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(a1: &str) -> CellAddress {
        a1.parse().unwrap()
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(translate_r1c1("=R[0]C[-1]", at("B2")), "=A2");
        assert_eq!(translate_r1c1("=R[1]C[1]+RC", at("B2")), "=C3+B2");
        assert_eq!(translate_r1c1("=SUM(R[-1]C:R[-1]C[2])", at("A3")), "=SUM(A2:C2)");
    }

    #[test]
    fn test_absolute_axes() {
        assert_eq!(translate_r1c1("=R1C1", at("Z99")), "=$A$1");
        assert_eq!(translate_r1c1("=R2C[0]", at("C5")), "=C$2");
        assert_eq!(translate_r1c1("=RC3", at("A7")), "=$C7");
    }

    #[test]
    fn test_names_and_strings_untouched() {
        assert_eq!(
            translate_r1c1("=ROUND(RC[-1],2)&\"RC\"", at("B1")),
            "=ROUND(A1,2)&\"RC\""
        );
        assert_eq!(translate_r1c1("=ARC+RCOUNT", at("B1")), "=ARC+RCOUNT");
    }

    #[test]
    fn test_malformed_reference_fails_whole_formula() {
        assert_eq!(translate_r1c1("=A1+R[oops]C", at("B2")), REF_ERROR);
        assert_eq!(translate_r1c1("=R[-5]C", at("A2")), REF_ERROR);
        assert_eq!(translate_r1c1("=R0C1", at("A2")), REF_ERROR);
        assert_eq!(try_translate_r1c1("=R[-1]C", at("A1")), None);
    }
}
