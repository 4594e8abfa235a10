//! Typed value detection for pasted cell text
//!
//! Rendered cell text from another application is turned back into the input a user
//! would have typed, plus the number format that reproduces the rendering.

use cellgrid_core::attributes::join_number_format;
use cellgrid_core::format_number;
use chrono::NaiveDate;

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹'];

/// chrono pattern and the display pattern stored as the date subformat
const DATE_FORMATS: &[(&str, &str)] = &[
    ("%Y-%m-%d", "yyyy-mm-dd"),
    ("%m/%d/%Y", "mm/dd/yyyy"),
    ("%Y/%m/%d", "yyyy/mm/dd"),
    ("%d.%m.%Y", "dd.mm.yyyy"),
];

/// Input text and number format recovered from rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercedValue {
    pub expression: String,
    pub number_format: Option<String>,
}

impl CoercedValue {
    fn text(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            number_format: None,
        }
    }

    fn formatted(expression: String, format: &str, subformat: Option<&str>) -> Self {
        Self {
            expression,
            number_format: Some(join_number_format(format, subformat)),
        }
    }
}

/// Detect numbers, money, percentages and dates in rendered text.
///
/// Commas are thousands separators, except in money, where a comma that is not followed
/// by a later `.` is the decimal separator (`€1,50`). Text with a leading zero (`007`)
/// stays text. Anything unrecognized is returned unchanged.
pub fn coerce_value(text: &str) -> CoercedValue {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('=') {
        return CoercedValue::text(trimmed);
    }

    if let Some(date) = parse_date(trimmed) {
        return date;
    }

    let (negative, body) = match trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };

    let currency = body.chars().find(|c| CURRENCY_SYMBOLS.contains(c));
    let percent = body.ends_with('%');

    let digits: String = body
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != '%' && !c.is_whitespace())
        .collect();

    let Some(number) = parse_number(&digits, currency.is_some()) else {
        return CoercedValue::text(trimmed);
    };

    if currency.is_none() && !percent && has_leading_zero(&digits) {
        return CoercedValue::text(trimmed);
    }

    let number = if negative { -number } else { number };

    match (currency, percent) {
        (Some(symbol), _) => {
            let symbol = symbol.to_string();
            CoercedValue::formatted(format_number(number), "currency", Some(&symbol))
        }
        (None, true) => CoercedValue::formatted(format_number(number / 100.0), "percent", None),
        (None, false) if digits.contains(',') || negative => {
            CoercedValue::formatted(format_number(number), "number", None)
        }
        (None, false) => CoercedValue::text(&format_number(number)),
    }
}

fn parse_number(digits: &str, money: bool) -> Option<f64> {
    if digits.is_empty() || !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let comma_is_decimal = money
        && digits
            .rfind(',')
            .map_or(false, |comma| digits.rfind('.').map_or(true, |dot| comma > dot));

    let normalized: String = if comma_is_decimal {
        digits.replace('.', "").replace(',', ".")
    } else {
        digits.replace(',', "")
    };

    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn has_leading_zero(digits: &str) -> bool {
    let unsigned = digits.trim_start_matches(['-', '+']);
    unsigned.len() > 1 && unsigned.starts_with('0') && unsigned.as_bytes()[1].is_ascii_digit()
}

fn parse_date(text: &str) -> Option<CoercedValue> {
    DATE_FORMATS.iter().find_map(|(pattern, display)| {
        let date = NaiveDate::parse_from_str(text, pattern).ok()?;
        let iso = date.format("%Y-%m-%d").to_string();
        Some(CoercedValue::formatted(iso, "date", Some(*display)))
    })
}
