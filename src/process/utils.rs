use super::CellValue;

/// Trim whitespace + strip exactly one layer of outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Finite number under Rust's `f64::from_str` grammar, or `None`.
/// Empty input is never numeric; hex (`0x1A`) and separators (`1_000`) are
/// not accepted.
pub fn parse_finite(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decide whether a single field is a number or text.
///
/// The numeric check runs on the trimmed field *before* any quote stripping,
/// so `42` is a number while `"007"` (quotes still attached) stays the text
/// `007`. Output compatibility depends on this order.
pub fn coerce_value(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if let Some(v) = parse_finite(trimmed) {
        return CellValue::Number(v);
    }
    CellValue::Text(clean_str(trimmed))
}

/// Permissive number read used downstream of the parser: numbers pass
/// through, text has surrounding quotes stripped and is parsed.
pub fn cell_to_f64(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) if v.is_finite() => Some(*v),
        CellValue::Number(_) => None,
        CellValue::Text(s) => parse_finite(s.trim().trim_matches('"').trim()),
        CellValue::Missing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce_value("42"), CellValue::Number(42.0));
        assert_eq!(coerce_value("  -71.06 "), CellValue::Number(-71.06));
        assert_eq!(coerce_value("1e3"), CellValue::Number(1000.0));
        assert_eq!(coerce_value("007"), CellValue::Number(7.0));
    }

    #[test]
    fn test_rust_float_grammar() {
        // hex and digit separators are not float literals here
        assert_eq!(coerce_value("0x1A"), CellValue::Text("0x1A".into()));
        assert_eq!(coerce_value("1_000"), CellValue::Text("1_000".into()));
        assert_eq!(coerce_value("+.5"), CellValue::Number(0.5));
        assert_eq!(coerce_value("5."), CellValue::Number(5.0));
    }

    #[test]
    fn test_empty_is_text_not_zero() {
        assert_eq!(coerce_value(""), CellValue::Text(String::new()));
        assert_eq!(coerce_value("   "), CellValue::Text(String::new()));
    }

    #[test]
    fn test_non_finite_is_text() {
        assert_eq!(coerce_value("inf"), CellValue::Text("inf".into()));
        assert_eq!(coerce_value("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn test_quote_strip_after_numeric_check() {
        assert_eq!(coerce_value("\"007\""), CellValue::Text("007".into()));
        assert_eq!(coerce_value(" \"Boston\" "), CellValue::Text("Boston".into()));
        // only one layer comes off
        assert_eq!(coerce_value("\"\"x\"\""), CellValue::Text("\"x\"".into()));
        // a lone quote is not a pair
        assert_eq!(coerce_value("\""), CellValue::Text("\"".into()));
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(coerce_value("Austin, TX"), CellValue::Text("Austin, TX".into()));
    }

    #[test]
    fn test_cell_to_f64() {
        assert_eq!(cell_to_f64(&CellValue::Number(1.5)), Some(1.5));
        assert_eq!(cell_to_f64(&CellValue::Text("\"71.5\"".into())), Some(71.5));
        assert_eq!(cell_to_f64(&CellValue::Text("".into())), None);
        assert_eq!(cell_to_f64(&CellValue::Text("abc".into())), None);
        assert_eq!(cell_to_f64(&CellValue::Missing), None);
    }
}
