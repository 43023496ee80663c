/*
 * scalar.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Canonical text for scalar values.

use super::symbol::{format_symbol, is_symbol};
use chrono::{Datelike, NaiveDate};

/// Render a string scalar: a symbol when it looks like one, otherwise an
/// escaped, double-quoted string literal.
///
/// ```rust
/// use yaml_sexpr::encode_string;
///
/// assert_eq!(encode_string("KS"), "'KS");
/// assert_eq!(encode_string("Dorothy Gale"), "\"Dorothy Gale\"");
/// assert_eq!(encode_string(""), "\"\"");
/// ```
pub fn encode_string(s: &str) -> String {
    if is_symbol(s) {
        format_symbol(s)
    } else {
        format!("\"{}\"", escape_string(s))
    }
}

/// Escape a string for use inside a double-quoted literal.
///
/// `"` and `\` are backslash-escaped, newline, tab and carriage return use
/// their short escapes, and every other control character (0x00-0x1F, 0x7F)
/// becomes `\x` plus two lowercase hex digits. Everything else passes through.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Render a float.
///
/// Finite values use the shortest representation that reads back to the
/// same double, always with a fractional digit (`1.0`, `9.99`, `1.0e16`).
/// Infinities and NaN become `+inf.0`, `-inf.0` and `+nan.0`.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "+nan.0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+inf.0" } else { "-inf.0" }.to_string();
    }

    let mut buffer = ryu::Buffer::new();
    let text = buffer.format_finite(f);
    match text.find('e') {
        Some(pos) if !text[..pos].contains('.') => {
            format!("{}.0{}", &text[..pos], &text[pos..])
        }
        _ => text.to_string(),
    }
}

/// Render a date as `(make-date <year> <MM> <DD>)`.
pub fn format_date(date: &NaiveDate) -> String {
    format!(
        "(make-date {} {:02} {:02})",
        date.year(),
        date.month(),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_symbol_or_string() {
        assert_eq!(encode_string("KS"), "'KS");
        assert_eq!(encode_string("P001"), "'P001");
        assert_eq!(encode_string("Dorothy"), "'Dorothy");
        assert_eq!(encode_string("Dorothy Gale"), "\"Dorothy Gale\"");
        assert_eq!(encode_string(""), "\"\"");
        assert_eq!(encode_string("42"), "\"42\"");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(escape_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_string(r"C:\path"), r"C:\\path");
        assert_eq!(escape_string("a\nb\tc\rd"), r"a\nb\tc\rd");
        assert_eq!(escape_string("\u{0}\u{1b}\u{7f}"), r"\x00\x1b\x7f");
        assert_eq!(escape_string("\u{1f}"), r"\x1f");
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(escape_string("café ☕ 日本"), "café ☕ 日本");
        assert_eq!(encode_string("naïve"), "\"naïve\"");
        // C1 controls are not escaped
        assert_eq!(escape_string("\u{85}"), "\u{85}");
    }

    #[test]
    fn test_long_identifier_is_escaped_string() {
        assert_eq!(
            encode_string("a_very_long_identifier_x"),
            "\"a_very_long_identifier_x\""
        );
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(9.99), "9.99");
        assert_eq!(format_float(14.99), "14.99");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e300), "1.0e300");
        assert_eq!(format_float(1.5e300), "1.5e300");
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(format_float(f64::INFINITY), "+inf.0");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf.0");
        assert_eq!(format_float(f64::NAN), "+nan.0");
        assert_eq!(format_float(-f64::NAN), "+nan.0");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2012, 8, 6).unwrap();
        assert_eq!(format_date(&date), "(make-date 2012 08 06)");

        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(format_date(&date), "(make-date 1999 12 31)");

        let date = NaiveDate::from_ymd_opt(812, 1, 1).unwrap();
        assert_eq!(format_date(&date), "(make-date 812 01 01)");
    }
}
