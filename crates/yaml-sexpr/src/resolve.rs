/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Scalar type resolution.
//!
//! Plain scalars are typed with YAML 1.1 rules, so `yes` is a boolean,
//! `0x1F` an integer and `2012-08-06` a date. Explicit core tags (`!!str`, `!!int`, ...) force a
//! type instead.

use crate::value::{Tagged, Value};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical prefix of the YAML core tags once the `!!` handle is expanded.
pub(crate) const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

static INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
    )
    .unwrap()
});

// A float needs a dot; an exponent needs an explicit sign.
static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*)$",
    )
    .unwrap()
});

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)?$",
    )
    .unwrap()
});

static DATE_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Resolve an untagged plain scalar to a typed value.
pub(crate) fn resolve_plain(value: &str) -> Value {
    if is_null(value) {
        return Value::Null;
    }
    if let Some(b) = parse_bool(value) {
        return Value::Boolean(b);
    }
    if let Some(v) = parse_int(value) {
        return v;
    }
    if let Some(f) = parse_float(value) {
        return Value::Float(f);
    }
    if let Some(d) = parse_timestamp(value) {
        return Value::Date(d);
    }
    Value::String(value.to_string())
}

/// Resolve a scalar carrying an explicit tag.
///
/// `tag` is the full tag (handle expanded). Returns an error message when the
/// scalar cannot be read as the requested core type.
pub(crate) fn resolve_tagged(value: &str, tag: &str) -> Result<Value, String> {
    let Some(suffix) = tag.strip_prefix(CORE_TAG_PREFIX) else {
        // "!" is the non-specific tag and forces a string
        if tag == "!" {
            return Ok(Value::String(value.to_string()));
        }
        return Ok(Value::Tagged(Tagged {
            tag: tag.to_string(),
            value: Box::new(Value::String(value.to_string())),
        }));
    };

    let invalid = || format!("cannot read {:?} as !!{}", value, suffix);
    match suffix {
        "str" => Ok(Value::String(value.to_string())),
        "null" => Ok(Value::Null),
        "bool" => parse_bool(value).map(Value::Boolean).ok_or_else(invalid),
        "int" => parse_int(value).ok_or_else(invalid),
        "float" => parse_float(value)
            .or_else(|| match parse_int(value) {
                Some(Value::Integer(i)) => Some(i as f64),
                Some(Value::Float(f)) => Some(f),
                _ => None,
            })
            // an explicit tag also accepts exponents without dot or sign
            .or_else(|| value.replace('_', "").parse::<f64>().ok())
            .map(Value::Float)
            .ok_or_else(invalid),
        "timestamp" => parse_timestamp(value).map(Value::Date).ok_or_else(invalid),
        _ => Ok(Value::Tagged(Tagged {
            tag: format!("!!{}", suffix),
            value: Box::new(Value::String(value.to_string())),
        })),
    }
}

fn is_null(value: &str) -> bool {
    matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

/// Parse a YAML 1.1 integer: decimal, `0x` hex, `0b` binary, leading-zero
/// octal or base 60 (`190:20:30`), with optional sign and `_` separators.
///
/// Integers that overflow `i64` are returned as floats.
fn parse_int(value: &str) -> Option<Value> {
    if !INT.is_match(value) {
        return None;
    }
    let cleaned: String = value.chars().filter(|&c| c != '_').collect();
    let (negative, body) = split_sign(&cleaned);

    if body.contains(':') {
        return Some(sexagesimal_int(negative, body));
    }

    let (radix, digits) = if let Some(rest) = body.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = body.strip_prefix("0x") {
        (16, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };
    if digits.is_empty() {
        return None;
    }

    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };
    match i64::from_str_radix(&signed, radix) {
        Ok(i) => Some(Value::Integer(i)),
        Err(_) if radix == 10 => signed.parse::<f64>().ok().map(Value::Float),
        Err(_) => {
            let magnitude = digits.chars().try_fold(0.0_f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            })?;
            Some(Value::Float(if negative { -magnitude } else { magnitude }))
        }
    }
}

fn sexagesimal_int(negative: bool, body: &str) -> Value {
    let exact = body.split(':').try_fold(0_i64, |acc, part| {
        let part: i64 = part.parse().ok()?;
        acc.checked_mul(60)?.checked_add(part)
    });
    match exact {
        Some(i) if negative => Value::Integer(-i),
        Some(i) => Value::Integer(i),
        None => Value::Float(sexagesimal_float(negative, body).unwrap_or(f64::NAN)),
    }
}

fn sexagesimal_float(negative: bool, body: &str) -> Option<f64> {
    let magnitude = body
        .split(':')
        .try_fold(0.0_f64, |acc, part| part.parse::<f64>().ok().map(|p| acc * 60.0 + p))?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(value: &str) -> (bool, &str) {
    match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    }
}

fn parse_float(value: &str) -> Option<f64> {
    match value {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    if !FLOAT.is_match(value) {
        return None;
    }
    let cleaned: String = value.chars().filter(|&c| c != '_').collect();
    if cleaned.contains(':') {
        let (negative, body) = split_sign(&cleaned);
        return sexagesimal_float(negative, body);
    }
    cleaned.parse::<f64>().ok()
}

/// Parse a YAML timestamp, keeping only its calendar date.
///
/// Returns `None` for strings that look like timestamps but name an
/// impossible date (e.g. `2012-02-30`); those stay strings.
fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let caps = TIMESTAMP.captures(value)?;
    // A bare date needs two-digit month and day
    if !value.contains(':') && !DATE_ONLY.is_match(value) {
        return None;
    }
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_null() {
        assert_eq!(resolve_plain(""), Value::Null);
        assert_eq!(resolve_plain("~"), Value::Null);
        assert_eq!(resolve_plain("null"), Value::Null);
        assert_eq!(resolve_plain("NULL"), Value::Null);
        assert_eq!(resolve_plain("nil"), Value::String("nil".into()));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(resolve_plain("true"), Value::Boolean(true));
        assert_eq!(resolve_plain("Yes"), Value::Boolean(true));
        assert_eq!(resolve_plain("ON"), Value::Boolean(true));
        assert_eq!(resolve_plain("no"), Value::Boolean(false));
        assert_eq!(resolve_plain("Off"), Value::Boolean(false));
        assert_eq!(resolve_plain("tRUE"), Value::String("tRUE".into()));
    }

    #[test]
    fn test_integers() {
        assert_eq!(resolve_plain("4"), Value::Integer(4));
        assert_eq!(resolve_plain("-17"), Value::Integer(-17));
        assert_eq!(resolve_plain("+3"), Value::Integer(3));
        assert_eq!(resolve_plain("0"), Value::Integer(0));
        assert_eq!(resolve_plain("1_000"), Value::Integer(1000));
        assert_eq!(resolve_plain("0x1F"), Value::Integer(31));
        assert_eq!(resolve_plain("0b101"), Value::Integer(5));
        assert_eq!(resolve_plain("-0x_1f"), Value::Integer(-31));
        assert_eq!(resolve_plain("017"), Value::Integer(15));
        assert_eq!(resolve_plain("08"), Value::String("08".into()));
        assert_eq!(resolve_plain("0o17"), Value::String("0o17".into()));
    }

    #[test]
    fn test_sexagesimal() {
        assert_eq!(resolve_plain("190:20:30"), Value::Integer(685_230));
        assert_eq!(resolve_plain("-1:30"), Value::Integer(-90));
        assert_eq!(resolve_plain("1:30.5"), Value::Float(90.5));
        assert_eq!(resolve_plain("1:60"), Value::String("1:60".into()));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(
            resolve_plain("123456789012345678901234567890"),
            Value::Float(123456789012345678901234567890.0)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(resolve_plain("9.99"), Value::Float(9.99));
        assert_eq!(resolve_plain("-0.5"), Value::Float(-0.5));
        assert_eq!(resolve_plain("1."), Value::Float(1.0));
        assert_eq!(resolve_plain(".5"), Value::Float(0.5));
        assert_eq!(resolve_plain("6.02e+23"), Value::Float(6.02e23));
        assert_eq!(resolve_plain("1.0e+3"), Value::Float(1000.0));
        assert_eq!(resolve_plain("1_000.5"), Value::Float(1000.5));
        assert_eq!(resolve_plain(".inf"), Value::Float(f64::INFINITY));
        assert_eq!(resolve_plain("-.INF"), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(resolve_plain(".NaN"), Value::Float(f) if f.is_nan()));
        assert_eq!(resolve_plain("."), Value::String(".".into()));
        assert_eq!(resolve_plain("inf"), Value::String("inf".into()));
        assert_eq!(resolve_plain("1.2.3"), Value::String("1.2.3".into()));
    }

    #[test]
    fn test_exponent_needs_dot_and_sign() {
        assert_eq!(resolve_plain("1e3"), Value::String("1e3".into()));
        assert_eq!(resolve_plain("1.0e3"), Value::String("1.0e3".into()));
        assert_eq!(resolve_plain("1e400"), Value::String("1e400".into()));
        assert_eq!(resolve_plain("1.0e-3"), Value::Float(0.001));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(resolve_plain("2012-08-06"), date(2012, 8, 6));
        assert_eq!(resolve_plain("2001-12-14t21:59:43.10-05:00"), date(2001, 12, 14));
        assert_eq!(resolve_plain("2001-12-14 21:59:43.10 -5"), date(2001, 12, 14));
        assert_eq!(resolve_plain("2001-12-15T02:59:43.1Z"), date(2001, 12, 15));
        assert_eq!(resolve_plain("2012-8-6"), Value::String("2012-8-6".into()));
        assert_eq!(resolve_plain("2012-02-30"), Value::String("2012-02-30".into()));
    }

    #[test]
    fn test_strings() {
        assert_eq!(resolve_plain("Dorothy"), Value::String("Dorothy".into()));
        assert_eq!(resolve_plain("P001"), Value::String("P001".into()));
        assert_eq!(resolve_plain("1-800"), Value::String("1-800".into()));
    }

    #[test]
    fn test_core_tags() {
        let str_tag = format!("{}str", CORE_TAG_PREFIX);
        assert_eq!(resolve_tagged("42", &str_tag), Ok(Value::String("42".into())));

        let int_tag = format!("{}int", CORE_TAG_PREFIX);
        assert_eq!(resolve_tagged("42", &int_tag), Ok(Value::Integer(42)));
        assert!(resolve_tagged("abc", &int_tag).is_err());

        let float_tag = format!("{}float", CORE_TAG_PREFIX);
        assert_eq!(resolve_tagged("3", &float_tag), Ok(Value::Float(3.0)));
        assert_eq!(resolve_tagged("1e3", &float_tag), Ok(Value::Float(1000.0)));
    }

    #[test]
    fn test_custom_tags_are_kept() {
        assert_eq!(
            resolve_tagged("red", "!color"),
            Ok(Value::Tagged(Tagged {
                tag: "!color".into(),
                value: Box::new(Value::String("red".into())),
            }))
        );
        assert_eq!(resolve_tagged("red", "!"), Ok(Value::String("red".into())));

        let binary = format!("{}binary", CORE_TAG_PREFIX);
        assert!(matches!(
            resolve_tagged("R0lG", &binary),
            Ok(Value::Tagged(Tagged { ref tag, .. })) if tag == "!!binary"
        ));
    }
}
