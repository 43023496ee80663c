/*
 * symbol.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Heuristic detection of strings that render as quoted symbols.
//!
//! A string is a symbol when it is 1 to [`MAX_SYMBOL_LEN`] characters long
//! and matches any of:
//!
//! - a part number: one letter followed by 4 to 6 digits (`A1234`)
//! - a code: 2 or 3 uppercase letters (`KS`, `USA`)
//! - a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`
//!
//! The patterns overlap and the identifier pattern subsumes the other two.
//! They are combined with a plain OR; no pattern takes precedence.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Longest string, in characters, that can still become a symbol.
pub const MAX_SYMBOL_LEN: usize = 20;

static SYMBOL_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // part number
        r"^[A-Za-z][0-9]{4,6}$",
        // code
        r"^[A-Z]{2,3}$",
        // identifier
        r"^[A-Za-z_][A-Za-z0-9_]*$",
    ])
    .unwrap()
});

/// Check whether a string renders as a symbol instead of a string literal.
///
/// ```rust
/// use yaml_sexpr::is_symbol;
///
/// assert!(is_symbol("KS"));
/// assert!(is_symbol("P001"));
/// assert!(!is_symbol(""));
/// assert!(!is_symbol("Dorothy Gale"));
/// ```
pub fn is_symbol(s: &str) -> bool {
    let len = s.chars().count();
    if len == 0 || len > MAX_SYMBOL_LEN {
        return false;
    }
    SYMBOL_PATTERNS.is_match(s)
}

/// Render a symbol token: the string with a leading quote, unescaped.
pub fn format_symbol(s: &str) -> String {
    format!("'{}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_numbers() {
        assert!(is_symbol("A1234"));
        assert!(is_symbol("A123456"));
        assert!(is_symbol("z98765"));
    }

    #[test]
    fn test_codes() {
        assert!(is_symbol("KS"));
        assert!(is_symbol("USA"));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_symbol("x"));
        assert!(is_symbol("_private"));
        assert!(is_symbol("snake_case_name"));
        assert!(is_symbol("Dorothy"));
        assert!(is_symbol("P001"));
    }

    #[test]
    fn test_overlapping_patterns_still_match() {
        // Fails the part-number and code patterns, passes as an identifier
        assert!(is_symbol("AB12"));
        // Too many digits for a part number, still an identifier
        assert!(is_symbol("A1234567"));
        // Four uppercase letters is not a code but is an identifier
        assert!(is_symbol("ABCD"));
    }

    #[test]
    fn test_non_symbols() {
        assert!(!is_symbol(""));
        assert!(!is_symbol("1234"));
        assert!(!is_symbol("9lives"));
        assert!(!is_symbol("two words"));
        assert!(!is_symbol("kebab-case"));
        assert!(!is_symbol("dotted.name"));
        assert!(!is_symbol("trailing\n"));
        assert!(!is_symbol("café"));
    }

    #[test]
    fn test_length_limit() {
        let twenty = "a".repeat(MAX_SYMBOL_LEN);
        let twenty_one = "a".repeat(MAX_SYMBOL_LEN + 1);
        assert!(is_symbol(&twenty));
        assert!(!is_symbol(&twenty_one));
        assert!(!is_symbol("A_very_long_identifier_name"));
    }

    #[test]
    fn test_format_symbol() {
        assert_eq!(format_symbol("KS"), "'KS");
        assert_eq!(format_symbol("P001"), "'P001");
    }
}
