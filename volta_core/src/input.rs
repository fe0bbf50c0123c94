//! # Numeric Input Parsing
//!
//! Quantities, hours and margins arrive as the text a user typed into a
//! table cell. This module turns that text into a number, or into `None`
//! when the text is a parse fault.
//!
//! Accepted forms:
//! - plain decimals: `"2"`, `"2.5"`, `" 10 "`
//! - comma decimal separator: `"2,5"`
//! - apostrophe thousands separator: `"1'250.50"`
//!
//! Rejected (returns `None`): blank text, non-numeric text, `NaN`/infinite
//! values and negative numbers.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::input::parse_number;
//!
//! assert_eq!(parse_number("2,5"), Some(2.5));
//! assert_eq!(parse_number("1'000"), Some(1000.0));
//! assert_eq!(parse_number("abc"), None);
//! assert_eq!(parse_number("-3"), None);
//! ```

/// Parse a non-negative finite number from cell text.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // "-0" parses; keep it out of sums as a plain zero
    Some(value.abs())
}

/// True when the cell holds nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
