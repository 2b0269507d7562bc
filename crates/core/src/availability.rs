//! Parsing of the scraped "available places" text field.
//!
//! The scraper stores whatever the source page shows ("12", "-3", "brak",
//! "N/A", "1.5", ...). Only strict signed integers are meaningful; everything
//! else collapses to `0`. As a consequence "unknown" and "exactly zero" cannot
//! be told apart once parsed.

/// Parse a raw availability string into a signed place count.
///
/// Accepts an optional leading `-` followed by one or more ASCII digits after
/// trimming surrounding Unicode whitespace (the `White_Space` property, so
/// NBSP and form feed count). Leading `+`, decimal points, exponents,
/// embedded whitespace and values outside the `i32` range all yield `0`.
/// Negative values are valid (overbooked wards).
pub fn parse_available_places(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if !is_strict_integer(trimmed) {
        return 0;
    }
    trimmed.parse::<i32>().unwrap_or(0)
}

/// `^-?[0-9]+$` without pulling in a regex for a hot path.
fn is_strict_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
