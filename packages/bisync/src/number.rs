//! Number and whitespace helpers shared by the sanitizer, normalizer and
//! diagnostics.

/// Parse a finite number. Empty input, `NaN` and infinities yield `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Format with at most 3 decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let mut text = format!("{:.3}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a comma and/or whitespace separated list into tokens.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Canonical whitespace for transform lists: single spaces, none around
/// commas.
pub fn compress_transform(value: &str) -> String {
    collapse_whitespace(value)
        .replace(" ,", ",")
        .replace(", ", ",")
}
