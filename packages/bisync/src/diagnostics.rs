//! # Diagnostics
//!
//! Editor markers for raw markup. Two passes always run and their results are
//! concatenated:
//!
//! 1. the sanitizer, whose warnings and failure are anchored at (1,1)
//! 2. a scan of the raw text for numeric attributes, with precise spans
//!
//! The scan works on the unsanitized text so numeric problems are reported
//! even when the document fails structurally somewhere else.

use crate::diagnostic::{Diagnostic, TextSpan};
use crate::number::parse_number;
use crate::sanitize::sanitize;
use crate::schema::Allowed;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const SANITIZE_RULE: &str = "sanitize";
pub const NUMERIC_RULE: &str = "numeric-range";

/// Diagnose raw editor text. Never fails.
pub fn diagnose(raw: &str) -> Vec<Diagnostic> {
    let mut diagnostics = sanitizer_diagnostics(raw);
    diagnostics.extend(numeric_attribute_diagnostics(raw));
    debug!(count = diagnostics.len(), "Diagnostics computed");
    diagnostics
}

fn sanitizer_diagnostics(raw: &str) -> Vec<Diagnostic> {
    let warning =
        |message: &String| Diagnostic::warning(SANITIZE_RULE, message, TextSpan::origin());

    match sanitize(raw) {
        Ok(result) => result.warnings.iter().map(warning).collect(),
        Err(err) => {
            let mut diagnostics = vec![Diagnostic::error(
                SANITIZE_RULE,
                err.to_string(),
                TextSpan::origin(),
            )];
            diagnostics.extend(err.warnings.iter().map(warning));
            diagnostics
        }
    }
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(\b[a-zA-Z-]+\b)="([^"]*)""#).expect("valid attribute pattern")
    })
}

/// Range checks for numeric attributes straight from the raw text.
pub fn numeric_attribute_diagnostics(raw: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for captures in attribute_pattern().captures_iter(raw) {
        let (Some(full), Some(name), Some(value)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        let name = name.as_str();
        if !Allowed::is_numeric(name) {
            continue;
        }

        let message = match parse_number(value.as_str()) {
            None => format!("Attribute {} must be a finite number", name),
            Some(number) if Allowed::is_non_negative(name) && number < 0.0 => {
                format!("Attribute {} cannot be negative", name)
            }
            Some(number) if name == "opacity" && !(0.0..=1.0).contains(&number) => {
                "Opacity must be between 0 and 1".to_string()
            }
            Some(_) => continue,
        };

        let span = span_between(raw, full.start(), full.end());
        diagnostics.push(Diagnostic::error(NUMERIC_RULE, message, span));
    }

    diagnostics
}

fn span_between(text: &str, start: usize, end: usize) -> TextSpan {
    let (start_line, start_col) = position_at(text, start);
    let (end_line, end_col) = position_at(text, end);
    TextSpan {
        start_line,
        start_col,
        end_line,
        end_col,
    }
}

/// 1-based line and column of a byte offset. Columns count characters.
fn position_at(text: &str, offset: usize) -> (usize, usize) {
    let prefix = &text[..offset];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}
