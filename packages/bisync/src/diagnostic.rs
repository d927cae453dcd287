use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// 1-based line/column range in the raw editor text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl TextSpan {
    /// The (1,1)-(1,1) anchor used when no position is known.
    pub const fn origin() -> Self {
        Self {
            start_line: 1,
            start_col: 1,
            end_line: 1,
            end_col: 1,
        }
    }
}

/// A diagnostic message for the editor surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,

    /// The severity level
    pub severity: Severity,

    /// The pass that produced this diagnostic
    pub rule: String,

    /// Where the problem is in the raw text
    pub span: TextSpan,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, span: TextSpan) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            rule: rule.into(),
            span,
        }
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, span: TextSpan) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            rule: rule.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
