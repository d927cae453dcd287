use thiserror::Error;

pub type SanitizeResult<T> = Result<T, SanitizeError>;

/// Fatal sanitizer failure.
///
/// Carries every warning collected before the failing node so the editor can
/// still show them next to the error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct SanitizeError {
    pub kind: SanitizeErrorKind,
    pub warnings: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SanitizeErrorKind {
    #[error("Invalid SVG markup: {0}")]
    Malformed(String),

    #[error("SVG markup must contain at least one element")]
    NoElement,

    #[error("Root element must be a <g> container")]
    NonContainerRoot,

    #[error("Element <{0}> is not allowed")]
    DisallowedElement(String),

    #[error("Text nodes may not contain markup")]
    MarkupInText,

    #[error("Attribute {name} expected numeric value but received '{value}'")]
    NotFinite { name: String, value: String },

    #[error("Attribute {0} must not be negative")]
    Negative(String),

    #[error("opacity must be between 0 and 1")]
    OpacityOutOfRange,

    #[error("points must contain an even number of numeric values")]
    InvalidPoints,

    #[error("stroke-dasharray must contain numeric values")]
    InvalidDashArray,
}

impl SanitizeErrorKind {
    /// Document shape problems: bad markup, wrong root, unknown elements,
    /// markup smuggled through text.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_)
                | Self::NoElement
                | Self::NonContainerRoot
                | Self::DisallowedElement(_)
                | Self::MarkupInText
        )
    }

    /// Attribute value problems.
    pub fn is_value_error(&self) -> bool {
        !self.is_structural()
    }
}

impl SanitizeError {
    pub fn new(kind: SanitizeErrorKind, warnings: Vec<String>) -> Self {
        Self { kind, warnings }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SanitizeErrorKind::Malformed(message.into()), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SanitizeError::new(SanitizeErrorKind::Negative("width".into()), vec![]);
        assert_eq!(err.to_string(), "Attribute width must not be negative");

        let err = SanitizeError::new(SanitizeErrorKind::DisallowedElement("script".into()), vec![]);
        assert_eq!(err.to_string(), "Element <script> is not allowed");
    }

    #[test]
    fn test_taxonomy() {
        assert!(SanitizeErrorKind::MarkupInText.is_structural());
        assert!(SanitizeErrorKind::NonContainerRoot.is_structural());
        assert!(SanitizeErrorKind::OpacityOutOfRange.is_value_error());
        assert!(SanitizeErrorKind::InvalidPoints.is_value_error());
    }
}
