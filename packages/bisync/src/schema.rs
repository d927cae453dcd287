//! Allow-list of elements and attributes that may reach the canvas.
//!
//! The attribute list is shared by every element; there is no per-element
//! table.

/// Tag every sanitized document must use as its root.
pub const CONTAINER_TAG: &str = "g";

const ELEMENTS: &[&str] = &[
    "g", "rect", "circle", "ellipse", "line", "polyline", "polygon", "path", "text", "tspan",
    "title", "desc",
];

const ATTRIBUTES: &[&str] = &[
    "id",
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "width",
    "height",
    "x1",
    "y1",
    "x2",
    "y2",
    "points",
    "d",
    "transform",
    "fill",
    "stroke",
    "stroke-width",
    "stroke-dasharray",
    "stroke-linecap",
    "stroke-linejoin",
    "fill-opacity",
    "stroke-opacity",
    "opacity",
    "vector-effect",
    "text-anchor",
    "dominant-baseline",
    "font-family",
    "font-size",
    "font-weight",
];

/// Attributes parsed as a single finite number.
const NUMERIC_ATTRIBUTES: &[&str] = &[
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "width",
    "height",
    "x1",
    "y1",
    "x2",
    "y2",
    "stroke-width",
    "opacity",
];

/// Numeric attributes that describe a size and may not go below zero.
const NON_NEGATIVE_ATTRIBUTES: &[&str] = &["width", "height", "stroke-width"];

/// Static allow-list table.
pub struct Allowed;

impl Allowed {
    pub fn elements() -> &'static [&'static str] {
        ELEMENTS
    }

    pub fn attrs() -> &'static [&'static str] {
        ATTRIBUTES
    }

    pub fn is_element(tag: &str) -> bool {
        ELEMENTS.contains(&tag)
    }

    pub fn is_attr(name: &str) -> bool {
        ATTRIBUTES.contains(&name)
    }

    pub fn is_numeric(name: &str) -> bool {
        NUMERIC_ATTRIBUTES.contains(&name)
    }

    pub fn is_non_negative(name: &str) -> bool {
        NON_NEGATIVE_ATTRIBUTES.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_is_allowed() {
        assert!(Allowed::is_element(CONTAINER_TAG));
    }

    #[test]
    fn test_script_is_not_allowed() {
        assert!(!Allowed::is_element("script"));
        assert!(!Allowed::is_element("foreignObject"));
        assert!(!Allowed::is_attr("onclick"));
        assert!(!Allowed::is_attr("href"));
    }

    #[test]
    fn test_numeric_attributes_are_allowed() {
        for name in NUMERIC_ATTRIBUTES {
            assert!(Allowed::is_attr(name), "{} should be allowed", name);
        }
        for name in NON_NEGATIVE_ATTRIBUTES {
            assert!(Allowed::is_numeric(name));
        }
    }
}
