//! # RoughRefine Bisync
//!
//! Keeps vector markup and the live canvas tree in lockstep.
//!
//! ```text
//! editor text ──sanitize──▶ SafeElement ──reconcile──▶ live canvas tree
//!      ▲                                                     │
//!      └──────────────────── canvas_text / normalize ◀───────┘
//!
//! editor text ──diagnose──▶ Vec<Diagnostic> (markers)
//! ```
//!
//! Everything here is a pure function over in-memory values.

mod diagnostic;
mod diagnostics;
mod diff;
mod error;
mod normalizer;
mod number;
mod parse;
mod sanitize;
mod schema;
mod tree;

pub use diagnostic::{has_errors, Diagnostic, Severity, TextSpan};
pub use diagnostics::{diagnose, numeric_attribute_diagnostics, NUMERIC_RULE, SANITIZE_RULE};
pub use diff::{reconcile, DiffReport, Reconciled};
pub use error::{SanitizeError, SanitizeErrorKind, SanitizeResult};
pub use normalizer::{canvas_text, normalize};
pub use number::format_number;
pub use parse::parse_fragment;
pub use sanitize::{sanitize, Sanitized};
pub use schema::{Allowed, CONTAINER_TAG};
pub use tree::{SafeElement, SafeNode};
