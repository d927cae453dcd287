//! Error types for the editor

use crate::pipeline::PipelineOwner;
use roughrefine_bisync::SanitizeError;
use roughrefine_geometry::GeometryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Sanitize error: {0}")]
    Sanitize(#[from] SanitizeError),

    #[error("Transform error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Document is busy: owned by {owner}")]
    PipelineBusy { owner: PipelineOwner },

    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("Shape id already in use: {0}")]
    DuplicateShape(String),

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
