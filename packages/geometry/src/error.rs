//! Error types for transform sessions

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("No transform session is active")]
    NoActiveSession,

    #[error("A transform session is already active")]
    SessionActive,

    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    #[error("Resize requires a resize handle")]
    MissingHandle,
}
