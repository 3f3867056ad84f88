use thiserror::Error;

use crate::model::ElementKind;

/// Errors produced by structural operations on a network.
///
/// Validation findings are deliberately not part of this enum: the validator
/// reports warnings that never block editing, see [`crate::validation`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} id '{id}' is already in use")]
    DuplicateId { kind: ElementKind, id: String },
    #[error("{kind} '{id}' not found")]
    NotFound { kind: ElementKind, id: String },
    #[error("no node at ({x}, {y}) to anchor the link")]
    EndpointNotFound { x: f64, y: f64 },
    #[error("a link from '{from}' to '{to}' already exists")]
    LinkExists { from: String, to: String },
    #[error("no transform available from '{from}' to '{to}'")]
    UnsupportedTransform { from: String, to: String },
    #[error("malformed settings file: {0}")]
    InvalidSettings(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
