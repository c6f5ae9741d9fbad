//! Error types shared by the store, the element model, and the export document.

use crate::id::ElementId;
use thiserror::Error;

/// Why an element record cannot become a shape (or a stored element).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("invalid element id `{0}` (expected `element-<n>`)")]
    InvalidId(String),

    #[error("unknown element type `{0}`")]
    UnknownKind(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("{id}: `{field}` is not a finite number")]
    NonFinite { id: ElementId, field: &'static str },

    #[error("{id}: size {width}x{height} must be positive")]
    NonPositiveSize {
        id: ElementId,
        width: f64,
        height: f64,
    },

    #[error("{0}: duplicate element id")]
    DuplicateId(ElementId),
}

/// Failures of explicit store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{0}: no such element in the store")]
    UnknownElement(ElementId),

    #[error(transparent)]
    Element(#[from] ElementError),
}

/// Failures reading or writing the JSON design document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed design document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Element(#[from] ElementError),
}
