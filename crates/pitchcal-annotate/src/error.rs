use crate::{AnnotationId, ShapeKind};

/// Errors from store mutations. The store is left unchanged in every case.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    #[error("annotation {0} not found")]
    NotFound(AnnotationId),
    #[error("annotation {id} is a {stored}, cannot change it to a {requested}")]
    TypeMismatch {
        id: AnnotationId,
        stored: ShapeKind,
        requested: ShapeKind,
    },
    #[error("invalid time interval [{start}, {end}]")]
    InvalidInterval { start: f64, end: f64 },
    #[error("annotation {0} holds a NaN or infinite value")]
    NonFinite(&'static str),
}

/// Errors from importing, exporting or persisting annotations.
#[derive(thiserror::Error, Debug)]
pub enum AnnotationIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed annotation document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported annotation document version {0}")]
    UnsupportedVersion(u32),
    #[error("duplicate annotation id {0}")]
    DuplicateId(AnnotationId),
    #[error("annotation {id} has an invalid time interval")]
    InvalidInterval { id: AnnotationId },
    #[error("annotation {id} holds a NaN or infinite value in its {part}")]
    NonFinite { id: AnnotationId, part: &'static str },
}
