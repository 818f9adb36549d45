//! Domain error types.
//!
//! Only construction-time problems are errors. Shape problems inside a
//! configuration tree never surface here; consumers fall back field by field.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("duplicate demo title: {0}")]
    DuplicateTitle(String),

    #[error("no widget-kind mapping for demo title: {0}")]
    UnmappedTitle(String),

    #[error("unknown widget-kind: {0}")]
    UnknownWidgetKind(String),

    #[error("override tree must be a table keyed by widget-kind, got {0}")]
    MalformedOverrideRoot(&'static str),
}

pub type GalleryResult<T> = std::result::Result<T, GalleryError>;
