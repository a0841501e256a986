//! Error types for the patch pipeline.

use thiserror::Error;

/// Errors that can occur while patching a cache file.
#[derive(Debug, Error)]
pub enum Error {
    /// Cache file error.
    #[error("{0}")]
    Cache(#[from] squisher_cache::Error),

    /// A tag's base struct cannot be dereferenced.
    #[error("tag data for \"{tag}\" is invalid")]
    InvalidTagData { tag: String },

    /// An element of a tag is out of bounds.
    #[error("{element} in \"{tag}\" is out of bounds")]
    OutOfBounds { element: String, tag: String },

    /// A meter stencil row runs past the end of the stencil.
    #[error("encoded stencil row {row} in \"{tag}\" is out of bounds")]
    StencilRowOutOfBounds { row: usize, tag: String },

    /// A meter stencil row lies outside the meter.
    #[error("encoded stencil row {row} origin in \"{tag}\" is out of bounds for meter dimensions")]
    StencilRowOutsideMeter { row: usize, tag: String },

    /// A meter stencil row's pixels run past the end of the stencil.
    #[error("encoded stencil pixel data for row {row} in \"{tag}\" is out of bounds")]
    StencilPixelsOutOfBounds { row: usize, tag: String },

    /// A decal's bitmap reference points outside the tag array.
    #[error("decal \"{decal}\" references an invalid bitmap")]
    InvalidDecalBitmap { decal: String },

    /// A decal uses a resource map bitmap whose sprite extent is not known.
    #[error("decal \"{decal}\" references external bitmap \"{bitmap}\" that does not match a known decal bitmap")]
    UnknownDecalBitmap { decal: String, bitmap: String },

    /// A bitmap uses resource map pixels but is not in the resource list.
    #[error("bitmap \"{path}\" has external pixels but does not map to the stock bitmaps.map by path index; the map should be rebuilt")]
    BitmapNotInResources { path: String },
}

impl From<squisher_cache::AuditViolation> for Error {
    fn from(violation: squisher_cache::AuditViolation) -> Self {
        Error::Cache(violation.into())
    }
}

/// Result type for patch operations.
pub type Result<T> = std::result::Result<T, Error>;
