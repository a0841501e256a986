//! Error types for cache file handling.

use thiserror::Error;

use crate::header::CacheVersion;

/// Reasons the Address Resolver refuses a virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    /// A zero-length request is never satisfied.
    #[error("invalid needed length (0)")]
    ZeroLength,

    /// The address lies below the base of its address space.
    #[error("address {address:#010x} underflows base address {base:#010x}")]
    Underflow { address: u32, base: u32 },

    /// The address starts past the end of its address space.
    #[error("address {address:#010x} has an out-of-bounds starting offset {offset:#x} (bound {bound:#x})")]
    StartOutOfBounds { address: u32, offset: u64, bound: u64 },

    /// The requested range runs past the end of its address space.
    #[error("address {address:#010x} with length {needed:#x} has an out-of-bounds ending address (bound {bound:#x})")]
    EndOutOfBounds { address: u32, needed: u64, bound: u64 },
}

/// Cross-reference violations found by the corruption audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditViolation {
    /// The scenario tag ID in the tag data header does not name a tag.
    #[error("scenario tag {0} is not a valid tag")]
    ScenarioMissing(String),

    /// The scenario record is some other group.
    #[error("scenario tag is a {found} tag, not a scenario")]
    ScenarioGroupMismatch { found: String },

    /// A tag's path cannot be resolved or is unterminated.
    #[error("tag {index} has no valid path")]
    MissingPath { index: usize },

    /// A tag's path is the empty string.
    #[error("tag {index} has an empty path")]
    EmptyPath { index: usize },

    /// A tag carries a group code outside the known set.
    #[error("tag {index} ({path}) has an unknown group {group}")]
    UnknownGroup { index: usize, path: String, group: String },

    /// Two tags of one group share a path.
    #[error("\"{path}.{extension}\" appears more than once")]
    DuplicatePath { path: String, extension: String },

    /// The scenario's BSP reference list is out of bounds.
    #[error("BSP reference {index} is out of bounds")]
    BspReferenceOutOfBounds { index: usize },

    /// A BSP reference does not point at a BSP tag.
    #[error("BSP reference {index} does not reference a scenario_structure_bsp tag")]
    BspReferenceInvalid { index: usize },

    /// A BSP tag is referenced by more than one BSP reference.
    #[error("BSP \"{path}\" is referenced more than once")]
    BspReferencedTwice { path: String },

    /// A BSP tag is not referenced by the scenario at all.
    #[error("BSP \"{path}\" is not referenced by the scenario")]
    BspOrphaned { path: String },
}

/// Errors that can occur when loading or processing a cache file.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] squisher_common::Error),

    /// Address resolution failure.
    #[error("{0}")]
    Address(#[from] AddressError),

    /// The file is empty.
    #[error("cache file is empty")]
    Empty,

    /// The file is smaller than a cache file can be.
    #[error("cache file is too small ({0} bytes)")]
    FileTooSmall(usize),

    /// The file is larger than a cache file can be.
    #[error("cache file is too large ({0} bytes)")]
    FileTooLarge(usize),

    /// Invalid header signature.
    #[error("invalid cache header signature: expected {expected:#010x}, got {actual:#010x}")]
    InvalidHeaderSignature { expected: u32, actual: u32 },

    /// Invalid footer signature.
    #[error("invalid cache footer signature: expected {expected:#010x}, got {actual:#010x}")]
    InvalidFooterSignature { expected: u32, actual: u32 },

    /// The cache version is not one this tool handles.
    #[error("unsupported cache file version {0}")]
    UnsupportedVersion(CacheVersion),

    /// Tag data offset over the 31-bit cap.
    #[error("tag data offset is too large ({0:#x})")]
    TagDataOffsetTooLarge(u32),

    /// Tag data size over the 31-bit cap.
    #[error("tag data size is too large ({0:#x})")]
    TagDataSizeTooLarge(u32),

    /// Tag data offset beyond the end of the file.
    #[error("tag data offset {offset:#x} is out of bounds for the cache file ({len:#x} bytes)")]
    TagDataOffsetOutOfBounds { offset: u32, len: usize },

    /// Tag data region runs past the end of the file.
    #[error("tag data size {size:#x} at {offset:#x} is out of bounds for the cache file ({len:#x} bytes)")]
    TagDataSizeOutOfBounds { offset: u32, size: u32, len: usize },

    /// Tag data region cannot hold its own header.
    #[error("tag data size is too small to have valid tag data ({0} bytes)")]
    TagDataTooSmall(u32),

    /// Tag count over the cap.
    #[error("too many tags ({0})")]
    TooManyTags(u32),

    /// The tag array does not lie inside the tag data.
    #[error("tag array is out of bounds: {0}")]
    TagArrayOutOfBounds(#[source] AddressError),

    /// The build number is not one this tool knows how to patch.
    #[error("build string `{0}` is not a known build, so this tool would be ineffective")]
    UntrackedBuild(String),

    /// The build number marks a file this tool already processed.
    #[error("cache file was already processed by this tool")]
    AlreadyProcessed,

    /// The corruption audit rejected the file.
    #[error("cache file is corrupt: {0}")]
    Corrupt(#[from] AuditViolation),

    /// The scenario tag cannot be dereferenced.
    #[error("scenario tag data is invalid")]
    ScenarioUnresolvable,

    /// A scenario BSP reference entry is out of bounds.
    #[error("BSP reference {0} is out of bounds")]
    BspReferenceOutOfBounds(usize),

    /// A BSP's file range is outside the file.
    #[error("BSP {index} range {offset:#x}+{size:#x} is out of bounds for the cache file")]
    BspOutOfBounds { index: usize, offset: u32, size: u32 },

    /// A BSP blob is too small to hold its header.
    #[error("BSP {index} is too small ({size} bytes) to be a BSP")]
    BspTooSmall { index: usize, size: u32 },

    /// A BSP address space starts below the tag data base address.
    #[error("BSP {index} base address {address:#010x} is below the tag data base address")]
    BspAddressTooLow { index: usize, address: u32 },

    /// A BSP blob header carries the wrong signature.
    #[error("BSP {index} header is invalid (signature {signature:#010x})")]
    InvalidBspHeader { index: usize, signature: u32 },

    /// The model data range is outside the file.
    #[error("model data range {offset:#x}+{size:#x} is out of bounds for the cache file")]
    ModelDataOutOfBounds { offset: u32, size: u32 },

    /// Forging the checksum did not reproduce the target value.
    #[error("failed to preserve checksum {expected:#010x} (got {actual:#010x})")]
    ChecksumNotPreserved { expected: u32, actual: u32 },
}

/// Result type for cache file operations.
pub type Result<T> = std::result::Result<T, Error>;
