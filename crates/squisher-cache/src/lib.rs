//! Halo CE cache file access for squisher.
//!
//! Cache files are a 2048-byte header followed by a relocatable blob of tag
//! data, model data and cached structure BSPs. Tag data stores 32-bit
//! virtual addresses; this crate turns them into checked ranges of the
//! in-memory file and never dereferences one any other way.
//!
//! - [`CacheFile`] - Loader, tag directory, audit and checksum recomputation
//! - [`AddressSpace`] - The bounds-checked virtual address resolver
//! - [`definitions`] - Layouts of the tag structs the patch routines edit
//!
//! # Example
//!
//! ```no_run
//! use squisher_cache::{definitions::Shader, CacheFile, TagGroup};
//!
//! let mut cache = CacheFile::open("maps/bloodgulch.map")?;
//! cache.audit()?;
//!
//! let shaders: Vec<_> = cache
//!     .iter_records()
//!     .filter(|(_, record)| record.is_a(TagGroup::Shader))
//!     .map(|(tag_id, _)| tag_id)
//!     .collect();
//! for tag_id in shaders {
//!     if let Some(shader) = cache.tag::<Shader>(tag_id) {
//!         println!("{}: {}", cache.get_extension_or_placeholder(tag_id), shader.shader_type.get());
//!     }
//! }
//!
//! cache.update_checksum()?;
//! cache.save("maps/bloodgulch.map")?;
//! # Ok::<(), squisher_cache::Error>(())
//! ```

mod address;
mod audit;
mod bsp;
mod checksum;
mod directory;
mod error;
mod file;
mod group;
mod header;
mod id;
mod layout;

pub mod definitions;

#[cfg(any(test, feature = "test-support"))]
pub mod builder;

pub use address::{AddressSpace, TAG_DATA_BASE_ADDRESS};
pub use bsp::CachedBsp;
pub use directory::{INVALID_PLACEHOLDER, MAX_TAG_PATH_LENGTH};
pub use error::{AddressError, AuditViolation, Error, Result};
pub use file::{is_resource_map_path, CacheFile, MAX_TAG_COUNT};
pub use group::{fourcc_to_extension, TagGroup, GROUP_NONE};
pub use header::{Build, CacheHeader, CacheVersion, ScenarioType, HEADER_SIZE};
pub use id::TagId;
pub use layout::{Reflexive, TagDataBlob, TagDataHeader, TagRecord, TagReference};
