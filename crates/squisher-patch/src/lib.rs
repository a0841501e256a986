//! Defect repairs for Halo CE cache files.
//!
//! The stock map compilers leave a handful of well-known defects in the
//! cache files they produce: truncated shader types, missing dialogue
//! variants, degree-valued rotation scales, byte-swapped enums, stale
//! runtime pointers and uninitialized padding. This crate repairs them in
//! place over a [`squisher_cache::CacheFile`] and recomputes the checksum.
//!
//! - [`process`] - Run the whole pipeline over one file
//! - [`PatchOptions`] - Checksum, audit, build stamping, resource and dry-run settings
//! - [`routines`] - The individual repairs
//!
//! # Example
//!
//! ```no_run
//! use squisher_cache::CacheFile;
//! use squisher_patch::{process, Outcome, PatchOptions};
//!
//! let mut cache = CacheFile::open("maps/bloodgulch.map")?;
//! if let Outcome::Patched { changes } = process(&mut cache, &PatchOptions::default())? {
//!     println!("{changes} repairs");
//!     cache.save("maps/bloodgulch.map")?;
//! }
//! # Ok::<(), squisher_patch::Error>(())
//! ```

mod error;
mod options;
mod pipeline;

pub mod routines;

pub use error::{Error, Result};
pub use options::PatchOptions;
pub use pipeline::{process, Outcome};
