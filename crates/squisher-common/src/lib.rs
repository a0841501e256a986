//! Common utilities for squisher.
//!
//! This crate provides the small primitives shared by the cache and patch crates:
//!
//! - [`crc`] - The Halo flavour of CRC-32 used by cache file checksums, plus
//!   a forger that steers the register to a chosen value
//! - [`cstr`] - NUL-terminated and fixed-width string fields
//!
//! # Example
//!
//! ```
//! use squisher_common::crc::HaloCrc;
//!
//! let mut crc = HaloCrc::new();
//! crc.update(b"12345");
//! crc.update(b"6789");
//! assert_eq!(crc.value(), 0x340B_C6D9);
//! ```

mod error;

pub mod crc;
pub mod cstr;

pub use error::{Error, Result};

