//! Cache file header.

use std::fmt;

use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use squisher_common::cstr;

use crate::{Error, Result};

/// Size of the fixed header at the start of every cache file.
pub const HEADER_SIZE: usize = 0x800;

/// Smallest file that can be a cache file.
pub const MINIMUM_FILE_SIZE: usize = 0x1000;

/// Largest file (and largest tag data offset or size) accepted.
pub const MAXIMUM_FILE_SIZE: usize = i32::MAX as usize;

/// The 2048-byte cache file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct CacheHeader {
    /// `head`
    pub header_signature: U32,
    pub version: U32,
    /// Declared size of the decompressed file
    pub file_size: U32,
    pub compressed_padding: U32,
    /// File offset of the tag data region
    pub tag_data_offset: U32,
    /// Size of the tag data region
    pub tag_data_size: U32,
    _index_buffers: [u8; 8],
    pub name: [u8; 32],
    pub build_number: [u8; 32],
    pub scenario_type: U16,
    _pad: [u8; 2],
    /// CRC over BSPs, model data and tag data
    pub checksum: U32,
    pub flags: U32,
    _unused: [u8; 0x790],
    /// `foot`
    pub footer_signature: U32,
}

const _: () = assert!(std::mem::size_of::<CacheHeader>() == HEADER_SIZE);

impl CacheHeader {
    /// `head` as stored.
    pub const HEADER_SIGNATURE: u32 = 0x6865_6164;

    /// `foot` as stored.
    pub const FOOTER_SIGNATURE: u32 = 0x666F_6F74;

    /// Byte offset of the checksum field.
    pub const CHECKSUM_OFFSET: usize = 0x64;

    /// Check signatures, version and string fields.
    pub fn validate(&self) -> Result<()> {
        let signature = self.header_signature.get();
        if signature != Self::HEADER_SIGNATURE {
            return Err(Error::InvalidHeaderSignature {
                expected: Self::HEADER_SIGNATURE,
                actual: signature,
            });
        }

        let signature = self.footer_signature.get();
        if signature != Self::FOOTER_SIGNATURE {
            return Err(Error::InvalidFooterSignature {
                expected: Self::FOOTER_SIGNATURE,
                actual: signature,
            });
        }

        self.name()?;
        self.build_number()?;

        match self.version() {
            CacheVersion::Retail | CacheVersion::CustomEdition => Ok(()),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    pub fn version(&self) -> CacheVersion {
        CacheVersion::from_raw(self.version.get())
    }

    /// Scenario name as stored. Maps built on non-English systems carry
    /// names in the builder's code page, so this is raw bytes.
    pub fn name(&self) -> Result<&[u8]> {
        Ok(cstr::fixed_field(&self.name, "name")?)
    }

    pub fn build_number(&self) -> Result<&[u8]> {
        Ok(cstr::fixed_field(&self.build_number, "build number")?)
    }

    pub fn set_build_number(&mut self, build: &str) -> Result<()> {
        Ok(cstr::write_fixed_field(&mut self.build_number, build)?)
    }

    pub fn scenario_type(&self) -> ScenarioType {
        ScenarioType::from_raw(self.scenario_type.get())
    }
}

/// Cache file format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheVersion {
    Xbox,
    Demo,
    Retail,
    CustomEdition,
    Unknown(u32),
}

impl CacheVersion {
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            5 => CacheVersion::Xbox,
            6 => CacheVersion::Demo,
            7 => CacheVersion::Retail,
            609 => CacheVersion::CustomEdition,
            other => CacheVersion::Unknown(other),
        }
    }

    pub const fn raw(self) -> u32 {
        match self {
            CacheVersion::Xbox => 5,
            CacheVersion::Demo => 6,
            CacheVersion::Retail => 7,
            CacheVersion::CustomEdition => 609,
            CacheVersion::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheVersion::Xbox => write!(f, "5 (Xbox)"),
            CacheVersion::Demo => write!(f, "6 (PC demo)"),
            CacheVersion::Retail => write!(f, "7 (PC retail)"),
            CacheVersion::CustomEdition => write!(f, "609 (Custom Edition)"),
            CacheVersion::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// What kind of scenario the cache file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioType {
    Singleplayer,
    Multiplayer,
    UserInterface,
    Unknown(u16),
}

impl ScenarioType {
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => ScenarioType::Singleplayer,
            1 => ScenarioType::Multiplayer,
            2 => ScenarioType::UserInterface,
            other => ScenarioType::Unknown(other),
        }
    }
}

/// Builds of the map compiler whose defects are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Build {
    /// Marker written by this tool after processing a file.
    Squished,
    Build0563,
    Build0564,
    /// Custom Edition 1.0
    CustomEdition,
    /// Custom Edition 1.10
    CustomEdition110,
}

impl Build {
    /// Known builds, in the order they are matched.
    pub const ALL: [Build; 5] = [
        Build::Squished,
        Build::Build0563,
        Build::Build0564,
        Build::CustomEdition,
        Build::CustomEdition110,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Build::Squished => "01.00.00.0000",
            Build::Build0563 => "01.00.00.0563",
            Build::Build0564 => "01.00.00.0564",
            Build::CustomEdition => "01.00.00.0609",
            Build::CustomEdition110 => "01.00.10.0621",
        }
    }

    /// Exact match against the known build strings.
    pub fn classify(build_number: &[u8]) -> Option<Build> {
        Self::ALL
            .into_iter()
            .find(|build| build.as_str().as_bytes() == build_number)
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
