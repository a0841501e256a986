//! Tag identifiers.

use std::fmt;

/// A 32-bit tag identifier: array index in the low half, salt in the high half.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(u32);

impl TagId {
    /// The empty tag reference.
    pub const NULL: TagId = TagId(0xFFFF_FFFF);

    /// Wrap a raw identifier.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Build an identifier from its salt and index halves.
    pub const fn new(salt: u16, index: u16) -> Self {
        Self(((salt as u32) << 16) | index as u32)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of the tag in the tag array.
    pub const fn index(self) -> u16 {
        self.0 as u16
    }

    pub const fn salt(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagId({:#010x})", self.0)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
