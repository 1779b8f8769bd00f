//! Metadata flags attached to every object.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Flags is the metadata bit set of an object.
///
/// The 32-bit space is partitioned into regions:
///
/// - `0x0000_00ff` belongs to the object type and is never stored here.
/// - `0x0000_ff00` is internal to this library, e.g. [`Flags::UNORDERED`].
///   Internal bits are per-instance and are not propagated by copies.
/// - `0xffff_0000` is the public region. Hosts may define their own bits in
///   `0xff00_0000`; `0x00ff_0000` is reserved for keywords defined by this
///   library such as [`Flags::STATIC_DATA`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    pub const MASK_TYPE: u32 = 0x0000_00ff;
    pub const MASK_INTERNAL: u32 = 0x0000_ff00;
    pub const MASK_PUBLIC: u32 = 0xffff_0000;
    pub const MASK_LIBRARY_KEYWORDS: u32 = 0x00ff_0000;

    pub const NONE: Flags = Flags(0);

    /// Bencode dictionary keys were not sorted when decoded.
    pub const UNORDERED: Flags = Flags(0x0000_0100);

    /// Object does not change across sessions.
    pub const STATIC_DATA: Flags = Flags(0x0001_0000);

    /// Object changes between sessions.
    pub const SESSION_DATA: Flags = Flags(0x0002_0000);

    /// Creates flags from raw bits, dropping the type region.
    pub const fn from_bits(bits: u32) -> Self {
        Flags(bits & !Self::MASK_TYPE)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any bit of `other` is set.
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns only the bits of the public region.
    pub const fn public(self) -> Flags {
        Flags(self.0 & Self::MASK_PUBLIC)
    }

    /// Returns only the bits of the internal region.
    pub const fn internal(self) -> Flags {
        Flags(self.0 & Self::MASK_INTERNAL)
    }

    pub(crate) fn insert_masked(&mut self, other: Flags, mask: u32) {
        self.0 |= other.0 & mask;
    }

    pub(crate) fn remove_masked(&mut self, other: Flags, mask: u32) {
        self.0 &= !(other.0 & mask);
    }
}

impl From<u32> for Flags {
    fn from(bits: u32) -> Self {
        Flags::from_bits(bits)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl Not for Flags {
    type Output = Flags;

    fn not(self) -> Flags {
        Flags::from_bits(!self.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits_drops_type_region() {
        assert_eq!(Flags::from_bits(0xffff_ffff).bits(), 0xffff_ff00);
        assert!(Flags::from_bits(0x09).is_empty());
    }

    #[test]
    fn test_regions() {
        let flags = Flags::UNORDERED | Flags::STATIC_DATA;
        assert_eq!(flags.public(), Flags::STATIC_DATA);
        assert_eq!(flags.internal(), Flags::UNORDERED);
        assert_eq!(Flags::MASK_LIBRARY_KEYWORDS & Flags::MASK_PUBLIC, Flags::MASK_LIBRARY_KEYWORDS);
    }

    #[test]
    fn test_contains_and_intersects() {
        let flags = Flags::STATIC_DATA | Flags::SESSION_DATA;
        assert!(flags.contains(Flags::STATIC_DATA));
        assert!(!Flags::STATIC_DATA.contains(flags));
        assert!(Flags::STATIC_DATA.intersects(flags));
        assert!(!Flags::UNORDERED.intersects(flags));
    }

    #[test]
    fn test_masked_updates() {
        let mut flags = Flags::NONE;
        flags.insert_masked(Flags::from_bits(0x0101_0100), Flags::MASK_PUBLIC);
        assert_eq!(flags.bits(), 0x0101_0000);

        flags.remove_masked(Flags::from_bits(0x0100_0000), Flags::MASK_PUBLIC);
        assert_eq!(flags, Flags::STATIC_DATA);
    }
}
