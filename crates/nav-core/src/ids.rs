//! Strongly typed lanelet identifier.
//!
//! `LaneletId` is a zero-cost index wrapper: `Copy + Ord + Hash`, usable as
//! a map key or a direct `Vec` index via [`index`](LaneletId::index).  The
//! inner integer is `pub` for SoA access but callers should prefer the
//! helper for clarity.

use std::fmt;

/// Index of a lane segment in the lane graph's SoA arrays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneletId(pub u32);

impl LaneletId {
    /// Sentinel meaning "no valid lanelet" — equivalent to `u32::MAX`.
    pub const INVALID: LaneletId = LaneletId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for LaneletId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for LaneletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaneletId({})", self.0)
    }
}

impl From<LaneletId> for usize {
    #[inline(always)]
    fn from(id: LaneletId) -> usize {
        id.0 as usize
    }
}
