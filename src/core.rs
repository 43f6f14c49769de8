//! Primitive types shared by the table and its callers.
//!
//! The search layer owns the real move and score representations; the table
//! only needs fixed-width handles it can pack into an entry, so everything
//! here is deliberately small and opaque.

use std::fmt;

use bitflags::bitflags;

/// Position fingerprints are 64-bit unsigned integers produced externally
/// (e.g. by [Zobrist hashing]) and assumed to be uniformly distributed.
///
/// [Zobrist hashing]: https://www.chessprogramming.org/Zobrist_Hashing
pub type Key = u64;

/// Search depth in plies.
pub type Depth = u8;

/// Signed score of a cached search result. Interpretation (centipawns,
/// mate-distance encoding) belongs to the search layer.
pub type Value = i16;

/// Opaque 16-bit move handle, stored verbatim in the table and handed back
/// to the search layer on a hit. The all-zero handle is reserved for "no
/// move known".
///
/// Move is a compact representation using only two bytes:
///
/// ```
/// use tabia::core::Move;
///
/// assert_eq!(std::mem::size_of::<Move>(), 2);
/// assert_eq!(Move::NONE.raw(), 0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Move(u16);

impl Move {
    /// Sentinel for "no move known".
    pub const NONE: Self = Self(0);

    /// Wraps a raw handle produced by the search layer.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns `true` for the "no move known" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

bitflags! {
    /// How a cached value relates to the true score of the position.
    ///
    /// A fail-high search proves a lower bound, a fail-low search an upper
    /// bound, and a full window both at once. The empty set marks an entry
    /// that has never been populated, which is why zero-filled table memory
    /// always decodes as empty.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Bound: u8 {
        /// The true score is at least the cached value (fail-high).
        const LOWER = 0b01;
        /// The true score is at most the cached value (fail-low).
        const UPPER = 0b10;
        /// The cached value is the exact score.
        const EXACT = Self::LOWER.bits() | Self::UPPER.bits();
    }
}
