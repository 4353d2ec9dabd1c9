//! The table of selectable blink rates.

/// Blink half-periods in timer ticks, slowest first.
pub const RATE_TABLE: [u16; 7] = [16000, 8000, 5333, 4000, 2666, 2000, 1600];

/// Index into [`RATE_TABLE`].
///
/// The index can never leave the table, stepping past either end leaves it
/// unchanged.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct RateIndex(usize);

impl RateIndex {
    /// The slowest rate.
    pub const SLOWEST: Self = Self(0);

    /// The fastest rate.
    pub const FASTEST: Self = Self(RATE_TABLE.len() - 1);

    /// Create an index, clamped to the last table entry.
    #[cfg(test)]
    fn new(index: usize) -> Self {
        Self(index.min(Self::FASTEST.0))
    }

    /// Position in the table, 0 is the slowest rate.
    pub fn as_usize(&self) -> usize {
        self.0
    }

    /// Blink half-period at this index, in ticks.
    pub fn period(&self) -> u16 {
        RATE_TABLE[self.0]
    }

    /// Step to the next faster rate.
    ///
    /// Returns `false` if the index is already at the fastest rate.
    pub fn faster(&mut self) -> bool {
        if *self == Self::FASTEST {
            return false;
        }
        self.0 += 1;
        true
    }

    /// Step to the next slower rate.
    ///
    /// Returns `false` if the index is already at the slowest rate.
    pub fn slower(&mut self) -> bool {
        if *self == Self::SLOWEST {
            return false;
        }
        self.0 -= 1;
        true
    }
}
