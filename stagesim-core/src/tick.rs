//! Logical simulation time
//!
//! The engine advances in whole ticks. One tick is one full pass of
//! generate → bus → (distribute, service) for every stage in order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Index of a simulation tick, starting at zero before the first pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(u64);

impl Tick {
    /// The tick before any pass has run.
    pub const fn zero() -> Self {
        Tick(0)
    }

    pub const fn from_u64(tick: u64) -> Self {
        Tick(tick)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The tick that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Tick(self.0 + 1)
    }

    /// Number of ticks elapsed between `earlier` and `self`, saturating at zero.
    pub fn ticks_since(&self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    fn add(self, rhs: u64) -> Self::Output {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_by_one() {
        let t = Tick::zero();
        assert_eq!(t.as_u64(), 0);
        assert_eq!(t.next().as_u64(), 1);
        assert_eq!(t.next().next(), Tick::from_u64(2));
        assert_eq!(Tick::from_u64(3) + 4, Tick::from_u64(7));
    }

    #[test]
    fn test_ticks_since() {
        let a = Tick::from_u64(5);
        let b = Tick::from_u64(12);
        assert_eq!(b.ticks_since(a), 7);
        assert_eq!(a.ticks_since(b), 0);
    }

    #[test]
    fn test_tick_display() {
        assert_eq!(Tick::from_u64(42).to_string(), "t=42");
    }
}
