//! Tick-granular simulation time.
//!
//! All deadlines (`pain_debounce`, `attack_finished`, combo windows, waypoint
//! waits) are absolute `SimTime` stamps compared in whole ticks, so repeated
//! float arithmetic can never drift a comparison across a frame boundary.

use serde::{Deserialize, Serialize};

/// Fixed simulation rate in ticks per second.
pub const TICK_HZ: u32 = 10;

/// Seconds advanced by a single tick.
pub const TICK_SECONDS: f32 = 1.0 / TICK_HZ as f32;

/// Monotonic simulation clock stamp, in ticks since level start.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime(pub u64);

/// A span of simulation time, in whole ticks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    /// Convert a duration in seconds to ticks, rounding to the nearest tick.
    /// Non-positive durations collapse to zero.
    pub fn from_secs(secs: f32) -> Self {
        if secs <= 0.0 {
            return Self(0);
        }
        Self((secs * TICK_HZ as f32).round().max(1.0) as u64)
    }

    pub fn as_secs(self) -> f32 {
        self.0 as f32 * TICK_SECONDS
    }
}

impl SimTime {
    /// Advance the clock by one tick.
    pub fn advance(&mut self) {
        self.0 += 1;
    }

    pub fn as_secs(self) -> f32 {
        self.0 as f32 * TICK_SECONDS
    }
}

impl std::ops::Add<Ticks> for SimTime {
    type Output = SimTime;
    fn add(self, rhs: Ticks) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::Sub<SimTime> for SimTime {
    type Output = Ticks;
    fn sub(self, rhs: SimTime) -> Ticks {
        Ticks(self.0.saturating_sub(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_round_to_ticks() {
        assert_eq!(Ticks::from_secs(0.0), Ticks(0));
        assert_eq!(Ticks::from_secs(-1.0), Ticks(0));
        assert_eq!(Ticks::from_secs(0.1), Ticks(1));
        assert_eq!(Ticks::from_secs(1.5), Ticks(15));
        // sub-tick durations still consume at least one tick
        assert_eq!(Ticks::from_secs(0.01), Ticks(1));
    }

    #[test]
    fn deadline_comparisons_are_exact() {
        let mut now = SimTime::default();
        let deadline = now + Ticks::from_secs(0.3);
        for _ in 0..3 {
            assert!(now < deadline);
            now.advance();
        }
        assert!(now >= deadline);
    }
}
