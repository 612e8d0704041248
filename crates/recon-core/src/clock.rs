//! World clock for the Recon simulation.
//!
//! The clock is the single source of truth for the current tick. Every
//! freshness, TTL, and cooldown computation receives its tick from here as
//! an explicit parameter; nothing reads ambient time.

use recon_types::Tick;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldClock {
    /// Last tick that started (0 before the first tick).
    tick: Tick,
}

impl WorldClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock resuming from a persisted tick.
    pub const fn from_tick(tick: Tick) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<Tick, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> Tick {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_tick_zero() {
        assert_eq!(WorldClock::new().tick(), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = WorldClock::new();
        assert_eq!(clock.advance().ok(), Some(1));
        assert_eq!(clock.advance().ok(), Some(2));
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn resumed_clock_continues_from_tick() {
        let mut clock = WorldClock::from_tick(500);
        assert_eq!(clock.advance().ok(), Some(501));
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = WorldClock::from_tick(Tick::MAX);
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), Tick::MAX);
    }
}
