//! Wall-clock access.
//!
//! The engine never reads time on its own: physics is frame-based and only
//! the draw recorder needs a timestamp, which it asks the host for through
//! [`WallClock`].

/// Source of the current wall-clock time.
pub trait WallClock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Clock frozen at a given instant; advanced manually.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock {
    pub now_ms: u64,
}

impl FixedClock {
    pub const fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }
}

impl WallClock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// Nominal frame period for a refresh rate, in milliseconds.
#[inline]
pub fn frame_period_ms(fps: u32) -> u64 {
    1000 / u64::from(fps.max(1))
}
