use serde::{Deserialize, Serialize};

/// Number of live display elements in the reel pool.
pub const POOL_SIZE: usize = 7;
/// Pool element that sits at the visual center of the viewport.
pub const POOL_CENTER: usize = 3;
/// Height of the viewport, in items.
pub const VIEWPORT_ITEMS: usize = 3;

/// Animation phase of the raffle reel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Decelerating,
    Stopped,
}

impl SpinPhase {
    /// Phases in which the per-frame physics step runs.
    #[inline]
    pub const fn is_animating(self) -> bool {
        matches!(self, SpinPhase::Spinning | SpinPhase::Decelerating)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SpinPhase::Idle => "idle",
            SpinPhase::Spinning => "spinning",
            SpinPhase::Decelerating => "decelerating",
            SpinPhase::Stopped => "stopped",
        }
    }
}

impl core::fmt::Display for SpinPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
