//! Display-refresh scheduling.
//!
//! Models the host's "call me on the next refresh" primitive as a single
//! pending slot. Requesting a frame replaces whatever was pending, so there
//! is never more than one live callback chain; a handle from a replaced or
//! cancelled request is stale and fires nothing.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct FrameScheduler {
    generation: u64,
    pending: Option<FrameHandle>,
    fired: u64,
}

impl FrameScheduler {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
            fired: 0,
        }
    }

    /// Schedule a callback for the next refresh, replacing any pending one.
    pub fn request(&mut self) -> FrameHandle {
        self.generation = self.generation.wrapping_add(1);
        let handle = FrameHandle(self.generation);
        self.pending = Some(handle);
        handle
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Consume `handle` if it is the live one. A callback that wants to keep
    /// animating must request again.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.fired += 1;
        true
    }

    /// Consume whatever is pending; the host's refresh entry point.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        let handle = self.pending?;
        self.fire(handle).then_some(handle)
    }

    /// Callbacks fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}
