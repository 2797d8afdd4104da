//! Virtual reel: an unbounded sequence of logical slots rendered through a
//! fixed pool of [`POOL_SIZE`] display elements.
//!
//! Slot contents come from a shuffled permutation of participant indices read
//! cyclically. Exactly one slot may be overridden to hold the pre-selected
//! winner; it is fixed when deceleration begins so that nothing on screen
//! hints at the outcome while the reel spins at full speed.
//!
//! A frame costs [`POOL_SIZE`] lookups regardless of roster size.

use alloc::vec::Vec;

use raffle_abi::{POOL_CENTER, POOL_SIZE, VIEWPORT_ITEMS};
use raffle_lib::RandomSource;

/// Relative tolerance used when mapping a position onto a slot boundary.
const SLOT_EPSILON: f64 = 1e-9;

/// Logical slot under the viewport center for a scroll position.
///
/// Positions that are an exact multiple of `item_height` up to float noise
/// map onto that multiple, so a landing on `slot * item_height` always
/// resolves to `slot`.
pub fn logical_slot_at(position: f64, item_height: f64) -> i64 {
    let raw = position / item_height;
    let nearest = round_half_up(raw);
    if abs(raw - nearest) <= SLOT_EPSILON * abs(nearest).max(1.0) {
        nearest as i64
    } else {
        floor(raw) as i64
    }
}

// The float rounding methods live in std; these cover the range reel
// positions use.
pub(crate) fn floor(x: f64) -> f64 {
    let t = x as i64 as f64;
    if t > x { t - 1.0 } else { t }
}

fn round_half_up(x: f64) -> f64 {
    floor(x + 0.5)
}

pub(crate) fn abs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}

/// What the pool should show for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolFrame {
    /// Logical slot under the viewport center.
    pub center_slot: i64,
    /// Logical slot shown by each pool element, top to bottom.
    pub slots: [i64; POOL_SIZE],
    /// Participant index shown by each pool element; `None` when the roster
    /// is empty.
    pub entries: [Option<usize>; POOL_SIZE],
    /// Vertical translation of the pool container, in pixels, that puts
    /// element [`POOL_CENTER`] at the viewport's middle row.
    pub translate_y: f64,
    pub item_height: f64,
}

impl PoolFrame {
    pub fn center_entry(&self) -> Option<usize> {
        self.entries[POOL_CENTER]
    }

    /// Height of the visible viewport, in pixels.
    pub fn viewport_height(&self) -> f64 {
        self.item_height * VIEWPORT_ITEMS as f64
    }
}

#[derive(Debug, Clone)]
pub struct VirtualReel {
    cycle: Vec<usize>,
    /// Slot overridden with `winner`, once fixed.
    winner_slot: Option<i64>,
    winner: Option<usize>,
    item_height: f64,
}

impl VirtualReel {
    pub fn new(item_height: f64) -> Self {
        Self {
            cycle: Vec::new(),
            winner_slot: None,
            winner: None,
            item_height,
        }
    }

    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    /// Shuffle a fresh permutation of `[0, participant_count)`. Any fixed
    /// winner slot is released.
    pub fn build_cycle<R: RandomSource>(&mut self, participant_count: usize, rng: &mut R) {
        self.cycle.clear();
        self.cycle.extend(0..participant_count);
        rng.shuffle(&mut self.cycle);
        self.winner_slot = None;
        self.winner = None;
    }

    pub fn cycle(&self) -> &[usize] {
        &self.cycle
    }

    /// Pin `winner` to logical `slot`.
    pub fn fix_winner(&mut self, slot: i64, winner: usize) {
        self.winner_slot = Some(slot);
        self.winner = Some(winner);
    }

    pub fn winner_slot(&self) -> Option<i64> {
        self.winner_slot
    }

    /// Forget cycle and winner; the reel shows nothing until rebuilt.
    pub fn clear(&mut self) {
        self.cycle.clear();
        self.winner_slot = None;
        self.winner = None;
    }

    /// Participant index shown at logical `slot`.
    pub fn resolve_logical_slot(&self, slot: i64) -> Option<usize> {
        if self.winner_slot == Some(slot) {
            return self.winner;
        }
        if self.cycle.is_empty() {
            return None;
        }
        let len = self.cycle.len() as i64;
        Some(self.cycle[slot.rem_euclid(len) as usize])
    }

    pub fn center_slot(&self, position: f64) -> i64 {
        logical_slot_at(position, self.item_height)
    }

    /// Compute the pool contents and container offset for `position`.
    pub fn render_window(&self, position: f64) -> PoolFrame {
        let center_slot = self.center_slot(position);
        let sub_offset = (position - center_slot as f64 * self.item_height).max(0.0);

        let mut slots = [0i64; POOL_SIZE];
        let mut entries = [None; POOL_SIZE];
        for (i, (slot, entry)) in slots.iter_mut().zip(entries.iter_mut()).enumerate() {
            *slot = center_slot + i as i64 - POOL_CENTER as i64;
            *entry = self.resolve_logical_slot(*slot);
        }

        let middle_row = (VIEWPORT_ITEMS / 2) as f64;
        let translate_y = (middle_row - POOL_CENTER as f64) * self.item_height - sub_offset;

        PoolFrame {
            center_slot,
            slots,
            entries,
            translate_y,
            item_height: self.item_height,
        }
    }
}
