//! Shared helpers for unit tests.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use raffle_abi::{Participant, SpinPhase};
use raffle_lib::{FixedClock, Lfsr64};

use crate::engine::{PoolSink, PoolView, RaffleEngine};
use crate::reel::PoolFrame;
use crate::spin::SpinConfig;
use crate::storage::MemoryStorage;

pub const TEST_SEED: u64 = 0x5eed_cafe_f00d_0001;
pub const TEST_EPOCH_MS: u64 = 1_700_000_000_000;

pub type TestEngine = RaffleEngine<MemoryStorage, Lfsr64, FixedClock>;

pub fn seeded_rng() -> Lfsr64 {
    Lfsr64::with_seed(TEST_SEED)
}

pub fn participant(name: &str, quantity: u32) -> Participant {
    Participant::new(name, "", quantity).expect("fixture participant has a name")
}

/// Participants named `P0`, `P1`, ... with the given quantities.
pub fn roster(quantities: &[u32]) -> Vec<Participant> {
    quantities
        .iter()
        .enumerate()
        .map(|(i, &q)| {
            Participant::new(&format!("P{i}"), &format!("050-00000{i:02}"), q)
                .expect("fixture participant has a name")
        })
        .collect()
}

/// Engine over in-memory storage with `roster(quantities)` installed.
pub fn engine_with(quantities: &[u32]) -> TestEngine {
    let mut engine = TestEngine::new(
        MemoryStorage::new(),
        seeded_rng(),
        FixedClock::at(TEST_EPOCH_MS),
        SpinConfig::default(),
    );
    engine.load(false);
    engine
        .replace_all(roster(quantities))
        .expect("memory storage accepts writes");
    engine
}

#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub frame: PoolFrame,
    pub center_entry: Option<usize>,
    pub labels: Vec<String>,
    pub phase: SpinPhase,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<RecordedFrame>,
}

impl PoolSink for RecordingSink {
    fn present(&mut self, view: &PoolView<'_>) {
        self.frames.push(RecordedFrame {
            frame: *view.frame,
            center_entry: view.frame.center_entry(),
            labels: view.labels().iter().map(|l| l.to_string()).collect(),
            phase: view.phase,
        });
    }
}
