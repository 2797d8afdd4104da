#![allow(dead_code)]

use raffle_abi::Participant;
use raffle_core::{MemoryStorage, PoolSink, PoolView, RaffleEngine, SpinConfig, TriggerOutcome};
use raffle_lib::{FixedClock, Lfsr64};

pub type Engine = RaffleEngine<MemoryStorage, Lfsr64, FixedClock>;

pub const EPOCH_MS: u64 = 1_700_000_000_000;

/// Remembers what the center pool element showed on the latest frame.
#[derive(Default)]
pub struct CenterSink {
    pub frames: u32,
    pub center: Option<usize>,
    pub center_label: String,
}

impl PoolSink for CenterSink {
    fn present(&mut self, view: &PoolView<'_>) {
        self.frames += 1;
        self.center = view.frame.center_entry();
        self.center_label = view.label(raffle_abi::POOL_CENTER).to_string();
    }
}

pub fn people(spec: &[(&str, u32)]) -> Vec<Participant> {
    spec.iter()
        .map(|&(name, qty)| Participant::new(name, "", qty).unwrap())
        .collect()
}

pub fn numbered(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| Participant::new(&format!("N{i}"), &format!("05{i:08}"), 0).unwrap())
        .collect()
}

pub fn engine(storage: MemoryStorage, seed: u64, config: SpinConfig) -> Engine {
    let mut engine = Engine::new(storage, Lfsr64::with_seed(seed), FixedClock::at(EPOCH_MS), config);
    engine.load(false);
    engine
}

pub fn engine_with(roster: Vec<Participant>, seed: u64) -> Engine {
    let mut engine = engine(MemoryStorage::new(), seed, SpinConfig::default());
    engine.replace_all(roster).unwrap();
    engine
}

/// Run one complete draw, spinning `spin_frames` frames before the second
/// trigger. Returns the winner chosen at spin start.
pub fn draw(engine: &mut Engine, sink: &mut CenterSink, spin_frames: u32) -> usize {
    let winner = match engine.trigger().unwrap() {
        TriggerOutcome::Started { winner } => winner,
        other => panic!("spin did not start: {other:?}"),
    };
    for _ in 0..spin_frames {
        assert!(engine.frame(sink));
    }
    assert!(matches!(engine.trigger().unwrap(), TriggerOutcome::Decelerating { .. }));
    let mut guard = 0;
    while engine.frame(sink) {
        guard += 1;
        assert!(guard < 5_000, "spin never landed");
    }
    engine.clock_mut().advance(1_000);
    winner
}
