//! Raffle engine: participant roster, fair winner selection, a virtualized
//! spinning reel with frame-driven physics, and the draw recorder.
//!
//! Everything here is `no_std` + `alloc`; storage, randomness, time and
//! rendering reach the outside world through small traits the host
//! implements.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod demo;
pub mod engine;
pub mod error;
pub mod export;
pub mod frame;
pub mod import;
pub mod recorder;
pub mod reel;
pub mod selector;
pub mod spin;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_fixtures;

pub use engine::{EngineEvent, PoolSink, PoolView, RaffleEngine, TriggerOutcome};
pub use error::{RaffleError, RaffleResult, StorageError, StorageResult};
pub use frame::{FrameHandle, FrameScheduler};
pub use recorder::{CommittedDraw, commit_draw, consumes_selection};
pub use reel::{PoolFrame, VirtualReel, logical_slot_at};
pub use selector::{count_eligible, select_winner};
pub use spin::{FrameStep, SpinConfig, SpinController};
pub use storage::{MemoryStorage, StateStorage};
pub use store::{LoadReport, LoadSource, ParticipantStore, RosterStats};
