//! Raffle data model shared between the engine, the presentation layer and
//! the host.
//!
//! Everything persisted or handed across a crate boundary is defined here so
//! the storage format has a single source of truth. The crate is `no_std`
//! (with `alloc`) so the engine can be embedded in constrained hosts.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod participant;
pub mod phase;
pub mod settings;
pub mod winner;

pub use participant::{Participant, Remaining};
pub use phase::{POOL_CENTER, POOL_SIZE, SpinPhase, VIEWPORT_ITEMS};
pub use settings::{Background, DisplayMode, Settings, SettingsFlags};
pub use winner::WinnerRecord;
