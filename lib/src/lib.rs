#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod config;
pub mod klog;
pub mod random;
pub mod ring_buffer;

pub use clock::{FixedClock, WallClock, frame_period_ms};
pub use config::{RaffleConfig, config_from_cmdline, parse_bool};
pub use klog::{KlogLevel, klog_get_level, klog_init, klog_register_backend, klog_set_level};
pub use random::{Lfsr64, RandomSource, SystemRandom, random_next, random_seed};
pub use ring_buffer::RingBuffer;
