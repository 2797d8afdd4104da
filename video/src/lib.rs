#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

use core::fmt;

pub mod backend;
pub mod reel_view;

pub use backend::ReelBackend;
pub use reel_view::{ReelLayout, ReelView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoError {
    /// The backend has no drawable surface (zero size or detached).
    NoSurface,
    Invalid,
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::NoSurface => f.write_str("no drawable surface"),
            VideoError::Invalid => f.write_str("invalid draw request"),
        }
    }
}

pub type VideoResult<T = ()> = Result<T, VideoError>;
