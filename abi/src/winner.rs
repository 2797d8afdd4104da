use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::participant::Participant;

/// Immutable snapshot of a completed draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub name: String,
    pub phone: String,
    /// Wall-clock completion time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Starts at 1 and increases by one per completed draw.
    pub draw_number: u32,
}

impl WinnerRecord {
    pub fn snapshot(participant: &Participant, timestamp_ms: u64, draw_number: u32) -> Self {
        Self {
            name: participant.name.clone(),
            phone: participant.phone.clone(),
            timestamp_ms,
            draw_number,
        }
    }
}
