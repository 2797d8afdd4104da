//! Commit of a finished spin: consume eligibility, append history, persist.

use raffle_abi::{Participant, Settings, WinnerRecord};
use raffle_lib::{klog_error, klog_info};

use crate::error::StorageError;
use crate::store::{Doc, ParticipantStore};
use crate::storage::StateStorage;

/// Whether a win consumes one of the participant's selections.
///
/// Bounded-ticket participants always pay for a win. Unlimited-ticket
/// participants are spared only when reselection is allowed (their
/// eligibility is unbounded either way).
pub fn consumes_selection(settings: &Settings, participant: &Participant) -> bool {
    !settings.allow_reselect() || participant.quantity > 0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedDraw {
    pub participant: usize,
    pub record: WinnerRecord,
    /// The draw is committed in memory even when this is set.
    pub persist_error: Option<StorageError>,
}

/// Record `winner` as the outcome of a completed spin.
///
/// Returns `None` if the index no longer names a participant.
pub fn commit_draw<S: StateStorage>(
    store: &mut ParticipantStore<S>,
    winner: usize,
    timestamp_ms: u64,
) -> Option<CommittedDraw> {
    let settings = store.settings().clone();
    let draw_number = store.draw_counter() + 1;

    let Some(participant) = store.participant_mut(winner) else {
        klog_error!("recorder: winner index {} out of range", winner);
        return None;
    };
    if consumes_selection(&settings, participant) {
        participant.remaining.consume();
    }
    let record = WinnerRecord::snapshot(participant, timestamp_ms, draw_number);

    store.push_winner(record.clone());
    klog_info!("recorder: draw #{} -> participant {}", draw_number, winner);

    let persist_error = store
        .persist(&[Doc::Participants, Doc::Winners, Doc::DrawCounter])
        .err();

    Some(CommittedDraw {
        participant: winner,
        record,
        persist_error,
    })
}
