use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::settings::DisplayMode;

/// Remaining eligibility of one participant.
///
/// A tagged variant instead of an infinite float so that persistence and
/// comparisons stay well defined. Serialized as `{"bounded": n}` or
/// `"unbounded"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remaining {
    Bounded(u32),
    Unbounded,
}

impl Remaining {
    /// Eligibility granted by a ticket quantity; `0` means unlimited.
    pub const fn from_quantity(quantity: u32) -> Self {
        if quantity == 0 {
            Remaining::Unbounded
        } else {
            Remaining::Bounded(quantity)
        }
    }

    #[inline]
    pub const fn is_eligible(self) -> bool {
        match self {
            Remaining::Unbounded => true,
            Remaining::Bounded(n) => n > 0,
        }
    }

    #[inline]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Remaining::Unbounded)
    }

    /// Consume one selection. Unbounded stays unbounded, zero stays zero.
    pub fn consume(&mut self) {
        if let Remaining::Bounded(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// One raffle entrant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub phone: String,
    /// Ticket count; `0` means unlimited eligibility.
    pub quantity: u32,
    pub remaining: Remaining,
}

impl Participant {
    /// Build a participant with full eligibility for `quantity`.
    ///
    /// Returns `None` when both `name` and `phone` are blank, since such a
    /// row cannot identify anybody.
    pub fn new(name: &str, phone: &str, quantity: u32) -> Option<Self> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() && phone.is_empty() {
            return None;
        }
        Some(Self {
            name: String::from(name),
            phone: String::from(phone),
            quantity,
            remaining: Remaining::from_quantity(quantity),
        })
    }

    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.remaining.is_eligible()
    }

    /// Restore eligibility to what the ticket quantity grants.
    pub fn reset_eligibility(&mut self) {
        self.remaining = Remaining::from_quantity(self.quantity);
    }

    /// Text shown for this participant, falling back to the other field
    /// when the preferred one is blank.
    pub fn label(&self, mode: DisplayMode) -> &str {
        let (preferred, fallback) = match mode {
            DisplayMode::Name => (&self.name, &self.phone),
            DisplayMode::Phone => (&self.phone, &self.name),
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }
}
