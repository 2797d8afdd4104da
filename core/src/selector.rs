//! Uniform winner selection over the currently eligible participants.
//!
//! Ticket quantity caps how often someone can win; it never weights a single
//! draw.

use raffle_abi::Participant;
use raffle_lib::RandomSource;

pub fn count_eligible(participants: &[Participant]) -> usize {
    participants.iter().filter(|p| p.is_eligible()).count()
}

/// Pick one eligible participant uniformly at random.
///
/// Returns `None` when nobody is eligible; a spin must not start then.
pub fn select_winner<R: RandomSource>(participants: &[Participant], rng: &mut R) -> Option<usize> {
    let eligible = count_eligible(participants);
    if eligible == 0 {
        return None;
    }
    let nth = rng.next_below(eligible as u64) as usize;
    participants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_eligible())
        .nth(nth)
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{roster, seeded_rng};
    use alloc::vec;
    use raffle_abi::Remaining;

    #[test]
    fn empty_pool_yields_none() {
        let mut rng = seeded_rng();
        assert_eq!(select_winner(&[], &mut rng), None);

        let mut depleted = roster(&[1, 2]);
        for p in depleted.iter_mut() {
            p.remaining = Remaining::Bounded(0);
        }
        assert_eq!(count_eligible(&depleted), 0);
        assert_eq!(select_winner(&depleted, &mut rng), None);
    }

    #[test]
    fn only_eligible_participants_win() {
        let mut rng = seeded_rng();
        let mut people = roster(&[1, 1, 1, 1]);
        people[0].remaining = Remaining::Bounded(0);
        people[2].remaining = Remaining::Bounded(0);
        for _ in 0..500 {
            let idx = select_winner(&people, &mut rng).unwrap();
            assert!(idx == 1 || idx == 3);
        }
    }

    #[test]
    fn selection_is_uniform_not_weighted() {
        // Quantities differ wildly; probabilities must not.
        let people = roster(&[0, 1, 50, 0, 3]);
        let k = people.len();
        let trials = 100_000u32;
        let mut rng = seeded_rng();
        let mut wins = vec![0u32; k];
        for _ in 0..trials {
            wins[select_winner(&people, &mut rng).unwrap()] += 1;
        }

        let expected = f64::from(trials) / k as f64;
        let chi_square: f64 = wins
            .iter()
            .map(|&w| {
                let d = f64::from(w) - expected;
                d * d / expected
            })
            .sum();
        // 4 degrees of freedom, p = 0.001.
        assert!(chi_square < 18.47, "chi-square {} too large: {:?}", chi_square, wins);
    }
}
