//! Uniform random source for winner selection and reel shuffles.
//!
//! The generator is a 64-bit xorshift register. It is not meant to resist
//! prediction; the raffle runs client-side and makes no fairness guarantees
//! beyond uniformity.

use spin::{Mutex, Once};

const DEFAULT_LFSR_SEED: u64 = 0xACE1u64;

/// Source of uniformly distributed 64-bit words.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform value in `[0, bound)`. Returns `0` when `bound` is zero.
    ///
    /// Draws falling into the incomplete top bucket are rejected so every
    /// residue is equally likely.
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let roll = self.next_u64();
            if roll < zone {
                return roll % bound;
            }
        }
    }

    /// Fisher-Yates shuffle in place.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Lfsr64 {
    state: u64,
}

impl Lfsr64 {
    pub fn with_seed(seed: u64) -> Self {
        let s = if seed == 0 { DEFAULT_LFSR_SEED } else { seed };
        Self { state: s }
    }

    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = if x == 0 { 0xfeedc0de } else { x };
        self.state
    }
}

impl RandomSource for Lfsr64 {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}

static RNG: Once<Mutex<Lfsr64>> = Once::new();

fn global() -> &'static Mutex<Lfsr64> {
    RNG.call_once(|| Mutex::new(Lfsr64::with_seed(DEFAULT_LFSR_SEED)))
}

/// Seed the process-wide generator. The host calls this once at startup
/// with whatever entropy it has (wall clock, crypto API).
pub fn random_seed(seed: u64) {
    *global().lock() = Lfsr64::with_seed(seed);
}

pub fn random_next() -> u64 {
    global().lock().next_u64()
}

/// Handle onto the process-wide generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        random_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn zero_seed_is_replaced() {
        let mut a = Lfsr64::with_seed(0);
        let mut b = Lfsr64::with_seed(DEFAULT_LFSR_SEED);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut rng = Lfsr64::with_seed(42);
        for bound in [1u64, 2, 3, 7, 10, 1000] {
            for _ in 0..500 {
                assert!(rng.next_below(bound) < bound);
            }
        }
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Lfsr64::with_seed(7);
        let mut items: Vec<u32> = (0..100).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<u32>>());
        assert_ne!(items, sorted);
    }

    #[test]
    fn next_below_is_roughly_uniform() {
        let mut rng = Lfsr64::with_seed(0xDEAD_BEEF);
        let mut counts = [0u32; 5];
        let trials = 50_000;
        for _ in 0..trials {
            counts[rng.next_below(5) as usize] += 1;
        }
        let expected = trials / 5;
        for c in counts {
            assert!(c.abs_diff(expected) < expected / 20, "bucket {} vs {}", c, expected);
        }
    }
}
