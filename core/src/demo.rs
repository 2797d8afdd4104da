//! Generated roster for first launch.
//!
//! Same shape as imported data, names drawn from a fixed pool. Not for
//! production draws.

use alloc::format;
use alloc::vec::Vec;

use raffle_abi::Participant;
use raffle_lib::RandomSource;

const FIRST_NAMES: [&str; 16] = [
    "דני", "נועה", "יוסי", "מיכל", "אבי", "תמר", "רון", "שירה", "Dana", "Omer", "Maya", "Eitan",
    "Yael", "Noam", "Lior", "Tal",
];

const LAST_NAMES: [&str; 12] = [
    "כהן", "לוי", "מזרחי", "פרץ", "ביטון", "אברהם", "Cohen", "Levi", "Friedman", "Shapiro",
    "Katz", "Mor",
];

const PHONE_PREFIXES: [&str; 6] = ["050", "052", "053", "054", "055", "058"];

/// Highest ticket count handed out; `0` (unlimited) is included.
const MAX_DEMO_QUANTITY: u64 = 3;

fn pick<'a, R: RandomSource>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.next_below(pool.len() as u64) as usize]
}

pub fn generate<R: RandomSource>(count: usize, rng: &mut R) -> Vec<Participant> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
        let phone = format!(
            "{}-{:07}",
            pick(rng, &PHONE_PREFIXES),
            rng.next_below(10_000_000)
        );
        let quantity = rng.next_below(MAX_DEMO_QUANTITY + 1) as u32;
        if let Some(p) = Participant::new(&name, &phone, quantity) {
            out.push(p);
        }
    }
    out
}
