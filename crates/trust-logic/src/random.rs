//! Random sources for automated agents
//!
//! Sessions are unseeded by default (OS entropy). A session seed makes every
//! random agent reproducible while keeping agents independent of each other.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build the generator for the agent at `index`.
///
/// Same seed + index = same sequence. Different indices under one seed get
/// unrelated streams.
pub fn agent_rng(seed: Option<u64>, index: u32) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(mix(seed, index)),
        None => StdRng::from_os_rng(),
    }
}

fn mix(seed: u64, index: u32) -> u64 {
    let mut state = seed ^ (index as u64).wrapping_mul(0x517cc1b727220a95);
    // xorshift64* finalizer
    state ^= state >> 12;
    state ^= state << 25;
    state ^= state >> 27;
    state.wrapping_mul(0x2545f4914f6cdd1d)
}
