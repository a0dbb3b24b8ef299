//! Seeded, explicitly threaded random number state
//!
//! The state is a value: drawing returns the next state instead of mutating a
//! hidden generator, so a `(state, inputs)` pair always replays identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Opaque PRNG state owned by the tick orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState(ChaCha8Rng);

/// Create the initial state for a battle seed
pub fn init_rng(seed: u64) -> RngState {
    RngState(ChaCha8Rng::seed_from_u64(seed))
}

/// Draw a value in `[0, 1)` and return it with the advanced state
pub fn next_random(state: &RngState) -> (f64, RngState) {
    let mut rng = state.0.clone();
    let value: f64 = rng.gen();
    (value, RngState(rng))
}

/// Pick an index in `0..count` with a single draw
///
/// `count` must be non-zero.
pub fn pick_index(state: &RngState, count: usize) -> (usize, RngState) {
    let (value, next) = next_random(state);
    let index = ((value * count as f64) as usize).min(count.saturating_sub(1));
    (index, next)
}
