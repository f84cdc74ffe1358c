//! Deterministic random number generation for seeded opponent policies.
//!
//! Combat resolution itself never rolls dice. The only consumer is
//! [`AiPolicy::Seeded`](crate::combat::AiPolicy::Seeded), which must pick the
//! same action for the same seed, turn, and actor across replays.

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// Stateless: every call derives its output from the seed passed in, so
/// callers mix turn and actor into the seed with [`compute_seed`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }

    /// Index in `0..len`. Returns 0 for an empty range.
    pub fn index(seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        Self::next_u32(seed) as usize % len
    }
}

/// Mixes a base seed with the turn counter, acting entity, and a context
/// discriminator into a single seed.
pub fn compute_seed(base: u64, turn: u64, actor: u32, context: u32) -> u64 {
    let mut hash = base;
    hash ^= turn.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
