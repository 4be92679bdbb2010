//! Deterministic RNG for combat and shop rolls
//!
//! This module provides a no_std compatible RNG trait and implementation.
//! The same seed always reproduces the same session.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Trait for random number generation inside the simulation
pub trait BattleRng {
    /// Generate a random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a random number in range [0, max)
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }

    /// Generate a random number in range [min, max], both ends included.
    ///
    /// A reversed range is treated as its mirror, and `min == max` draws nothing.
    fn gen_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        let span = (hi as i64 - lo as i64 + 1) as u64;
        lo + (self.next_u32() as u64 % span) as i32
    }
}

/// XorShift32 RNG - simple, fast, deterministic
///
/// This is suitable for game logic where cryptographic security is not needed.
#[derive(Debug, Clone, Encode, Decode, TypeInfo)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Create a new RNG from a u64 seed
    ///
    /// The seed is combined into a u32, ensuring state is never 0.
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }
}

impl BattleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_deterministic() {
        let mut rng1 = XorShiftRng::seed_from_u64(12345);
        let mut rng2 = XorShiftRng::seed_from_u64(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = XorShiftRng::seed_from_u64(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_gen_inclusive_bounds() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let mut seen_min = false;
        let mut seen_max = false;

        for _ in 0..500 {
            let val = rng.gen_inclusive(3, 6);
            assert!((3..=6).contains(&val));
            seen_min |= val == 3;
            seen_max |= val == 6;
        }

        assert!(seen_min && seen_max, "both ends of the range must be reachable");
    }

    #[test]
    fn test_gen_inclusive_degenerate_range() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(rng.gen_inclusive(10, 10), 10);
            assert!((-4..=2).contains(&rng.gen_inclusive(2, -4)));
        }
    }
}
