//! Uniform random draws over bounded integer ranges
//!
//! The registry has no "give me one at random" primitive, so uniformity has
//! to come from our side of the wire: draw a fixed-width random value, map
//! it into [0, 1), scale into the target span, floor. No rejection loop,
//! one draw per sample.
//!
//! The entropy source is a trait so production code can use the operating
//! system CSPRNG while tests run on a seeded deterministic stream.

use rand::rngs::OsRng;
use rand::RngCore;

/// Source of uniformly distributed 64-bit values
pub trait UniformSource {
    fn next_u64(&mut self) -> u64;
}

/// Operating-system entropy, cryptographically strong
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl UniformSource for OsEntropy {
    fn next_u64(&mut self) -> u64 {
        OsRng.next_u64()
    }
}

/// Seeded SplitMix64 stream for deterministic tests
#[derive(Clone, Debug)]
pub struct SeededEntropy {
    state: u64,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl UniformSource for SeededEntropy {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Draw one integer uniformly from the inclusive range [lo, hi].
///
/// The top 53 bits of the draw become a float in [0, 1), which is scaled
/// into the span and floored. The clamp guards the open upper bound against
/// rounding on very wide spans.
pub fn uniform_in_range<S: UniformSource>(source: &mut S, lo: u64, hi: u64) -> u64 {
    debug_assert!(lo <= hi);
    let span = (hi - lo) as u128 + 1;
    let unit = (source.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
    let offset = (unit * span as f64) as u64;
    lo + offset.min((span - 1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_stays_in_range() {
        let mut rng = SeededEntropy::new(42);
        for _ in 0..10_000 {
            let v = uniform_in_range(&mut rng, 1_000_000, 2_399_999);
            assert!((1_000_000..=2_399_999).contains(&v));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = SeededEntropy::new(7);
        for _ in 0..100 {
            assert_eq!(uniform_in_range(&mut rng, 5, 5), 5);
        }
    }

    #[test]
    fn test_full_width_range_does_not_overflow() {
        let mut rng = SeededEntropy::new(99);
        for _ in 0..1_000 {
            uniform_in_range(&mut rng, 0, u64::MAX);
            let v = uniform_in_range(&mut rng, u64::MAX - 10, u64::MAX);
            assert!(v >= u64::MAX - 10);
        }
    }

    #[test]
    fn test_os_entropy_in_range() {
        let mut rng = OsEntropy;
        for _ in 0..1_000 {
            let v = uniform_in_range(&mut rng, 0, 9);
            assert!(v <= 9);
        }
    }

    /// Chi-square goodness of fit over ten buckets. With 10,000 draws the
    /// expected count per bucket is 1,000; the statistic must stay under
    /// the critical value for df=9 at p=0.001 (27.88). Deterministic seed,
    /// so this is not flaky.
    #[test]
    fn test_chi_square_uniformity() {
        let mut rng = SeededEntropy::new(12345);
        let mut buckets = [0u64; 10];
        let trials = 10_000u64;
        for _ in 0..trials {
            let v = uniform_in_range(&mut rng, 0, 9);
            buckets[v as usize] += 1;
        }

        let expected = trials as f64 / 10.0;
        let chi_square: f64 = buckets
            .iter()
            .map(|&obs| {
                let diff = obs as f64 - expected;
                diff * diff / expected
            })
            .sum();

        assert!(
            chi_square < 27.88,
            "chi-square {} exceeds critical value; buckets {:?}",
            chi_square,
            buckets
        );
    }

    #[test]
    fn test_seeded_stream_is_reproducible() {
        let mut a = SeededEntropy::new(2024);
        let mut b = SeededEntropy::new(2024);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
