//! Deterministic random number generation
//!
//! The Monte Carlo estimator is the only randomness consumer in the engine,
//! and all of its randomness derives from an explicit seed so runs are
//! reproducible under test. Uses SplitMix64: portable, fast, and of good
//! statistical quality for simulation purposes.

use std::fmt;

/// A deterministic pseudo-random number stream.
///
/// Streams are created from a seed (optionally mixed with a semantic label)
/// and produce a reproducible sequence. Each generation call advances the
/// stream state; streams never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngStream {
    state: u64,
}

impl RngStream {
    /// Create a stream from a seed.
    #[inline]
    pub const fn new(seed: u64) -> Self {
        // SplitMix64 requires a non-zero state
        let state = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state }
    }

    /// Create a stream by mixing a parent seed with a label, so independent
    /// consumers of the same seed get independent sequences.
    #[inline]
    pub fn derive(parent_seed: u64, label: &str) -> Self {
        let mixed = splitmix64_mix(parent_seed ^ fnv1a64(label.as_bytes()));
        Self::new(mixed)
    }

    /// Current internal state, for debugging and tests.
    #[inline]
    pub const fn state(&self) -> u64 {
        self.state
    }

    /// Next random u64.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        splitmix64_mix(self.state)
    }

    /// Uniform f64 in [0, 1).
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        // Upper 53 bits for full f64 mantissa precision
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform f64 in [min, max).
    #[inline]
    pub fn uniform_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.uniform() * (max - min)
    }
}

impl fmt::Display for RngStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rng:{:016x}", self.state)
    }
}

/// SplitMix64 mixing function.
#[inline]
const fn splitmix64_mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Stable FNV-1a 64-bit hash for label derivation. Not cryptographic.
#[inline]
const fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    let mut i = 0usize;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
        i += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_determinism() {
        let mut a = RngStream::new(42);
        let mut b = RngStream::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_uniform_bounds() {
        let mut stream = RngStream::new(12345);
        for _ in 0..1000 {
            let v = stream.uniform();
            assert!((0.0..1.0).contains(&v));
        }
        for _ in 0..1000 {
            let v = stream.uniform_range(10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
        }
    }

    #[test]
    fn test_derive_creates_independent_streams() {
        let a = RngStream::derive(12345, "economic");
        let b = RngStream::derive(12345, "social");
        assert_ne!(a.state(), b.state());

        let c = RngStream::derive(12345, "economic");
        assert_eq!(a.state(), c.state());
    }

    /// Regression: these values are fixed by the SplitMix64 algorithm.
    /// If this fails after a change, determinism has been broken.
    #[test]
    fn test_determinism_regression() {
        let mut stream = RngStream::new(0xDEADBEEF);
        assert_eq!(stream.next_u64(), 0x4ADFB90F68C9EB9B);
        assert_eq!(stream.next_u64(), 0xDE586A3141A10922);
        assert_eq!(stream.next_u64(), 0x021FBC2F8E1CFC1D);
    }
}
