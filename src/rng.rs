//! Seeded random stream for world generation
//!
//! A small linear-congruential generator. Every draw made while building a
//! world goes through one of these, so the whole output is a pure function of
//! the seed and the order of draws.

/// LCG multiplier
const MULTIPLIER: i64 = 9301;
/// LCG increment
const INCREMENT: i64 = 49297;
/// LCG modulus (also the divisor that maps the state into [0, 1))
const MODULUS: i64 = 233280;

/// Deterministic pseudo-random stream of floats in [0, 1).
///
/// The stream is deliberately not `Clone`: whoever holds `&mut RandomStream`
/// owns the sequence, and handing it to the next pass is an explicit borrow.
#[derive(Debug)]
pub struct RandomStream {
    state: i64,
}

impl RandomStream {
    pub fn new(seed: i64) -> Self {
        Self { state: seed }
    }

    /// Advance the recurrence and return the next value in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            .rem_euclid(MODULUS);
        self.state as f64 / MODULUS as f64
    }

    /// Integer in the half-open range `[lo, hi)`. Returns `lo` for an empty range.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo;
        let offset = (self.next() * span as f64) as usize;
        lo + offset.min(span - 1)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Pick a uniformly random element.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range(0, items.len());
        items.get(idx)
    }

    /// Weighted draw from `(value, weight)` pairs.
    ///
    /// Weights need not sum to one. Falls back to the last entry when rounding
    /// leaves the roll past the final bucket.
    pub fn weighted<T: Copy>(&mut self, table: &[(T, f64)]) -> Option<T> {
        let total: f64 = table.iter().map(|(_, w)| w.max(0.0)).sum();
        if table.is_empty() || total <= 0.0 {
            return None;
        }

        let mut roll = self.next() * total;
        for &(value, weight) in table {
            let weight = weight.max(0.0);
            if roll < weight {
                return Some(value);
            }
            roll -= weight;
        }

        table.last().map(|&(value, _)| value)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomStream::new(1234);
        let mut b = RandomStream::new(1234);
        for _ in 0..1000 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        for seed in [0i64, 1, -1, 42, i32::MAX as i64, i64::MIN, i64::MAX] {
            let mut rng = RandomStream::new(seed);
            for _ in 0..500 {
                let v = rng.next();
                assert!((0.0..1.0).contains(&v), "seed {} produced {}", seed, v);
            }
        }
    }

    #[test]
    fn test_first_value_matches_recurrence() {
        let mut rng = RandomStream::new(1);
        // (1 * 9301 + 49297) % 233280 = 58598
        assert_eq!(rng.next(), 58598.0 / 233280.0);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = RandomStream::new(99);
        for _ in 0..1000 {
            let v = rng.range(3, 9);
            assert!((3..9).contains(&v));
        }
        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range(7, 2), 7);
    }

    #[test]
    fn test_weighted_respects_zero_weights() {
        let mut rng = RandomStream::new(7);
        for _ in 0..500 {
            let v = rng.weighted(&[('a', 0.0), ('b', 1.0), ('c', 0.0)]);
            assert_eq!(v, Some('b'));
        }
        assert_eq!(rng.weighted::<char>(&[]), None);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = RandomStream::new(5);
        let mut values: Vec<u32> = (0..64).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
    }
}
