//! Home-slot functions mapping a string key into `[0, capacity)`.

/// Which function a table uses to place keys. Fixed for the lifetime of a
/// table so earlier placements stay reachable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashStrategy {
    /// Sum of the key's bytes, modulo capacity.
    #[default]
    ByteSum,
    /// Polynomial rolling hash with base 31, reduced modulo capacity at
    /// every step. Spreads anagrams and near-identical keys apart.
    Polynomial,
}

impl HashStrategy {
    /// Home slot of `key`. An empty key or a zero capacity maps to `0`.
    #[inline]
    pub fn hash(self, key: &str, capacity: usize) -> usize {
        match self {
            HashStrategy::ByteSum => byte_sum(key, capacity),
            HashStrategy::Polynomial => polynomial(key, capacity),
        }
    }
}

pub fn byte_sum(key: &str, capacity: usize) -> usize {
    if key.is_empty() || capacity == 0 {
        return 0;
    }
    let sum: u64 = key.bytes().map(u64::from).sum();
    (sum % capacity as u64) as usize
}

const BASE: u64 = 31;

pub fn polynomial(key: &str, capacity: usize) -> usize {
    if key.is_empty() || capacity == 0 {
        return 0;
    }
    let m = capacity as u64;
    let mut value = 0u64;
    let mut power = 1u64;
    for b in key.bytes() {
        value = (value + u64::from(b) * power) % m;
        power = (power * BASE) % m;
    }
    value as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_inputs_map_to_zero() {
        for s in [HashStrategy::ByteSum, HashStrategy::Polynomial] {
            assert_eq!(s.hash("", 10), 0);
            assert_eq!(s.hash("alice", 0), 0);
        }
    }

    #[test]
    fn byte_sum_is_order_insensitive() {
        // 'a' + 'b' + 'c' = 294
        assert_eq!(byte_sum("abc", 7), 0);
        assert_eq!(byte_sum("cab", 7), 0);
        assert_eq!(byte_sum("abc", 1000), 294);
    }

    #[test]
    fn polynomial_separates_anagrams() {
        assert_eq!(polynomial("abc", 7), 1);
        assert_eq!(polynomial("cab", 7), 5);
    }

    #[test]
    fn results_stay_in_range() {
        for cap in 1..40 {
            for key in ["a", "Alice", "0987654321", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
                assert!(byte_sum(key, cap) < cap);
                assert!(polynomial(key, cap) < cap);
            }
        }
    }
}
