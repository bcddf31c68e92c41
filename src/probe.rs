//! Linear probing: `probe(h, i) = (h + i) mod capacity`.

/// Slot examined on `attempt` (0 = home slot). Zero capacity yields `0`.
#[inline]
pub fn linear_probe(home: usize, attempt: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    (home % capacity + attempt % capacity) % capacity
}

/// Incremental form of [`linear_probe`]: the slot after `current`.
#[inline]
pub fn next_probe(current: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    (current + 1) % capacity
}

/// Bounded walk over a probe chain, yielding `(attempt, slot)`.
///
/// Stops after `capacity` slots, so every caller terminates even when no
/// slot resolves the operation.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    slot: usize,
    attempt: usize,
    capacity: usize,
}

impl ProbeSeq {
    pub fn new(home: usize, capacity: usize) -> Self {
        Self {
            slot: linear_probe(home, 0, capacity),
            attempt: 0,
            capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.capacity {
            return None;
        }
        let item = (self.attempt, self.slot);
        self.attempt += 1;
        self.slot = next_probe(self.slot, self.capacity);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.capacity - self.attempt;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for ProbeSeq {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_modulo_capacity() {
        assert_eq!(linear_probe(3, 0, 5), 3);
        assert_eq!(linear_probe(3, 2, 5), 0);
        assert_eq!(next_probe(4, 5), 0);
        assert_eq!(linear_probe(3, 1, 0), 0);
        assert_eq!(next_probe(3, 0), 0);
    }

    #[test]
    fn incremental_walk_matches_formula() {
        for cap in 1..12 {
            for home in 0..cap {
                let walked: Vec<_> = ProbeSeq::new(home, cap).collect();
                assert_eq!(walked.len(), cap);
                for (attempt, slot) in walked {
                    assert_eq!(slot, linear_probe(home, attempt, cap));
                }
            }
        }
    }

    #[test]
    fn visits_every_slot_once() {
        let mut seen: Vec<usize> = ProbeSeq::new(7, 10).map(|(_, s)| s).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(ProbeSeq::new(0, 0).count(), 0);
    }
}
