//! Outcome histograms produced by the simulation harness.

use std::collections::BTreeMap;
use std::fmt;

/// A counter of trial outcomes keyed by an integer statistic, e.g. people
/// contacted before recovery.
///
/// The domain is seeded with explicit zero bins so that values that never
/// occur still show up when the histogram is printed or summed; keys are
/// ordered, so iteration and display are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    bins: BTreeMap<usize, u64>,
}

impl Histogram {
    /// An empty histogram with zero bins over `1..=max`.
    pub fn with_domain(max: usize) -> Self {
        Self {
            bins: (1..=max).map(|k| (k, 0)).collect(),
        }
    }

    /// Counts one outcome at `key`, creating the bin if the key falls
    /// outside the seeded domain.
    pub fn record(&mut self, key: usize) {
        *self.bins.entry(key).or_insert(0) += 1;
    }

    /// Adds every count of `other` into `self`.
    pub fn merge(&mut self, other: &Histogram) {
        for (&key, &count) in &other.bins {
            *self.bins.entry(key).or_insert(0) += count;
        }
    }

    /// The count recorded at `key`.
    pub fn count(&self, key: usize) -> u64 {
        self.bins.get(&key).copied().unwrap_or(0)
    }

    /// Total count over all bins.
    pub fn total(&self) -> u64 {
        self.bins.values().sum()
    }

    /// Ordered `(key, count)` pairs, zero bins included.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.bins.iter().map(|(&k, &v)| (k, v))
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, count) in self.iter() {
            writeln!(f, "{key}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_seeded_with_zeros() {
        let hist = Histogram::with_domain(4);
        assert_eq!(hist.iter().collect::<Vec<_>>(), vec![(1, 0), (2, 0), (3, 0), (4, 0)]);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn record_and_count() {
        let mut hist = Histogram::with_domain(3);
        hist.record(2);
        hist.record(2);
        hist.record(3);
        assert_eq!(hist.count(1), 0);
        assert_eq!(hist.count(2), 2);
        assert_eq!(hist.count(3), 1);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn record_outside_domain_creates_the_bin() {
        let mut hist = Histogram::with_domain(2);
        hist.record(7);
        assert_eq!(hist.count(7), 1);
        assert_eq!(hist.iter().count(), 3);
    }

    #[test]
    fn merge_adds_counts_bin_by_bin() {
        let mut a = Histogram::with_domain(3);
        a.record(1);
        a.record(3);
        let mut b = Histogram::with_domain(3);
        b.record(3);
        b.record(4);
        a.merge(&b);
        assert_eq!(a.count(1), 1);
        assert_eq!(a.count(3), 2);
        assert_eq!(a.count(4), 1);
        assert_eq!(a.total(), 4);
    }
}
