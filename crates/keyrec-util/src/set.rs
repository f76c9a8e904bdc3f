//! Set-style operations over slices.
//!
//! The simulation tracks shares and subsecrets as append-only vectors and
//! reasons about them with set semantics. These helpers keep the order of
//! one of the inputs, which matters for reproducibility of the trials.

use itertools::Itertools;
use std::collections::HashSet;
use std::hash::Hash;

/// Returns the identity permutation `0..n`.
pub fn indices(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Returns `count` fresh identifiers starting at `offset`.
pub fn offset_range(count: usize, offset: u64) -> Vec<u64> {
    (offset..offset + count as u64).collect()
}

/// Elements of `b` that are also present in `a`, in `b`'s order.
///
/// Duplicates in `b` are kept; the engine only ever intersects
/// duplicate-free inputs.
pub fn intersection<T: Copy + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let members: HashSet<T> = a.iter().copied().collect();
    b.iter().copied().filter(|x| members.contains(x)).collect()
}

/// Elements of `a` that are not present in `b`, in `a`'s order.
pub fn difference<T: Copy + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let excluded: HashSet<T> = b.iter().copied().collect();
    a.iter().copied().filter(|x| !excluded.contains(x)).collect()
}

/// Number of entries strictly below `limit`.
///
/// People are indexed with trustees first, so counting entries below the
/// trustee count yields the number of trustees contacted.
pub fn count_less_than(xs: &[usize], limit: usize) -> usize {
    xs.iter().filter(|&&x| x < limit).count()
}

/// Whether the slice contains any repeated element.
pub fn has_duplicates<T: Copy + Eq + Hash>(xs: &[T]) -> bool {
    xs.iter().unique().count() != xs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn intersection_keeps_second_order() {
        assert_eq!(intersection(&[5, 1, 3], &[3, 4, 5]), vec![3, 5]);
        assert_eq!(intersection(&[1, 2], &[3, 4]), Vec::<i32>::new());
    }

    #[test]
    fn difference_keeps_first_order() {
        assert_eq!(difference(&[5, 1, 3, 2], &[1, 2]), vec![5, 3]);
        assert_eq!(difference(&[], &[1]), Vec::<i32>::new());
    }

    #[test]
    fn count_less_than_counts_trustees() {
        assert_eq!(count_less_than(&[0, 4, 2, 9], 3), 2);
        assert_eq!(count_less_than(&[], 3), 0);
    }

    #[test]
    fn offset_range_is_contiguous() {
        assert_eq!(offset_range(3, 7), vec![7, 8, 9]);
        assert!(offset_range(0, 7).is_empty());
    }

    proptest! {
        #[test]
        fn intersection_is_subset_of_both(a in proptest::collection::vec(0u64..50, 0..40),
                                          b in proptest::collection::vec(0u64..50, 0..40)) {
            let inter = intersection(&a, &b);
            for x in &inter {
                prop_assert!(a.contains(x));
                prop_assert!(b.contains(x));
            }
        }

        #[test]
        fn difference_disjoint_from_subtrahend(a in proptest::collection::vec(0u64..50, 0..40),
                                               b in proptest::collection::vec(0u64..50, 0..40)) {
            let diff = difference(&a, &b);
            for x in &diff {
                prop_assert!(!b.contains(x));
            }
            for x in &a {
                prop_assert!(diff.contains(x) || b.contains(x));
            }
        }

        #[test]
        fn indices_has_no_duplicates(n in 0usize..200) {
            prop_assert!(!has_duplicates(&indices(n)));
        }
    }
}
