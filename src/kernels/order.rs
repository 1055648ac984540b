//! This module contains the pure, stateless kernels for sorting a single lane.
//!
//! Both kernels delegate the actual sort to the standard library: `sort_by` when a
//! stable order is requested, `sort_unstable_by` otherwise. Descending order is the
//! reversed comparator, so stability keeps equal elements in original order in both
//! directions.

use crate::types::Element;
use std::cmp::Ordering;

//==================================================================================
// 1. Private Core Logic
//==================================================================================

#[inline]
fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Sorts `values` in place.
pub fn sort<T: Element>(values: &mut [T], descending: bool, stable: bool) {
    let cmp = |a: &T, b: &T| directed(a.order_cmp(b), descending);
    if stable {
        values.sort_by(cmp);
    } else {
        values.sort_unstable_by(cmp);
    }
}

/// Returns the permutation that sorts `values`.
pub fn argsort<T: Element>(values: &[T], descending: bool, stable: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    let cmp = |a: &usize, b: &usize| directed(values[*a].order_cmp(&values[*b]), descending);
    if stable {
        indices.sort_by(cmp);
    } else {
        indices.sort_unstable_by(cmp);
    }
    indices
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_argsort_keeps_ties_in_order() {
        let values = [3i64, 1, 3, 1, 2];
        assert_eq!(argsort(&values, false, true), vec![1, 3, 4, 0, 2]);
        assert_eq!(argsort(&values, true, true), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn test_unstable_argsort_is_still_a_sorting_permutation() {
        let values = [5u32, 5, 5, 0, 9];
        let order = argsort(&values, false, false);
        let reordered: Vec<u32> = order.iter().map(|&i| values[i]).collect();
        assert_eq!(reordered, vec![0, 5, 5, 5, 9]);
        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_nan_sorts_last_ascending_and_first_descending() {
        let mut values = [2.0f64, f64::NAN, -1.0, 0.5];
        sort(&mut values, false, true);
        assert_eq!(&values[..3], &[-1.0, 0.5, 2.0]);
        assert!(values[3].is_nan());

        let mut values = [2.0f32, f32::NAN, -1.0];
        sort(&mut values, true, true);
        assert!(values[0].is_nan());
        assert_eq!(&values[1..], &[2.0, -1.0]);
    }

    #[test]
    fn test_empty_and_single_lanes() {
        assert!(argsort::<i32>(&[], false, true).is_empty());
        assert_eq!(argsort(&[42i32], true, false), vec![0]);
    }
}
