//! Partial-order (selection) kernel for `argpartition`.
//!
//! Both selection kinds run once per pivot over the still-unordered tail.
//! `Introselect` is the standard library's `select_nth_unstable_by`;
//! `Quickselect` is a median-of-three quickselect with three-way partitioning.
//! The kinds may order non-pivot positions differently, never the pivots.

use crate::config::SelectKind;
use crate::types::Element;
use std::cmp::Ordering;

/// Returns a permutation of `0..values.len()` such that, for every pivot `k` in
/// `kths`, position `k` holds the index of the element that a full ascending sort
/// would place there, every earlier position holds an index of a value not greater
/// than it, and every later position holds an index of a value not less than it.
///
/// `kths` must be sorted, deduplicated and in bounds.
pub fn argpartition<T: Element>(values: &[T], kths: &[usize], kind: SelectKind) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    let cmp = |a: &usize, b: &usize| values[*a].order_cmp(&values[*b]);
    log::trace!(
        "argpartition: len={} pivots={} kind={:?}",
        values.len(),
        kths.len(),
        kind
    );

    let mut lo = 0;
    for &k in kths {
        // Pivots are ascending, so everything before `lo` is already in place.
        match kind {
            SelectKind::Introselect => {
                indices[lo..].select_nth_unstable_by(k - lo, cmp);
            }
            SelectKind::Quickselect => quickselect(&mut indices[lo..], k - lo, cmp),
        }
        lo = k + 1;
    }
    indices
}

/// Moves the element of rank `k` to position `k`, with nothing greater before it
/// and nothing smaller after it.
fn quickselect<F>(idx: &mut [usize], k: usize, cmp: F)
where
    F: Fn(&usize, &usize) -> Ordering,
{
    let (mut lo, mut hi) = (0, idx.len());
    while hi - lo > 1 {
        let pivot = median_of_three(idx[lo], idx[lo + (hi - lo) / 2], idx[hi - 1], &cmp);
        // [lo, lt) < pivot, [lt, gt) == pivot, [gt, hi) > pivot
        let (mut lt, mut i, mut gt) = (lo, lo, hi);
        while i < gt {
            match cmp(&idx[i], &pivot) {
                Ordering::Less => {
                    idx.swap(lt, i);
                    lt += 1;
                    i += 1;
                }
                Ordering::Greater => {
                    gt -= 1;
                    idx.swap(i, gt);
                }
                Ordering::Equal => i += 1,
            }
        }
        if k < lt {
            hi = lt;
        } else if k >= gt {
            lo = gt;
        } else {
            return;
        }
    }
}

fn median_of_three<F>(a: usize, b: usize, c: usize, cmp: &F) -> usize
where
    F: Fn(&usize, &usize) -> Ordering,
{
    let (lo, hi) = if cmp(&a, &b) == Ordering::Greater { (b, a) } else { (a, b) };
    if cmp(&c, &lo) == Ordering::Less {
        lo
    } else if cmp(&c, &hi) == Ordering::Greater {
        hi
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partitioned<T: Element>(values: &[T], order: &[usize], k: usize) {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.order_cmp(b));
        let pivot = values[order[k]];
        assert_eq!(pivot.order_cmp(&sorted[k]), std::cmp::Ordering::Equal);
        for &i in &order[..k] {
            assert_ne!(values[i].order_cmp(&pivot), std::cmp::Ordering::Greater);
        }
        for &i in &order[k + 1..] {
            assert_ne!(values[i].order_cmp(&pivot), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_single_pivot() {
        let values = [9i32, 4, 7, 1, 8, 2];
        let order = argpartition(&values, &[2], SelectKind::Introselect);
        assert_partitioned(&values, &order, 2);
        assert_eq!(values[order[2]], 4);
    }

    #[test]
    fn test_multiple_pivots_hold_simultaneously() {
        let values = [5.5f64, -1.0, 3.25, 8.0, 0.0, 2.0, 7.5, 1.0];
        let kths = [1, 4, 6];
        let order = argpartition(&values, &kths, SelectKind::Quickselect);
        for &k in &kths {
            assert_partitioned(&values, &order, k);
        }
    }

    #[test]
    fn test_quickselect_with_heavy_duplicates_and_nan() {
        let values = [2.0f32, f32::NAN, 2.0, 1.0, 2.0, 2.0, -3.0, 2.0, 9.0];
        for k in 0..values.len() {
            let order = argpartition(&values, &[k], SelectKind::Quickselect);
            assert_partitioned(&values, &order, k);
        }
        let order = argpartition(&values, &[8], SelectKind::Quickselect);
        assert!(values[order[8]].is_nan());
    }

    #[test]
    fn test_result_is_a_permutation() {
        let values = [3u64, 3, 3, 1, 1];
        let mut order = argpartition(&values, &[0, 4], SelectKind::Introselect);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
