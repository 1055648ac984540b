//! Binary-search and extreme-value kernels over a single sorted lane.

use crate::config::Side;
use crate::error::OrderingError;
use crate::types::Element;
use std::cmp::Ordering;

/// Which end of the value range `arg_extreme` looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// The insertion point of `probe` into the ascending `sorted` lane.
///
/// `Side::Left` returns the first position whose element is not less than `probe`;
/// `Side::Right` returns the first position whose element is greater than `probe`.
#[inline]
pub fn search_sorted<T: Element>(sorted: &[T], probe: &T, side: Side) -> usize {
    match side {
        Side::Left => sorted.partition_point(|e| e.order_cmp(probe) == Ordering::Less),
        Side::Right => sorted.partition_point(|e| e.order_cmp(probe) != Ordering::Greater),
    }
}

/// Reorders `values` by the permutation `sorter`, producing the ascending lane that
/// `search_sorted` expects.
pub fn apply_sorter<T: Element>(values: &[T], sorter: &[i64]) -> Result<Vec<T>, OrderingError> {
    if sorter.len() != values.len() {
        return Err(OrderingError::shape_mismatch(&[values.len()], &[sorter.len()]));
    }
    sorter
        .iter()
        .map(|&i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| values.get(i).copied())
                .ok_or_else(|| {
                    OrderingError::InvalidArgument(format!(
                        "sorter index {} is out of bounds for a lane of length {}",
                        i,
                        values.len()
                    ))
                })
        })
        .collect()
}

/// Position of the first minimum or maximum of `values`, or `None` if empty.
///
/// NaN counts as the greatest value, so a NaN wins `Max` and never wins `Min`
/// unless every element is NaN.
pub fn arg_extreme<T: Element>(values: &[T], extreme: Extreme) -> Option<usize> {
    let wanted = match extreme {
        Extreme::Min => Ordering::Less,
        Extreme::Max => Ordering::Greater,
    };
    let mut iter = values.iter().enumerate();
    let (mut best_idx, mut best) = iter.next()?;
    for (idx, value) in iter {
        if value.order_cmp(best) == wanted {
            best_idx = idx;
            best = value;
        }
    }
    Some(best_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_and_right_sides_differ_on_ties() {
        let sorted = [1i32, 2, 2, 2, 5];
        assert_eq!(search_sorted(&sorted, &2, Side::Left), 1);
        assert_eq!(search_sorted(&sorted, &2, Side::Right), 4);
        assert_eq!(search_sorted(&sorted, &0, Side::Left), 0);
        assert_eq!(search_sorted(&sorted, &9, Side::Right), 5);
    }

    #[test]
    fn test_nan_probe_lands_after_every_number() {
        let sorted = [0.0f64, 1.0, 2.0];
        assert_eq!(search_sorted(&sorted, &f64::NAN, Side::Left), 3);
        assert_eq!(search_sorted(&sorted, &-0.0, Side::Left), 0);
        assert_eq!(search_sorted(&sorted, &-0.0, Side::Right), 1);
    }

    #[test]
    fn test_apply_sorter_validates_the_permutation() {
        let values = [30u64, 10, 20];
        assert_eq!(apply_sorter(&values, &[1, 2, 0]).unwrap(), vec![10, 20, 30]);
        assert!(matches!(
            apply_sorter(&values, &[1, 2]),
            Err(OrderingError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            apply_sorter(&values, &[0, 1, 3]),
            Err(OrderingError::InvalidArgument(_))
        ));
        assert!(apply_sorter(&values, &[0, -1, 2]).is_err());
    }

    #[test]
    fn test_arg_extreme_takes_first_occurrence() {
        let values = [3i64, 7, 1, 7, 1];
        assert_eq!(arg_extreme(&values, Extreme::Max), Some(1));
        assert_eq!(arg_extreme(&values, Extreme::Min), Some(2));
        assert_eq!(arg_extreme::<i64>(&[], Extreme::Min), None);

        let floats = [1.0f32, f32::NAN, 5.0];
        assert_eq!(arg_extreme(&floats, Extreme::Max), Some(1));
        assert_eq!(arg_extreme(&floats, Extreme::Min), Some(0));
    }
}
