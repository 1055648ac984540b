//! The Paddle-style search functions: `argsort`, `searchsorted`, `argmax`,
//! `argmin` and `nonzero`.
//!
//! Each function checks its own supported-dtype list first and fails with
//! `UnsupportedType` outside it. `argsort` and `searchsorted` go through the
//! process-wide backend registry; the reductions run on the ndarray lane helpers
//! and always return ndarray-backed results.

use crate::backend::native::{arg_extreme_nd, nonzero_nd};
use crate::backend::BackendRegistry;
use crate::config::{SearchConfig, Side, SortConfig};
use crate::error::OrderingError;
use crate::kernels::search::Extreme;
use crate::types::{Array, DType, NdArray};
use ndarray::Axis;

const SEARCH_DTYPES: &[DType] = &[DType::Float32, DType::Float64, DType::Int32, DType::Int64];

fn check_supported(op: &str, x: &Array) -> Result<DType, OrderingError> {
    let dtype = x.dtype()?;
    if SEARCH_DTYPES.contains(&dtype) {
        Ok(dtype)
    } else {
        Err(OrderingError::UnsupportedType(format!(
            "paddle.{} does not support {} inputs",
            op, dtype
        )))
    }
}

/// Stable sorting permutation along `axis`.
pub fn argsort(x: &Array, axis: isize, descending: bool) -> Result<Array, OrderingError> {
    check_supported("argsort", x)?;
    let cfg = SortConfig {
        axis,
        descending,
        stable: true,
    };
    BackendRegistry::global().resolve(x)?.argsort(x, &cfg)
}

/// Insertion points of `values` into `sorted_sequence`; `Int32` positions when
/// `out_int32`, the last suitable position when `right`.
pub fn searchsorted(
    sorted_sequence: &Array,
    values: &Array,
    out_int32: bool,
    right: bool,
) -> Result<Array, OrderingError> {
    check_supported("searchsorted", sorted_sequence)?;
    check_supported("searchsorted", values)?;
    let cfg = SearchConfig {
        side: if right { Side::Right } else { Side::Left },
        ret_dtype: if out_int32 { DType::Int32 } else { DType::Int64 },
    };
    BackendRegistry::global()
        .resolve(sorted_sequence)?
        .searchsorted(sorted_sequence, values, None, &cfg)
}

fn arg_extreme(
    op: &str,
    x: &Array,
    axis: Option<isize>,
    keepdim: bool,
    dtype: DType,
    extreme: Extreme,
) -> Result<Array, OrderingError> {
    check_supported(op, x)?;
    dtype.ensure_integer("dtype")?;
    let positions = arg_extreme_nd(&*x.to_nd()?, axis, keepdim, extreme)?;
    Ok(Array::Nd(NdArray::Int64(positions).cast(dtype)))
}

/// Position of the first maximum, over the flattened array when `axis` is `None`.
pub fn argmax(
    x: &Array,
    axis: Option<isize>,
    keepdim: bool,
    dtype: DType,
) -> Result<Array, OrderingError> {
    arg_extreme("argmax", x, axis, keepdim, dtype, Extreme::Max)
}

/// Position of the first minimum, over the flattened array when `axis` is `None`.
pub fn argmin(
    x: &Array,
    axis: Option<isize>,
    keepdim: bool,
    dtype: DType,
) -> Result<Array, OrderingError> {
    arg_extreme("argmin", x, axis, keepdim, dtype, Extreme::Min)
}

/// The result of `nonzero`.
#[derive(Debug, Clone, PartialEq)]
pub enum NonZero {
    /// One row of coordinates per non-zero element: shape `[count, ndim]`.
    Stacked(Array),
    /// One coordinate array per dimension, each of length `count`.
    PerAxis(Vec<Array>),
}

pub fn nonzero(input: &Array, as_tuple: bool) -> Result<NonZero, OrderingError> {
    check_supported("nonzero", input)?;
    let coords = nonzero_nd(&*input.to_nd()?)?;
    if !as_tuple {
        return Ok(NonZero::Stacked(Array::from(coords)));
    }
    let per_axis = (0..coords.shape()[1])
        .map(|dim| Array::from(coords.index_axis(Axis(1), dim).to_owned()))
        .collect();
    Ok(NonZero::PerAxis(per_axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_argsort_is_stable_and_honours_descending() {
        let x = Array::from_vec(vec![2.0f32, 1.0, 2.0]);
        let asc = argsort(&x, -1, false).unwrap();
        assert_eq!(asc, Array::from_vec(vec![1i64, 0, 2]));
        let desc = argsort(&x, 0, true).unwrap();
        assert_eq!(desc, Array::from_vec(vec![0i64, 2, 1]));
    }

    #[test]
    fn test_unsupported_dtype_is_rejected() {
        let x = Array::from_vec(vec![1u32, 2]);
        assert!(matches!(argsort(&x, -1, false), Err(OrderingError::UnsupportedType(_))));
        assert!(matches!(
            argmax(&x, None, false, DType::Int64),
            Err(OrderingError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_searchsorted_flags() {
        let seq = Array::from_vec(vec![1i64, 3, 3, 5]);
        let values = Array::from_vec(vec![3i64, 6]);
        assert_eq!(
            searchsorted(&seq, &values, false, false).unwrap(),
            Array::from_vec(vec![1i64, 4])
        );
        assert_eq!(
            searchsorted(&seq, &values, true, true).unwrap(),
            Array::from_vec(vec![3i32, 4])
        );
    }

    #[test]
    fn test_argmax_and_argmin() {
        let x = Array::from(array![[1i32, 8, 8], [9, 0, 0]].into_dyn());
        assert_eq!(
            argmax(&x, None, false, DType::Int64).unwrap(),
            Array::from(ndarray::arr0(3i64).into_dyn())
        );
        assert_eq!(
            argmax(&x, Some(1), false, DType::Int64).unwrap(),
            Array::from_vec(vec![1i64, 0])
        );
        assert_eq!(
            argmin(&x, Some(-1), true, DType::Int32).unwrap(),
            Array::from(array![[0i32], [1]].into_dyn())
        );
        assert!(matches!(
            argmin(&x, None, false, DType::Float32),
            Err(OrderingError::InvalidDtype(_))
        ));
    }

    #[test]
    fn test_nonzero_layouts() {
        let x = Array::from(array![[0.0f64, 2.0], [3.0, 0.0]].into_dyn());
        let stacked = nonzero(&x, false).unwrap();
        assert_eq!(
            stacked,
            NonZero::Stacked(Array::from(array![[0i64, 1], [1, 0]].into_dyn()))
        );
        let per_axis = nonzero(&x, true).unwrap();
        assert_eq!(
            per_axis,
            NonZero::PerAxis(vec![
                Array::from_vec(vec![0i64, 1]),
                Array::from_vec(vec![1i64, 0]),
            ])
        );
    }
}
