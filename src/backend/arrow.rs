//! The Arrow backend: ordering for one-dimensional Arrow primitive arrays.
//!
//! `sort` and `argsort` run on Arrow's own compute kernels, so null slots are
//! supported there and are placed last in both directions. `searchsorted` and
//! `argpartition` have no Arrow kernel; they marshal the (null-free) values into
//! ndarray storage, reuse the lane helpers of the ndarray backend and marshal the
//! positions back into an Arrow array.

use crate::backend::native;
use crate::backend::OrderingBackend;
use crate::config::{PartitionConfig, SearchConfig, SortConfig};
use crate::error::OrderingError;
use crate::types::array::with_nd;
use crate::types::arrow_impl::{arrow_to_nd, nd_to_arrow};
use crate::types::{normalize_axis, Array, DType, Kth, NdArray};
use arrow::array::{Array as ArrowArray, ArrayRef, AsArray, UInt32Array};
use arrow::compute::{cast, lexsort_to_indices, sort_to_indices, take, SortColumn, SortOptions};
use arrow::datatypes::{Float32Type, Float64Type};
use arrow_schema::DataType;
use ndarray::Axis;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowBackend;

fn expect_arrow(x: &Array) -> Result<&ArrayRef, OrderingError> {
    let array = x.as_arrow().ok_or_else(|| {
        OrderingError::UnsupportedType(format!("arrow backend cannot order {} arrays", x.kind()))
    })?;
    // Only the numeric element kinds are ordered.
    DType::from_arrow_type(array.data_type())?;
    Ok(array)
}

/// Sort keys that follow `Element::order_cmp` under Arrow's total order.
///
/// Arrow orders `-0.0` before `0.0` and sign-bit NaNs before every number, so float
/// keys fold every zero to `0.0` and every NaN to the positive quiet NaN.
fn canonical_sort_keys(array: &ArrayRef) -> ArrayRef {
    match array.data_type() {
        DataType::Float32 => Arc::new(array.as_primitive::<Float32Type>().unary::<_, Float32Type>(
            |v| match v {
                v if v.is_nan() => f32::NAN,
                v if v == 0.0 => 0.0,
                v => v,
            },
        )),
        DataType::Float64 => Arc::new(array.as_primitive::<Float64Type>().unary::<_, Float64Type>(
            |v| match v {
                v if v.is_nan() => f64::NAN,
                v if v == 0.0 => 0.0,
                v => v,
            },
        )),
        _ => Arc::clone(array),
    }
}

/// Positions that sort `array`, with nulls last.
///
/// The stable variant adds the original position as a second, ascending sort key,
/// which pins the relative order of equal values in both directions.
fn sorted_indices(
    array: &ArrayRef,
    descending: bool,
    stable: bool,
) -> Result<UInt32Array, OrderingError> {
    let options = SortOptions {
        descending,
        nulls_first: false,
    };
    let keys = canonical_sort_keys(array);
    if !stable {
        return Ok(sort_to_indices(keys.as_ref(), Some(options), None)?);
    }
    let positions: ArrayRef = Arc::new(UInt32Array::from_iter_values(0..array.len() as u32));
    let columns = [
        SortColumn {
            values: keys,
            options: Some(options),
        },
        SortColumn {
            values: positions,
            options: Some(SortOptions {
                descending: false,
                nulls_first: false,
            }),
        },
    ];
    Ok(lexsort_to_indices(&columns, None)?)
}

impl OrderingBackend for ArrowBackend {
    fn name(&self) -> &'static str {
        "arrow"
    }

    fn sort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError> {
        let array = expect_arrow(x)?;
        normalize_axis(cfg.axis, 1)?;
        let indices = sorted_indices(array, cfg.descending, cfg.stable)?;
        Ok(Array::Arrow(take(array.as_ref(), &indices, None)?))
    }

    fn argsort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError> {
        let array = expect_arrow(x)?;
        normalize_axis(cfg.axis, 1)?;
        let indices = sorted_indices(array, cfg.descending, cfg.stable)?;
        Ok(Array::Arrow(cast(&indices, &DataType::Int64)?))
    }

    fn searchsorted(
        &self,
        x: &Array,
        v: &Array,
        sorter: Option<&Array>,
        cfg: &SearchConfig,
    ) -> Result<Array, OrderingError> {
        cfg.ret_dtype.ensure_integer("ret_dtype")?;
        let haystack = arrow_to_nd(expect_arrow(x)?.as_ref())?;
        let probes = v.to_nd()?;
        if probes.ndim() != 1 {
            return Err(OrderingError::InvalidArgument(format!(
                "probes for an Arrow array must be 1-D, got shape {:?}",
                probes.shape()
            )));
        }
        let sorter = sorter.map(Array::to_nd).transpose()?;
        let indices = native::search_nd(&haystack, &probes, sorter.as_deref(), cfg.side)?;
        let indices = NdArray::Int64(indices).cast(cfg.ret_dtype);
        Ok(Array::Arrow(nd_to_arrow(&indices)?))
    }

    fn argpartition(
        &self,
        x: &Array,
        kth: &Kth,
        cfg: &PartitionConfig,
    ) -> Result<Array, OrderingError> {
        cfg.reject_order()?;
        let values = arrow_to_nd(expect_arrow(x)?.as_ref())?;
        normalize_axis(cfg.axis, 1)?;
        let kths = kth.normalized(values.len())?;
        let indices = with_nd!(&values, a => native::argpartition_axis(a, Axis(0), &kths, cfg.kind));
        Ok(Array::Arrow(nd_to_arrow(&NdArray::Int64(indices))?))
    }
}
