//! The ndarray backend: N-dimensional ordering along any axis.
//!
//! Each operation normalizes the axis, dispatches on the dtype once, and then runs
//! the slice kernels lane by lane along the chosen axis.

use crate::backend::OrderingBackend;
use crate::config::{PartitionConfig, SearchConfig, SelectKind, Side, SortConfig};
use crate::error::OrderingError;
use crate::kernels::search::Extreme;
use crate::kernels::{order, search, select};
use crate::types::array::{map_nd, with_nd, with_nd_pair};
use crate::types::{normalize_axis, Array, Element, Kth, NdArray};
use ndarray::{ArrayD, Axis, Dimension, IxDyn, RemoveAxis, Zip};

#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayBackend;

fn expect_nd(x: &Array) -> Result<&NdArray, OrderingError> {
    x.as_nd().ok_or_else(|| {
        OrderingError::UnsupportedType(format!("ndarray backend cannot order {} arrays", x.kind()))
    })
}

impl OrderingBackend for NdarrayBackend {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn sort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError> {
        let nd = expect_nd(x)?;
        let axis = Axis(normalize_axis(cfg.axis, nd.ndim())?);
        Ok(Array::Nd(map_nd!(nd, a => sort_axis(a, axis, cfg.descending, cfg.stable))))
    }

    fn argsort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError> {
        let nd = expect_nd(x)?;
        let axis = Axis(normalize_axis(cfg.axis, nd.ndim())?);
        let indices = with_nd!(nd, a => argsort_axis(a, axis, cfg.descending, cfg.stable));
        Ok(Array::Nd(NdArray::Int64(indices)))
    }

    fn searchsorted(
        &self,
        x: &Array,
        v: &Array,
        sorter: Option<&Array>,
        cfg: &SearchConfig,
    ) -> Result<Array, OrderingError> {
        cfg.ret_dtype.ensure_integer("ret_dtype")?;
        let x = expect_nd(x)?;
        let v = v.to_nd()?;
        let sorter = sorter.map(Array::to_nd).transpose()?;
        let indices = search_nd(x, &v, sorter.as_deref(), cfg.side)?;
        Ok(Array::Nd(NdArray::Int64(indices).cast(cfg.ret_dtype)))
    }

    fn argpartition(
        &self,
        x: &Array,
        kth: &Kth,
        cfg: &PartitionConfig,
    ) -> Result<Array, OrderingError> {
        cfg.reject_order()?;
        let nd = expect_nd(x)?;
        let axis = normalize_axis(cfg.axis, nd.ndim())?;
        let kths = kth.normalized(nd.shape()[axis])?;
        let indices = with_nd!(nd, a => argpartition_axis(a, Axis(axis), &kths, cfg.kind));
        Ok(Array::Nd(NdArray::Int64(indices)))
    }
}

//==================================================================================
// Lane-wise helpers (shared with the Arrow backend and the frontends)
//==================================================================================

pub(crate) fn sort_axis<T: Element>(
    a: &ArrayD<T>,
    axis: Axis,
    descending: bool,
    stable: bool,
) -> ArrayD<T> {
    let mut out = a.to_owned();
    for mut lane in out.lanes_mut(axis) {
        let mut values = lane.to_vec();
        order::sort(&mut values, descending, stable);
        lane.iter_mut().zip(values).for_each(|(dst, v)| *dst = v);
    }
    out
}

pub(crate) fn argsort_axis<T: Element>(
    a: &ArrayD<T>,
    axis: Axis,
    descending: bool,
    stable: bool,
) -> ArrayD<i64> {
    let mut out = ArrayD::<i64>::zeros(a.raw_dim());
    Zip::from(a.lanes(axis))
        .and(out.lanes_mut(axis))
        .for_each(|lane, mut dst| {
            let values = lane.to_vec();
            let permutation = order::argsort(&values, descending, stable);
            dst.iter_mut()
                .zip(permutation)
                .for_each(|(d, i)| *d = i as i64);
        });
    out
}

pub(crate) fn argpartition_axis<T: Element>(
    a: &ArrayD<T>,
    axis: Axis,
    kths: &[usize],
    kind: SelectKind,
) -> ArrayD<i64> {
    let mut out = ArrayD::<i64>::zeros(a.raw_dim());
    Zip::from(a.lanes(axis))
        .and(out.lanes_mut(axis))
        .for_each(|lane, mut dst| {
            let values = lane.to_vec();
            let permutation = select::argpartition(&values, kths, kind);
            dst.iter_mut()
                .zip(permutation)
                .for_each(|(d, i)| *d = i as i64);
        });
    out
}

/// Insertion points of `v` into `x`.
///
/// A 1-D `x` is searched for every element of `v`, and the result takes `v`'s
/// shape. A higher-rank `x` is searched lane by lane along its last axis: `v` must
/// have the same rank and the same leading shape, and each lane of `v` is searched
/// in the matching lane of `x`. Both operands are compared in their promoted dtype.
pub(crate) fn search_nd(
    x: &NdArray,
    v: &NdArray,
    sorter: Option<&NdArray>,
    side: Side,
) -> Result<ArrayD<i64>, OrderingError> {
    if x.ndim() == 0 {
        return Err(OrderingError::InvalidArgument(
            "the sorted operand of searchsorted must be at least 1-D".to_string(),
        ));
    }
    let sorter = match sorter {
        Some(s) => {
            if s.shape() != x.shape() {
                return Err(OrderingError::shape_mismatch(x.shape(), s.shape()));
            }
            let values = s.index_values("sorter")?;
            Some(ArrayD::from_shape_vec(IxDyn(s.shape()), values)?)
        }
        None => None,
    };
    if x.ndim() > 1 {
        let lead = &x.shape()[..x.ndim() - 1];
        if v.ndim() != x.ndim() || &v.shape()[..v.ndim() - 1] != lead {
            let mut expected = lead.to_vec();
            expected.push(v.shape().last().copied().unwrap_or(0));
            return Err(OrderingError::shape_mismatch(&expected, v.shape()));
        }
    }

    let common = x.dtype().promote(v.dtype());
    let (x, v) = (x.cast(common), v.cast(common));
    with_nd_pair!(&x, &v, (xa, va) => search_typed(xa, va, sorter.as_ref(), side)).unwrap_or_else(
        || {
            Err(OrderingError::InternalError(
                "promoted operands disagree on dtype".to_string(),
            ))
        },
    )
}

fn search_typed<T: Element>(
    x: &ArrayD<T>,
    v: &ArrayD<T>,
    sorter: Option<&ArrayD<i64>>,
    side: Side,
) -> Result<ArrayD<i64>, OrderingError> {
    if x.ndim() == 1 {
        let haystack = sorted_haystack(x.iter().copied().collect(), sorter)?;
        return Ok(v.mapv(|probe| search::search_sorted(&haystack, &probe, side) as i64));
    }

    let last = Axis(x.ndim() - 1);
    let mut out = ArrayD::<i64>::zeros(v.raw_dim());
    let mut sorter_lanes = sorter.map(|s| s.lanes(last).into_iter());
    for ((x_lane, v_lane), mut out_lane) in x
        .lanes(last)
        .into_iter()
        .zip(v.lanes(last))
        .zip(out.lanes_mut(last))
    {
        let permutation = match sorter_lanes.as_mut() {
            Some(lanes) => Some(lanes.next().ok_or_else(|| {
                OrderingError::InternalError("sorter has fewer lanes than x".to_string())
            })?),
            None => None,
        };
        let permutation = permutation.map(|lane| lane.to_owned().into_dyn());
        let haystack = sorted_haystack(x_lane.to_vec(), permutation.as_ref())?;
        for (dst, probe) in out_lane.iter_mut().zip(v_lane.iter()) {
            *dst = search::search_sorted(&haystack, probe, side) as i64;
        }
    }
    Ok(out)
}

fn sorted_haystack<T: Element>(
    lane: Vec<T>,
    sorter: Option<&ArrayD<i64>>,
) -> Result<Vec<T>, OrderingError> {
    match sorter {
        None => Ok(lane),
        Some(permutation) => {
            let permutation: Vec<i64> = permutation.iter().copied().collect();
            search::apply_sorter(&lane, &permutation)
        }
    }
}

/// Positions of the first minimum or maximum, over the flattened array
/// (`axis = None`) or along one axis.
pub(crate) fn arg_extreme_nd(
    nd: &NdArray,
    axis: Option<isize>,
    keepdim: bool,
    extreme: Extreme,
) -> Result<ArrayD<i64>, OrderingError> {
    with_nd!(nd, a => arg_extreme_typed(a, axis, keepdim, extreme))
}

fn arg_extreme_typed<T: Element>(
    a: &ArrayD<T>,
    axis: Option<isize>,
    keepdim: bool,
    extreme: Extreme,
) -> Result<ArrayD<i64>, OrderingError> {
    let empty = || {
        OrderingError::InvalidArgument("cannot take the extreme of an empty sequence".to_string())
    };
    match axis {
        None => {
            let flat: Vec<T> = a.iter().copied().collect();
            let position = search::arg_extreme(&flat, extreme).ok_or_else(empty)? as i64;
            let shape = if keepdim { vec![1; a.ndim()] } else { Vec::new() };
            Ok(ArrayD::from_elem(IxDyn(&shape), position))
        }
        Some(axis) => {
            let axis = Axis(normalize_axis(axis, a.ndim())?);
            if a.len_of(axis) == 0 {
                return Err(empty());
            }
            let mut out = ArrayD::<i64>::zeros(a.raw_dim().remove_axis(axis));
            Zip::from(a.lanes(axis)).and(&mut out).for_each(|lane, dst| {
                let values = lane.to_vec();
                *dst = search::arg_extreme(&values, extreme).map_or(0, |p| p as i64);
            });
            Ok(if keepdim { out.insert_axis(axis) } else { out })
        }
    }
}

/// Coordinates of every non-zero element in row-major order, as an
/// `[count, ndim]` array.
pub(crate) fn nonzero_nd(nd: &NdArray) -> Result<ArrayD<i64>, OrderingError> {
    with_nd!(nd, a => nonzero_typed(a))
}

fn nonzero_typed<T: Element>(a: &ArrayD<T>) -> Result<ArrayD<i64>, OrderingError> {
    let mut coords = Vec::new();
    let mut count = 0;
    for (idx, value) in a.indexed_iter() {
        if !value.is_zero() {
            coords.extend(idx.slice().iter().map(|&i| i as i64));
            count += 1;
        }
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&[count, a.ndim()]), coords)?)
}
