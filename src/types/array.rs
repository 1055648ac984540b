//! The array values that ordering operations run on.
//!
//! An `Array` is tagged with the backend that owns its storage. `NdArray` holds the
//! N-dimensional ndarray storage for every supported `DType`; Arrow arrays are held
//! as a shared `ArrayRef` and are always one-dimensional.

use crate::error::OrderingError;
use crate::types::arrow_impl;
use crate::types::DType;
use arrow::array::{Array as ArrowArray, ArrayRef};
use arrow::datatypes::{
    ArrowNativeType, ArrowPrimitiveType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type,
    UInt64Type,
};
use ndarray::{ArrayD, IxDyn};
use num_traits::{AsPrimitive, Zero};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

//==================================================================================
// 1. Element Trait
//==================================================================================

/// A primitive element type that can live inside an `NdArray`.
pub trait Element:
    Copy
    + fmt::Debug
    + PartialOrd
    + Zero
    + ArrowNativeType
    + Send
    + Sync
    + 'static
    + AsPrimitive<i32>
    + AsPrimitive<i64>
    + AsPrimitive<u32>
    + AsPrimitive<u64>
    + AsPrimitive<f32>
    + AsPrimitive<f64>
{
    const DTYPE: DType;

    /// The Arrow primitive type with the same native representation.
    type Arrow: ArrowPrimitiveType<Native = Self>;

    /// Total order used by every kernel: NaN compares greater than every other
    /// value (and equal to NaN), and `-0.0` equals `0.0`.
    fn order_cmp(&self, other: &Self) -> Ordering;

    fn wrap(array: ArrayD<Self>) -> NdArray;

    fn view(array: &NdArray) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_int_element {
    ($t:ty, $variant:ident, $arrow:ty) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Arrow = $arrow;

            #[inline]
            fn order_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn wrap(array: ArrayD<Self>) -> NdArray {
                NdArray::$variant(array)
            }

            fn view(array: &NdArray) -> Option<&ArrayD<Self>> {
                match array {
                    NdArray::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $variant:ident, $arrow:ty) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Arrow = $arrow;

            #[inline]
            fn order_cmp(&self, other: &Self) -> Ordering {
                match self.partial_cmp(other) {
                    Some(ordering) => ordering,
                    None => self.is_nan().cmp(&other.is_nan()),
                }
            }

            fn wrap(array: ArrayD<Self>) -> NdArray {
                NdArray::$variant(array)
            }

            fn view(array: &NdArray) -> Option<&ArrayD<Self>> {
                match array {
                    NdArray::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_int_element!(i32, Int32, Int32Type);
impl_int_element!(i64, Int64, Int64Type);
impl_int_element!(u32, UInt32, UInt32Type);
impl_int_element!(u64, UInt64, UInt64Type);
impl_float_element!(f32, Float32, Float32Type);
impl_float_element!(f64, Float64, Float64Type);

//==================================================================================
// 2. NdArray: dtype-tagged ndarray storage
//==================================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NdArray {
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt32(ArrayD<u32>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
}

/// Runs `$body` with `$a` bound to the typed `ArrayD` inside an `NdArray`.
macro_rules! with_nd {
    ($nd:expr, $a:ident => $body:expr) => {
        match $nd {
            $crate::types::NdArray::Int32($a) => $body,
            $crate::types::NdArray::Int64($a) => $body,
            $crate::types::NdArray::UInt32($a) => $body,
            $crate::types::NdArray::UInt64($a) => $body,
            $crate::types::NdArray::Float32($a) => $body,
            $crate::types::NdArray::Float64($a) => $body,
        }
    };
}

/// Like `with_nd!`, but rewraps the resulting `ArrayD` in the same variant.
macro_rules! map_nd {
    ($nd:expr, $a:ident => $body:expr) => {
        match $nd {
            $crate::types::NdArray::Int32($a) => $crate::types::NdArray::Int32($body),
            $crate::types::NdArray::Int64($a) => $crate::types::NdArray::Int64($body),
            $crate::types::NdArray::UInt32($a) => $crate::types::NdArray::UInt32($body),
            $crate::types::NdArray::UInt64($a) => $crate::types::NdArray::UInt64($body),
            $crate::types::NdArray::Float32($a) => $crate::types::NdArray::Float32($body),
            $crate::types::NdArray::Float64($a) => $crate::types::NdArray::Float64($body),
        }
    };
}

/// Runs `$body` when both operands hold the same dtype; evaluates to `None` otherwise.
macro_rules! with_nd_pair {
    ($lhs:expr, $rhs:expr, ($a:ident, $b:ident) => $body:expr) => {
        match ($lhs, $rhs) {
            ($crate::types::NdArray::Int32($a), $crate::types::NdArray::Int32($b)) => Some($body),
            ($crate::types::NdArray::Int64($a), $crate::types::NdArray::Int64($b)) => Some($body),
            ($crate::types::NdArray::UInt32($a), $crate::types::NdArray::UInt32($b)) => {
                Some($body)
            }
            ($crate::types::NdArray::UInt64($a), $crate::types::NdArray::UInt64($b)) => {
                Some($body)
            }
            ($crate::types::NdArray::Float32($a), $crate::types::NdArray::Float32($b)) => {
                Some($body)
            }
            ($crate::types::NdArray::Float64($a), $crate::types::NdArray::Float64($b)) => {
                Some($body)
            }
            _ => None,
        }
    };
}

pub(crate) use map_nd;
pub(crate) use with_nd;
pub(crate) use with_nd_pair;

impl NdArray {
    pub fn dtype(&self) -> DType {
        match self {
            NdArray::Int32(_) => DType::Int32,
            NdArray::Int64(_) => DType::Int64,
            NdArray::UInt32(_) => DType::UInt32,
            NdArray::UInt64(_) => DType::UInt64,
            NdArray::Float32(_) => DType::Float32,
            NdArray::Float64(_) => DType::Float64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_nd!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        with_nd!(self, a => a.ndim())
    }

    pub fn len(&self) -> usize {
        with_nd!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_shape_vec<T: Element>(shape: &[usize], data: Vec<T>) -> Result<Self, OrderingError> {
        Ok(T::wrap(ArrayD::from_shape_vec(IxDyn(shape), data)?))
    }

    /// An all-zero array of the given dtype and shape.
    pub fn zeros(dtype: DType, shape: &[usize]) -> Self {
        let dim = IxDyn(shape);
        match dtype {
            DType::Int32 => NdArray::Int32(ArrayD::zeros(dim)),
            DType::Int64 => NdArray::Int64(ArrayD::zeros(dim)),
            DType::UInt32 => NdArray::UInt32(ArrayD::zeros(dim)),
            DType::UInt64 => NdArray::UInt64(ArrayD::zeros(dim)),
            DType::Float32 => NdArray::Float32(ArrayD::zeros(dim)),
            DType::Float64 => NdArray::Float64(ArrayD::zeros(dim)),
        }
    }

    /// Borrows the typed storage if `T` matches this array's dtype.
    pub fn as_typed<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::view(self)
    }

    /// Element-wise `as` conversion into `dtype`.
    pub fn cast(&self, dtype: DType) -> NdArray {
        if self.dtype() == dtype {
            return self.clone();
        }
        with_nd!(self, a => cast_typed(a, dtype))
    }

    /// Reads an integer array as `i64` values in logical (row-major) order.
    pub fn index_values(&self, role: &str) -> Result<Vec<i64>, OrderingError> {
        self.dtype().ensure_integer(role)?;
        match self.cast(DType::Int64) {
            NdArray::Int64(a) => Ok(a.iter().copied().collect()),
            other => Err(OrderingError::InternalError(format!(
                "cast to int64 produced {}",
                other.dtype()
            ))),
        }
    }

    /// Broadcasts `result` to this array's shape, casts it to this array's dtype
    /// and overwrites the contents.
    pub fn write_from(&mut self, result: &NdArray) -> Result<(), OrderingError> {
        let casted = result.cast(self.dtype());
        with_nd_pair!(self, &casted, (dst, src) => assign_broadcast(dst, src)).unwrap_or_else(|| {
            Err(OrderingError::InternalError(
                "cast produced a dtype different from the destination".to_string(),
            ))
        })
    }
}

fn cast_typed<S: Element>(a: &ArrayD<S>, dtype: DType) -> NdArray {
    match dtype {
        DType::Int32 => NdArray::Int32(a.mapv(<S as AsPrimitive<i32>>::as_)),
        DType::Int64 => NdArray::Int64(a.mapv(<S as AsPrimitive<i64>>::as_)),
        DType::UInt32 => NdArray::UInt32(a.mapv(<S as AsPrimitive<u32>>::as_)),
        DType::UInt64 => NdArray::UInt64(a.mapv(<S as AsPrimitive<u64>>::as_)),
        DType::Float32 => NdArray::Float32(a.mapv(<S as AsPrimitive<f32>>::as_)),
        DType::Float64 => NdArray::Float64(a.mapv(<S as AsPrimitive<f64>>::as_)),
    }
}

fn assign_broadcast<T: Element>(dst: &mut ArrayD<T>, src: &ArrayD<T>) -> Result<(), OrderingError> {
    match src.broadcast(dst.raw_dim()) {
        Some(view) => {
            dst.assign(&view);
            Ok(())
        }
        None => Err(OrderingError::shape_mismatch(dst.shape(), src.shape())),
    }
}

impl<T: Element> From<ArrayD<T>> for NdArray {
    fn from(array: ArrayD<T>) -> Self {
        T::wrap(array)
    }
}

impl<T: Element> From<Vec<T>> for NdArray {
    fn from(values: Vec<T>) -> Self {
        T::wrap(ndarray::Array1::from(values).into_dyn())
    }
}

/// Resolves a possibly negative axis against `ndim`.
///
/// Rank-0 arrays have no valid axis at all.
pub fn normalize_axis(axis: isize, ndim: usize) -> Result<usize, OrderingError> {
    let rank = ndim as isize;
    let resolved = if axis < 0 { axis + rank } else { axis };
    if resolved < 0 || resolved >= rank {
        return Err(OrderingError::InvalidAxis { axis, ndim });
    }
    Ok(resolved as usize)
}

//==================================================================================
// 3. Array: backend-tagged value
//==================================================================================

/// Identifies which backend owns an array's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Ndarray,
    Arrow,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKind::Ndarray => f.write_str("ndarray"),
            ArrayKind::Arrow => f.write_str("arrow"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Array {
    Nd(NdArray),
    Arrow(ArrayRef),
}

impl Array {
    pub fn kind(&self) -> ArrayKind {
        match self {
            Array::Nd(_) => ArrayKind::Ndarray,
            Array::Arrow(_) => ArrayKind::Arrow,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Array::Nd(nd) => nd.shape().to_vec(),
            Array::Arrow(a) => vec![a.len()],
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            Array::Nd(nd) => nd.ndim(),
            Array::Arrow(_) => 1,
        }
    }

    pub fn dtype(&self) -> Result<DType, OrderingError> {
        match self {
            Array::Nd(nd) => Ok(nd.dtype()),
            Array::Arrow(a) => DType::from_arrow_type(a.data_type()),
        }
    }

    pub fn as_nd(&self) -> Option<&NdArray> {
        match self {
            Array::Nd(nd) => Some(nd),
            Array::Arrow(_) => None,
        }
    }

    pub fn as_arrow(&self) -> Option<&ArrayRef> {
        match self {
            Array::Arrow(a) => Some(a),
            Array::Nd(_) => None,
        }
    }

    /// Views the array as ndarray storage, converting Arrow arrays on the way.
    pub fn to_nd(&self) -> Result<Cow<'_, NdArray>, OrderingError> {
        match self {
            Array::Nd(nd) => Ok(Cow::Borrowed(nd)),
            Array::Arrow(a) => Ok(Cow::Owned(arrow_impl::arrow_to_nd(a.as_ref())?)),
        }
    }

    /// A 1-D ndarray-backed array.
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        Array::Nd(NdArray::from(values))
    }

    pub fn from_shape_vec<T: Element>(shape: &[usize], data: Vec<T>) -> Result<Self, OrderingError> {
        Ok(Array::Nd(NdArray::from_shape_vec(shape, data)?))
    }

    /// Overwrites this array with `result`, keeping this array's backend and dtype.
    ///
    /// `result` must broadcast to this array's shape.
    pub fn write_from(&mut self, result: &Array) -> Result<(), OrderingError> {
        let src = result.to_nd()?;
        match self {
            Array::Nd(dst) => dst.write_from(&src),
            Array::Arrow(dst) => {
                let dtype = DType::from_arrow_type(dst.data_type())?;
                let mut staged = NdArray::zeros(dtype, &[dst.len()]);
                staged.write_from(&src)?;
                *dst = arrow_impl::nd_to_arrow(&staged)?;
                Ok(())
            }
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Array::Nd(a), Array::Nd(b)) => a == b,
            (Array::Arrow(a), Array::Arrow(b)) => a.to_data() == b.to_data(),
            _ => false,
        }
    }
}

impl From<NdArray> for Array {
    fn from(nd: NdArray) -> Self {
        Array::Nd(nd)
    }
}

impl From<ArrayRef> for Array {
    fn from(array: ArrayRef) -> Self {
        Array::Arrow(array)
    }
}

impl<T: Element> From<ArrayD<T>> for Array {
    fn from(array: ArrayD<T>) -> Self {
        Array::Nd(T::wrap(array))
    }
}
