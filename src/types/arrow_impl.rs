//! Marshalling between Arrow primitive arrays and ndarray storage.
//!
//! Arrow arrays are one-dimensional. Null slots have no dense representation, so
//! converting an array with nulls is rejected rather than silently filled.

use crate::error::OrderingError;
use crate::types::array::{with_nd, Element, NdArray};
use crate::types::DType;
use arrow::array::{Array as ArrowArray, ArrayRef, AsArray, PrimitiveArray};
use ndarray::ArrayD;
use std::sync::Arc;

/// Converts a null-free Arrow primitive array into a 1-D `NdArray`.
pub fn arrow_to_nd(array: &dyn ArrowArray) -> Result<NdArray, OrderingError> {
    if array.null_count() > 0 {
        return Err(OrderingError::UnsupportedType(format!(
            "Arrow array with {} null slot(s) has no dense ndarray form",
            array.null_count()
        )));
    }
    match DType::from_arrow_type(array.data_type())? {
        DType::Int32 => primitive_to_nd::<i32>(array),
        DType::Int64 => primitive_to_nd::<i64>(array),
        DType::UInt32 => primitive_to_nd::<u32>(array),
        DType::UInt64 => primitive_to_nd::<u64>(array),
        DType::Float32 => primitive_to_nd::<f32>(array),
        DType::Float64 => primitive_to_nd::<f64>(array),
    }
}

fn primitive_to_nd<T: Element>(array: &dyn ArrowArray) -> Result<NdArray, OrderingError> {
    let values: Vec<T> = array.as_primitive::<T::Arrow>().values().to_vec();
    NdArray::from_shape_vec(&[values.len()], values)
}

/// Converts a 1-D `NdArray` into an Arrow primitive array of the same dtype.
pub fn nd_to_arrow(nd: &NdArray) -> Result<ArrayRef, OrderingError> {
    if nd.ndim() != 1 {
        return Err(OrderingError::InvalidArgument(format!(
            "Arrow arrays are one-dimensional, got an array of shape {:?}",
            nd.shape()
        )));
    }
    Ok(with_nd!(nd, a => typed_to_arrow(a)))
}

fn typed_to_arrow<T: Element>(a: &ArrayD<T>) -> ArrayRef {
    Arc::new(PrimitiveArray::<T::Arrow>::from_iter_values(a.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float32Array, Int64Array, StringArray};
    use ndarray::array;

    #[test]
    fn test_arrow_to_nd_preserves_values_and_dtype() {
        let arrow = Float32Array::from(vec![3.5, -1.0, 0.25]);
        let nd = arrow_to_nd(&arrow).unwrap();
        assert_eq!(nd.dtype(), DType::Float32);
        assert_eq!(nd, NdArray::from(vec![3.5f32, -1.0, 0.25]));
    }

    #[test]
    fn test_nulls_are_rejected() {
        let arrow = Int64Array::from(vec![Some(1), None, Some(3)]);
        let err = arrow_to_nd(&arrow).unwrap_err();
        assert!(matches!(err, OrderingError::UnsupportedType(msg) if msg.contains("null")));
    }

    #[test]
    fn test_non_numeric_arrays_are_rejected() {
        let arrow = StringArray::from(vec!["a", "b"]);
        assert!(matches!(arrow_to_nd(&arrow), Err(OrderingError::UnsupportedType(_))));
    }

    #[test]
    fn test_nd_to_arrow_requires_one_dimension() {
        let nd = NdArray::from(array![[1i64, 2], [3, 4]].into_dyn());
        assert!(matches!(nd_to_arrow(&nd), Err(OrderingError::InvalidArgument(_))));

        let flat = NdArray::from(vec![7u32, 8]);
        let arrow = nd_to_arrow(&flat).unwrap();
        assert_eq!(arrow.len(), 2);
        assert_eq!(DType::from_arrow_type(arrow.data_type()).unwrap(), DType::UInt32);
    }
}
