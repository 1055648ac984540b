//! This module defines the core, strongly-typed data representations used
//! throughout sortnest.
//!
//! It includes the canonical `DType` enum, the backend-tagged `Array` value and its
//! ndarray storage `NdArray`, the Arrow marshalling helpers, and the `Kth` pivot
//! argument of `argpartition`.

pub mod array;
pub mod arrow_impl;
pub mod dtype;
pub mod kth;

// Re-export the main type(s) for easier access.
pub use array::{normalize_axis, Array, ArrayKind, Element, NdArray};
pub use dtype::DType;
pub use kth::{Kth, KthArg};
