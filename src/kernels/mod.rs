//! Pure, stateless slice kernels shared by every backend.
//!
//! Each kernel operates on one contiguous lane of values and returns positions or
//! reordered values; axis handling, dtype dispatch and result packaging live in the
//! backends. The comparisons all go through `Element::order_cmp`.

pub mod order;
pub mod search;
pub mod select;
