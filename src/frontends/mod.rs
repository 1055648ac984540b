//! Framework-flavoured entry points built on the ordering contract.
//!
//! A frontend mirrors another array library's call signatures and dtype rules on
//! top of the backend registry, so code written against that library's search API
//! can be pointed at sortnest arrays.

pub mod paddle;
