//! This file is the root of the `sortnest` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`backend`, `bridge`,
//!     `container`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the public calling surface: the static ordering functions, the
//!     dispatcher, the container and array types, and the configs they take.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod backend;
pub mod bridge;
pub mod config;
pub mod container;
pub mod error;
pub mod frontends;
pub mod kernels;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use backend::{BackendRegistry, OrderingBackend};
pub use bridge::{argpartition, argsort, msort, searchsorted, sort, OrderingDispatcher};
pub use config::{
    MappingConfig, OrderingConfig, PartitionConfig, SearchConfig, SelectKind, Side, SortConfig,
};
pub use container::{Container, KeyChainSelector, Value};
pub use error::OrderingError;
pub use observability::enable_verbose_logging;
pub use types::{Array, ArrayKind, DType, Kth, KthArg, NdArray};
