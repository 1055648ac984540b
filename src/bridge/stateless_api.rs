// In: src/bridge/stateless_api.rs

//! The static calling form: free functions over the process-wide backend registry.
//!
//! Each function accepts a bare array, a container, or any `Value` as `x`, plus
//! the operation's config, a `MappingConfig` for containers, and an optional `out`
//! tree. With `out`, results are written into it and a copy of it is returned.

use crate::bridge::OrderingDispatcher;
use crate::config::{MappingConfig, PartitionConfig, SearchConfig, SortConfig};
use crate::container::mapper::Operand;
use crate::container::Value;
use crate::error::OrderingError;
use crate::types::KthArg;

/// Sorted copies of every selected leaf of `x`.
pub fn sort<'a>(
    x: impl Into<Operand<'a>>,
    cfg: &SortConfig,
    mapping: &MappingConfig,
    out: Option<&mut Value>,
) -> Result<Value, OrderingError> {
    OrderingDispatcher::global().sort(x, cfg, mapping, out)
}

/// Sorting permutations (`Int64`) of every selected leaf of `x`.
pub fn argsort<'a>(
    x: impl Into<Operand<'a>>,
    cfg: &SortConfig,
    mapping: &MappingConfig,
    out: Option<&mut Value>,
) -> Result<Value, OrderingError> {
    OrderingDispatcher::global().argsort(x, cfg, mapping, out)
}

/// Every selected leaf of `a` sorted ascending along its leading axis.
pub fn msort<'a>(
    a: impl Into<Operand<'a>>,
    mapping: &MappingConfig,
    out: Option<&mut Value>,
) -> Result<Value, OrderingError> {
    OrderingDispatcher::global().msort(a, mapping, out)
}

/// Insertion points of `v` into every selected (sorted) leaf of `x`.
pub fn searchsorted<'a>(
    x: impl Into<Operand<'a>>,
    v: &Value,
    sorter: Option<&Value>,
    cfg: &SearchConfig,
    mapping: &MappingConfig,
    out: Option<&mut Value>,
) -> Result<Value, OrderingError> {
    OrderingDispatcher::global().searchsorted(x, v, sorter, cfg, mapping, out)
}

/// Partition indices (`Int64`) of every selected leaf of `x` around `kth`.
pub fn argpartition<'a>(
    x: impl Into<Operand<'a>>,
    kth: &KthArg,
    cfg: &PartitionConfig,
    mapping: &MappingConfig,
    out: Option<&mut Value>,
) -> Result<Value, OrderingError> {
    OrderingDispatcher::global().argpartition(x, kth, cfg, mapping, out)
}
