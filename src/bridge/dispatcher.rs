// In: src/bridge/dispatcher.rs

//! The dispatcher joins the structural mapper to the backend registry.
//!
//! It decides which operand drives the mapping, resolves nested per-leaf
//! arguments, and resolves a backend for every leaf it touches.

use crate::backend::{BackendRegistry, OrderingBackend};
use crate::config::{MappingConfig, PartitionConfig, SearchConfig, SortConfig};
use crate::container::mapper::{LeafAddr, Operand, StructuralMapper};
use crate::container::Value;
use crate::error::OrderingError;
use crate::types::{Array, Kth, KthArg};
use std::borrow::Cow;

/// Runs ordering operations against one backend registry.
#[derive(Debug, Clone, Copy)]
pub struct OrderingDispatcher<'r> {
    registry: &'r BackendRegistry,
}

impl OrderingDispatcher<'static> {
    /// A dispatcher over the process-wide registry.
    pub fn global() -> Self {
        Self::new(BackendRegistry::global())
    }
}

impl<'r> OrderingDispatcher<'r> {
    pub fn new(registry: &'r BackendRegistry) -> Self {
        Self { registry }
    }

    fn resolve(&self, leaf: &Array, addr: &LeafAddr<'_>) -> Result<&'r dyn OrderingBackend, OrderingError> {
        let backend = self.registry.resolve(leaf)?;
        log_metric!(
            "event" = "resolve_backend",
            "key_chain" = addr.key_chain,
            "backend" = backend.name()
        );
        Ok(backend)
    }

    pub fn sort<'a>(
        &self,
        x: impl Into<Operand<'a>>,
        cfg: &SortConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        log::debug!(
            "sort: axis={} descending={} stable={}",
            cfg.axis,
            cfg.descending,
            cfg.stable
        );
        StructuralMapper::new(mapping).run(x.into(), out, |leaf, addr| {
            self.resolve(leaf, addr)?.sort(leaf, cfg)
        })
    }

    pub fn argsort<'a>(
        &self,
        x: impl Into<Operand<'a>>,
        cfg: &SortConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        log::debug!(
            "argsort: axis={} descending={} stable={}",
            cfg.axis,
            cfg.descending,
            cfg.stable
        );
        StructuralMapper::new(mapping).run(x.into(), out, |leaf, addr| {
            self.resolve(leaf, addr)?.argsort(leaf, cfg)
        })
    }

    pub fn msort<'a>(
        &self,
        a: impl Into<Operand<'a>>,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        log::debug!("msort");
        StructuralMapper::new(mapping).run(a.into(), out, |leaf, addr| {
            self.resolve(leaf, addr)?.msort(leaf)
        })
    }

    /// Insertion points of `v` into the sorted leaves of `x`.
    ///
    /// `v` and `sorter` are per-leaf arguments: a bare array is shared by every
    /// leaf, a nested value is looked up at each leaf's key-chain. When `x` is a
    /// bare array and `v` is nested, `v` drives the mapping instead.
    pub fn searchsorted<'a>(
        &self,
        x: impl Into<Operand<'a>>,
        v: &Value,
        sorter: Option<&Value>,
        cfg: &SearchConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        log::debug!("searchsorted: side={:?} ret_dtype={}", cfg.side, cfg.ret_dtype);
        cfg.ret_dtype.ensure_integer("ret_dtype")?;
        let x = x.into();
        let mapper = StructuralMapper::new(mapping);

        if let (Some(haystack), false) = (x.as_array(), matches!(v, Value::Array(_))) {
            return mapper.run(Operand::Value(v), out, |probes, addr| {
                let sorter = sorter.map(|s| addr.resolve_arg(s)).transpose()?;
                self.resolve(haystack, addr)?
                    .searchsorted(haystack, probes, sorter, cfg)
            });
        }
        mapper.run(x, out, |leaf, addr| {
            let probes = addr.resolve_arg(v)?;
            let sorter = sorter.map(|s| addr.resolve_arg(s)).transpose()?;
            self.resolve(leaf, addr)?
                .searchsorted(leaf, probes, sorter, cfg)
        })
    }

    /// Partition indices of every leaf of `x` around `kth`.
    ///
    /// A nested `kth` gives each leaf its own pivots; when `x` is a bare array, a
    /// nested `kth` drives the mapping instead.
    pub fn argpartition<'a>(
        &self,
        x: impl Into<Operand<'a>>,
        kth: &KthArg,
        cfg: &PartitionConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        log::debug!("argpartition: axis={} kind={:?}", cfg.axis, cfg.kind);
        let x = x.into();
        let mapper = StructuralMapper::new(mapping);

        match kth {
            KthArg::Nested(pivots) if !matches!(pivots, Value::Array(_)) => {
                if let Some(values) = x.as_array() {
                    return mapper.run(Operand::Value(pivots), out, |pivot_leaf, addr| {
                        let kth = Kth::from_array(pivot_leaf)?;
                        self.resolve(values, addr)?.argpartition(values, &kth, cfg)
                    });
                }
                mapper.run(x, out, |leaf, addr| {
                    let kth = Kth::from_array(addr.resolve_arg(pivots)?)?;
                    self.resolve(leaf, addr)?.argpartition(leaf, &kth, cfg)
                })
            }
            _ => {
                let kth = shared_kth(kth)?;
                mapper.run(x, out, |leaf, addr| {
                    self.resolve(leaf, addr)?.argpartition(leaf, &kth, cfg)
                })
            }
        }
    }
}

/// The pivots shared by every leaf.
fn shared_kth(kth: &KthArg) -> Result<Cow<'_, Kth>, OrderingError> {
    match kth {
        KthArg::Fixed(kth) => Ok(Cow::Borrowed(kth)),
        KthArg::Nested(Value::Array(array)) => Ok(Cow::Owned(Kth::from_array(array)?)),
        KthArg::Nested(other) => Err(OrderingError::UnsupportedLeafType {
            key_chain: String::new(),
            found: other.type_name().to_string(),
        }),
    }
}
