//! Ordering backends and the registry that resolves them.
//!
//! A backend implements the ordering contract for one array storage kind. The
//! registry maps each `ArrayKind` to the backend that handles it; resolution is a
//! pure lookup on the array's tag. Extending the library to a new storage kind
//! means registering a new backend, with no change to the dispatch layer.

pub mod arrow;
pub mod native;


use crate::config::{PartitionConfig, SearchConfig, SortConfig};
use crate::error::OrderingError;
use crate::types::{Array, ArrayKind, Kth};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The ordering primitive contract, as implemented by one array backend.
///
/// Index-producing operations return integer arrays whose positions refer to the
/// ordered axis. Every method fails with `InvalidAxis` for an axis outside the
/// array's rank.
pub trait OrderingBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Values sorted along `cfg.axis`.
    fn sort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError>;

    /// The `Int64` permutation that sorts `x` along `cfg.axis`.
    fn argsort(&self, x: &Array, cfg: &SortConfig) -> Result<Array, OrderingError>;

    /// `sort` along the leading axis, ascending and stable.
    fn msort(&self, a: &Array) -> Result<Array, OrderingError> {
        self.sort(a, &SortConfig::leading_axis())
    }

    /// Insertion points of the probes `v` into the ascending `x`, in `cfg.ret_dtype`.
    ///
    /// `sorter`, when given, is the permutation that sorts an unsorted `x`.
    fn searchsorted(
        &self,
        x: &Array,
        v: &Array,
        sorter: Option<&Array>,
        cfg: &SearchConfig,
    ) -> Result<Array, OrderingError>;

    /// An `Int64` permutation that places the `kth` order statistics along
    /// `cfg.axis`, with no larger value before and no smaller value after each.
    fn argpartition(&self, x: &Array, kth: &Kth, cfg: &PartitionConfig)
        -> Result<Array, OrderingError>;
}

/// Maps array kinds to the backend that orders them.
#[derive(Clone)]
pub struct BackendRegistry {
    backends: HashMap<ArrayKind, Arc<dyn OrderingBackend>>,
}

impl BackendRegistry {
    /// A registry with no backends; every resolution fails.
    pub fn empty() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// A registry with the ndarray and Arrow backends installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(ArrayKind::Ndarray, Arc::new(native::NdarrayBackend));
        registry.register(ArrayKind::Arrow, Arc::new(arrow::ArrowBackend));
        registry
    }

    /// The process-wide registry used by the stateless API.
    pub fn global() -> &'static BackendRegistry {
        static GLOBAL: OnceLock<BackendRegistry> = OnceLock::new();
        GLOBAL.get_or_init(BackendRegistry::with_defaults)
    }

    /// Installs `backend` for `kind`, returning the backend it replaces.
    pub fn register(
        &mut self,
        kind: ArrayKind,
        backend: Arc<dyn OrderingBackend>,
    ) -> Option<Arc<dyn OrderingBackend>> {
        log::debug!("registering '{}' backend for {} arrays", backend.name(), kind);
        self.backends.insert(kind, backend)
    }

    pub fn unregister(&mut self, kind: ArrayKind) -> Option<Arc<dyn OrderingBackend>> {
        self.backends.remove(&kind)
    }

    pub fn supports(&self, kind: ArrayKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// The backend for `x`'s storage kind.
    pub fn resolve(&self, x: &Array) -> Result<&dyn OrderingBackend, OrderingError> {
        let kind = x.kind();
        self.backends
            .get(&kind)
            .map(|backend| backend.as_ref())
            .ok_or(OrderingError::BackendUnavailable(kind))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, backend) in &self.backends {
            map.entry(kind, &backend.name());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::arrow::array::Int32Array;

    #[test]
    fn test_default_registry_resolves_both_kinds() {
        let registry = BackendRegistry::with_defaults();
        let nd = Array::from_vec(vec![1i32]);
        let arrow = Array::Arrow(Arc::new(Int32Array::from(vec![1])));
        assert_eq!(registry.resolve(&nd).unwrap().name(), "ndarray");
        assert_eq!(registry.resolve(&arrow).unwrap().name(), "arrow");
        assert!(BackendRegistry::global().supports(ArrayKind::Arrow));
    }

    #[test]
    fn test_unregistered_kind_is_unavailable() {
        let mut registry = BackendRegistry::with_defaults();
        assert!(registry.unregister(ArrayKind::Arrow).is_some());
        let arrow = Array::Arrow(Arc::new(Int32Array::from(vec![1])));
        let err = registry.resolve(&arrow).err().unwrap();
        assert!(matches!(err, OrderingError::BackendUnavailable(ArrayKind::Arrow)));
        assert!(BackendRegistry::empty()
            .resolve(&Array::from_vec(vec![0u64]))
            .is_err());
    }

    #[test]
    fn test_register_replaces_and_returns_previous() {
        let mut registry = BackendRegistry::empty();
        assert!(registry
            .register(ArrayKind::Ndarray, Arc::new(native::NdarrayBackend))
            .is_none());
        let previous = registry.register(ArrayKind::Ndarray, Arc::new(native::NdarrayBackend));
        assert_eq!(previous.map(|b| b.name()), Some("ndarray"));
    }
}
