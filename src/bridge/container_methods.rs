// In: src/bridge/container_methods.rs

//! The instance calling form: ordering methods bound to a `Container`.
//!
//! Every method forwards to the static form with `x = self`, so both forms share
//! one implementation and cannot drift apart.

use crate::bridge::stateless_api;
use crate::config::{MappingConfig, PartitionConfig, SearchConfig, SortConfig};
use crate::container::{Container, Value};
use crate::error::OrderingError;
use crate::types::KthArg;

impl Container {
    pub fn sort(
        &self,
        cfg: &SortConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        stateless_api::sort(self, cfg, mapping, out)
    }

    pub fn argsort(
        &self,
        cfg: &SortConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        stateless_api::argsort(self, cfg, mapping, out)
    }

    pub fn msort(
        &self,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        stateless_api::msort(self, mapping, out)
    }

    pub fn searchsorted(
        &self,
        v: &Value,
        sorter: Option<&Value>,
        cfg: &SearchConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        stateless_api::searchsorted(self, v, sorter, cfg, mapping, out)
    }

    pub fn argpartition(
        &self,
        kth: &KthArg,
        cfg: &PartitionConfig,
        mapping: &MappingConfig,
        out: Option<&mut Value>,
    ) -> Result<Value, OrderingError> {
        stateless_api::argpartition(self, kth, cfg, mapping, out)
    }
}
