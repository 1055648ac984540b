// In: src/config.rs

//! The parameter bundles accepted by every ordering operation.
//!
//! Each operation takes its own small config struct, constructed by the caller
//! for the call. There are no process-wide defaults: the `Default` impls below are
//! the documented defaults, and they can also be loaded from JSON through
//! `OrderingConfig`.

use crate::container::KeyChainSelector;
use crate::error::OrderingError;
use crate::types::DType;
use serde::{Deserialize, Serialize};

//==================================================================================
// I. Ordering Parameters
//==================================================================================

/// Parameters of `sort` and `argsort`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SortConfig {
    /// The axis to order along. Negative values count from the last axis.
    #[serde(default = "default_axis")]
    pub axis: isize,

    /// If true, produce a non-increasing order.
    #[serde(default)]
    pub descending: bool,

    /// If true, equal elements keep their relative order.
    #[serde(default = "default_true")]
    pub stable: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            axis: default_axis(),
            descending: false,
            stable: true,
        }
    }
}

impl SortConfig {
    /// The fixed parameters of `msort`: ascending, stable, along the leading axis.
    pub fn leading_axis() -> Self {
        Self {
            axis: 0,
            descending: false,
            stable: true,
        }
    }
}

/// Which insertion point `searchsorted` reports for probes equal to existing elements.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The first suitable position.
    #[default]
    Left,
    /// The last suitable position.
    Right,
}

/// Parameters of `searchsorted`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    #[serde(default)]
    pub side: Side,

    /// Integer dtype of the returned positions.
    #[serde(default)]
    pub ret_dtype: DType,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            side: Side::Left,
            ret_dtype: DType::Int64,
        }
    }
}

/// Selection algorithm family requested for `argpartition`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectKind {
    #[default]
    Introselect,
    Quickselect,
}

/// Parameters of `argpartition`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PartitionConfig {
    #[serde(default = "default_axis")]
    pub axis: isize,

    #[serde(default)]
    pub kind: SelectKind,

    /// Field order for record arrays. No backend stores records, so any value
    /// here is rejected with `InvalidArgument`.
    #[serde(default)]
    pub order: Option<Vec<String>>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            axis: default_axis(),
            kind: SelectKind::default(),
            order: None,
        }
    }
}

impl PartitionConfig {
    pub(crate) fn reject_order(&self) -> Result<(), OrderingError> {
        match &self.order {
            None => Ok(()),
            Some(fields) => Err(OrderingError::InvalidArgument(format!(
                "field ordering {:?} is not supported for plain numeric arrays",
                fields
            ))),
        }
    }
}

//==================================================================================
// II. Structural-Mapping Parameters
//==================================================================================

/// Controls how an operation is mapped over the leaves of a container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct MappingConfig {
    /// Restricts (or, with `to_apply = false`, excludes) the leaves the operation
    /// runs on. `None` selects every leaf.
    #[serde(default)]
    pub key_chains: Option<KeyChainSelector>,

    /// If true, the operation runs on the selected leaves; if false, it runs on
    /// every leaf except the selected ones.
    #[serde(default = "default_true")]
    pub to_apply: bool,

    /// If true, leaves the operation did not run on are dropped from the result.
    #[serde(default)]
    pub prune_unapplied: bool,

    /// If true, sequences of arrays are entered and mapped element-wise.
    #[serde(default)]
    pub map_sequences: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            key_chains: None,
            to_apply: true,
            prune_unapplied: false,
            map_sequences: false,
        }
    }
}

impl MappingConfig {
    /// Whether the operation runs on the leaf at `key_chain`.
    pub fn is_applied(&self, key_chain: &str) -> bool {
        match &self.key_chains {
            None => true,
            Some(selector) => selector.selects(key_chain) == self.to_apply,
        }
    }

    /// The key-chain the result of the leaf at `key_chain` is stored under.
    pub fn output_chain(&self, key_chain: &str) -> String {
        match &self.key_chains {
            Some(selector) if self.to_apply => selector
                .rename_target(key_chain)
                .unwrap_or_else(|| key_chain.to_string()),
            _ => key_chain.to_string(),
        }
    }
}

//==================================================================================
// III. The Grouped OrderingConfig
//==================================================================================

/// Every parameter bundle in one place, for callers that load their defaults from
/// a file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct OrderingConfig {
    #[serde(default)]
    pub sort: SortConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub partition: PartitionConfig,

    #[serde(default)]
    pub mapping: MappingConfig,
}

impl OrderingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, OrderingError> {
        let config: OrderingConfig = serde_json::from_str(json)?;
        config.search.ret_dtype.ensure_integer("ret_dtype")?;
        Ok(config)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

/// Helper for `serde` to default an axis to the last one.
fn default_axis() -> isize {
    -1
}
