//! The structural mapper: runs a per-leaf function over a container tree.
//!
//! The mapper owns every structural concern of a dispatched call: which leaves are
//! selected, descent into sequences, pruning, renaming and writing into a caller
//! supplied `out` tree. The leaf function only ever sees one array at a time,
//! together with the address it came from so that nested per-leaf arguments can be
//! looked up in parallel trees.
//!
//! Any leaf error aborts the walk and propagates unchanged. `out` leaves written
//! before the failing leaf keep their new contents.

use crate::config::MappingConfig;
use crate::container::{join_key_chain, Container, Value};
use crate::error::OrderingError;
use crate::types::Array;

/// The input of a dispatched call.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Array(&'a Array),
    Container(&'a Container),
    Value(&'a Value),
}

impl<'a> Operand<'a> {
    /// The bare array, if the operand is a single array.
    pub fn as_array(&self) -> Option<&'a Array> {
        match *self {
            Operand::Array(a) => Some(a),
            Operand::Value(Value::Array(a)) => Some(a),
            _ => None,
        }
    }
}

impl<'a> From<&'a Array> for Operand<'a> {
    fn from(array: &'a Array) -> Self {
        Operand::Array(array)
    }
}

impl<'a> From<&'a Container> for Operand<'a> {
    fn from(container: &'a Container) -> Self {
        Operand::Container(container)
    }
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(value: &'a Value) -> Self {
        Operand::Value(value)
    }
}

/// Where a leaf sits in the input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafAddr<'a> {
    /// Key-chain of the leaf (or of the sequence holding it). Empty for a bare array.
    pub key_chain: &'a str,
    /// Positions inside nested sequences, outermost first.
    pub index: &'a [usize],
}

impl<'a> LeafAddr<'a> {
    /// Finds this leaf's counterpart in a per-leaf argument.
    ///
    /// A bare array argument is shared by every leaf.
    pub fn resolve_arg<'v>(&self, arg: &'v Value) -> Result<&'v Array, OrderingError> {
        if let Value::Array(shared) = arg {
            return Ok(shared);
        }
        match arg.locate(self.key_chain, self.index)? {
            Value::Array(array) => Ok(array),
            other => Err(OrderingError::UnsupportedLeafType {
                key_chain: self.key_chain.to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }
}

pub struct StructuralMapper<'c> {
    cfg: &'c MappingConfig,
}

impl<'c> StructuralMapper<'c> {
    pub fn new(cfg: &'c MappingConfig) -> Self {
        Self { cfg }
    }

    /// Applies `leaf_fn` to every selected leaf of `input`.
    ///
    /// Returns the mapped tree, or a copy of `out` after writing into it when an
    /// `out` tree is supplied.
    pub fn run<F>(
        &self,
        input: Operand<'_>,
        out: Option<&mut Value>,
        leaf_fn: F,
    ) -> Result<Value, OrderingError>
    where
        F: FnMut(&Array, &LeafAddr<'_>) -> Result<Array, OrderingError>,
    {
        let mut out = out;
        let mapped = {
            let mut walker = Walker {
                cfg: self.cfg,
                out: out.as_deref_mut(),
                leaf_fn,
            };
            match input {
                Operand::Array(array) => Value::Array(walker.apply(array, "", &[])?),
                Operand::Value(Value::Array(array)) => Value::Array(walker.apply(array, "", &[])?),
                Operand::Container(container) => self.map_container(&mut walker, container)?,
                Operand::Value(Value::Container(container)) => {
                    self.map_container(&mut walker, container)?
                }
                Operand::Value(value) => walker.walk_value(value, "")?.unwrap_or_else(|| {
                    Value::Container(Container::new())
                }),
            }
        };
        match out {
            Some(out) => Ok(out.clone()),
            None => Ok(mapped),
        }
    }

    fn map_container<F>(
        &self,
        walker: &mut Walker<'c, '_, F>,
        container: &Container,
    ) -> Result<Value, OrderingError>
    where
        F: FnMut(&Array, &LeafAddr<'_>) -> Result<Array, OrderingError>,
    {
        if let Some(selector) = &self.cfg.key_chains {
            selector.validate(container)?;
        }
        let mapped = walker.walk_node(container, "")?.unwrap_or_default();
        Ok(Value::Container(self.apply_renames(mapped)?))
    }

    fn apply_renames(&self, mut mapped: Container) -> Result<Container, OrderingError> {
        let Some(selector) = self.cfg.key_chains.as_ref().filter(|_| self.cfg.to_apply) else {
            return Ok(mapped);
        };
        for (src, tgt) in selector.renames_deepest_first() {
            if src == tgt {
                continue;
            }
            if mapped.rename_key_chain(src, tgt) {
                log::trace!("renamed '{}' -> '{}' in place", src, tgt);
            } else if let Some(subtree) = mapped.remove_key_chain(src) {
                log::trace!("renaming '{}' -> '{}'", src, tgt);
                mapped.set_at_key_chain(tgt, subtree)?;
            }
        }
        Ok(mapped)
    }
}

struct Walker<'c, 'o, F> {
    cfg: &'c MappingConfig,
    out: Option<&'o mut Value>,
    leaf_fn: F,
}

impl<'c, 'o, F> Walker<'c, 'o, F>
where
    F: FnMut(&Array, &LeafAddr<'_>) -> Result<Array, OrderingError>,
{
    /// Maps one container level. Returns `None` when pruning empties the node.
    fn walk_node(
        &mut self,
        node: &Container,
        prefix: &str,
    ) -> Result<Option<Container>, OrderingError> {
        let mut mapped = Container::new();
        for (key, child) in node.iter() {
            let chain = join_key_chain(prefix, key);
            if let Some(value) = self.walk_value(child, &chain)? {
                mapped.insert(key, value);
            }
        }
        if self.cfg.prune_unapplied && mapped.is_empty() {
            return Ok(None);
        }
        Ok(Some(mapped))
    }

    fn walk_value(&mut self, value: &Value, chain: &str) -> Result<Option<Value>, OrderingError> {
        if let Value::Container(inner) = value {
            return Ok(self.walk_node(inner, chain)?.map(Value::Container));
        }
        if !self.cfg.is_applied(chain) {
            return Ok(if self.cfg.prune_unapplied {
                None
            } else {
                Some(value.clone())
            });
        }
        match value {
            Value::Array(array) => Ok(Some(Value::Array(self.apply(array, chain, &[])?))),
            Value::Sequence(items) if self.cfg.map_sequences => {
                let mut index = Vec::new();
                Ok(Some(Value::Sequence(
                    self.walk_sequence(items, chain, &mut index)?,
                )))
            }
            other if self.cfg.map_sequences => Err(OrderingError::UnsupportedLeafType {
                key_chain: chain.to_string(),
                found: other.type_name().to_string(),
            }),
            // Without `map_sequences`, non-array leaves pass through untouched.
            other => Ok(Some(other.clone())),
        }
    }

    fn walk_sequence(
        &mut self,
        items: &[Value],
        chain: &str,
        index: &mut Vec<usize>,
    ) -> Result<Vec<Value>, OrderingError> {
        let mut mapped = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            index.push(i);
            let value = match item {
                Value::Array(array) => Value::Array(self.apply(array, chain, index)?),
                Value::Sequence(inner) => Value::Sequence(self.walk_sequence(inner, chain, index)?),
                other => {
                    return Err(OrderingError::UnsupportedLeafType {
                        key_chain: format!("{}{:?}", chain, index),
                        found: other.type_name().to_string(),
                    })
                }
            };
            index.pop();
            mapped.push(value);
        }
        Ok(mapped)
    }

    fn apply(&mut self, leaf: &Array, chain: &str, index: &[usize]) -> Result<Array, OrderingError> {
        let addr = LeafAddr {
            key_chain: chain,
            index,
        };
        log::trace!("leaf '{}' {:?}: shape {:?}", chain, index, leaf.shape());
        let result = (self.leaf_fn)(leaf, &addr)?;
        if let Some(out) = self.out.as_deref_mut() {
            let target = self.cfg.output_chain(chain);
            match out.locate_mut(&target, index)? {
                Value::Array(slot) => slot.write_from(&result)?,
                other => {
                    return Err(OrderingError::UnsupportedLeafType {
                        key_chain: target,
                        found: other.type_name().to_string(),
                    })
                }
            }
        }
        Ok(result)
    }
}
