//! Nested key-value containers of arrays.
//!
//! A `Container` is an insertion-ordered map from string keys to `Value`s, where a
//! value is an array leaf, a sequence, a nested container, or an opaque non-array
//! leaf. Every node is addressed by a key-chain: the `/`-joined keys from the root.

pub mod mapper;
pub mod selector;


pub use selector::KeyChainSelector;

use crate::error::OrderingError;
use crate::types::{Array, NdArray};

/// Separator between the keys of a key-chain.
pub const KEY_CHAIN_SEPARATOR: char = '/';

/// Joins `key` onto `prefix`; the root has the empty chain.
pub fn join_key_chain(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, KEY_CHAIN_SEPARATOR, key)
    }
}

fn split_head(key_chain: &str) -> (&str, Option<&str>) {
    match key_chain.split_once(KEY_CHAIN_SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (key_chain, None),
    }
}

/// Splits off the last key: `("b", "c")` for `"b/c"`, `("", "a")` for `"a"`.
fn split_parent(key_chain: &str) -> (&str, &str) {
    key_chain
        .rsplit_once(KEY_CHAIN_SEPARATOR)
        .unwrap_or(("", key_chain))
}

//==================================================================================
// 1. Value
//==================================================================================

/// Any node of a container tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Array(Array),
    Sequence(Vec<Value>),
    Container(Container),
    /// A non-array leaf (number, string, flag) carried through unchanged.
    Other(serde_json::Value),
}

impl Value {
    /// Short description used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Array(_) => "array",
            Value::Sequence(_) => "sequence",
            Value::Container(_) => "container",
            Value::Other(serde_json::Value::Null) => "null",
            Value::Other(serde_json::Value::Bool(_)) => "bool",
            Value::Other(serde_json::Value::Number(_)) => "number",
            Value::Other(serde_json::Value::String(_)) => "string",
            Value::Other(serde_json::Value::Array(_)) => "json array",
            Value::Other(serde_json::Value::Object(_)) => "json object",
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Finds the node that corresponds to a leaf at `key_chain` and sequence
    /// position `index` of another tree.
    ///
    /// Broadcasting rule for per-leaf arguments: once an array (or any non-sequence
    /// node) is reached, the remaining sequence positions share it.
    pub fn locate(&self, key_chain: &str, index: &[usize]) -> Result<&Value, OrderingError> {
        let mut current = if key_chain.is_empty() {
            self
        } else {
            match self {
                Value::Container(c) => c
                    .at_key_chain(key_chain)
                    .ok_or_else(|| OrderingError::KeyChainNotFound(key_chain.to_string()))?,
                _ => return Err(OrderingError::KeyChainNotFound(key_chain.to_string())),
            }
        };
        for &i in index {
            match current {
                Value::Sequence(items) => {
                    current = items.get(i).ok_or_else(|| {
                        OrderingError::KeyChainNotFound(format!("{}[{}]", key_chain, i))
                    })?;
                }
                _ => break,
            }
        }
        Ok(current)
    }

    /// Mutable counterpart of `locate` used for `out` trees, which must mirror the
    /// result structure exactly.
    pub fn locate_mut(
        &mut self,
        key_chain: &str,
        index: &[usize],
    ) -> Result<&mut Value, OrderingError> {
        let mut current = if key_chain.is_empty() {
            self
        } else {
            match self {
                Value::Container(c) => c
                    .at_key_chain_mut(key_chain)
                    .ok_or_else(|| OrderingError::KeyChainNotFound(key_chain.to_string()))?,
                _ => return Err(OrderingError::KeyChainNotFound(key_chain.to_string())),
            }
        };
        for &i in index {
            current = match current {
                Value::Sequence(items) => items.get_mut(i).ok_or_else(|| {
                    OrderingError::KeyChainNotFound(format!("{}[{}]", key_chain, i))
                })?,
                _ => {
                    return Err(OrderingError::KeyChainNotFound(format!(
                        "{}[{}]",
                        key_chain, i
                    )))
                }
            };
        }
        Ok(current)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<NdArray> for Value {
    fn from(array: NdArray) -> Self {
        Value::Array(Array::Nd(array))
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        Value::Container(container)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Other(value)
    }
}

//==================================================================================
// 2. Container
//==================================================================================

/// An insertion-ordered mapping from keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    entries: Vec<(String, Value)>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `value` under `key`. An existing key keeps its position and its old
    /// value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn at_key_chain(&self, key_chain: &str) -> Option<&Value> {
        let (head, rest) = split_head(key_chain);
        let value = self.get(head)?;
        match rest {
            None => Some(value),
            Some(rest) => match value {
                Value::Container(inner) => inner.at_key_chain(rest),
                _ => None,
            },
        }
    }

    pub fn at_key_chain_mut(&mut self, key_chain: &str) -> Option<&mut Value> {
        let (head, rest) = split_head(key_chain);
        let value = self.get_mut(head)?;
        match rest {
            None => Some(value),
            Some(rest) => match value {
                Value::Container(inner) => inner.at_key_chain_mut(rest),
                _ => None,
            },
        }
    }

    pub fn contains_key_chain(&self, key_chain: &str) -> bool {
        self.at_key_chain(key_chain).is_some()
    }

    /// Stores `value` at `key_chain`, creating intermediate containers as needed.
    pub fn set_at_key_chain(
        &mut self,
        key_chain: &str,
        value: Value,
    ) -> Result<Option<Value>, OrderingError> {
        if key_chain.is_empty() {
            return Err(OrderingError::InvalidArgument(
                "cannot set a value at the empty key-chain".to_string(),
            ));
        }
        let (head, rest) = split_head(key_chain);
        let Some(rest) = rest else {
            return Ok(self.insert(head, value));
        };
        if !self.contains_key(head) {
            self.insert(head, Container::new());
        }
        match self.get_mut(head) {
            Some(Value::Container(inner)) => inner.set_at_key_chain(rest, value),
            Some(other) => Err(OrderingError::InvalidArgument(format!(
                "cannot descend into '{}': it holds a {}, not a container",
                head,
                other.type_name()
            ))),
            None => Err(OrderingError::InternalError(format!(
                "entry '{}' vanished after insertion",
                head
            ))),
        }
    }

    /// Removes and returns the node at `key_chain`.
    pub fn remove_key_chain(&mut self, key_chain: &str) -> Option<Value> {
        let (head, rest) = split_head(key_chain);
        match rest {
            None => self.remove(head),
            Some(rest) => match self.get_mut(head)? {
                Value::Container(inner) => inner.remove_key_chain(rest),
                _ => None,
            },
        }
    }

    /// Renames the node at `from` to `to` without moving it, when both chains share
    /// a parent. Returns `false`, leaving the tree untouched, when the parents
    /// differ, `from` is missing or `to` is already taken.
    pub fn rename_key_chain(&mut self, from: &str, to: &str) -> bool {
        let (from_parent, from_key) = split_parent(from);
        let (to_parent, to_key) = split_parent(to);
        if from_parent != to_parent {
            return false;
        }
        let parent = if from_parent.is_empty() {
            self
        } else {
            match self.at_key_chain_mut(from_parent) {
                Some(Value::Container(inner)) => inner,
                _ => return false,
            }
        };
        if parent.contains_key(to_key) {
            return false;
        }
        match parent.entries.iter_mut().find(|(k, _)| k == from_key) {
            Some((key, _)) => {
                *key = to_key.to_string();
                true
            }
            None => false,
        }
    }

    /// Key-chains of every non-container node, depth first in insertion order.
    pub fn leaf_key_chains(&self) -> Vec<String> {
        let mut chains = Vec::new();
        self.collect_leaf_chains("", &mut chains);
        chains
    }

    fn collect_leaf_chains(&self, prefix: &str, chains: &mut Vec<String>) {
        for (key, value) in self.iter() {
            let chain = join_key_chain(prefix, key);
            match value {
                Value::Container(inner) => inner.collect_leaf_chains(&chain, chains),
                _ => chains.push(chain),
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut container = Container::new();
        for (key, value) in iter {
            container.insert(key, value);
        }
        container
    }
}
