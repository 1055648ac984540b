//! Key-chain selection for the structural mapper.

use crate::container::{Container, KEY_CHAIN_SEPARATOR};
use crate::error::OrderingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Picks the leaves an operation runs on.
///
/// A selector chain matches the leaf at that chain and every leaf below it. With
/// `Rename`, matched subtrees are also moved to the target chain in the result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeyChainSelector {
    Chains(Vec<String>),
    Rename(BTreeMap<String, String>),
}

/// `chain` equals `prefix` or lies below it.
fn is_under(chain: &str, prefix: &str) -> bool {
    match chain.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(KEY_CHAIN_SEPARATOR),
        None => false,
    }
}

impl KeyChainSelector {
    pub fn chains<S: Into<String>>(chains: impl IntoIterator<Item = S>) -> Self {
        KeyChainSelector::Chains(chains.into_iter().map(Into::into).collect())
    }

    pub fn rename<S: Into<String>, T: Into<String>>(pairs: impl IntoIterator<Item = (S, T)>) -> Self {
        KeyChainSelector::Rename(
            pairs
                .into_iter()
                .map(|(src, tgt)| (src.into(), tgt.into()))
                .collect(),
        )
    }

    /// The selector's source chains.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            KeyChainSelector::Chains(chains) => chains.iter().map(String::as_str).collect(),
            KeyChainSelector::Rename(map) => map.keys().map(String::as_str).collect(),
        }
    }

    pub fn selects(&self, key_chain: &str) -> bool {
        self.sources().into_iter().any(|src| is_under(key_chain, src))
    }

    /// Fails with `KeyChainNotFound` for the first source chain absent from `root`.
    pub fn validate(&self, root: &Container) -> Result<(), OrderingError> {
        match self
            .sources()
            .into_iter()
            .find(|src| !root.contains_key_chain(src))
        {
            Some(missing) => Err(OrderingError::KeyChainNotFound(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Where the leaf at `key_chain` lands after renaming, using the most specific
    /// matching source. `None` when no rename applies.
    pub fn rename_target(&self, key_chain: &str) -> Option<String> {
        let KeyChainSelector::Rename(map) = self else {
            return None;
        };
        let (src, tgt) = map
            .iter()
            .filter(|(src, _)| is_under(key_chain, src))
            .max_by_key(|(src, _)| src.len())?;
        Some(format!("{}{}", tgt, &key_chain[src.len()..]))
    }

    /// Rename pairs ordered so that deeper sources move before their ancestors.
    pub(crate) fn renames_deepest_first(&self) -> Vec<(&str, &str)> {
        let KeyChainSelector::Rename(map) = self else {
            return Vec::new();
        };
        let mut pairs: Vec<(&str, &str)> = map
            .iter()
            .map(|(src, tgt)| (src.as_str(), tgt.as_str()))
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Value;
    use crate::types::Array;

    #[test]
    fn test_prefix_matching_respects_separators() {
        let sel = KeyChainSelector::chains(["a/b"]);
        assert!(sel.selects("a/b"));
        assert!(sel.selects("a/b/c"));
        assert!(!sel.selects("a/bc"));
        assert!(!sel.selects("a"));
    }

    #[test]
    fn test_validate_reports_missing_chain() {
        let root = Container::new().with(
            "a",
            Container::new().with("b", Value::Array(Array::from_vec(vec![1i32]))),
        );
        assert!(KeyChainSelector::chains(["a", "a/b"]).validate(&root).is_ok());
        let err = KeyChainSelector::chains(["a/c"]).validate(&root).unwrap_err();
        assert!(matches!(err, OrderingError::KeyChainNotFound(chain) if chain == "a/c"));
    }

    #[test]
    fn test_rename_target_prefers_the_most_specific_source() {
        let sel = KeyChainSelector::rename([("a", "x"), ("a/b", "y")]);
        assert_eq!(sel.rename_target("a/c").as_deref(), Some("x/c"));
        assert_eq!(sel.rename_target("a/b/d").as_deref(), Some("y/d"));
        assert_eq!(sel.rename_target("z"), None);
        assert_eq!(sel.renames_deepest_first()[0], ("a/b", "y"));
        assert_eq!(KeyChainSelector::chains(["a"]).rename_target("a"), None);
    }

    #[test]
    fn test_untagged_serde_forms() {
        let chains: KeyChainSelector = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(chains, KeyChainSelector::chains(["a", "b"]));
        let rename: KeyChainSelector = serde_json::from_str(r#"{"a": "x"}"#).unwrap();
        assert_eq!(rename, KeyChainSelector::rename([("a", "x")]));
    }
}
