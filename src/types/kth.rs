//! The pivot argument of `argpartition`.

use crate::container::Value;
use crate::error::OrderingError;
use crate::types::Array;

/// One or more pivot positions along the partition axis. Negative positions count
/// from the end of the axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kth {
    Index(isize),
    Indices(Vec<isize>),
}

impl Kth {
    /// Reads pivots out of an integer array (a 0-d or 1-D array of positions).
    pub fn from_array(array: &Array) -> Result<Self, OrderingError> {
        let nd = array.to_nd()?;
        if nd.ndim() > 1 {
            return Err(OrderingError::InvalidArgument(format!(
                "kth must be a scalar or a 1-D sequence, got shape {:?}",
                nd.shape()
            )));
        }
        let values = nd
            .index_values("kth")?
            .into_iter()
            .map(|k| k as isize)
            .collect::<Vec<_>>();
        if nd.ndim() == 0 {
            return values.first().map(|&k| Kth::Index(k)).ok_or_else(|| {
                OrderingError::InternalError("0-d kth array holds no element".to_string())
            });
        }
        Ok(Kth::Indices(values))
    }

    /// Resolves every pivot against an axis of length `len`, returning them sorted
    /// and deduplicated.
    pub fn normalized(&self, len: usize) -> Result<Vec<usize>, OrderingError> {
        let raw: &[isize] = match self {
            Kth::Index(k) => std::slice::from_ref(k),
            Kth::Indices(ks) => ks,
        };
        let rank = len as isize;
        let mut resolved = raw
            .iter()
            .map(|&k| {
                let r = if k < 0 { k + rank } else { k };
                if r < 0 || r >= rank {
                    Err(OrderingError::InvalidKth { kth: k, len })
                } else {
                    Ok(r as usize)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        resolved.sort_unstable();
        resolved.dedup();
        Ok(resolved)
    }
}

impl From<isize> for Kth {
    fn from(k: isize) -> Self {
        Kth::Index(k)
    }
}

impl From<Vec<isize>> for Kth {
    fn from(ks: Vec<isize>) -> Self {
        Kth::Indices(ks)
    }
}

/// `kth` as passed to the dispatch layer: either one pivot set shared by every
/// leaf, or a nested value whose leaves give each leaf its own pivots.
#[derive(Debug, Clone, PartialEq)]
pub enum KthArg {
    Fixed(Kth),
    Nested(Value),
}

impl From<Kth> for KthArg {
    fn from(kth: Kth) -> Self {
        KthArg::Fixed(kth)
    }
}

impl From<isize> for KthArg {
    fn from(k: isize) -> Self {
        KthArg::Fixed(Kth::Index(k))
    }
}

impl From<Vec<isize>> for KthArg {
    fn from(ks: Vec<isize>) -> Self {
        KthArg::Fixed(Kth::Indices(ks))
    }
}
