//! Node identifier encoding.
//!
//! Every connection point of a layout is addressed by the pair
//! `(module, local)`: the 1-based module number and the connector id the
//! layout author wrote inside that module. [`NodeId`] folds that pair into a
//! single integer with the Cantor pairing function so that connection points
//! of all modules share one flat key space.
//!
//! The inverse uses an exact integer square root; an `f64` triangular root
//! loses precision once ids pass 2^53.

use core::fmt;
use core::str::FromStr;

/// Module number as written in a node id (`module.local`).
pub type ModuleNo = u16;

/// Connector id local to one module.
pub type LocalNode = u32;

/// Encoded, globally unique connection point identifier.
///
/// A `NodeId` can only be produced by [`NodeId::encode`] or the checked
/// [`NodeId::from_raw`], so [`NodeId::decode`] is total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Encodes `(module, local)` with the Cantor pairing function.
    ///
    /// `t = module + local`, result `t * (t + 1) / 2 + local`. The widths of
    /// [`ModuleNo`] and [`LocalNode`] keep the result below `u64::MAX`.
    #[inline]
    pub fn encode(module: ModuleNo, local: LocalNode) -> Self {
        let t = u128::from(module) + u128::from(local);
        let id = t * (t + 1) / 2 + u128::from(local);
        Self(id as u64)
    }

    /// Returns the `(module, local)` pair this id was encoded from.
    #[inline]
    pub fn decode(self) -> (ModuleNo, LocalNode) {
        let (module, local) = unpair(self.0);
        (module as ModuleNo, local as LocalNode)
    }

    /// Module number of this node.
    #[inline]
    pub fn module(self) -> ModuleNo {
        self.decode().0
    }

    /// Module-local connector id of this node.
    #[inline]
    pub fn local(self) -> LocalNode {
        self.decode().1
    }

    /// Returns the raw encoded value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Accepts a raw encoded value if it decodes to an in-range pair.
    pub fn from_raw(raw: u64) -> Option<Self> {
        let (module, local) = unpair(raw);
        if module > u128::from(ModuleNo::MAX) || local > u128::from(LocalNode::MAX) {
            return None;
        }
        Some(Self(raw))
    }
}

/// Largest `w` with `w * (w + 1) / 2 <= c`, computed exactly.
///
/// `w(w+1)/2 <= c` is equivalent to `(2w + 1)^2 <= 8c + 1`, so
/// `w = (isqrt(8c + 1) - 1) / 2`.
#[inline]
fn triangular_root(c: u128) -> u128 {
    ((8 * c + 1).isqrt() - 1) / 2
}

fn unpair(raw: u64) -> (u128, u128) {
    let c = u128::from(raw);
    let w = triangular_root(c);
    let local = c - w * (w + 1) / 2;
    (w - local, local)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (module, local) = self.decode();
        write!(f, "{module}.{local}")
    }
}

/// Error returned when parsing a `module.local` node reference fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node reference '{0}': expected <module>.<node>")]
pub struct ParseNodeIdError(String);

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    /// Parses `"module.local"`, e.g. `"1.12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNodeIdError(s.to_string());
        let (module, local) = s.trim().split_once('.').ok_or_else(err)?;
        let module = module.parse::<ModuleNo>().map_err(|_| err())?;
        let local = local.parse::<LocalNode>().map_err(|_| err())?;
        Ok(Self::encode(module, local))
    }
}
