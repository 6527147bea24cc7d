//! Discovered routes.

use core::fmt;

use crate::codec::NodeId;

/// One discovered route: node ids in traversal order, first element the
/// node the search started from. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathRecord(Vec<NodeId>);

impl PathRecord {
    /// Wraps a non-empty node sequence.
    pub(crate) fn new(nodes: Vec<NodeId>) -> Self {
        debug_assert!(!nodes.is_empty(), "path records are never empty");
        Self(nodes)
    }

    /// Node ids in traversal order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Number of nodes on the route.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node the route starts at.
    pub fn start(&self) -> NodeId {
        self.0[0]
    }

    /// Node the route ends at.
    pub fn end(&self) -> NodeId {
        self.0[self.0.len() - 1]
    }

    /// Returns `true` if the route passes `node`.
    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }

    /// Returns `true` if the route ends where it started.
    pub fn is_cycle(&self) -> bool {
        self.0.len() > 1 && self.start() == self.end()
    }
}

impl fmt::Display for PathRecord {
    /// Writes the route with decoded nodes: `[ 1.2  1.3  2.1 ]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for node in &self.0 {
            write!(f, " {node} ")?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a PathRecord {
    type Item = &'a NodeId;
    type IntoIter = core::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(locals: &[u32]) -> PathRecord {
        PathRecord::new(locals.iter().map(|&l| NodeId::encode(1, l)).collect())
    }

    #[test]
    fn endpoints_and_cycle() {
        let open = record(&[1, 2, 5]);
        assert_eq!(open.start(), NodeId::encode(1, 1));
        assert_eq!(open.end(), NodeId::encode(1, 5));
        assert!(!open.is_cycle());
        assert!(record(&[1, 3, 2, 1]).is_cycle());
        assert!(!record(&[1]).is_cycle());
    }

    #[test]
    fn display_decodes_nodes() {
        assert_eq!(record(&[1, 12]).to_string(), "[ 1.1  1.12 ]");
    }
}
