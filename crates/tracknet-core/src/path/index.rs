//! Path index - discovered routes per start node.

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::codec::{LocalNode, ModuleNo, NodeId};

use super::record::PathRecord;

/// Result store of the exhaustive precomputation.
///
/// Maps every searched start node to the set of routes found from it, plus a
/// scratch buffer that collects the routes of the search currently running.
/// The scratch buffer is always empty between searches.
#[derive(Clone, Debug, Default)]
pub struct PathIndex {
    by_start_node: BTreeMap<NodeId, Vec<PathRecord>>,
    scratch: Vec<PathRecord>,
    calculated: bool,
}

impl PathIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes found from `node`, if it has been searched.
    pub fn paths_by_node(&self, node: NodeId) -> Option<&[PathRecord]> {
        self.by_start_node.get(&node).map(Vec::as_slice)
    }

    /// Routes found from the un-encoded `(module, local)` node.
    pub fn paths_by_module_node(
        &self,
        module: ModuleNo,
        local: LocalNode,
    ) -> Option<&[PathRecord]> {
        self.paths_by_node(NodeId::encode(module, local))
    }

    /// Searched start nodes with their routes, ascending by node id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[PathRecord])> {
        self.by_start_node
            .iter()
            .map(|(node, paths)| (*node, paths.as_slice()))
    }

    /// Number of searched start nodes.
    pub fn len(&self) -> usize {
        self.by_start_node.len()
    }

    /// Returns `true` if no start node has been searched.
    pub fn is_empty(&self) -> bool {
        self.by_start_node.is_empty()
    }

    /// Total number of routes across all start nodes.
    pub fn number_of_paths(&self) -> usize {
        self.by_start_node.values().map(Vec::len).sum()
    }

    /// Returns `true` once a full precomputation has completed.
    pub fn is_calculated(&self) -> bool {
        self.calculated
    }

    pub(crate) fn set_calculated(&mut self, calculated: bool) {
        self.calculated = calculated;
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut Vec<PathRecord> {
        &mut self.scratch
    }

    /// Moves the scratch buffer into the entry for `node`, dropping duplicate
    /// records, and leaves the scratch buffer empty. Returns the number of
    /// routes stored.
    pub(crate) fn commit(&mut self, node: NodeId) -> usize {
        let mut seen = HashSet::with_capacity(self.scratch.len());
        let records: Vec<PathRecord> = self
            .scratch
            .drain(..)
            .filter(|record| seen.insert(record.clone()))
            .collect();
        let count = records.len();
        self.by_start_node.insert(node, records);
        count
    }

    /// Returns `true` if the scratch buffer holds no routes.
    pub fn scratch_is_empty(&self) -> bool {
        self.scratch.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(locals: &[u32]) -> PathRecord {
        PathRecord::new(locals.iter().map(|&l| NodeId::encode(1, l)).collect())
    }

    #[test]
    fn commit_moves_scratch_and_dedups() {
        let mut index = PathIndex::new();
        index.scratch_mut().push(record(&[1, 2]));
        index.scratch_mut().push(record(&[1, 3]));
        index.scratch_mut().push(record(&[1, 2]));

        assert_eq!(index.commit(NodeId::encode(1, 1)), 2);
        assert!(index.scratch_is_empty());
        assert_eq!(index.number_of_paths(), 2);
        assert_eq!(
            index.paths_by_module_node(1, 1).unwrap(),
            &[record(&[1, 2]), record(&[1, 3])]
        );
    }

    #[test]
    fn unknown_node_has_no_entry() {
        let index = PathIndex::new();
        assert!(index.paths_by_node(NodeId::encode(1, 1)).is_none());
        assert!(index.is_empty());
        assert!(!index.is_calculated());
    }

    #[test]
    fn recommit_replaces_entry() {
        let mut index = PathIndex::new();
        let node = NodeId::encode(1, 1);
        index.scratch_mut().push(record(&[1, 2]));
        index.commit(node);
        index.scratch_mut().push(record(&[1, 4]));
        index.commit(node);
        assert_eq!(index.len(), 1);
        assert_eq!(index.paths_by_node(node).unwrap(), &[record(&[1, 4])]);
    }
}
