//! Topology graph - vertex arena, joints, and paired-ends groups.
//!
//! [`TopologyGraph`] owns every element, vertex and paired-ends group of one
//! built layout. Vertices live in a flat arena indexed by [`VertexId`];
//! adjacency and pairing are stored as id lists, so the structure has no
//! cyclic ownership and can be shared freely by reference.
//!
//! The graph is mutated only while a [`GraphBuilder`](super::GraphBuilder)
//! owns it. Once the builder hands it out it is marked built and stays
//! structurally immutable; path searches keep their own traversal state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::codec::{LocalNode, ModuleNo, NodeId};

use super::element::{Element, ElementAttrs, ElementId, ElementKind};
use super::paired::{PairId, PairedEnds};
use super::vertex::{Vertex, VertexId};

/// Errors raised by low-level graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The referenced vertex does not exist in this graph.
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),
    /// The referenced element does not exist in this graph.
    #[error("element {0:?} not found")]
    ElementNotFound(ElementId),
    /// A paired-ends group must hold two ends of the same element.
    #[error("cannot pair {0} and {1}: they belong to different elements")]
    ForeignPair(VertexId, VertexId),
    /// A vertex cannot be paired with itself.
    #[error("cannot pair {0} with itself")]
    DegeneratePair(VertexId),
    /// Joints only exist between different elements.
    #[error("cannot join {0} and {1}: they belong to the same element")]
    SameElementJoin(VertexId, VertexId),
}

/// Counts describing a built graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSummary {
    /// Number of modules the layout declared.
    pub modules: usize,
    /// Element count per kind.
    pub elements: BTreeMap<ElementKind, usize>,
    /// Number of vertices.
    pub vertices: usize,
    /// Number of paired-ends groups.
    pub pairs: usize,
    /// Number of distinct encoded node ids.
    pub nodes: usize,
    /// Number of joints (unordered joined vertex pairs).
    pub joints: usize,
}

impl GraphSummary {
    /// Number of elements of `kind`.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of elements.
    pub fn total_elements(&self) -> usize {
        self.elements.values().sum()
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Modules:   {}", self.modules)?;
        write!(f, "Elements:  {}", self.total_elements())?;
        for kind in ElementKind::ALL {
            let n = self.count(kind);
            if n > 0 {
                write!(f, "  {kind}: {n}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Vertices:  {}", self.vertices)?;
        writeln!(f, "Nodes:     {}", self.nodes)?;
        writeln!(f, "Joints:    {}", self.joints)?;
        write!(f, "Pairs:     {}", self.pairs)
    }
}

/// Vertex/element graph of one layout.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    elements: Vec<Element>,
    vertices: Vec<Vertex>,
    pairs: Vec<PairedEnds>,
    pair_keys: BTreeMap<(VertexId, VertexId), PairId>,
    /// Vertices per encoded node id, in gid order.
    nodes: BTreeMap<NodeId, Vec<VertexId>>,
    /// Element numbering per (module, kind).
    counters: HashMap<(ModuleNo, ElementKind), u32>,
    module_count: usize,
    built: bool,
}

impl TopologyGraph {
    /// Creates an empty, unbuilt graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutations (builder only) ---

    /// Adds an element and mints its module-scoped local id.
    ///
    /// Junctions are numbered across the whole layout regardless of module.
    pub(crate) fn add_element(
        &mut self,
        module: ModuleNo,
        kind: ElementKind,
        attrs: ElementAttrs,
    ) -> ElementId {
        let scope = if kind == ElementKind::Junction { 0 } else { module };
        let counter = self.counters.entry((scope, kind)).or_insert(0);
        let local_id = *counter;
        *counter += 1;

        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            id,
            kind,
            module,
            local_id,
            attrs,
        });
        id
    }

    /// Adds a connection point of `element` on `module` at `raw_node`.
    pub(crate) fn add_vertex(
        &mut self,
        element: ElementId,
        module: ModuleNo,
        raw_node: LocalNode,
    ) -> Result<VertexId, GraphError> {
        let kind = self
            .elements
            .get(element.0 as usize)
            .ok_or(GraphError::ElementNotFound(element))?
            .kind;

        let gid = VertexId(self.vertices.len() as u32);
        let vertex = Vertex::new(gid, element, kind, module, raw_node);
        self.nodes.entry(vertex.node_id).or_default().push(gid);
        self.vertices.push(vertex);
        Ok(gid)
    }

    /// Records a joint between two vertices of different elements.
    ///
    /// Returns `Ok(false)` if the joint already existed.
    pub(crate) fn join(&mut self, a: VertexId, b: VertexId) -> Result<bool, GraphError> {
        let ea = self.get_vertex(a)?.element;
        let eb = self.get_vertex(b)?.element;
        if ea == eb {
            return Err(GraphError::SameElementJoin(a, b));
        }
        if self.vertices[a.slot()].joined_to.contains(&b) {
            return Ok(false);
        }
        self.vertices[a.slot()].joined_to.push(b);
        self.vertices[b.slot()].joined_to.push(a);
        Ok(true)
    }

    /// Groups two ends of the same element into one route.
    ///
    /// Pairing the same two ends twice returns the existing group.
    pub(crate) fn pair(&mut self, a: VertexId, b: VertexId) -> Result<PairId, GraphError> {
        if a == b {
            return Err(GraphError::DegeneratePair(a));
        }
        let ea = self.get_vertex(a)?.element;
        let eb = self.get_vertex(b)?.element;
        if ea != eb {
            return Err(GraphError::ForeignPair(a, b));
        }

        let group = PairedEnds::new(a, b);
        if let Some(&existing) = self.pair_keys.get(&group.key()) {
            return Ok(existing);
        }

        let id = PairId(self.pairs.len() as u32);
        self.pair_keys.insert(group.key(), id);
        self.pairs.push(group);
        self.vertices[a.slot()].pairs.push(id);
        self.vertices[b.slot()].pairs.push(id);
        Ok(id)
    }

    pub(crate) fn set_module_count(&mut self, modules: usize) {
        self.module_count = modules;
    }

    pub(crate) fn mark_built(&mut self) {
        self.built = true;
    }

    // --- Queries ---

    /// Returns `true` once a builder has completed this graph.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of modules the layout declared.
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Looks up a vertex by id.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.slot())
    }

    /// All vertices in gid order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Looks up an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    /// All elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Looks up a paired-ends group by id.
    pub fn pair_group(&self, id: PairId) -> Option<&PairedEnds> {
        self.pairs.get(id.0 as usize)
    }

    /// Looks up the group pairing `a` and `b`, in either order.
    pub fn paired_group(&self, a: VertexId, b: VertexId) -> Option<&PairedEnds> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.pair_keys
            .get(&key)
            .and_then(|id| self.pair_group(*id))
    }

    /// All paired-ends groups.
    pub fn pair_groups(&self) -> impl Iterator<Item = &PairedEnds> {
        self.pairs.iter()
    }

    /// Number of paired-ends groups.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Every vertex carrying `node`, in gid order. Empty if none.
    pub fn vertices_at(&self, node: NodeId) -> &[VertexId] {
        self.nodes.get(&node).map_or(&[][..], Vec::as_slice)
    }

    /// Returns `true` if at least one vertex carries `node`.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Distinct node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of distinct node ids.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Intra-element far ends of `v`: the other member of every group `v`
    /// belongs to.
    pub fn far_ends(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .get(v.slot())
            .map_or(&[][..], |vertex| vertex.pairs.as_slice())
            .iter()
            .filter_map(move |p| self.pairs[p.0 as usize].find_other(v))
    }

    /// For a bumper, the vertex of the element joined to it at the same node.
    ///
    /// Returns `None` for non-bumpers and for bumpers nothing is joined to.
    pub fn counterpart(&self, v: VertexId) -> Option<VertexId> {
        let vertex = self.vertex(v)?;
        if !vertex.is_bumper() {
            return None;
        }
        let found = vertex
            .joined_to
            .iter()
            .copied()
            .find(|j| !self.vertices[j.slot()].is_bumper());
        #[cfg(feature = "tracing")]
        if found.is_none() {
            tracing::warn!("bumper at {} has nothing joined to it", vertex.node_id);
        }
        found
    }

    /// Node ids carried by rail vertices, deduplicated, ascending.
    ///
    /// These are the start nodes of the exhaustive path precomputation.
    pub fn rail_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .vertices
            .iter()
            .filter(|v| v.kind == ElementKind::Rail)
            .map(|v| v.node_id)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Counts of everything in the graph.
    pub fn summary(&self) -> GraphSummary {
        let mut elements = BTreeMap::new();
        for element in &self.elements {
            *elements.entry(element.kind).or_insert(0) += 1;
        }
        let joints = self
            .vertices
            .iter()
            .map(|v| v.joined_to.len())
            .sum::<usize>()
            / 2;
        GraphSummary {
            modules: self.module_count,
            elements,
            vertices: self.vertices.len(),
            pairs: self.pairs.len(),
            nodes: self.nodes.len(),
            joints,
        }
    }

    // --- Internal helpers ---

    fn get_vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.vertices
            .get(id.slot())
            .ok_or(GraphError::VertexNotFound(id))
    }

    /// Vertex by id, for ids minted by this graph.
    #[inline]
    pub(crate) fn vertex_ref(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rail(g: &mut TopologyGraph, module: ModuleNo, a: LocalNode, b: LocalNode) -> [VertexId; 2] {
        let e = g.add_element(module, ElementKind::Rail, ElementAttrs::default());
        let va = g.add_vertex(e, module, a).unwrap();
        let vb = g.add_vertex(e, module, b).unwrap();
        g.pair(va, vb).unwrap();
        [va, vb]
    }

    #[test]
    fn gids_are_sequential() {
        let mut g = TopologyGraph::new();
        let [a, b] = rail(&mut g, 1, 1, 2);
        let [c, d] = rail(&mut g, 1, 2, 3);
        assert_eq!([a.index(), b.index(), c.index(), d.index()], [0, 1, 2, 3]);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn local_ids_are_scoped_per_module_and_kind() {
        let mut g = TopologyGraph::new();
        let r0 = g.add_element(1, ElementKind::Rail, ElementAttrs::default());
        let t0 = g.add_element(1, ElementKind::Turnout, ElementAttrs::default());
        let r1 = g.add_element(1, ElementKind::Rail, ElementAttrs::default());
        let r2 = g.add_element(2, ElementKind::Rail, ElementAttrs::default());
        let j0 = g.add_element(1, ElementKind::Junction, ElementAttrs::default());
        let j1 = g.add_element(2, ElementKind::Junction, ElementAttrs::default());

        let local = |id| g.element(id).unwrap().local_id();
        assert_eq!(local(r0), 0);
        assert_eq!(local(t0), 0);
        assert_eq!(local(r1), 1);
        assert_eq!(local(r2), 0);
        assert_eq!(local(j0), 0);
        assert_eq!(local(j1), 1);
    }

    #[test]
    fn node_id_is_encoded_from_module_and_raw_node() {
        let mut g = TopologyGraph::new();
        let [a, _] = rail(&mut g, 3, 14, 15);
        let v = g.vertex(a).unwrap();
        assert_eq!(v.node_id(), NodeId::encode(3, 14));
        assert_eq!(v.raw_node(), 14);
        assert_eq!(v.module(), 3);
    }

    #[test]
    fn join_is_mutual_and_idempotent() {
        let mut g = TopologyGraph::new();
        let [_, b] = rail(&mut g, 1, 1, 2);
        let [c, _] = rail(&mut g, 1, 2, 3);

        assert!(g.join(b, c).unwrap());
        assert!(!g.join(c, b).unwrap());
        assert_eq!(g.vertex(b).unwrap().joined_to(), &[c]);
        assert_eq!(g.vertex(c).unwrap().joined_to(), &[b]);
        assert_eq!(g.summary().joints, 1);
    }

    #[test]
    fn join_within_one_element_is_rejected() {
        let mut g = TopologyGraph::new();
        let [a, b] = rail(&mut g, 1, 1, 2);
        assert_eq!(g.join(a, b), Err(GraphError::SameElementJoin(a, b)));
    }

    #[test]
    fn pair_across_elements_is_rejected() {
        let mut g = TopologyGraph::new();
        let [_, b] = rail(&mut g, 1, 1, 2);
        let [c, _] = rail(&mut g, 1, 2, 3);
        assert_eq!(g.pair(b, c), Err(GraphError::ForeignPair(b, c)));
        assert_eq!(g.pair(b, b), Err(GraphError::DegeneratePair(b)));
    }

    #[test]
    fn repeated_pair_returns_existing_group() {
        let mut g = TopologyGraph::new();
        let [a, b] = rail(&mut g, 1, 1, 2);
        let first = g.vertex(a).unwrap().pairs()[0];
        assert_eq!(g.pair(b, a).unwrap(), first);
        assert_eq!(g.pair_count(), 1);
        assert!(g.paired_group(b, a).is_some());
    }

    #[test]
    fn far_ends_follow_every_group() {
        let mut g = TopologyGraph::new();
        let e = g.add_element(1, ElementKind::Turnout, ElementAttrs::default());
        let narrow = g.add_vertex(e, 1, 1).unwrap();
        let w1 = g.add_vertex(e, 1, 2).unwrap();
        let w2 = g.add_vertex(e, 1, 3).unwrap();
        g.pair(narrow, w1).unwrap();
        g.pair(narrow, w2).unwrap();

        let from_narrow: Vec<_> = g.far_ends(narrow).collect();
        assert_eq!(from_narrow, vec![w1, w2]);
        let from_wide: Vec<_> = g.far_ends(w2).collect();
        assert_eq!(from_wide, vec![narrow]);
    }

    #[test]
    fn counterpart_resolves_only_for_bumpers() {
        let mut g = TopologyGraph::new();
        let bumper = g.add_element(1, ElementKind::Bumper, ElementAttrs::default());
        let stop = g.add_vertex(bumper, 1, 1).unwrap();
        let [a, _] = rail(&mut g, 1, 1, 2);
        assert_eq!(g.counterpart(stop), None);

        g.join(stop, a).unwrap();
        assert_eq!(g.counterpart(stop), Some(a));
        assert_eq!(g.counterpart(a), None);
    }

    #[test]
    fn vertices_at_lists_every_sharer() {
        let mut g = TopologyGraph::new();
        let [_, b] = rail(&mut g, 1, 1, 2);
        let [c, _] = rail(&mut g, 1, 2, 3);
        assert_eq!(g.vertices_at(NodeId::encode(1, 2)), &[b, c]);
        assert!(g.vertices_at(NodeId::encode(1, 9)).is_empty());
        assert_eq!(g.rail_nodes().len(), 3);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut g = TopologyGraph::new();
        assert_eq!(
            g.add_vertex(ElementId(4), 1, 1),
            Err(GraphError::ElementNotFound(ElementId(4)))
        );
        let [a, _] = rail(&mut g, 1, 1, 2);
        assert_eq!(
            g.join(a, VertexId(99)),
            Err(GraphError::VertexNotFound(VertexId(99)))
        );
        assert!(!g.is_built());
    }
}
