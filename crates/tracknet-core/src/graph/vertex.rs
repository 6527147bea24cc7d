//! Graph vertex types.
//!
//! A [`Vertex`] is one traversable connection point of one element. Two
//! adjacency relations hang off it:
//!
//! - `joined_to` - vertices of *other* elements that meet at the same node
//!   (the physical joint between two pieces of track);
//! - `pairs` - the [`PairedEnds`](super::PairedEnds) groups of its *own*
//!   element that it is a member of (the routes through the element).

use crate::codec::{LocalNode, ModuleNo, NodeId};

use super::element::{ElementId, ElementKind};
use super::paired::PairId;

/// Global vertex identifier.
///
/// Assigned monotonically as vertices are created and never reused within a
/// graph instance. Doubles as the index into the graph's vertex arena and into
/// per-search mark tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for VertexId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// One connection point of one element instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub(crate) gid: VertexId,
    pub(crate) element: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) module: ModuleNo,
    pub(crate) raw_node: LocalNode,
    pub(crate) node_id: NodeId,
    pub(crate) joined_to: Vec<VertexId>,
    pub(crate) pairs: Vec<PairId>,
}

impl Vertex {
    /// Creates an unconnected vertex. The node id is encoded from
    /// `(module, raw_node)`.
    pub(crate) fn new(
        gid: VertexId,
        element: ElementId,
        kind: ElementKind,
        module: ModuleNo,
        raw_node: LocalNode,
    ) -> Self {
        Self {
            gid,
            element,
            kind,
            module,
            raw_node,
            node_id: NodeId::encode(module, raw_node),
            joined_to: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Global id of this vertex.
    pub fn gid(&self) -> VertexId {
        self.gid
    }

    /// Owning element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Kind of the owning element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Module the connection point lies on.
    pub fn module(&self) -> ModuleNo {
        self.module
    }

    /// Connector id as written in the layout description.
    pub fn raw_node(&self) -> LocalNode {
        self.raw_node
    }

    /// Encoded node id. Shared with every vertex joined to this one.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Vertices of other elements physically joined at this point.
    pub fn joined_to(&self) -> &[VertexId] {
        &self.joined_to
    }

    /// Paired-ends groups of the owning element this vertex belongs to.
    pub fn pairs(&self) -> &[PairId] {
        &self.pairs
    }

    /// Returns `true` for the single vertex of a buffer stop.
    #[inline]
    pub fn is_bumper(&self) -> bool {
        self.kind == ElementKind::Bumper
    }
}
