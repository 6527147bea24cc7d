//! Track element types.
//!
//! An element is one physical piece of track placed on a module: a buffer
//! stop, a plain rail, a turnout, a crossing, or a junction bridging two
//! modules. The graph stores each element once; its connection points become
//! [`Vertex`](super::Vertex) values that refer back to it by [`ElementId`].

use core::fmt;

use crate::codec::ModuleNo;

/// Index of an element in the graph's element arena.
///
/// Element IDs are assigned sequentially and never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// The closed set of track element variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    /// Dead end with a single connection point.
    Bumper,
    /// Plain track with two connection points.
    Rail,
    /// One narrow end and two or more wide ends.
    Turnout,
    /// Four connection points, optionally with slip routes.
    Crossing,
    /// Connection between two layout modules.
    Junction,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Bumper,
        ElementKind::Rail,
        ElementKind::Turnout,
        ElementKind::Crossing,
        ElementKind::Junction,
    ];

    /// Lower-case name as used in layout descriptions.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Bumper => "bumper",
            ElementKind::Rail => "rail",
            ElementKind::Turnout => "turnout",
            ElementKind::Crossing => "crossing",
            ElementKind::Junction => "junction",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain attributes carried along with an element.
///
/// The graph never interprets these; they exist for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementAttrs {
    /// Length in layout units, if the description declares one.
    pub length: Option<u32>,
    /// Free-text description.
    pub description: Option<String>,
}

impl ElementAttrs {
    /// Attributes with a length and no description.
    pub fn with_length(length: u32) -> Self {
        Self {
            length: Some(length),
            description: None,
        }
    }
}

/// One element instance in a built graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) module: ModuleNo,
    pub(crate) local_id: u32,
    pub(crate) attrs: ElementAttrs,
}

impl Element {
    /// Arena id of this element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Element variant.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Owning module. For junctions this is the `from` side.
    pub fn module(&self) -> ModuleNo {
        self.module
    }

    /// Number of this element among elements of the same kind on its module.
    ///
    /// Junctions are numbered across the whole layout.
    pub fn local_id(&self) -> u32 {
        self.local_id
    }

    /// Domain attributes.
    pub fn attrs(&self) -> &ElementAttrs {
        &self.attrs
    }
}
