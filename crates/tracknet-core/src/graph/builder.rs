//! Element-level graph construction.
//!
//! [`GraphBuilder`] materializes track elements into a [`TopologyGraph`]:
//! one vertex per declared connection point, one paired-ends group per route
//! through the element. [`finish()`](GraphBuilder::finish) then joins every
//! pair of vertices of different elements that share a node id and checks
//! that no non-bumper connection point is left dangling.
//!
//! Routes per element:
//!
//! | Element  | Vertices            | Groups                                  |
//! |----------|---------------------|-----------------------------------------|
//! | Bumper   | 1                   | none                                    |
//! | Rail     | 2                   | `a-b`                                   |
//! | Turnout  | 1 narrow + n wide   | `narrow-wide[i]` for each wide end      |
//! | Crossing | 4 (`a, b, c, d`)    | `a-b`, `c-d`, plus one per slip pair    |
//! | Junction | 2 (one per module)  | `from-to`                               |

use std::collections::BTreeSet;

use crate::codec::{LocalNode, ModuleNo, NodeId};

use super::element::{ElementAttrs, ElementId, ElementKind};
use super::topology::{GraphError, TopologyGraph};
use super::vertex::VertexId;

/// Errors that abort a graph build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An element is missing node ids or declares them inconsistently.
    #[error("malformed {kind} on module {module}: {reason}")]
    MalformedElement {
        /// Module the element was declared on.
        module: ModuleNo,
        /// Element kind.
        kind: ElementKind,
        /// What is wrong with it.
        reason: String,
    },

    /// A non-bumper connection point is joined to nothing.
    #[error("{kind} at node {node} is not connected to any other element")]
    DanglingNode {
        /// The dangling node.
        node: NodeId,
        /// Kind of the element owning the dangling end.
        kind: ElementKind,
    },

    /// A module references a track plan the layout does not define.
    #[error("module '{module}' references unknown trackplan '{trackplan}'")]
    UnknownTrackplan {
        /// Module name.
        module: String,
        /// Missing track plan name.
        trackplan: String,
    },

    /// A junction references a module the layout does not define.
    #[error("junction references unknown module '{0}'")]
    UnknownModule(String),

    /// A module number outside `1..=modules`.
    #[error("module {module} out of range (layout has {modules} modules)")]
    ModuleOutOfRange {
        /// Offending module number.
        module: ModuleNo,
        /// Number of modules in the layout.
        modules: usize,
    },

    /// More modules than a node id can address.
    #[error("layout has {0} modules, at most {max} are supported", max = ModuleNo::MAX)]
    TooManyModules(usize),

    /// A node id that does not fit a module-local connector id.
    #[error("node id {value} in module '{module}' is out of range")]
    NodeOutOfRange {
        /// Module name.
        module: String,
        /// The offending value.
        value: i64,
    },

    /// Low-level graph mutation failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Builds a [`TopologyGraph`] one element at a time.
///
/// # Example
///
/// ```rust
/// use tracknet_core::{ElementAttrs, GraphBuilder};
///
/// let mut builder = GraphBuilder::new(1).unwrap();
/// builder.add_bumper(1, 1, ElementAttrs::default()).unwrap();
/// builder.add_rail(1, 1, 2, ElementAttrs::with_length(100)).unwrap();
/// builder.add_bumper(1, 2, ElementAttrs::default()).unwrap();
/// let graph = builder.finish().unwrap();
/// assert!(graph.is_built());
/// assert_eq!(graph.vertex_count(), 4);
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    graph: TopologyGraph,
    modules: usize,
}

impl GraphBuilder {
    /// Creates a builder for a layout of `modules` modules, numbered from 1.
    pub fn new(modules: usize) -> Result<Self, BuildError> {
        if modules > usize::from(ModuleNo::MAX) {
            return Err(BuildError::TooManyModules(modules));
        }
        let mut graph = TopologyGraph::new();
        graph.set_module_count(modules);
        Ok(Self { graph, modules })
    }

    /// Adds a buffer stop at `node`.
    pub fn add_bumper(
        &mut self,
        module: ModuleNo,
        node: LocalNode,
        attrs: ElementAttrs,
    ) -> Result<ElementId, BuildError> {
        self.check_module(module)?;
        let element = self.graph.add_element(module, ElementKind::Bumper, attrs);
        self.graph.add_vertex(element, module, node)?;
        Ok(element)
    }

    /// Adds a plain rail between `a` and `b`.
    pub fn add_rail(
        &mut self,
        module: ModuleNo,
        a: LocalNode,
        b: LocalNode,
        attrs: ElementAttrs,
    ) -> Result<ElementId, BuildError> {
        self.check_module(module)?;
        if a == b {
            return Err(malformed(
                module,
                ElementKind::Rail,
                format!("both ends at node {a}"),
            ));
        }
        let element = self.graph.add_element(module, ElementKind::Rail, attrs);
        let va = self.graph.add_vertex(element, module, a)?;
        let vb = self.graph.add_vertex(element, module, b)?;
        self.graph.pair(va, vb)?;
        Ok(element)
    }

    /// Adds a turnout with one narrow end and at least two wide ends.
    pub fn add_turnout(
        &mut self,
        module: ModuleNo,
        narrow: LocalNode,
        wide: &[LocalNode],
        attrs: ElementAttrs,
    ) -> Result<ElementId, BuildError> {
        self.check_module(module)?;
        let kind = ElementKind::Turnout;
        if wide.len() < 2 {
            return Err(malformed(
                module,
                kind,
                format!("needs at least 2 wide ends, got {}", wide.len()),
            ));
        }
        let mut seen = BTreeSet::from([narrow]);
        for &w in wide {
            if !seen.insert(w) {
                return Err(malformed(module, kind, format!("node {w} used twice")));
            }
        }

        let element = self.graph.add_element(module, kind, attrs);
        let vn = self.graph.add_vertex(element, module, narrow)?;
        for &w in wide {
            let vw = self.graph.add_vertex(element, module, w)?;
            self.graph.pair(vn, vw)?;
        }
        Ok(element)
    }

    /// Adds a crossing.
    ///
    /// `path = [a, b, c, d]` declares the straight routes `a-b` and `c-d`.
    /// `slips` is a flat list of node pairs, each an additional route between
    /// two of the four ends (`[a, d]` for a single slip, `[a, d, c, b]` for a
    /// double slip).
    pub fn add_crossing(
        &mut self,
        module: ModuleNo,
        path: &[LocalNode],
        slips: &[LocalNode],
        attrs: ElementAttrs,
    ) -> Result<ElementId, BuildError> {
        self.check_module(module)?;
        let kind = ElementKind::Crossing;
        let &[a, b, c, d] = path else {
            return Err(malformed(
                module,
                kind,
                format!("path needs 4 nodes, got {}", path.len()),
            ));
        };
        if BTreeSet::from([a, b, c, d]).len() != 4 {
            return Err(malformed(module, kind, "path nodes must be distinct".into()));
        }
        if slips.len() % 2 != 0 {
            return Err(malformed(
                module,
                kind,
                format!("slip list has odd length {}", slips.len()),
            ));
        }
        for &s in slips {
            if !path.contains(&s) {
                return Err(malformed(
                    module,
                    kind,
                    format!("slip node {s} is not part of the crossing"),
                ));
            }
        }
        if let Some(slip) = slips.chunks_exact(2).find(|slip| slip[0] == slip[1]) {
            return Err(malformed(
                module,
                kind,
                format!("slip from node {} to itself", slip[0]),
            ));
        }

        let element = self.graph.add_element(module, kind, attrs);
        let mut ends = [VertexId(0); 4];
        for (slot, &node) in ends.iter_mut().zip(path) {
            *slot = self.graph.add_vertex(element, module, node)?;
        }
        let end_of = |node: LocalNode| ends[path.iter().position(|&p| p == node).unwrap_or(0)];

        self.graph.pair(ends[0], ends[1])?;
        self.graph.pair(ends[2], ends[3])?;
        for slip in slips.chunks_exact(2) {
            self.graph.pair(end_of(slip[0]), end_of(slip[1]))?;
        }
        Ok(element)
    }

    /// Adds a junction joining `from.1` on module `from.0` to `to.1` on
    /// module `to.0`.
    pub fn add_junction(
        &mut self,
        from: (ModuleNo, LocalNode),
        to: (ModuleNo, LocalNode),
        attrs: ElementAttrs,
    ) -> Result<ElementId, BuildError> {
        self.check_module(from.0)?;
        self.check_module(to.0)?;
        if from == to {
            return Err(malformed(
                from.0,
                ElementKind::Junction,
                format!("both ends at node {}", NodeId::encode(from.0, from.1)),
            ));
        }
        let element = self.graph.add_element(from.0, ElementKind::Junction, attrs);
        let vf = self.graph.add_vertex(element, from.0, from.1)?;
        let vt = self.graph.add_vertex(element, to.0, to.1)?;
        self.graph.pair(vf, vt)?;
        Ok(element)
    }

    /// Read access to the graph under construction.
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// Joins shared nodes, checks integrity, and returns the built graph.
    pub fn finish(mut self) -> Result<TopologyGraph, BuildError> {
        let shared: Vec<Vec<VertexId>> = self
            .graph
            .node_ids()
            .map(|node| self.graph.vertices_at(node).to_vec())
            .filter(|sharers| sharers.len() > 1)
            .collect();

        for sharers in &shared {
            #[cfg(feature = "tracing")]
            if sharers.len() > 2 {
                tracing::warn!(
                    "{} connection points meet at node {}",
                    sharers.len(),
                    self.graph.vertex_ref(sharers[0]).node_id()
                );
            }
            for (i, &a) in sharers.iter().enumerate() {
                for &b in &sharers[i + 1..] {
                    if self.graph.vertex_ref(a).element() == self.graph.vertex_ref(b).element() {
                        continue;
                    }
                    self.graph.join(a, b)?;
                }
            }
        }

        let dangling: Vec<BuildError> = self
            .graph
            .vertices()
            .filter(|v| v.joined_to().is_empty())
            .filter(|v| {
                if v.is_bumper() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("bumper at node {} ends nothing", v.node_id());
                    return false;
                }
                true
            })
            .map(|v| BuildError::DanglingNode {
                node: v.node_id(),
                kind: v.kind(),
            })
            .collect();
        if let Some(err) = dangling.first().cloned() {
            #[cfg(feature = "tracing")]
            for more in &dangling[1..] {
                tracing::error!("{more}");
            }
            return Err(err);
        }

        self.graph.mark_built();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_build: {} elements, {} vertices, {} pairs",
            self.graph.element_count(),
            self.graph.vertex_count(),
            self.graph.pair_count()
        );
        Ok(self.graph)
    }

    fn check_module(&self, module: ModuleNo) -> Result<(), BuildError> {
        if module == 0 || usize::from(module) > self.modules {
            return Err(BuildError::ModuleOutOfRange {
                module,
                modules: self.modules,
            });
        }
        Ok(())
    }
}

fn malformed(module: ModuleNo, kind: ElementKind, reason: String) -> BuildError {
    BuildError::MalformedElement {
        module,
        kind,
        reason,
    }
}
