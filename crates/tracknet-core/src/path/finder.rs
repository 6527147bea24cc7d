//! Depth-first route enumeration over a built [`TopologyGraph`].
//!
//! A search starts at every vertex a node id resolves to and walks the graph
//! in alternating hops: across a joint into a neighbouring element, then
//! through that element to each of its far ends. A branch ends when it
//!
//! 1. reaches a dead end (no joined neighbour, or only buffer stops),
//! 2. reaches the target node (targeted queries only),
//! 3. returns to the node it started from, or
//! 4. re-enters a vertex that is already on the current branch.
//!
//! The traversal uses an explicit stack, so search depth is bounded by heap
//! memory rather than the call stack. Per-vertex marks belong to the
//! [`PathFinder`] and are reset before every query; the graph itself is never
//! written.

use std::collections::HashSet;

use crate::codec::NodeId;
use crate::graph::{TopologyGraph, Vertex, VertexId};

use super::index::PathIndex;
use super::record::PathRecord;

/// Errors local to one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The graph has not been completed by a builder.
    #[error("graph is not built")]
    NotBuilt,
    /// No vertex carries the requested node id.
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

/// Visitation state of one vertex during one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mark {
    /// Not reached yet.
    #[default]
    Unvisited,
    /// On the branch currently being explored.
    Visiting,
    /// Fully explored.
    Done,
}

/// One frame of the explicit DFS stack.
enum Step {
    Enter { vertex: VertexId, path: Vec<NodeId> },
    Leave(VertexId),
}

/// Route search over one built graph.
///
/// Holds the per-vertex marks and the query state (`start`, `target`), so a
/// finder can be reused for any number of queries. Separate finders over the
/// same graph are independent.
///
/// ```rust
/// use tracknet_core::{ElementAttrs, GraphBuilder, NodeId, PathFinder, PathIndex};
///
/// let mut b = GraphBuilder::new(1)?;
/// b.add_bumper(1, 1, ElementAttrs::default())?;
/// b.add_rail(1, 1, 2, ElementAttrs::default())?;
/// b.add_bumper(1, 2, ElementAttrs::default())?;
/// let graph = b.finish()?;
///
/// let mut finder = PathFinder::new(&graph);
/// let mut index = PathIndex::new();
/// finder.find_all_from(NodeId::encode(1, 1), &mut index)?;
/// let paths = index.paths_by_module_node(1, 1).unwrap();
/// assert_eq!(paths[0].to_string(), "[ 1.1  1.2 ]");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PathFinder<'g> {
    graph: &'g TopologyGraph,
    marks: Vec<Mark>,
    start: Option<NodeId>,
    target: Option<NodeId>,
}

impl<'g> PathFinder<'g> {
    /// Creates a finder over `graph`.
    pub fn new(graph: &'g TopologyGraph) -> Self {
        Self {
            graph,
            marks: vec![Mark::Unvisited; graph.vertex_count()],
            start: None,
            target: None,
        }
    }

    /// Mark of `vertex` as left by the last query.
    pub fn mark(&self, vertex: VertexId) -> Mark {
        self.marks.get(vertex.slot()).copied().unwrap_or_default()
    }

    /// Vertices a search from `node` starts at.
    ///
    /// A buffer stop contributes the vertex joined to it. Any other vertex
    /// contributes itself plus each of its far ends that is not a buffer stop.
    /// The result is deduplicated in discovery order.
    pub fn resolve_start_points(&self, node: NodeId) -> Result<Vec<VertexId>, QueryError> {
        let graph = self.graph;
        let mut starts = Vec::new();
        let mut add = |v: VertexId| {
            if !starts.contains(&v) {
                starts.push(v);
            }
        };

        for &id in graph.vertices_at(node) {
            let vertex = graph.vertex_ref(id);
            if vertex.is_bumper() {
                if let Some(joined) = graph.counterpart(id) {
                    add(joined);
                }
                continue;
            }
            add(id);
            for far in graph.far_ends(id) {
                if !graph.vertex_ref(far).is_bumper() {
                    add(far);
                }
            }
        }

        if starts.is_empty() {
            return Err(QueryError::NodeNotFound(node));
        }
        Ok(starts)
    }

    /// Enumerates every route from `node` and stores them in `index`,
    /// replacing any earlier entry for `node`. Returns the number of distinct
    /// routes stored.
    pub fn find_all_from(
        &mut self,
        node: NodeId,
        index: &mut PathIndex,
    ) -> Result<usize, QueryError> {
        let starts = self.begin(node, None)?;
        let scratch = index.scratch_mut();
        for (vertex, seed) in starts {
            self.run(vertex, seed, scratch);
        }
        let count = index.commit(node);

        #[cfg(feature = "tracing")]
        tracing::debug!("{count} paths from {node}");
        Ok(count)
    }

    /// Enumerates the routes from `from` that end at `to`, or that return to
    /// `from`. Dead ends short of `to` are not reported. Nothing is stored.
    pub fn find_between(
        &mut self,
        from: NodeId,
        to: NodeId,
    ) -> Result<Vec<PathRecord>, QueryError> {
        if self.graph.is_built() && !self.graph.contains_node(to) {
            return Err(QueryError::NodeNotFound(to));
        }
        let starts = self.begin(from, Some(to))?;
        let mut found = Vec::new();
        for (vertex, seed) in starts {
            self.run(vertex, seed, &mut found);
        }

        let mut seen = HashSet::with_capacity(found.len());
        let unique: Vec<PathRecord> = found
            .into_iter()
            .filter(|record| seen.insert(record.clone()))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!("{} paths from {from} to {to}", unique.len());
        Ok(unique)
    }

    /// Runs [`find_all_from`](Self::find_all_from) for every node carried by
    /// a rail and returns the completed index.
    pub fn precompute_all(&mut self) -> Result<PathIndex, QueryError> {
        self.precompute_with(|_, _| {})
    }

    /// Like [`precompute_all`](Self::precompute_all), calling
    /// `progress(node, paths)` after each start node.
    pub fn precompute_with<F>(&mut self, mut progress: F) -> Result<PathIndex, QueryError>
    where
        F: FnMut(NodeId, usize),
    {
        if !self.graph.is_built() {
            return Err(QueryError::NotBuilt);
        }
        let mut index = PathIndex::new();
        for node in self.graph.rail_nodes() {
            let count = self.find_all_from(node, &mut index)?;
            progress(node, count);
        }
        index.set_calculated(true);
        Ok(index)
    }

    /// Resets marks, records the query, and resolves seeded start points.
    ///
    /// A start point away from `node` is seeded with `node`, so every route
    /// begins at the queried node.
    fn begin(
        &mut self,
        node: NodeId,
        target: Option<NodeId>,
    ) -> Result<Vec<(VertexId, Vec<NodeId>)>, QueryError> {
        if !self.graph.is_built() {
            return Err(QueryError::NotBuilt);
        }
        self.marks.fill(Mark::Unvisited);
        self.start = Some(node);
        self.target = target;

        let starts = self.resolve_start_points(node)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("search from {node}: {} start points", starts.len());

        Ok(starts
            .into_iter()
            .map(|v| {
                let seed = if self.graph.vertex_ref(v).node_id() == node {
                    Vec::new()
                } else {
                    vec![node]
                };
                (v, seed)
            })
            .collect())
    }

    /// Depth-first walk from `origin`, appending completed routes to `out`.
    fn run(&mut self, origin: VertexId, seed: Vec<NodeId>, out: &mut Vec<PathRecord>) {
        let graph = self.graph;
        let mut stack = vec![Step::Enter {
            vertex: origin,
            path: seed,
        }];

        while let Some(step) = stack.pop() {
            let (id, mut path) = match step {
                Step::Leave(id) => {
                    self.marks[id.slot()] = Mark::Done;
                    continue;
                }
                Step::Enter { vertex, path } => (vertex, path),
            };
            let vertex = graph.vertex_ref(id);
            let node = vertex.node_id();

            if self.is_terminal(vertex, &path) {
                if self.records(node, &path) {
                    path.push(node);
                    out.push(PathRecord::new(path));
                }
                continue;
            }

            self.marks[id.slot()] = Mark::Visiting;
            stack.push(Step::Leave(id));
            path.push(node);

            let first_child = stack.len();
            for &joined in vertex.joined_to() {
                for next in graph.far_ends(joined) {
                    stack.push(Step::Enter {
                        vertex: next,
                        path: path.clone(),
                    });
                }
            }
            // Explore children in declaration order.
            stack[first_child..].reverse();
        }
    }

    fn is_terminal(&self, vertex: &Vertex, path: &[NodeId]) -> bool {
        let graph = self.graph;
        let node = vertex.node_id();
        let mark = self.marks[vertex.gid().slot()];

        let dead_end = vertex
            .joined_to()
            .iter()
            .all(|&j| graph.vertex_ref(j).is_bumper());
        let at_target = self.target == Some(node);
        let back_at_origin =
            self.start == Some(node) && (!path.is_empty() || mark != Mark::Unvisited);
        let on_branch = mark == Mark::Visiting;

        dead_end || at_target || back_at_origin || on_branch
    }

    /// Whether a branch that stopped at `node` is reported.
    fn records(&self, node: NodeId, path: &[NodeId]) -> bool {
        if path.is_empty() {
            return false;
        }
        match self.target {
            None => true,
            Some(target) => node == target || self.start == Some(node),
        }
    }
}
