//! Route enumeration.
//!
//! - [`PathFinder`] walks a built [`TopologyGraph`] depth-first and reports
//!   every route from a start node, either exhaustively or towards a target.
//! - [`PathRecord`] is one route: node ids in traversal order.
//! - [`PathIndex`] stores the exhaustive results per start node.
//!
//! [`precompute_all`] and [`find_between`] are the one-call entry points; use
//! a [`PathFinder`] directly to run several queries with one mark table.

pub mod finder;
pub mod index;
pub mod record;

pub use finder::{Mark, PathFinder, QueryError};
pub use index::PathIndex;
pub use record::PathRecord;

use crate::codec::NodeId;
use crate::graph::TopologyGraph;

/// Enumerates the routes from every node carried by a rail.
///
/// Fails with [`QueryError::NotBuilt`] if `graph` was not produced by a
/// builder.
pub fn precompute_all(graph: &TopologyGraph) -> Result<PathIndex, QueryError> {
    PathFinder::new(graph).precompute_all()
}

/// Routes from `from` that reach `to`. The result is not persisted.
pub fn find_between(
    graph: &TopologyGraph,
    from: NodeId,
    to: NodeId,
) -> Result<Vec<PathRecord>, QueryError> {
    PathFinder::new(graph).find_between(from, to)
}
