//! Tracknet Core - track topology and route enumeration for modular
//! model-railroad layouts
//!
//! A layout is a set of modules, each carrying track elements (buffer stops,
//! rails, turnouts, crossings) whose connection points are numbered per
//! module. Junctions connect modules. This crate turns such a layout into a
//! traversable graph and enumerates the routes through it.
//!
//! # Core Abstractions
//!
//! ## Node Ids
//!
//! - [`NodeId`] - Cantor-paired `(module, local)` connection point id
//!
//! ## Graph
//!
//! - [`GraphBuilder`] - Adds elements and produces a built graph
//! - [`TopologyGraph`] - Vertex arena with joints and paired ends
//! - [`Vertex`] / [`PairedEnds`] - Connection points and routes through an element
//!
//! ## Paths
//!
//! - [`PathFinder`] - Exhaustive and targeted depth-first search
//! - [`PathIndex`] - Routes per start node
//! - [`PathRecord`] - One route
//!
//! # Example
//!
//! ```rust
//! use tracknet_core::{ElementAttrs, GraphBuilder, NodeId, precompute_all};
//!
//! let mut b = GraphBuilder::new(1)?;
//! b.add_bumper(1, 1, ElementAttrs::default())?;
//! b.add_rail(1, 1, 2, ElementAttrs::with_length(120))?;
//! b.add_turnout(1, 2, &[3, 4], ElementAttrs::default())?;
//! b.add_rail(1, 3, 5, ElementAttrs::default())?;
//! b.add_rail(1, 4, 6, ElementAttrs::default())?;
//! for stop in [5, 6] {
//!     b.add_bumper(1, stop, ElementAttrs::default())?;
//! }
//! let graph = b.finish()?;
//!
//! let index = precompute_all(&graph)?;
//! let from_1 = index.paths_by_node(NodeId::encode(1, 1)).unwrap();
//! assert_eq!(from_1.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `tracing` - emit `tracing` events for build warnings and query progress

pub mod codec;
pub mod graph;
pub mod path;

pub use codec::{LocalNode, ModuleNo, NodeId, ParseNodeIdError};
pub use graph::{
    BuildError, Element, ElementAttrs, ElementId, ElementKind, GraphBuilder, GraphError,
    GraphSummary, PairId, PairedEnds, TopologyGraph, Vertex, VertexId,
};
pub use path::{
    Mark, PathFinder, PathIndex, PathRecord, QueryError, find_between, precompute_all,
};
