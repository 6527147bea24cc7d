//! Track topology graph.
//!
//! A layout is modelled on two levels:
//!
//! - **Joints** between elements. Every connection point of every element is
//!   a [`Vertex`]; vertices of different elements that carry the same encoded
//!   [`NodeId`](crate::NodeId) are physically joined and list each other in
//!   [`Vertex::joined_to`].
//! - **Routes** through an element. [`PairedEnds`] groups two vertices of the
//!   same element a train can pass between. A turnout's narrow end belongs to
//!   one group per wide end, which is where routes branch.
//!
//! A path search alternates the two: from the vertex where it leaves an
//! element, cross the joint into a neighbour, then follow the neighbour's
//! paired ends to where it leaves that element.
//!
//! # Construction
//!
//! [`GraphBuilder`] is the only way to mutate a graph. It adds elements one by
//! one, and [`finish()`](GraphBuilder::finish) joins shared nodes, rejects
//! dangling connection points, and returns a built [`TopologyGraph`].
//!
//! ```rust
//! use tracknet_core::{ElementAttrs, GraphBuilder, NodeId};
//!
//! let mut b = GraphBuilder::new(1)?;
//! b.add_bumper(1, 1, ElementAttrs::default())?;
//! b.add_rail(1, 1, 2, ElementAttrs::default())?;
//! b.add_turnout(1, 2, &[3, 4], ElementAttrs::default())?;
//! b.add_bumper(1, 3, ElementAttrs::default())?;
//! b.add_bumper(1, 4, ElementAttrs::default())?;
//! let graph = b.finish()?;
//!
//! assert_eq!(graph.vertices_at(NodeId::encode(1, 2)).len(), 2);
//! # Ok::<(), tracknet_core::BuildError>(())
//! ```

pub mod builder;
pub mod element;
pub mod paired;
pub mod topology;
pub mod vertex;

pub use builder::{BuildError, GraphBuilder};
pub use element::{Element, ElementAttrs, ElementId, ElementKind};
pub use paired::{PairId, PairedEnds};
pub use topology::{GraphError, GraphSummary, TopologyGraph};
pub use vertex::{Vertex, VertexId};
