//! Layout descriptions for tracknet.
//!
//! This crate reads layout description files, checks them, and turns them
//! into a [`tracknet_core::TopologyGraph`].
//!
//! # Features
//!
//! - **Formats**: JSON or TOML, chosen by file extension
//! - **Validation**: Every structural problem reported at once
//! - **Build**: Modules, track plans and junctions fed into the core graph builder
//!
//! # Example
//!
//! ```rust,no_run
//! use tracknet_layout::{TrackLayout, build};
//!
//! let layout = TrackLayout::load("layout.json").unwrap();
//! let graph = build(&layout).unwrap();
//! println!("{}", graph.summary());
//! ```

mod build;
mod error;
mod model;

/// Structural validation of layout descriptions.
pub mod validation;

pub use build::build;
pub use error::LayoutError;
pub use model::{
    BumperSpec, CrossingSpec, JunctionEnd, JunctionSpec, LayoutFormat, LayoutInfo, ModuleSpec,
    RailSpec, TrackElement, TrackLayout, TrackPlan, TrackSection, TurnoutSpec,
};
pub use validation::{ValidationError, ValidationResult, validate_element, validate_layout};

/// Loads, validates, and builds the layout at `path`.
pub fn load_graph(
    path: impl AsRef<std::path::Path>,
) -> Result<(TrackLayout, tracknet_core::TopologyGraph), LayoutError> {
    let layout = TrackLayout::load(path)?;
    let graph = build(&layout)?;
    Ok((layout, graph))
}
