//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use tracknet_core::{PathRecord, TopologyGraph};
use tracknet_layout::TrackLayout;

/// Load, validate, and build a layout file.
pub fn load_graph(path: &Path) -> anyhow::Result<(TrackLayout, TopologyGraph)> {
    tracknet_layout::load_graph(path)
        .with_context(|| format!("cannot load layout '{}'", path.display()))
}

/// Print routes one per line, or a placeholder when there are none.
pub fn print_paths(paths: &[PathRecord]) {
    if paths.is_empty() {
        println!("  (none)");
    }
    for path in paths {
        println!("  {path}");
    }
}
