//! Targeted route search between two nodes.

use clap::Args;
use tracknet_core::{NodeId, find_between};

use super::common::{load_graph, print_paths};

/// Find the routes from one node to another.
#[derive(Args)]
pub struct RouteArgs {
    /// Path to the layout file (.json or .toml)
    pub layout: std::path::PathBuf,

    /// Start node (`module.node`)
    pub from: NodeId,

    /// Destination node (`module.node`)
    pub to: NodeId,
}

/// Run the route command.
pub fn run(args: RouteArgs) -> anyhow::Result<()> {
    let (_, graph) = load_graph(&args.layout)?;
    let routes = find_between(&graph, args.from, args.to)?;

    println!("Routes {} -> {} ({}):", args.from, args.to, routes.len());
    print_paths(&routes);
    Ok(())
}
