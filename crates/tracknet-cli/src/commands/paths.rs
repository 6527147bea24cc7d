//! Enumerate routes.

use std::time::Instant;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracknet_core::{NodeId, PathFinder, PathIndex};

use super::common::{load_graph, print_paths};

/// Enumerate every route from every rail node, or from a single node.
#[derive(Args)]
pub struct PathsArgs {
    /// Path to the layout file (.json or .toml)
    pub layout: std::path::PathBuf,

    /// Only search from this node (`module.node`, e.g. `1.12`)
    #[arg(short, long)]
    pub node: Option<NodeId>,

    /// Print only the number of routes per node
    #[arg(long)]
    pub count: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the paths command.
pub fn run(args: PathsArgs) -> anyhow::Result<()> {
    let (_, graph) = load_graph(&args.layout)?;
    let mut finder = PathFinder::new(&graph);
    let started = Instant::now();

    let index = match args.node {
        Some(node) => {
            let mut index = PathIndex::new();
            finder.find_all_from(node, &mut index)?;
            index
        }
        None => {
            let total = graph.rail_nodes().len() as u64;
            let pb = if args.quiet {
                ProgressBar::hidden()
            } else {
                ProgressBar::new(total)
            };
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("##-"),
            );
            let index = finder.precompute_with(|node, _| {
                pb.set_message(node.to_string());
                pb.inc(1);
            })?;
            pb.finish_and_clear();
            index
        }
    };
    tracing::info!(
        "{} paths from {} nodes in {:?}",
        index.number_of_paths(),
        index.len(),
        started.elapsed()
    );

    for (node, paths) in index.iter() {
        if args.count {
            println!("{node}: {}", paths.len());
        } else {
            println!("From {node} ({} paths):", paths.len());
            print_paths(paths);
        }
    }
    println!("Total: {} paths", index.number_of_paths());
    Ok(())
}
