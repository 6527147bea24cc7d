//! Display layout and graph information.

use clap::Args;
use tracknet_core::TopologyGraph;

use super::common::load_graph;

/// Build a layout and print its graph summary.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the layout file (.json or .toml)
    pub layout: std::path::PathBuf,

    /// List every vertex with its element and joints, then the paired ends
    #[arg(long)]
    pub vertices: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let (layout, graph) = load_graph(&args.layout)?;
    let header = &layout.layout;

    println!("Layout:    {}", header.name);
    if !header.version.is_empty() {
        println!("Version:   {}", header.version);
    }
    if let Some(author) = &header.author {
        println!("Author:    {author}");
    }
    for (i, module) in layout.modules.iter().enumerate() {
        println!("  module {}: {} [{}]", i + 1, module.name, module.trackplan);
    }
    println!("{}", graph.summary());

    if args.vertices {
        println!();
        print_vertices(&graph);
        println!();
        print_pairs(&graph);
    }
    Ok(())
}

fn print_vertices(graph: &TopologyGraph) {
    for vertex in graph.vertices() {
        let Some(element) = graph.element(vertex.element()) else {
            continue;
        };
        let joined: Vec<String> = vertex
            .joined_to()
            .iter()
            .map(ToString::to_string)
            .collect();
        let far: Vec<String> = graph.far_ends(vertex.gid()).map(|v| v.to_string()).collect();
        println!(
            "{:>6}  {:<8} {:<9} #{:<3} joined [{}]  through [{}]",
            vertex.gid().to_string(),
            vertex.node_id().to_string(),
            vertex.kind().name(),
            element.local_id(),
            joined.join(", "),
            far.join(", ")
        );
    }
}

fn print_pairs(graph: &TopologyGraph) {
    for (i, pair) in graph.pair_groups().enumerate() {
        let [a, b] = pair.ends();
        let (Some(va), Some(vb)) = (graph.vertex(a), graph.vertex(b)) else {
            continue;
        };
        println!(
            "{:>6}  {a} <-> {b}  {:<9} {} <-> {}",
            format!("P{i}"),
            va.kind().name(),
            va.node_id(),
            vb.node_id()
        );
    }
}
