use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use toponet::analysis::{generate_dot, summarize};
use toponet::config_loader::load_config_or_default;
use toponet::snapshot;
use toponet::Topology;

/// Load a topology snapshot, recompute wireless links and report on it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology snapshot text file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Path to a YAML topology configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the re-exported snapshot to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a GraphViz DOT rendering to this file
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Print the topology summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Snapshot file: {:?}", args.snapshot);

    let config = load_config_or_default(args.config.as_deref())?;
    let mut topology = Topology::with_config(config)?;

    let text = fs::read_to_string(&args.snapshot)
        .wrap_err_with(|| format!("Failed to read snapshot '{}'", args.snapshot.display()))?;
    snapshot::import(&mut topology, &text)
        .wrap_err_with(|| format!("Failed to import snapshot '{}'", args.snapshot.display()))?;

    let summary = summarize(&topology);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "{} nodes, {} arcs ({} wireless), {} edges ({} wireless)",
            summary.total_nodes, summary.total_arcs, summary.wireless_arcs, summary.total_edges, summary.wireless_edges
        );
        if !summary.isolated_nodes.is_empty() {
            info!("Isolated nodes: {}", summary.isolated_nodes.join(", "));
        }
    }

    if let Some(output) = &args.output {
        fs::write(output, snapshot::export(&topology))
            .wrap_err_with(|| format!("Failed to write snapshot '{}'", output.display()))?;
        info!("Wrote snapshot to {:?}", output);
    }

    if let Some(dot_path) = &args.dot {
        fs::write(dot_path, generate_dot(&topology))
            .wrap_err_with(|| format!("Failed to write DOT file '{}'", dot_path.display()))?;
        info!("Wrote DOT rendering to {:?}", dot_path);
    }

    Ok(())
}
