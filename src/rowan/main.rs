//! Batch driver: runs the depot-assignment pipeline over many node/edge file
//! pairs and writes the mapping and analysis outputs.

mod generate;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use lastmile::builder::{build_graph, run_pipeline};
use lastmile::import::import_graph;
use lastmile::report::{BatchStats, batch_stats};
use lastmile::routing_core::FormattedRoute;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Assign stations to depots for every batch listed in the manifest
    Route {
        /// File with one `<node_file> <edge_file>` pair per line
        #[arg(long)]
        manifest: PathBuf,
        /// Route output: one `depot key... distance` line per route
        #[arg(long, default_value = "mapping.txt")]
        mapping: PathBuf,
        /// Per-batch min/max/average of route size and distance
        #[arg(long, default_value = "analysis.txt")]
        analysis: PathBuf,
        /// Emit the analysis as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Generate a synthetic node/edge dataset
    Generate {
        /// Total node count
        #[arg(long)]
        nodes: u32,
        /// How many of the nodes are depots
        #[arg(long)]
        depots: u32,
        /// Extra random edges on top of the connected backbone
        #[arg(long, default_value_t = 0)]
        extra_edges: u32,
        #[arg(long, default_value_t = 100)]
        max_weight: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_nodes: PathBuf,
        #[arg(long)]
        out_edges: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct BatchResult {
    batch: usize,
    routes: Vec<FormattedRoute>,
    stats: Option<BatchStats>,
}

fn read_manifest(path: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading manifest {}", path.display()))?;
    let mut pairs = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(nodes), Some(edges), None) => {
                pairs.push((PathBuf::from(nodes), PathBuf::from(edges)));
            }
            _ => anyhow::bail!(
                "manifest line {}: expected `<node_file> <edge_file>`, got {line:?}",
                line_no + 1
            ),
        }
    }
    Ok(pairs)
}

fn process_batch(batch: usize, node_path: &Path, edge_path: &Path) -> Result<BatchResult> {
    let started = Instant::now();
    let imported = import_graph(node_path, edge_path)?;
    let graph = build_graph(&imported);
    let routes = run_pipeline(&graph)
        .with_context(|| format!("routing batch {batch} ({})", node_path.display()))?;
    let stats = batch_stats(&routes);
    info!(
        batch,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        routes = routes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch routed"
    );
    Ok(BatchResult {
        batch,
        routes,
        stats,
    })
}

fn run_route(manifest: &Path, mapping: &Path, analysis: &Path, json: bool) -> Result<()> {
    let pairs = read_manifest(manifest)?;
    ensure!(!pairs.is_empty(), "manifest lists no batches");

    // Batches are independent graphs; route them in parallel but emit in
    // manifest order.
    let results: Vec<BatchResult> = pairs
        .par_iter()
        .enumerate()
        .map(|(idx, (node_path, edge_path))| process_batch(idx + 1, node_path, edge_path))
        .collect::<Result<_>>()?;

    let mut mapping_out = String::new();
    for result in &results {
        writeln!(mapping_out, "Batch: {}", result.batch)?;
        for route in &result.routes {
            for key in &route.keys {
                write!(mapping_out, "{key} ")?;
            }
            writeln!(mapping_out, "{}", route.distance)?;
        }
        writeln!(mapping_out)?;
    }
    fs::write(mapping, mapping_out)
        .with_context(|| format!("writing mapping {}", mapping.display()))?;

    if json {
        let rendered = serde_json::to_string_pretty(&results)?;
        fs::write(analysis, rendered)
            .with_context(|| format!("writing analysis {}", analysis.display()))?;
    } else {
        let mut analysis_out = String::new();
        for result in &results {
            match &result.stats {
                Some(stats) => {
                    writeln!(analysis_out, "{} {}", result.batch, stats.summary_line())?
                }
                None => writeln!(analysis_out, "{} no routes", result.batch)?,
            }
        }
        fs::write(analysis, analysis_out)
            .with_context(|| format!("writing analysis {}", analysis.display()))?;
    }

    info!(batches = results.len(), "all batches complete");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match args.command {
        Commands::Route {
            manifest,
            mapping,
            analysis,
            json,
        } => run_route(&manifest, &mapping, &analysis, json),
        Commands::Generate {
            nodes,
            depots,
            extra_edges,
            max_weight,
            seed,
            out_nodes,
            out_edges,
        } => {
            let config = generate::GenerateConfig {
                nodes,
                depots,
                extra_edges,
                max_weight,
                seed: seed.unwrap_or_else(rand::random),
            };
            let (node_text, edge_text) = generate::generate_dataset(&config)?;
            fs::write(&out_nodes, node_text)
                .with_context(|| format!("writing {}", out_nodes.display()))?;
            fs::write(&out_edges, edge_text)
                .with_context(|| format!("writing {}", out_edges.display()))?;
            info!(
                nodes,
                depots,
                seed = config.seed,
                "dataset written to {} and {}",
                out_nodes.display(),
                out_edges.display()
            );
            Ok(())
        }
    }
}
