//! Synthetic dataset generator for exercising the routing pipeline.
//!
//! Emits node and edge files in the importer's text format. The edge set
//! always includes a shuffled backbone chain over all nodes, so every
//! generated graph is connected and every station can reach a depot.

use anyhow::{Result, ensure};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt::Write as _;

pub struct GenerateConfig {
    pub nodes: u32,
    pub depots: u32,
    pub extra_edges: u32,
    pub max_weight: u32,
    pub seed: u64,
}

pub fn generate_dataset(config: &GenerateConfig) -> Result<(String, String)> {
    ensure!(config.nodes >= 2, "need at least two nodes");
    ensure!(
        config.depots >= 1 && config.depots < config.nodes,
        "depot count must be in 1..nodes"
    );
    ensure!(config.max_weight >= 1, "max weight must be at least 1");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut keys: Vec<i64> = (1..=i64::from(config.nodes)).collect();
    keys.shuffle(&mut rng);

    let (depot_keys, station_keys) = keys.split_at(config.depots as usize);

    let mut node_text = String::new();
    for key in depot_keys {
        writeln!(node_text, "depot {key}")?;
    }
    for key in station_keys {
        writeln!(node_text, "station {key}")?;
    }

    let mut edge_text = String::new();
    let mut backbone = keys.clone();
    backbone.shuffle(&mut rng);
    for pair in backbone.windows(2) {
        let weight = rng.random_range(1..=config.max_weight);
        writeln!(edge_text, "{} - {} {weight}", pair[0], pair[1])?;
    }
    for _ in 0..config.extra_edges {
        let a = keys[rng.random_range(0..keys.len())];
        let b = keys[rng.random_range(0..keys.len())];
        if a == b {
            continue;
        }
        let weight = rng.random_range(1..=config.max_weight);
        writeln!(edge_text, "{a} - {b} {weight}")?;
    }

    Ok((node_text, edge_text))
}
