//! Dataset import.
//!
//! Node files are whitespace-separated `<kind> <key>` pairs where the kind
//! token `depot` marks a depot and anything else a station. Edge files are
//! whitespace-separated `<key1> <label> <key2> <weight>` quadruples; the
//! label token is decorative and discarded. Edges naming unknown keys are
//! filtered out here so the graph layer never sees them.

use ahash::AHashSet as HashSet;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: i64,
    pub to: i64,
    pub weight: u32,
}

#[derive(Debug, Default)]
pub struct ImportedGraph {
    pub depots: Vec<i64>,
    pub stations: Vec<i64>,
    pub edges: Vec<EdgeRecord>,
}

impl ImportedGraph {
    fn known_keys(&self) -> HashSet<i64> {
        self.depots.iter().chain(&self.stations).copied().collect()
    }
}

pub fn parse_nodes(text: &str) -> Result<ImportedGraph> {
    let mut imported = ImportedGraph::default();
    let mut tokens = text.split_whitespace();

    while let Some(kind) = tokens.next() {
        let Some(key_token) = tokens.next() else {
            bail!("node kind {kind:?} has no key token");
        };
        let key: i64 = key_token
            .parse()
            .with_context(|| format!("bad node key {key_token:?}"))?;
        if kind == "depot" {
            imported.depots.push(key);
        } else {
            imported.stations.push(key);
        }
    }
    Ok(imported)
}

pub fn parse_edges(text: &str, imported: &mut ImportedGraph) -> Result<()> {
    let known = imported.known_keys();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 4 != 0 {
        bail!(
            "edge data has {} tokens, expected <key> <label> <key> <weight> quadruples",
            tokens.len()
        );
    }

    for quad in tokens.chunks_exact(4) {
        let from: i64 = quad[0]
            .parse()
            .with_context(|| format!("bad edge endpoint {:?}", quad[0]))?;
        let to: i64 = quad[2]
            .parse()
            .with_context(|| format!("bad edge endpoint {:?}", quad[2]))?;
        let weight: u32 = quad[3]
            .parse()
            .with_context(|| format!("bad edge weight {:?}", quad[3]))?;

        if known.contains(&from) && known.contains(&to) {
            imported.edges.push(EdgeRecord { from, to, weight });
        } else {
            warn!(from, to, "edge references unknown node keys, skipping");
        }
    }
    Ok(())
}

/// Read and parse one node/edge file pair.
pub fn import_graph(node_path: &Path, edge_path: &Path) -> Result<ImportedGraph> {
    let node_text = fs::read_to_string(node_path)
        .with_context(|| format!("reading node file {}", node_path.display()))?;
    let mut imported = parse_nodes(&node_text)
        .with_context(|| format!("parsing node file {}", node_path.display()))?;

    let edge_text = fs::read_to_string(edge_path)
        .with_context(|| format!("reading edge file {}", edge_path.display()))?;
    parse_edges(&edge_text, &mut imported)
        .with_context(|| format!("parsing edge file {}", edge_path.display()))?;
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_kinds() {
        let imported = parse_nodes("depot 4\nstation 1 station 2\ndepot 5\nstop 3").unwrap();
        assert_eq!(imported.depots, vec![4, 5]);
        // Any kind other than "depot" counts as a station.
        assert_eq!(imported.stations, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_dangling_node_token() {
        assert!(parse_nodes("depot 4 station").is_err());
        assert!(parse_nodes("depot four").is_err());
    }

    #[test]
    fn parses_and_filters_edges() {
        let mut imported = parse_nodes("depot 4 station 1 station 2").unwrap();
        parse_edges("1 - 2 10\n2 - 4 20\n2 - 99 7", &mut imported).unwrap();
        // The 2-99 edge names an unknown node and is dropped.
        assert_eq!(
            imported.edges,
            vec![
                EdgeRecord {
                    from: 1,
                    to: 2,
                    weight: 10
                },
                EdgeRecord {
                    from: 2,
                    to: 4,
                    weight: 20
                },
            ]
        );
    }

    #[test]
    fn rejects_truncated_edge_quadruple() {
        let mut imported = parse_nodes("station 1 station 2").unwrap();
        assert!(parse_edges("1 - 2", &mut imported).is_err());
    }
}
