//! Redundant-route elimination.
//!
//! Raw routes are grouped by their depot endpoint; within a group, a route
//! whose full key set already appears inside a longer route is redundant and
//! dropped (pure set containment, order and adjacency are irrelevant).
//! Degenerate single-node or empty routes are removed last.

use ahash::AHashSet as HashSet;
use serde::Serialize;

use super::graph::{GraphError, WeightedGraph};

/// A final route oriented depot-first, with its total weighted distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRoute {
    pub keys: Vec<i64>,
    pub distance: u32,
}

impl FormattedRoute {
    /// Number of nodes the route crosses.
    pub fn size(&self) -> usize {
        self.keys.len()
    }
}

/// Pull the first remaining route plus every other route sharing its depot
/// endpoint out of `raw`, insertion-sorted by descending node count.
fn pull_same_depot_group(raw: &mut Vec<Vec<i64>>) -> Vec<Vec<i64>> {
    let mut buffer: Vec<Vec<i64>> = Vec::new();
    if raw.is_empty() {
        return buffer;
    }

    let head = raw.remove(0);
    let terminal = head.last().copied();
    insert_descending(&mut buffer, head);

    let mut i = 0;
    while i < raw.len() {
        if raw[i].last().copied() == terminal {
            let route = raw.remove(i);
            insert_descending(&mut buffer, route);
        } else {
            i += 1;
        }
    }
    buffer
}

/// Stable descending-length insertion: ties keep discovery order.
fn insert_descending(buffer: &mut Vec<Vec<i64>>, route: Vec<i64>) {
    let position = buffer
        .iter()
        .take_while(|existing| existing.len() >= route.len())
        .count();
    buffer.insert(position, route);
}

/// Sweep a same-depot group left to right, dropping every later route whose
/// keys are all contained in the current route.
fn dump_sublists(buffer: &mut Vec<Vec<i64>>) {
    let mut i = 0;
    while i < buffer.len() {
        let current: HashSet<i64> = buffer[i].iter().copied().collect();
        let mut j = i + 1;
        while j < buffer.len() {
            if buffer[j].iter().all(|key| current.contains(key)) {
                buffer.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Reduce raw station-to-depot routes to the minimal non-redundant set.
/// Routes shorter than two nodes (isolated stations) never survive.
pub fn reduce_routes(mut raw: Vec<Vec<i64>>) -> Vec<Vec<i64>> {
    let mut reduced = Vec::new();
    while !raw.is_empty() {
        let mut buffer = pull_same_depot_group(&mut raw);
        dump_sublists(&mut buffer);
        reduced.append(&mut buffer);
    }
    reduced.retain(|route| route.len() >= 2);
    reduced
}

/// Reverse each surviving route to run depot-first and attach its total
/// distance. Reduced routes come straight out of the search, so a
/// non-adjacent pair here means the caller handed in a foreign sequence.
pub fn format_routes(
    graph: &WeightedGraph,
    reduced: Vec<Vec<i64>>,
) -> Result<Vec<FormattedRoute>, GraphError> {
    reduced
        .into_iter()
        .map(|mut keys| {
            keys.reverse();
            let distance = graph.path_length(&keys)?;
            Ok(FormattedRoute { keys, distance })
        })
        .collect()
}
