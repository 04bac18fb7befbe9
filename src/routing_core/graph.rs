//! Weighted undirected graph with a Dijkstra search that terminates early on
//! a caller-supplied settle predicate.
//!
//! Nodes live in an arena (`Vec`) and reference each other by index, so the
//! adjacency structure has no ownership cycles. All transient search state
//! (tentative distance, settled flag, predecessor) lives in a [`SearchContext`]
//! allocated fresh per run, never on the nodes themselves, so no state can
//! leak between searches.

use ahash::AHashMap as HashMap;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Distance sentinel for a node no search has reached.
pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// A valid route terminus.
    Depot,
    /// A node requiring assignment to some depot.
    Station,
    /// A plain junction.
    Unknown,
}

/// A graph vertex. The role is fixed at insertion and the adjacency list
/// holds at most one entry per neighbor (the minimum-weight edge).
pub struct Node {
    pub key: i64,
    pub value: i64,
    pub role: NodeRole,
    /// (target arena index, weight)
    adjacency: Vec<(u32, u32)>,
}

impl Node {
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node key {0} does not exist in the graph")]
    UnknownNode(i64),
    #[error("nodes {from} and {to} are not adjacent")]
    NotAdjacent { from: i64, to: i64 },
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: u32,
    node: u32,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap instead of a max-heap.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-search scratch state, parallel to the node arena. Allocated fresh for
/// every run, so a finished search leaves nothing behind on the graph.
pub(crate) struct SearchContext {
    dist: Vec<u32>,
    settled: Vec<bool>,
    predecessor: Vec<Option<u32>>,
}

impl SearchContext {
    fn new(node_count: usize) -> Self {
        Self {
            dist: vec![UNREACHABLE; node_count],
            settled: vec![false; node_count],
            predecessor: vec![None; node_count],
        }
    }

    pub(crate) fn distance_of(&self, idx: u32) -> u32 {
        self.dist[idx as usize]
    }
}

/// Whether the search should keep settling nodes after the callback saw one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SettleControl {
    Continue,
    Stop,
}

/// A resolved two-endpoint query. An unreachable target yields a path holding
/// only the target key and `distance == UNREACHABLE`; callers inspect the
/// distance to decide reachability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPath {
    pub keys: Vec<i64>,
    pub distance: u32,
}

#[derive(Default)]
pub struct WeightedGraph {
    nodes: Vec<Node>,
    index_of: HashMap<i64, u32>,
    edge_count: usize,
}

enum Attach {
    Inserted,
    Replaced,
    Kept,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Insert a node. Returns false (and mutates nothing) if the key is taken.
    pub fn add_node(&mut self, key: i64, value: i64, role: NodeRole) -> bool {
        if self.index_of.contains_key(&key) {
            return false;
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            key,
            value,
            role,
            adjacency: Vec::new(),
        });
        self.index_of.insert(key, idx);
        true
    }

    pub fn get_node(&self, key: i64) -> Option<&Node> {
        self.index_of
            .get(&key)
            .map(|&idx| &self.nodes[idx as usize])
    }

    pub(crate) fn node_index(&self, key: i64) -> Option<u32> {
        self.index_of.get(&key).copied()
    }

    pub(crate) fn key_at(&self, idx: u32) -> i64 {
        self.nodes[idx as usize].key
    }

    pub(crate) fn role_at(&self, idx: u32) -> NodeRole {
        self.nodes[idx as usize].role
    }

    /// Insert an undirected edge under the shortest-wins policy: a fresh pair
    /// or a strictly shorter replacement returns true, anything else is a
    /// no-op returning false. Self-loops and absent endpoints are rejected.
    pub fn add_edge(&mut self, k1: i64, k2: i64, weight: u32) -> bool {
        let (Some(a), Some(b)) = (self.node_index(k1), self.node_index(k2)) else {
            return false;
        };
        if a == b {
            return false;
        }
        // Mirrored insertion; both sides always agree since edges are never removed.
        let outcome = self.attach(a, b, weight);
        self.attach(b, a, weight);
        match outcome {
            Attach::Inserted => {
                self.edge_count += 1;
                true
            }
            Attach::Replaced => true,
            Attach::Kept => false,
        }
    }

    fn attach(&mut self, from: u32, to: u32, weight: u32) -> Attach {
        let adjacency = &mut self.nodes[from as usize].adjacency;
        match adjacency.iter_mut().find(|(target, _)| *target == to) {
            Some((_, existing)) if weight < *existing => {
                *existing = weight;
                Attach::Replaced
            }
            Some(_) => Attach::Kept,
            None => {
                adjacency.push((to, weight));
                Attach::Inserted
            }
        }
    }

    /// Current weight between two adjacent nodes, `None` if either key is
    /// absent or no edge connects them.
    pub fn edge_weight(&self, k1: i64, k2: i64) -> Option<u32> {
        let (a, b) = (self.node_index(k1)?, self.node_index(k2)?);
        self.nodes[a as usize]
            .adjacency
            .iter()
            .find(|(target, _)| *target == b)
            .map(|&(_, weight)| weight)
    }

    /// Sum of edge weights along a key sequence. A consecutive pair that is
    /// not adjacent is a caller bug and surfaces as an error rather than a
    /// silently wrong total.
    pub fn path_length(&self, keys: &[i64]) -> Result<u32, GraphError> {
        for &key in keys {
            if self.node_index(key).is_none() {
                return Err(GraphError::UnknownNode(key));
            }
        }
        let mut total: u32 = 0;
        for (&from, &to) in keys.iter().tuple_windows() {
            let weight = self
                .edge_weight(from, to)
                .ok_or(GraphError::NotAdjacent { from, to })?;
            total += weight;
        }
        Ok(total)
    }

    /// Dijkstra from `source`, settling nodes in non-decreasing distance
    /// order. `on_settle` sees every settled node and may halt the search;
    /// returns the scratch state plus the node it stopped on, if any.
    pub(crate) fn run_search<F>(&self, source: u32, mut on_settle: F) -> (SearchContext, Option<u32>)
    where
        F: FnMut(u32) -> SettleControl,
    {
        let mut ctx = SearchContext::new(self.nodes.len());
        let mut heap = BinaryHeap::new();

        ctx.dist[source as usize] = 0;
        heap.push(State {
            cost: 0,
            node: source,
        });

        while let Some(State { cost, node: u }) = heap.pop() {
            // Stale entry from lazy deletion; the node was already settled
            // through a shorter path.
            if ctx.settled[u as usize] || cost > ctx.dist[u as usize] {
                continue;
            }
            ctx.settled[u as usize] = true;

            if on_settle(u) == SettleControl::Stop {
                return (ctx, Some(u));
            }

            for &(v, weight) in &self.nodes[u as usize].adjacency {
                if ctx.settled[v as usize] {
                    continue;
                }
                let Some(through) = cost.checked_add(weight) else {
                    continue;
                };
                if through < ctx.dist[v as usize] {
                    ctx.dist[v as usize] = through;
                    ctx.predecessor[v as usize] = Some(u);
                    heap.push(State {
                        cost: through,
                        node: v,
                    });
                }
            }
        }

        (ctx, None)
    }

    /// Walk predecessor links back from `end` and return the key sequence
    /// oriented source-first.
    pub(crate) fn reconstruct(&self, ctx: &SearchContext, end: u32) -> Vec<i64> {
        let mut keys = Vec::new();
        let mut current = Some(end);
        while let Some(idx) = current {
            keys.push(self.nodes[idx as usize].key);
            current = ctx.predecessor[idx as usize];
        }
        keys.reverse();
        keys
    }

    /// Plain two-endpoint query: the early-termination search with an
    /// "is this the target" predicate. `None` if either key is absent.
    pub fn shortest_path(&self, from: i64, to: i64) -> Option<ShortestPath> {
        let source = self.node_index(from)?;
        let target = self.node_index(to)?;

        let (ctx, _) = self.run_search(source, |u| {
            if u == target {
                SettleControl::Stop
            } else {
                SettleControl::Continue
            }
        });

        Some(ShortestPath {
            keys: self.reconstruct(&ctx, target),
            distance: ctx.distance_of(target),
        })
    }
}
