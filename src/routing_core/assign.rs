//! Nearest-depot assignment.
//!
//! Runs one early-terminating Dijkstra per still-uncovered station. Because
//! settlement order is non-decreasing in distance, the first depot settled is
//! the nearest one. Any other station settled along the way is presumed to
//! share that depot's basin and is retired from the pending set without its
//! own search. That retirement is a deliberate approximation carried over
//! from the reference behavior; it is not individually optimal for the
//! retired stations and must not be replaced with a multi-source search.

use ahash::AHashSet as HashSet;

use super::graph::{NodeRole, SearchContext, SettleControl, WeightedGraph};

/// Outcome of one nearest-role search: the search scratch state plus the
/// depot it stopped on, if any.
struct NearestDepot {
    ctx: SearchContext,
    depot: Option<u32>,
}

/// Stations not yet covered by any discovered route, in declaration order.
#[derive(Default)]
pub struct PendingStations {
    order: Vec<i64>,
    members: HashSet<i64>,
}

impl PendingStations {
    fn push(&mut self, key: i64) {
        if self.members.insert(key) {
            self.order.push(key);
        }
    }

    fn retire(&mut self, key: i64) -> bool {
        self.members.remove(&key)
    }

    /// First still-pending station in declaration order.
    fn first(&mut self) -> Option<i64> {
        while let Some(&key) = self.order.first() {
            if self.members.contains(&key) {
                return Some(key);
            }
            self.order.remove(0);
        }
        None
    }

    pub fn contains(&self, key: i64) -> bool {
        self.members.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Drives the nearest-depot search over every pending station, producing one
/// raw route (station first, depot last) per search.
pub struct RouteAssigner<'a> {
    graph: &'a WeightedGraph,
    pending: PendingStations,
}

impl<'a> RouteAssigner<'a> {
    pub fn new(graph: &'a WeightedGraph) -> Self {
        let mut pending = PendingStations::default();
        for node in graph.nodes() {
            if node.role == NodeRole::Station {
                pending.push(node.key);
            }
        }
        Self { graph, pending }
    }

    pub fn pending(&self) -> &PendingStations {
        &self.pending
    }

    /// Nearest-role search from one station: stop on the first depot settled,
    /// retiring every station settled along the way (the source retires
    /// itself on its own settlement).
    fn nearest_depot_search(&mut self, source: u32) -> NearestDepot {
        let graph = self.graph;
        let pending = &mut self.pending;
        let (ctx, stopped) = graph.run_search(source, |u| match graph.role_at(u) {
            NodeRole::Station => {
                pending.retire(graph.key_at(u));
                SettleControl::Continue
            }
            NodeRole::Depot => SettleControl::Stop,
            NodeRole::Unknown => SettleControl::Continue,
        });
        NearestDepot { ctx, depot: stopped }
    }

    /// Key of the depot nearest to `station_key`, `None` if the key is absent
    /// or no depot is reachable. Settlement side effects on the pending set
    /// apply as in a full assignment run.
    pub fn nearest_depot(&mut self, station_key: i64) -> Option<i64> {
        let source = self.graph.node_index(station_key)?;
        let found = self.nearest_depot_search(source);
        found.depot.map(|idx| self.graph.key_at(idx))
    }

    /// Search from the next pending station. `None` once every station is
    /// covered. A station with no reachable depot yields an empty route; it
    /// still leaves the pending set when its own search settles it, so the
    /// assignment loop always terminates.
    pub fn assign_next(&mut self) -> Option<Vec<i64>> {
        let source_key = self.pending.first()?;
        let Some(source) = self.graph.node_index(source_key) else {
            // Pending keys come from the graph itself; an absent key would be
            // a construction bug, but dropping it beats looping forever.
            self.pending.retire(source_key);
            return Some(Vec::new());
        };

        let found = self.nearest_depot_search(source);
        match found.depot {
            Some(depot) => Some(self.graph.reconstruct(&found.ctx, depot)),
            None => Some(Vec::new()),
        }
    }

    /// Assign every pending station, in declaration order.
    pub fn run_all(mut self) -> Vec<Vec<i64>> {
        let mut routes = Vec::new();
        while let Some(route) = self.assign_next() {
            routes.push(route);
        }
        routes
    }
}
