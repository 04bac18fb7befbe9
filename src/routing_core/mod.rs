//! Core routing engine: weighted graph, nearest-depot assignment, and
//! redundant-route elimination.

pub mod assign;
pub mod graph;
pub mod reduce;


pub use assign::{PendingStations, RouteAssigner};
pub use graph::{GraphError, Node, NodeRole, ShortestPath, UNREACHABLE, WeightedGraph};
pub use reduce::{FormattedRoute, format_routes, reduce_routes};
