//! Builds a weighted graph from imported records and runs the full
//! assignment pipeline over it.

use tracing::debug;

use crate::import::ImportedGraph;
use crate::routing_core::{
    FormattedRoute, GraphError, NodeRole, RouteAssigner, WeightedGraph, format_routes,
    reduce_routes,
};

/// Materialize the graph: depots first, then stations, then edges. Duplicate
/// keys and non-improving edges are non-fatal no-ops.
pub fn build_graph(imported: &ImportedGraph) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    for &key in &imported.depots {
        if !graph.add_node(key, key, NodeRole::Depot) {
            debug!(key, "duplicate depot key ignored");
        }
    }
    for &key in &imported.stations {
        if !graph.add_node(key, key, NodeRole::Station) {
            debug!(key, "duplicate station key ignored");
        }
    }
    for edge in &imported.edges {
        // False here means a kept shorter edge; unknown endpoints were
        // already filtered by the importer.
        graph.add_edge(edge.from, edge.to, edge.weight);
    }
    graph
}

/// Assignment, reduction, and depot-first formatting in one pass.
pub fn run_pipeline(graph: &WeightedGraph) -> Result<Vec<FormattedRoute>, GraphError> {
    let raw = RouteAssigner::new(graph).run_all();
    let reduced = reduce_routes(raw);
    format_routes(graph, reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{EdgeRecord, parse_nodes};

    #[test]
    fn builds_graph_from_records() {
        let mut imported = parse_nodes("depot 4 depot 5 station 1 station 2 station 3").unwrap();
        for (from, to, weight) in [(1, 2, 10), (2, 4, 20), (4, 3, 50), (3, 5, 5)] {
            imported.edges.push(EdgeRecord { from, to, weight });
        }

        let graph = build_graph(&imported);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.get_node(4).unwrap().role, NodeRole::Depot);

        let routes = run_pipeline(&graph).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].keys, vec![4, 2, 1]);
        assert_eq!(routes[0].distance, 30);
        assert_eq!(routes[1].keys, vec![5, 3]);
        assert_eq!(routes[1].distance, 5);
    }

    #[test]
    fn duplicate_records_are_harmless() {
        let mut imported = parse_nodes("depot 4 depot 4 station 1 station 1").unwrap();
        imported.edges.push(EdgeRecord {
            from: 1,
            to: 4,
            weight: 9,
        });
        imported.edges.push(EdgeRecord {
            from: 4,
            to: 1,
            weight: 12,
        });

        let graph = build_graph(&imported);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(1, 4), Some(9));

        let routes = run_pipeline(&graph).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].keys, vec![4, 1]);
        assert_eq!(routes[0].distance, 9);
    }

    #[test]
    fn isolated_station_yields_no_route() {
        let imported = parse_nodes("depot 4 station 1").unwrap();
        let graph = build_graph(&imported);
        let routes = run_pipeline(&graph).unwrap();
        assert!(routes.is_empty());
    }
}
