//! Aggregate route statistics for batch reporting.

use serde::Serialize;

use crate::routing_core::FormattedRoute;

/// Min/max/average of route size (nodes crossed) and weighted distance for
/// one batch of final routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub routes: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub avg_size: f64,
    pub min_distance: u32,
    pub max_distance: u32,
    pub avg_distance: f64,
}

impl BatchStats {
    /// Analysis line: `<min_size> <max_size> <avg_size> <min_dist> <max_dist> <avg_dist>`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.min_size,
            self.max_size,
            self.avg_size,
            self.min_distance,
            self.max_distance,
            self.avg_distance
        )
    }
}

/// `None` for an empty batch; there is no meaningful average of zero routes.
pub fn batch_stats(routes: &[FormattedRoute]) -> Option<BatchStats> {
    if routes.is_empty() {
        return None;
    }

    let mut stats = BatchStats {
        routes: routes.len(),
        min_size: usize::MAX,
        max_size: 0,
        avg_size: 0.0,
        min_distance: u32::MAX,
        max_distance: 0,
        avg_distance: 0.0,
    };
    let mut total_size = 0usize;
    let mut total_distance = 0u64;

    for route in routes {
        let size = route.size();
        stats.min_size = stats.min_size.min(size);
        stats.max_size = stats.max_size.max(size);
        stats.min_distance = stats.min_distance.min(route.distance);
        stats.max_distance = stats.max_distance.max(route.distance);
        total_size += size;
        total_distance += u64::from(route.distance);
    }

    stats.avg_size = total_size as f64 / routes.len() as f64;
    stats.avg_distance = total_distance as f64 / routes.len() as f64;
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(keys: Vec<i64>, distance: u32) -> FormattedRoute {
        FormattedRoute { keys, distance }
    }

    #[test]
    fn aggregates_min_max_avg() {
        let routes = vec![
            route(vec![4, 2, 1], 30),
            route(vec![5, 3], 5),
            route(vec![6, 7, 8, 9], 10),
        ];
        let stats = batch_stats(&routes).unwrap();
        assert_eq!(stats.routes, 3);
        assert_eq!(stats.min_size, 2);
        assert_eq!(stats.max_size, 4);
        assert_eq!(stats.avg_size, 3.0);
        assert_eq!(stats.min_distance, 5);
        assert_eq!(stats.max_distance, 30);
        assert_eq!(stats.avg_distance, 15.0);
        assert_eq!(stats.summary_line(), "2 4 3 5 30 15");
    }

    #[test]
    fn empty_batch_has_no_stats() {
        assert!(batch_stats(&[]).is_none());
    }
}
