use crate::core::graph::NicheGraph;
use crate::types::ClosenessPolicy;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority-queue state (min-heap via reversed ordering)
#[derive(Debug, Clone, PartialEq)]
struct State {
    cost: f64,
    node: u32,
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

/// Shortest-path search and closeness scoring over niche graphs.
///
/// Edge weights are non-negative, so a binary-heap Dijkstra from each
/// source covers the all-pairs-within-niche requirement one source at a
/// time.
#[derive(Debug, Clone, Copy)]
pub struct PathCostEngine {
    policy: ClosenessPolicy,
}

impl PathCostEngine {
    pub fn new(policy: ClosenessPolicy) -> Self {
        Self { policy }
    }

    /// Shortest distance from `source` (local id) to every niche member.
    ///
    /// Unreachable members are `f64::INFINITY`.
    pub fn shortest_paths(&self, graph: &NicheGraph, source: u32) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; graph.len()];
        let mut heap = BinaryHeap::new();

        dist[source as usize] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: source,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if cost > dist[node as usize] {
                continue;
            }
            for &(next, weight) in graph.neighbors(node) {
                let candidate = cost + weight;
                if candidate < dist[next as usize] {
                    dist[next as usize] = candidate;
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        dist
    }

    /// Closeness of `source` within its niche.
    ///
    /// Unreachable members (disconnected components) are excluded from the
    /// aggregation rather than treated as infinite-cost terms. A source
    /// with no reachable other member scores 0.
    pub fn closeness(&self, graph: &NicheGraph, source: u32) -> f64 {
        let dist = self.shortest_paths(graph, source);
        self.closeness_from(&dist, source)
    }

    /// Aggregate a distance vector into a closeness score
    pub fn closeness_from(&self, dist: &[f64], source: u32) -> f64 {
        let reachable: Vec<f64> = dist
            .iter()
            .enumerate()
            .filter(|&(i, &d)| i != source as usize && d.is_finite())
            .map(|(_, &d)| d)
            .collect();

        if reachable.is_empty() {
            return 0.0;
        }

        let n = reachable.len() as f64;
        let sum: f64 = reachable.iter().sum();
        match self.policy {
            ClosenessPolicy::ReciprocalMean => {
                if sum > 0.0 {
                    n / sum
                } else {
                    0.0
                }
            }
            ClosenessPolicy::ReciprocalSum => {
                if sum > 0.0 {
                    1.0 / sum
                } else {
                    0.0
                }
            }
            ClosenessPolicy::Harmonic => {
                reachable.iter().filter(|&&d| d > 0.0).map(|&d| 1.0 / d).sum::<f64>() / n
            }
        }
    }
}

impl Default for PathCostEngine {
    fn default() -> Self {
        Self::new(ClosenessPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::GraphOptions;
    use crate::core::grid::Grid;
    use crate::core::niche::Band;
    use crate::types::BoundaryMode;
    use approx::assert_relative_eq;
    use ndarray::{arr2, Array2};

    fn full_band() -> Band {
        Band {
            lo: -1e9,
            hi: 1e9,
        }
    }

    fn flat_graph(ny: usize, nx: usize, diagonals: bool) -> (Grid, NicheGraph) {
        let z = Array2::from_elem((ny, nx), 100.0);
        let grid =
            Grid::from_elevation(z, 1.0, BoundaryMode::None, crate::types::DEFAULT_SEA_LEVEL)
                .unwrap();
        let options = GraphOptions {
            diagonals,
            ..GraphOptions::default()
        };
        let graph = NicheGraph::build(&grid, &full_band(), &options).unwrap();
        (grid, graph)
    }

    #[test]
    fn test_axial_and_diagonal_distances() {
        let (grid, graph) = flat_graph(3, 3, true);
        let engine = PathCostEngine::default();

        let source = graph.local_index(grid.node_index(0, 0)).unwrap();
        let dist = engine.shortest_paths(&graph, source);

        let right = graph.local_index(grid.node_index(0, 1)).unwrap();
        let diag = graph.local_index(grid.node_index(1, 1)).unwrap();
        assert_relative_eq!(dist[right as usize], 1.0, epsilon = 1e-12);
        assert_relative_eq!(dist[diag as usize], std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_manhattan_paths_without_diagonals() {
        let (grid, graph) = flat_graph(4, 4, false);
        let engine = PathCostEngine::default();

        let source = graph.local_index(grid.node_index(0, 0)).unwrap();
        let dist = engine.shortest_paths(&graph, source);
        let far = graph.local_index(grid.node_index(3, 3)).unwrap();
        assert_relative_eq!(dist[far as usize], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unreachable_members_excluded_from_closeness() {
        // Two land regions split by a marine channel: the right column is
        // unreachable from the left one.
        let z = arr2(&[
            [10.0, -50.0, 10.0],
            [10.0, -50.0, 10.0],
            [10.0, -50.0, 10.0],
        ]);
        let grid = Grid::from_elevation(z, 1.0, BoundaryMode::None, 0.0).unwrap();
        let options = GraphOptions {
            diagonals: false,
            ..GraphOptions::default()
        };
        let graph = NicheGraph::build(&grid, &full_band(), &options).unwrap();
        let engine = PathCostEngine::default();

        let source = graph.local_index(grid.node_index(0, 0)).unwrap();
        let dist = engine.shortest_paths(&graph, source);

        let reachable_count = dist.iter().filter(|d| d.is_finite()).count();
        assert_eq!(reachable_count, 3); // left column only, source included

        // Mean over the two reachable others (distances 1 and 2)
        let closeness = engine.closeness_from(&dist, source);
        assert_relative_eq!(closeness, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_isolated_source_scores_zero() {
        let z = arr2(&[[10.0]]);
        let grid = Grid::from_elevation(z, 1.0, BoundaryMode::None, -1.0).unwrap();
        let graph = NicheGraph::build(&grid, &full_band(), &GraphOptions::default()).unwrap();
        let engine = PathCostEngine::default();

        assert_eq!(engine.closeness(&graph, 0), 0.0);
    }

    #[test]
    fn test_closeness_policies() {
        let dist = vec![0.0, 1.0, 2.0, f64::INFINITY];

        let mean = PathCostEngine::new(ClosenessPolicy::ReciprocalMean);
        assert_relative_eq!(mean.closeness_from(&dist, 0), 2.0 / 3.0, epsilon = 1e-12);

        let sum = PathCostEngine::new(ClosenessPolicy::ReciprocalSum);
        assert_relative_eq!(sum.closeness_from(&dist, 0), 1.0 / 3.0, epsilon = 1e-12);

        let harmonic = PathCostEngine::new(ClosenessPolicy::Harmonic);
        assert_relative_eq!(harmonic.closeness_from(&dist, 0), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_steeper_terrain_costs_more() {
        let flat = arr2(&[[0.0, 0.0, 0.0]]);
        let ridge = arr2(&[[0.0, 5.0, 0.0]]);
        let engine = PathCostEngine::default();

        let mut closeness = Vec::new();
        for z in [flat, ridge] {
            let grid = Grid::from_elevation(z, 1.0, BoundaryMode::None, -1.0).unwrap();
            let graph = NicheGraph::build(&grid, &full_band(), &GraphOptions::default()).unwrap();
            let source = graph.local_index(0).unwrap();
            closeness.push(engine.closeness(&graph, source));
        }

        assert!(
            closeness[0] > closeness[1],
            "flat terrain should score higher closeness than a ridge crossing"
        );
    }
}
