use crate::core::grid::Grid;
use crate::core::niche::Band;
use crate::types::{CostModel, LecError, LecResult};
use std::collections::HashMap;

/// 4-connected neighbor offsets with their distance multipliers
const AXIAL_NEIGHBORS: [(isize, isize, f64); 4] = [
    (-1, 0, 1.0),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (1, 0, 1.0),
];

/// Diagonal neighbor offsets, enabled by `diagonals`
const DIAGONAL_NEIGHBORS: [(isize, isize, f64); 4] = [
    (-1, -1, std::f64::consts::SQRT_2),
    (-1, 1, std::f64::consts::SQRT_2),
    (1, -1, std::f64::consts::SQRT_2),
    (1, 1, std::f64::consts::SQRT_2),
];

/// Graph construction options
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    /// Include diagonal (8-connectivity) moves
    pub diagonals: bool,
    /// Edge cost model
    pub cost_model: CostModel,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            diagonals: true,
            cost_model: CostModel::default(),
        }
    }
}

/// Cost of one step of planar length `step` with elevation change `dz`.
///
/// Both models are monotone in `|dz|` and depend only on elevation
/// differences, so LEC is invariant to a global elevation shift.
pub fn edge_cost(step: f64, dz: f64, model: CostModel) -> f64 {
    match model {
        CostModel::Surface => (step * step + dz * dz).sqrt(),
        CostModel::SlopePenalty => step * (1.0 + (dz / step) * (dz / step)),
    }
}

/// Grid subgraph induced by one elevation band.
///
/// Members are the non-marine nodes whose elevation falls inside the band;
/// edges join grid-adjacent members under the grid's boundary mode. Node
/// indices are compacted so path searches run on dense local ids.
#[derive(Debug, Clone)]
pub struct NicheGraph {
    members: Vec<usize>,
    local: HashMap<usize, u32>,
    adjacency: Vec<Vec<(u32, f64)>>,
}

impl NicheGraph {
    /// Build the induced subgraph for `band`.
    ///
    /// Fails with `EmptyNiche` when the band contains no node at all, so an
    /// empty band is reported instead of silently yielding NaN downstream.
    pub fn build(grid: &Grid, band: &Band, options: &GraphOptions) -> LecResult<Self> {
        let members: Vec<usize> = grid
            .land_nodes()
            .filter(|&node| band.contains(grid.elevation(node)))
            .collect();

        if members.is_empty() {
            return Err(LecError::EmptyNiche {
                lo: band.lo,
                hi: band.hi,
            });
        }

        let local: HashMap<usize, u32> = members
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i as u32))
            .collect();

        let mut offsets: Vec<(isize, isize, f64)> = AXIAL_NEIGHBORS.to_vec();
        if options.diagonals {
            offsets.extend_from_slice(&DIAGONAL_NEIGHBORS);
        }

        let dx = grid.dx();
        let mut adjacency = vec![Vec::new(); members.len()];

        for (li, &node) in members.iter().enumerate() {
            let (row, col) = grid.node_position(node);
            let z_here = grid.elevation(node);

            for &(dr, dc, dist) in &offsets {
                let Some((nr, nc)) = grid.neighbor(row, col, dr, dc) else {
                    continue;
                };
                let neighbor = grid.node_index(nr, nc);
                let Some(&lj) = local.get(&neighbor) else {
                    continue;
                };

                let dz = grid.elevation(neighbor) - z_here;
                let weight = edge_cost(dist * dx, dz, options.cost_model);
                adjacency[li].push((lj, weight));
            }
        }

        Ok(Self {
            members,
            local,
            adjacency,
        })
    }

    /// Number of member nodes
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Global node indices of the members, in local-id order
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Local id of a global node, None when outside the niche
    pub fn local_index(&self, node: usize) -> Option<u32> {
        self.local.get(&node).copied()
    }

    /// Global node index for a local id
    pub fn node_at(&self, local: u32) -> usize {
        self.members[local as usize]
    }

    /// Weighted neighbors of a local id
    pub fn neighbors(&self, local: u32) -> &[(u32, f64)] {
        &self.adjacency[local as usize]
    }
}
