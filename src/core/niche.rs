use crate::core::grid::Grid;
use crate::types::{LecError, LecResult, NicheWidth};
use std::collections::HashMap;

/// Closed elevation band `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub fn contains(&self, z: f64) -> bool {
        z >= self.lo && z <= self.hi
    }

    /// Bit-exact key for grouping nodes that share a band
    fn key(&self) -> (u64, u64) {
        (self.lo.to_bits(), self.hi.to_bits())
    }
}

/// Nodes sharing one elevation band; the band's graph is built once and
/// reused for every owner.
#[derive(Debug, Clone)]
pub struct BandGroup {
    pub band: Band,
    pub nodes: Vec<usize>,
}

/// Partitions the elevation range into one overlapping band per node.
///
/// The width variant is resolved to a concrete half-width once, at
/// construction; banding is deterministic given the grid and width.
#[derive(Debug, Clone)]
pub struct NicheBinner {
    half_width: f64,
}

impl NicheBinner {
    pub fn new(width: NicheWidth, grid: &Grid) -> LecResult<Self> {
        let (z_min, z_max) = grid.elevation_range().ok_or_else(|| {
            LecError::InvalidConfig("grid has no nodes above sea level".to_string())
        })?;

        let half_width = match width {
            NicheWidth::Fixed(sigmav) => sigmav,
            NicheWidth::Percent(sigmap) => sigmap * (z_max - z_min),
        };

        log::debug!(
            "Niche half-width resolved to {:.6} (elevation range [{:.3}, {:.3}])",
            half_width,
            z_min,
            z_max
        );

        Ok(Self { half_width })
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Band centered on one node's elevation
    pub fn band(&self, elevation: f64) -> Band {
        Band {
            lo: elevation - self.half_width,
            hi: elevation + self.half_width,
        }
    }

    /// Lazy `(node, band)` sequence over non-marine nodes, in node order
    pub fn bands<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = (usize, Band)> + 'a {
        grid.land_nodes()
            .map(move |node| (node, self.band(grid.elevation(node))))
    }

    /// Nodes grouped by identical band, in first-seen node order.
    ///
    /// Flat regions collapse into a single group, so a uniform grid builds
    /// exactly one graph.
    pub fn band_groups(&self, grid: &Grid) -> Vec<BandGroup> {
        let mut groups: Vec<BandGroup> = Vec::new();
        let mut index: HashMap<(u64, u64), usize> = HashMap::new();

        for (node, band) in self.bands(grid) {
            match index.get(&band.key()) {
                Some(&i) => groups[i].nodes.push(node),
                None => {
                    index.insert(band.key(), groups.len());
                    groups.push(BandGroup {
                        band,
                        nodes: vec![node],
                    });
                }
            }
        }

        log::debug!(
            "{} land nodes partitioned into {} band groups",
            groups.iter().map(|g| g.nodes.len()).sum::<usize>(),
            groups.len()
        );
        groups
    }
}
