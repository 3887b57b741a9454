use crate::types::{BoundaryMode, ElevationGrid, LecError, LecResult};
use ndarray::Array2;

/// Regular elevation grid with boundary mode and marine mask.
///
/// Nodes are indexed row-major: `node = row * nx + col`. The grid is
/// immutable after construction; every accessor is read-only.
#[derive(Debug, Clone)]
pub struct Grid {
    nx: usize,
    ny: usize,
    dx: f64,
    z: ElevationGrid,
    x: Vec<f64>,
    y: Vec<f64>,
    boundary: BoundaryMode,
    sea_level: f64,
    marine: Vec<bool>,
}

impl Grid {
    /// Build a grid from an in-memory elevation array and cell spacing.
    ///
    /// Coordinates start at the origin: `x[col] = col * dx`, `y[row] = row * dx`.
    pub fn from_elevation(
        z: ElevationGrid,
        dx: f64,
        boundary: BoundaryMode,
        sea_level: f64,
    ) -> LecResult<Self> {
        let (ny, nx) = z.dim();
        if nx == 0 || ny == 0 {
            return Err(LecError::InvalidConfig(
                "elevation grid must not be empty".to_string(),
            ));
        }
        if !(dx > 0.0) {
            return Err(LecError::InvalidConfig(format!(
                "grid spacing must be positive, got {}",
                dx
            )));
        }

        let x = (0..nx).map(|c| c as f64 * dx).collect();
        let y = (0..ny).map(|r| r as f64 * dx).collect();
        Ok(Self::assemble(z, dx, x, y, boundary, sea_level))
    }

    /// Build a grid from flat `(x, y, z)` records on a regular lattice.
    ///
    /// Grid dimensions and spacing are inferred from the unique coordinate
    /// values. Fails with `ShapeMismatch` when the record count does not
    /// cover the lattice, and `InvalidFormat` when the spacing is not
    /// uniform or cells are duplicated.
    pub fn from_records(
        records: &[(f64, f64, f64)],
        boundary: BoundaryMode,
        sea_level: f64,
    ) -> LecResult<Self> {
        if records.is_empty() {
            return Err(LecError::InvalidFormat(
                "no grid points supplied".to_string(),
            ));
        }

        let xs = unique_sorted(records.iter().map(|r| r.0));
        let ys = unique_sorted(records.iter().map(|r| r.1));
        let nx = xs.len();
        let ny = ys.len();

        if nx * ny != records.len() {
            return Err(LecError::ShapeMismatch {
                expected: nx * ny,
                actual: records.len(),
            });
        }

        let dx = uniform_spacing(&xs, &ys)?;
        log::debug!(
            "Inferred lattice: {}x{} nodes, spacing {:.6}",
            nx,
            ny,
            dx
        );

        let x0 = xs[0];
        let y0 = ys[0];
        let tol = dx * 1e-6;
        let mut z = Array2::from_elem((ny, nx), f64::NAN);
        let mut filled = vec![false; nx * ny];

        for &(px, py, pz) in records {
            let col = ((px - x0) / dx).round() as usize;
            let row = ((py - y0) / dx).round() as usize;
            if col >= nx || row >= ny {
                return Err(LecError::InvalidFormat(format!(
                    "point ({}, {}) falls outside the inferred lattice",
                    px, py
                )));
            }
            if (px - (x0 + col as f64 * dx)).abs() > tol
                || (py - (y0 + row as f64 * dx)).abs() > tol
            {
                return Err(LecError::InvalidFormat(format!(
                    "point ({}, {}) is off-lattice",
                    px, py
                )));
            }
            if filled[row * nx + col] {
                return Err(LecError::InvalidFormat(format!(
                    "duplicate grid point at ({}, {})",
                    px, py
                )));
            }
            filled[row * nx + col] = true;
            z[[row, col]] = pz;
        }

        Ok(Self::assemble(z, dx, xs, ys, boundary, sea_level))
    }

    fn assemble(
        z: ElevationGrid,
        dx: f64,
        x: Vec<f64>,
        y: Vec<f64>,
        boundary: BoundaryMode,
        sea_level: f64,
    ) -> Self {
        let (ny, nx) = z.dim();
        let marine = z.iter().map(|&v| v < sea_level).collect();
        Self {
            nx,
            ny,
            dx,
            z,
            x,
            y,
            boundary,
            sea_level,
            marine,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Total node count, marine nodes included
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn z(&self) -> &ElevationGrid {
        &self.z
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }

    /// Elevation at a flat node index
    pub fn elevation(&self, node: usize) -> f64 {
        let (row, col) = self.node_position(node);
        self.z[[row, col]]
    }

    /// Flat node index for a (row, col) position
    pub fn node_index(&self, row: usize, col: usize) -> usize {
        row * self.nx + col
    }

    /// (row, col) position for a flat node index
    pub fn node_position(&self, node: usize) -> (usize, usize) {
        (node / self.nx, node % self.nx)
    }

    /// True when the node lies below sea level
    pub fn is_marine(&self, node: usize) -> bool {
        self.marine[node]
    }

    /// Marine mask over all nodes, in node order
    pub fn marine_mask(&self) -> &[bool] {
        &self.marine
    }

    /// Flat indices of all non-marine nodes, in node order
    pub fn land_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.marine
            .iter()
            .enumerate()
            .filter(|(_, &m)| !m)
            .map(|(i, _)| i)
    }

    /// Elevation range over non-marine nodes, None when fully marine
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for node in self.land_nodes() {
            let z = self.elevation(node);
            range = Some(match range {
                Some((lo, hi)) => (lo.min(z), hi.max(z)),
                None => (z, z),
            });
        }
        range
    }

    /// Neighbor position after applying the boundary mode.
    ///
    /// `dr`/`dc` are single-cell offsets (-1, 0, 1). Returns None when the
    /// move leaves the grid (`none` mode) or reflects onto the origin cell
    /// (`symmetric` mode).
    pub fn neighbor(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
    ) -> Option<(usize, usize)> {
        let nr = row as isize + dr;
        let nc = col as isize + dc;

        let (nr, nc) = match self.boundary {
            BoundaryMode::None => {
                if nr < 0 || nc < 0 || nr >= self.ny as isize || nc >= self.nx as isize {
                    return None;
                }
                (nr as usize, nc as usize)
            }
            BoundaryMode::Periodic => (
                nr.rem_euclid(self.ny as isize) as usize,
                nc.rem_euclid(self.nx as isize) as usize,
            ),
            BoundaryMode::Symmetric => (
                reflect(nr, self.ny) as usize,
                reflect(nc, self.nx) as usize,
            ),
        };

        if nr == row && nc == col {
            return None;
        }
        Some((nr, nc))
    }
}

/// Reflect an index back into `[0, len)` across the nearest border
fn reflect(i: isize, len: usize) -> isize {
    if i < 0 {
        -i - 1
    } else if i >= len as isize {
        2 * len as isize - i - 1
    } else {
        i
    }
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let span = sorted.last().copied().unwrap_or(0.0) - sorted.first().copied().unwrap_or(0.0);
    let eps = span.abs() * 1e-9 + 1e-12;
    let mut unique: Vec<f64> = Vec::new();
    for v in sorted {
        match unique.last() {
            Some(&last) if (v - last).abs() <= eps => {}
            _ => unique.push(v),
        }
    }
    unique
}

fn uniform_spacing(xs: &[f64], ys: &[f64]) -> LecResult<f64> {
    let axis_spacing = |coords: &[f64]| -> LecResult<Option<f64>> {
        if coords.len() < 2 {
            return Ok(None);
        }
        let step = coords[1] - coords[0];
        let tol = step.abs() * 1e-6;
        for pair in coords.windows(2) {
            if ((pair[1] - pair[0]) - step).abs() > tol {
                return Err(LecError::InvalidFormat(
                    "grid spacing is not uniform".to_string(),
                ));
            }
        }
        Ok(Some(step))
    };

    let sx = axis_spacing(xs)?;
    let sy = axis_spacing(ys)?;

    match (sx, sy) {
        (Some(dx), Some(dy)) => {
            if (dx - dy).abs() > dx.abs() * 1e-6 {
                return Err(LecError::InvalidFormat(format!(
                    "grid cells must be square, got dx={} dy={}",
                    dx, dy
                )));
            }
            Ok(dx)
        }
        (Some(dx), None) => Ok(dx),
        (None, Some(dy)) => Ok(dy),
        (None, None) => Err(LecError::InvalidFormat(
            "cannot infer spacing from a single grid point".to_string(),
        )),
    }
}
