use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Elevation or cost value
pub type LecReal = f64;

/// 2D elevation grid (row x column, row-major)
pub type ElevationGrid = Array2<LecReal>;

/// 2D LEC output grid, aligned with the elevation grid
pub type LecGrid = Array2<LecReal>;

/// Sentinel sea level that keeps the marine mask disabled
pub const DEFAULT_SEA_LEVEL: f64 = -1.0e8;

/// Default niche width as a fraction of the elevation range
pub const DEFAULT_SIGMAP: f64 = 0.1;

/// Adjacency policy at the grid borders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// No wraparound; border nodes have fewer neighbors
    None,
    /// Opposite edges wrap (column 0 is adjacent to column nx-1)
    Periodic,
    /// Out-of-range neighbors reflect back across the border
    Symmetric,
}

impl Default for BoundaryMode {
    fn default() -> Self {
        BoundaryMode::None
    }
}

impl std::fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryMode::None => write!(f, "none"),
            BoundaryMode::Periodic => write!(f, "periodic"),
            BoundaryMode::Symmetric => write!(f, "symmetric"),
        }
    }
}

/// Niche band width, resolved once when the binner is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NicheWidth {
    /// Fixed half-width in elevation units (sigmav)
    Fixed(f64),
    /// Fraction of the non-marine elevation range (sigmap)
    Percent(f64),
}

impl Default for NicheWidth {
    fn default() -> Self {
        NicheWidth::Percent(DEFAULT_SIGMAP)
    }
}

/// Edge cost model for spreading between adjacent nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostModel {
    /// Euclidean length along the terrain surface: sqrt(step^2 + dz^2)
    Surface,
    /// Planar step scaled by a squared-slope penalty: step * (1 + (dz/step)^2)
    SlopePenalty,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Surface
    }
}

/// Per-node closeness aggregation over within-niche path distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosenessPolicy {
    /// Reciprocal of the mean distance to reachable niche members
    ReciprocalMean,
    /// Reciprocal of the summed distance to reachable niche members
    ReciprocalSum,
    /// Mean of reciprocal distances (harmonic closeness)
    Harmonic,
}

impl Default for ClosenessPolicy {
    fn default() -> Self {
        ClosenessPolicy::ReciprocalMean
    }
}

/// Complete LEC run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecConfig {
    /// Boundary adjacency mode
    pub boundary: BoundaryMode,
    /// Niche band width policy
    pub niche_width: NicheWidth,
    /// Include diagonal (8-connectivity) moves
    pub diagonals: bool,
    /// Nodes below this elevation are excluded from all computations
    pub sea_level: f64,
    /// Edge cost model
    pub cost_model: CostModel,
    /// Closeness aggregation policy
    pub closeness: ClosenessPolicy,
    /// Worker threads for the parallel path engine (None = rayon default)
    pub workers: Option<usize>,
}

impl Default for LecConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryMode::None,
            niche_width: NicheWidth::default(),
            diagonals: true,
            sea_level: DEFAULT_SEA_LEVEL,
            cost_model: CostModel::default(),
            closeness: ClosenessPolicy::default(),
            workers: None,
        }
    }
}

impl LecConfig {
    /// Build a configuration from the flat option surface.
    ///
    /// `periodic` and `symmetric` are mutually exclusive; `sigmav` takes
    /// precedence over `sigmap` when both are given.
    pub fn from_options(
        periodic: bool,
        symmetric: bool,
        sigmap: f64,
        sigmav: Option<f64>,
        diagonals: bool,
        sea_level: f64,
        workers: Option<usize>,
    ) -> LecResult<Self> {
        if periodic && symmetric {
            return Err(LecError::InvalidConfig(
                "periodic and symmetric boundary modes are mutually exclusive".to_string(),
            ));
        }

        let boundary = if periodic {
            BoundaryMode::Periodic
        } else if symmetric {
            BoundaryMode::Symmetric
        } else {
            BoundaryMode::None
        };

        let niche_width = match sigmav {
            Some(v) => NicheWidth::Fixed(v),
            None => NicheWidth::Percent(sigmap),
        };

        let config = Self {
            boundary,
            niche_width,
            diagonals,
            sea_level,
            workers,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check option values that are invalid regardless of the grid.
    pub fn validate(&self) -> LecResult<()> {
        match self.niche_width {
            NicheWidth::Fixed(v) if v <= 0.0 => {
                return Err(LecError::InvalidConfig(format!(
                    "niche width sigmav must be positive, got {}",
                    v
                )));
            }
            NicheWidth::Percent(p) if p <= 0.0 => {
                return Err(LecError::InvalidConfig(format!(
                    "niche width sigmap must be positive, got {}",
                    p
                )));
            }
            _ => {}
        }

        if let Some(0) = self.workers {
            return Err(LecError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Error types for LEC processing
#[derive(Debug, thiserror::Error)]
pub enum LecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Shape mismatch: expected {expected} grid points, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Elevation band [{lo:.3}, {hi:.3}] contains no grid nodes")]
    EmptyNiche { lo: f64, hi: f64 },

    #[error("LEC values requested before compute() ran")]
    NotComputed,

    #[error("Processing error: {0}")]
    Processing(String),
}

/// Result type for LEC operations
pub type LecResult<T> = Result<T, LecError>;
