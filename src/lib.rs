//! LandLEC: A Fast, Parallel Landscape Elevational Connectivity Processor
//!
//! This library computes the landscape elevational connectivity (LEC) metric
//! over regular elevation grids: for every node it measures closeness to the
//! other sites of similar elevation, aggregated over shortest-path distances
//! within the node's elevation niche.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    BoundaryMode, ClosenessPolicy, CostModel, ElevationGrid, LecConfig, LecError, LecGrid,
    LecResult, NicheWidth, DEFAULT_SEA_LEVEL, DEFAULT_SIGMAP,
};

pub use self::core::{Grid, LecProcessor, LecSummary, NicheBinner, RunReport};

pub use self::io::{CsvOptions, GridReader, LecWriter, VtkReader, VtkWriter};
