//! Core LEC processing modules

pub mod aggregate;
pub mod graph;
pub mod grid;
pub mod lec;
pub mod niche;
pub mod pathcost;

// Re-export main types
pub use aggregate::{elevation_profile, ElevationBin, ResultAggregator, RunReport, TaskFailure};
pub use graph::{edge_cost, GraphOptions, NicheGraph};
pub use grid::Grid;
pub use lec::{LecProcessor, LecSummary};
pub use niche::{Band, BandGroup, NicheBinner};
pub use pathcost::PathCostEngine;
