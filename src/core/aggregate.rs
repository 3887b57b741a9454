use crate::core::grid::Grid;
use crate::types::{LecError, LecGrid, LecResult};
use ndarray::Array2;
use serde::Serialize;

/// One worker-computed closeness value
#[derive(Debug, Clone, Copy)]
pub struct PartialResult {
    pub node: usize,
    pub closeness: f64,
    /// The node's band held no other member; closeness was forced to 0
    pub empty_niche: bool,
}

/// An isolated task failure: the affected output slots keep the NaN
/// sentinel and sibling tasks are unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct TaskFailure {
    pub nodes: Vec<usize>,
    pub message: String,
}

/// End-of-run accounting of recoverable conditions
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Nodes with a successfully computed closeness
    pub computed: usize,
    /// Nodes whose niche contained no other member (closeness 0)
    pub empty_niches: Vec<usize>,
    /// Task-level failures, each covering one band group
    pub failures: Vec<TaskFailure>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.empty_niches.is_empty() && self.failures.is_empty()
    }

    pub fn failed_nodes(&self) -> usize {
        self.failures.iter().map(|f| f.nodes.len()).sum()
    }

    /// Aggregate warning lines, emitted once at the end of a run
    pub fn log_summary(&self) {
        if !self.empty_niches.is_empty() {
            log::warn!(
                "{} node(s) had an empty niche and scored closeness 0: {:?}",
                self.empty_niches.len(),
                self.empty_niches
            );
        }
        for failure in &self.failures {
            log::warn!(
                "Task covering {} node(s) failed: {} (affected nodes: {:?})",
                failure.nodes.len(),
                failure.message,
                failure.nodes
            );
        }
    }
}

/// Merges disjoint per-worker partial results into the final LEC grid.
///
/// Every node's output slot is written at most once, so the merge needs no
/// locking and is deterministic regardless of worker count or completion
/// order. Marine and failed slots keep the NaN sentinel.
#[derive(Debug)]
pub struct ResultAggregator {
    values: LecGrid,
    report: RunReport,
}

impl ResultAggregator {
    pub fn new(grid: &Grid) -> Self {
        Self {
            values: Array2::from_elem((grid.ny(), grid.nx()), f64::NAN),
            report: RunReport::default(),
        }
    }

    /// Merge one worker's partial results
    pub fn absorb(&mut self, grid: &Grid, partials: Vec<PartialResult>) {
        for partial in partials {
            let (row, col) = grid.node_position(partial.node);
            self.values[[row, col]] = partial.closeness;
            self.report.computed += 1;
            if partial.empty_niche {
                self.report.empty_niches.push(partial.node);
            }
        }
    }

    /// Record an isolated task failure
    pub fn record_failure(&mut self, nodes: Vec<usize>, message: String) {
        self.report.failures.push(TaskFailure { nodes, message });
    }

    pub fn finish(mut self) -> (LecGrid, RunReport) {
        self.report.empty_niches.sort_unstable();
        (self.values, self.report)
    }
}

/// One row of the elevation-vs-LEC summary
#[derive(Debug, Clone, Serialize)]
pub struct ElevationBin {
    pub lo: f64,
    pub hi: f64,
    /// Mean LEC over valid nodes in the bin, NaN when the bin is empty
    pub mean_lec: f64,
    /// Non-marine node count in the bin
    pub count: usize,
}

/// Binned frequency of elevation vs. LEC and vs. node count.
///
/// Marine nodes are skipped; nodes whose LEC slot carries the NaN sentinel
/// count toward `count` but not toward the mean.
pub fn elevation_profile(grid: &Grid, lec: &LecGrid, nbins: usize) -> LecResult<Vec<ElevationBin>> {
    if nbins == 0 {
        return Err(LecError::InvalidConfig(
            "profile bin count must be at least 1".to_string(),
        ));
    }

    let Some((z_min, z_max)) = grid.elevation_range() else {
        return Ok(Vec::new());
    };

    let span = (z_max - z_min).max(f64::EPSILON);
    let width = span / nbins as f64;

    let mut counts = vec![0usize; nbins];
    let mut sums = vec![0.0f64; nbins];
    let mut valid = vec![0usize; nbins];

    for node in grid.land_nodes() {
        let z = grid.elevation(node);
        let bin = (((z - z_min) / width) as usize).min(nbins - 1);
        counts[bin] += 1;

        let (row, col) = grid.node_position(node);
        let value = lec[[row, col]];
        if value.is_finite() {
            sums[bin] += value;
            valid[bin] += 1;
        }
    }

    Ok((0..nbins)
        .map(|bin| ElevationBin {
            lo: z_min + bin as f64 * width,
            hi: z_min + (bin + 1) as f64 * width,
            mean_lec: if valid[bin] > 0 {
                sums[bin] / valid[bin] as f64
            } else {
                f64::NAN
            },
            count: counts[bin],
        })
        .collect())
}
