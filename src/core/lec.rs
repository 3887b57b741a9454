use crate::core::aggregate::{
    elevation_profile, ElevationBin, PartialResult, ResultAggregator, RunReport,
};
use crate::core::graph::{GraphOptions, NicheGraph};
use crate::core::grid::Grid;
use crate::core::niche::{BandGroup, NicheBinner};
use crate::core::pathcost::PathCostEngine;
use crate::types::{LecConfig, LecError, LecGrid, LecResult};
use serde::Serialize;
use std::time::Instant;

/// Whole-run LEC summary over land nodes
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LecSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub computed: usize,
}

/// Top-level LEC session: owns the grid, drives niche binning, graph
/// construction and path search, and holds the final LEC array.
///
/// The `(band group, source node)` task set is partitioned across rayon
/// workers; each task returns a partial result that the coordinator merges
/// into the output array. Slot ownership is exclusive per node, so the
/// merge is a disjoint-key union.
pub struct LecProcessor {
    grid: Grid,
    config: LecConfig,
    output: Option<(LecGrid, RunReport)>,
}

impl LecProcessor {
    /// Create a processor for a pre-built grid.
    ///
    /// The grid's own boundary mode and sea level are authoritative; build
    /// the grid from the same configuration used here.
    pub fn new(grid: Grid, config: LecConfig) -> LecResult<Self> {
        config.validate()?;
        Ok(Self {
            grid,
            config,
            output: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LecConfig {
        &self.config
    }

    /// Run the full LEC computation.
    pub fn compute(&mut self) -> LecResult<()> {
        let start = Instant::now();
        let binner = NicheBinner::new(self.config.niche_width, &self.grid)?;
        let groups = binner.band_groups(&self.grid);
        let task_count: usize = groups.iter().map(|g| g.nodes.len()).sum();

        log::info!(
            "Computing LEC: {} source nodes across {} band groups ({} boundary, diagonals={})",
            task_count,
            groups.len(),
            self.grid.boundary(),
            self.config.diagonals
        );

        let aggregator = self.solve(&groups)?;
        let (values, report) = aggregator.finish();
        report.log_summary();

        log::info!(
            "LEC computation finished in {:.2}s: {} computed, {} empty niches, {} failed",
            start.elapsed().as_secs_f64(),
            report.computed,
            report.empty_niches.len(),
            report.failed_nodes()
        );

        self.output = Some((values, report));
        Ok(())
    }

    /// Final LEC array; fails until `compute()` has run
    pub fn lec(&self) -> LecResult<&LecGrid> {
        self.output
            .as_ref()
            .map(|(values, _)| values)
            .ok_or(LecError::NotComputed)
    }

    /// End-of-run report; fails until `compute()` has run
    pub fn report(&self) -> LecResult<&RunReport> {
        self.output
            .as_ref()
            .map(|(_, report)| report)
            .ok_or(LecError::NotComputed)
    }

    /// Binned elevation vs. LEC statistics for presentation consumers
    pub fn elevation_profile(&self, nbins: usize) -> LecResult<Vec<ElevationBin>> {
        elevation_profile(&self.grid, self.lec()?, nbins)
    }

    /// Min/max/mean LEC over nodes with a computed value
    pub fn summary(&self) -> LecResult<LecSummary> {
        let lec = self.lec()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut computed = 0usize;

        for &value in lec.iter() {
            if value.is_finite() {
                min = min.min(value);
                max = max.max(value);
                sum += value;
                computed += 1;
            }
        }

        if computed == 0 {
            return Err(LecError::Processing(
                "no LEC values were computed".to_string(),
            ));
        }

        Ok(LecSummary {
            min,
            max,
            mean: sum / computed as f64,
            computed,
        })
    }

    fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            diagonals: self.config.diagonals,
            cost_model: self.config.cost_model,
        }
    }

    #[cfg(feature = "parallel")]
    fn solve(&self, groups: &[BandGroup]) -> LecResult<ResultAggregator> {
        match self.config.workers {
            Some(workers) => {
                log::debug!("Using a dedicated pool of {} worker threads", workers);
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| {
                        LecError::Processing(format!("failed to build worker pool: {}", e))
                    })?;
                pool.install(|| self.solve_parallel(groups))
            }
            None => self.solve_parallel(groups),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn solve(&self, groups: &[BandGroup]) -> LecResult<ResultAggregator> {
        self.solve_sequential(groups)
    }

    /// Partition-and-distribute: build each band group's graph once, then
    /// fan the `(group, source)` tasks out across the pool.
    #[cfg(feature = "parallel")]
    fn solve_parallel(&self, groups: &[BandGroup]) -> LecResult<ResultAggregator> {
        use rayon::prelude::*;

        let options = self.graph_options();
        let engine = PathCostEngine::new(self.config.closeness);
        let mut aggregator = ResultAggregator::new(&self.grid);

        let graphs: Vec<LecResult<NicheGraph>> = groups
            .par_iter()
            .map(|group| NicheGraph::build(&self.grid, &group.band, &options))
            .collect();

        let mut tasks: Vec<(usize, usize)> = Vec::new();
        for (gi, (group, graph)) in groups.iter().zip(&graphs).enumerate() {
            match graph {
                Ok(_) => tasks.extend(group.nodes.iter().map(|&node| (gi, node))),
                Err(LecError::EmptyNiche { .. }) => {
                    // An empty band cannot hold its own owners; report the
                    // owners as empty-niche nodes and keep going.
                    aggregator.absorb(
                        &self.grid,
                        group
                            .nodes
                            .iter()
                            .map(|&node| PartialResult {
                                node,
                                closeness: 0.0,
                                empty_niche: true,
                            })
                            .collect(),
                    );
                }
                Err(e) => {
                    aggregator.record_failure(group.nodes.clone(), e.to_string());
                }
            }
        }

        let partials: Vec<LecResult<PartialResult>> = tasks
            .par_iter()
            .map(|&(gi, node)| {
                let graph = graphs[gi]
                    .as_ref()
                    .map_err(|e| LecError::Processing(e.to_string()))?;
                solve_source(graph, &engine, node)
            })
            .collect();

        for (result, &(_, node)) in partials.into_iter().zip(&tasks) {
            match result {
                Ok(partial) => aggregator.absorb(&self.grid, vec![partial]),
                Err(e) => aggregator.record_failure(vec![node], e.to_string()),
            }
        }

        Ok(aggregator)
    }

    #[allow(dead_code)]
    fn solve_sequential(&self, groups: &[BandGroup]) -> LecResult<ResultAggregator> {
        let options = self.graph_options();
        let engine = PathCostEngine::new(self.config.closeness);
        let mut aggregator = ResultAggregator::new(&self.grid);

        for group in groups {
            let graph = match NicheGraph::build(&self.grid, &group.band, &options) {
                Ok(graph) => graph,
                Err(LecError::EmptyNiche { .. }) => {
                    aggregator.absorb(
                        &self.grid,
                        group
                            .nodes
                            .iter()
                            .map(|&node| PartialResult {
                                node,
                                closeness: 0.0,
                                empty_niche: true,
                            })
                            .collect(),
                    );
                    continue;
                }
                Err(e) => {
                    aggregator.record_failure(group.nodes.clone(), e.to_string());
                    continue;
                }
            };

            for &node in &group.nodes {
                match solve_source(&graph, &engine, node) {
                    Ok(partial) => aggregator.absorb(&self.grid, vec![partial]),
                    Err(e) => aggregator.record_failure(vec![node], e.to_string()),
                }
            }
        }

        Ok(aggregator)
    }
}

/// Closeness for one source node over its (already built) niche graph
fn solve_source(
    graph: &NicheGraph,
    engine: &PathCostEngine,
    node: usize,
) -> LecResult<PartialResult> {
    let source = graph.local_index(node).ok_or_else(|| {
        LecError::Processing(format!("node {} missing from its own niche graph", node))
    })?;

    if graph.len() <= 1 {
        return Ok(PartialResult {
            node,
            closeness: 0.0,
            empty_niche: true,
        });
    }

    Ok(PartialResult {
        node,
        closeness: engine.closeness(graph, source),
        empty_niche: false,
    })
}
