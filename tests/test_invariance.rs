use approx::assert_relative_eq;
use landlec::core::{Grid, LecProcessor};
use landlec::types::{LecConfig, LecError, NicheWidth, DEFAULT_SEA_LEVEL};
use ndarray::arr2;

fn rolling_terrain() -> ndarray::Array2<f64> {
    arr2(&[
        [12.0, 35.0, 80.0, 44.0],
        [18.0, 42.0, 95.0, 51.0],
        [25.0, 55.0, 120.0, 63.0],
        [30.0, 61.0, 140.0, 70.0],
    ])
}

fn compute(z: ndarray::Array2<f64>, config: LecConfig) -> ndarray::Array2<f64> {
    let grid = Grid::from_elevation(z, 1.0, config.boundary, config.sea_level).unwrap();
    let mut proc = LecProcessor::new(grid, config).unwrap();
    proc.compute().unwrap();
    proc.lec().unwrap().clone()
}

/// Only elevation differences and spatial distances drive weights, so a
/// global additive shift must not change any LEC value.
#[test]
fn test_global_elevation_shift_is_invariant() {
    let base = compute(rolling_terrain(), LecConfig::default());
    let shifted = compute(rolling_terrain() + 1000.0, LecConfig::default());

    for (a, b) in base.iter().zip(shifted.iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_conflicting_boundary_modes_never_compute() {
    let result = LecConfig::from_options(true, true, 0.1, None, true, DEFAULT_SEA_LEVEL, None);
    assert!(matches!(result, Err(LecError::InvalidConfig(_))));
}

#[test]
fn test_marine_nodes_are_fully_excluded() {
    // A marine channel splits the plain: land nodes on either side share a
    // niche but have no path across, so both score 0 without any warning.
    let z = arr2(&[[10.0, -50.0, 10.0]]);
    let config = LecConfig {
        sea_level: 0.0,
        niche_width: NicheWidth::Fixed(100.0),
        ..LecConfig::default()
    };
    let grid = Grid::from_elevation(z, 1.0, config.boundary, config.sea_level).unwrap();
    let mut proc = LecProcessor::new(grid, config).unwrap();
    proc.compute().unwrap();

    let lec = proc.lec().unwrap();
    assert!(lec[[0, 1]].is_nan(), "marine node must keep the sentinel");
    assert_eq!(lec[[0, 0]], 0.0);
    assert_eq!(lec[[0, 2]], 0.0);

    let report = proc.report().unwrap();
    assert_eq!(report.computed, 2);
    assert!(report.empty_niches.is_empty());
}

/// Periodic wraparound shortens paths for border nodes, so a flat strip
/// scores uniformly under `periodic` but not under `none`.
#[test]
fn test_periodic_boundary_equalizes_flat_strip() {
    let z = ndarray::Array2::from_elem((1, 8), 50.0);

    let periodic = LecConfig::from_options(true, false, 0.5, None, false, DEFAULT_SEA_LEVEL, None)
        .unwrap();
    let wrapped = compute(z.clone(), periodic);
    for value in wrapped.iter() {
        assert_relative_eq!(*value, wrapped[[0, 0]], epsilon = 1e-12);
    }

    let open = LecConfig::from_options(false, false, 0.5, None, false, DEFAULT_SEA_LEVEL, None)
        .unwrap();
    let clamped = compute(z, open);
    assert!(
        clamped[[0, 3]] > clamped[[0, 0]],
        "open-ended strip should favor central nodes"
    );
}

/// Symmetric reflection only adds edges between distinct border cells, so
/// it must never produce a self-loop that inflates closeness.
#[test]
fn test_symmetric_boundary_is_finite_and_clean() {
    let symmetric =
        LecConfig::from_options(false, true, 0.5, None, true, DEFAULT_SEA_LEVEL, None).unwrap();
    let lec = compute(rolling_terrain(), symmetric);
    assert!(lec.iter().all(|v| v.is_finite()));
}
