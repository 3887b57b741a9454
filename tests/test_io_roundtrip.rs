use approx::assert_relative_eq;
use landlec::core::{Grid, LecProcessor};
use landlec::io::{CsvOptions, GridReader, LecWriter, VtkReader, VtkWriter};
use landlec::types::{LecConfig, LecError, NicheWidth};
use std::io::Write;

fn wide_niche_config() -> LecConfig {
    LecConfig {
        niche_width: NicheWidth::Percent(0.5),
        ..LecConfig::default()
    }
}

fn write_grid_csv(dir: &std::path::Path, delimiter: &str) -> std::path::PathBuf {
    let path = dir.join("dem.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    for row in 0..3 {
        for col in 0..3 {
            writeln!(
                file,
                "{}{}{}{}{}",
                col as f64 * 50.0,
                delimiter,
                row as f64 * 50.0,
                delimiter,
                (row * 3 + col) as f64 * 10.0
            )
            .unwrap();
        }
    }
    path
}

#[test]
fn test_csv_to_vtk_pipeline_round_trips() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();

    let input = write_grid_csv(dir.path(), " ");
    let records = GridReader::read_records(&input, &CsvOptions::default()).unwrap();
    assert_eq!(records.len(), 9);

    let config = wide_niche_config();
    let grid = Grid::from_records(&records, config.boundary, config.sea_level).unwrap();
    assert_eq!((grid.nx(), grid.ny()), (3, 3));
    assert_relative_eq!(grid.dx(), 50.0, epsilon = 1e-12);

    let mut proc = LecProcessor::new(grid, config).unwrap();
    proc.compute().unwrap();
    let lec = proc.lec().unwrap().clone();

    let vtk_path = dir.path().join("lec.vtk");
    VtkWriter::write_structured_grid(&vtk_path, proc.grid(), &lec).unwrap();

    let (nx, ny, values) = VtkReader::read_lec(&vtk_path).unwrap();
    assert_eq!((nx, ny), (3, 3));
    for (i, &value) in values.iter().enumerate() {
        let expected = lec[[i / 3, i % 3]];
        if expected.is_nan() {
            assert!(value.is_nan());
        } else {
            assert_relative_eq!(value, expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_comma_delimited_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_grid_csv(dir.path(), ",");

    let options = CsvOptions {
        delimiter: Some(','),
    };
    let records = GridReader::read_records(&input, &options).unwrap();
    let config = LecConfig::default();
    let grid = Grid::from_records(&records, config.boundary, config.sea_level).unwrap();
    assert_eq!((grid.nx(), grid.ny()), (3, 3));
}

#[test]
fn test_truncated_grid_is_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    // 3x3 lattice coordinates with one row missing
    for (x, y, z) in [
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 2.0),
        (2.0, 0.0, 3.0),
        (0.0, 1.0, 4.0),
        (1.0, 1.0, 5.0),
        (2.0, 1.0, 6.0),
        (0.0, 2.0, 7.0),
        (1.0, 2.0, 8.0),
    ] {
        writeln!(file, "{} {} {}", x, y, z).unwrap();
    }

    let records = GridReader::read_records(&path, &CsvOptions::default()).unwrap();
    let result = Grid::from_records(&records, Default::default(), -1.0);
    assert!(matches!(
        result,
        Err(LecError::ShapeMismatch {
            expected: 9,
            actual: 8
        })
    ));
}

#[test]
fn test_lec_csv_output_covers_every_node() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_grid_csv(dir.path(), " ");

    let records = GridReader::read_records(&input, &CsvOptions::default()).unwrap();
    let config = wide_niche_config();
    let grid = Grid::from_records(&records, config.boundary, config.sea_level).unwrap();
    let mut proc = LecProcessor::new(grid, config).unwrap();
    proc.compute().unwrap();

    let out = dir.path().join("lec.csv");
    LecWriter::write_csv(&out, proc.grid(), proc.lec().unwrap()).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 9);
    let first: Vec<&str> = content.lines().next().unwrap().split(' ').collect();
    assert_eq!(first.len(), 4);
}
