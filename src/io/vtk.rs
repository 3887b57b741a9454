use crate::core::grid::Grid;
use crate::types::{LecError, LecGrid, LecResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Writer for legacy ASCII VTK structured grids.
///
/// Points carry the elevation as their Z coordinate; the LEC value is
/// attached as a scalar point-data field, in node order.
pub struct VtkWriter;

impl VtkWriter {
    pub fn write_structured_grid<P: AsRef<Path>>(
        path: P,
        grid: &Grid,
        lec: &LecGrid,
    ) -> LecResult<()> {
        log::info!(
            "Writing VTK structured grid to: {}",
            path.as_ref().display()
        );

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        let npoints = grid.len();

        writeln!(writer, "# vtk DataFile Version 3.0")?;
        writeln!(writer, "Landscape elevational connectivity")?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET STRUCTURED_GRID")?;
        writeln!(writer, "DIMENSIONS {} {} 1", grid.nx(), grid.ny())?;
        writeln!(writer, "POINTS {} double", npoints)?;

        for row in 0..grid.ny() {
            for col in 0..grid.nx() {
                writeln!(
                    writer,
                    "{} {} {}",
                    grid.x()[col],
                    grid.y()[row],
                    grid.z()[[row, col]]
                )?;
            }
        }

        writeln!(writer, "POINT_DATA {}", npoints)?;
        writeln!(writer, "SCALARS LEC double 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for row in 0..grid.ny() {
            for col in 0..grid.nx() {
                writeln!(writer, "{}", lec[[row, col]])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

/// Minimal reader for files produced by [`VtkWriter`]
pub struct VtkReader;

impl VtkReader {
    /// Read the LEC scalar field back, in node order.
    ///
    /// Returns `(nx, ny, values)`. Only the structured-grid layout written
    /// by this crate is understood.
    pub fn read_lec<P: AsRef<Path>>(path: P) -> LecResult<(usize, usize, Vec<f64>)> {
        log::info!(
            "Reading VTK structured grid from: {}",
            path.as_ref().display()
        );

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let mut nx = 0usize;
        let mut ny = 0usize;
        let mut npoints = 0usize;

        while let Some(line) = lines.next() {
            let line = line?;
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("DIMENSIONS") => {
                    nx = parse_field(fields.next(), "DIMENSIONS nx")?;
                    ny = parse_field(fields.next(), "DIMENSIONS ny")?;
                }
                Some("POINT_DATA") => {
                    npoints = parse_field(fields.next(), "POINT_DATA count")?;
                    break;
                }
                _ => {}
            }
        }

        if nx == 0 || ny == 0 {
            return Err(LecError::InvalidFormat(
                "VTK file has no DIMENSIONS header".to_string(),
            ));
        }
        if npoints != nx * ny {
            return Err(LecError::ShapeMismatch {
                expected: nx * ny,
                actual: npoints,
            });
        }

        // Skip the SCALARS and LOOKUP_TABLE declarations
        for _ in 0..2 {
            lines.next().transpose()?;
        }

        let mut values = Vec::with_capacity(npoints);
        for line in lines {
            let line = line?;
            for field in line.split_whitespace() {
                let value = field.parse::<f64>().map_err(|_| {
                    LecError::InvalidFormat(format!("cannot parse '{}' as a scalar", field))
                })?;
                values.push(value);
            }
        }

        if values.len() != npoints {
            return Err(LecError::ShapeMismatch {
                expected: npoints,
                actual: values.len(),
            });
        }

        Ok((nx, ny, values))
    }
}

fn parse_field(field: Option<&str>, what: &str) -> LecResult<usize> {
    field
        .and_then(|f| f.parse::<usize>().ok())
        .ok_or_else(|| LecError::InvalidFormat(format!("malformed VTK header: {}", what)))
}
