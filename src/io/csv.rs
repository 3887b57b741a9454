use crate::core::grid::Grid;
use crate::types::{LecError, LecGrid, LecResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// CSV parsing options
#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Field delimiter; None splits on any run of whitespace
    pub delimiter: Option<char>,
}

/// Reader for flat `X Y Z` grid files (no header)
pub struct GridReader;

impl GridReader {
    /// Read `(x, y, z)` records from a delimited text file.
    ///
    /// Blank lines are skipped; any row that does not parse into three
    /// floats fails with `InvalidFormat`.
    pub fn read_records<P: AsRef<Path>>(
        path: P,
        options: &CsvOptions,
    ) -> LecResult<Vec<(f64, f64, f64)>> {
        log::info!("Reading grid points from: {}", path.as_ref().display());

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields: Vec<&str> = match options.delimiter {
                Some(delim) => trimmed.split(delim).map(str::trim).collect(),
                None => trimmed.split_whitespace().collect(),
            };

            if fields.len() != 3 {
                return Err(LecError::InvalidFormat(format!(
                    "line {}: expected 3 fields (X Y Z), got {}",
                    lineno + 1,
                    fields.len()
                )));
            }

            let parse = |field: &str| -> LecResult<f64> {
                field.parse::<f64>().map_err(|_| {
                    LecError::InvalidFormat(format!(
                        "line {}: cannot parse '{}' as a number",
                        lineno + 1,
                        field
                    ))
                })
            };

            records.push((parse(fields[0])?, parse(fields[1])?, parse(fields[2])?));
        }

        log::debug!("Read {} grid points", records.len());
        Ok(records)
    }
}

/// Writer for per-node LEC output
pub struct LecWriter;

impl LecWriter {
    /// Write one `X Y Z LEC` row per node, in node order.
    ///
    /// Marine and failed nodes emit `NaN` in the LEC column.
    pub fn write_csv<P: AsRef<Path>>(path: P, grid: &Grid, lec: &LecGrid) -> LecResult<()> {
        log::info!("Writing LEC CSV to: {}", path.as_ref().display());

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        for row in 0..grid.ny() {
            for col in 0..grid.nx() {
                writeln!(
                    writer,
                    "{} {} {} {}",
                    grid.x()[col],
                    grid.y()[row],
                    grid.z()[[row, col]],
                    lec[[row, col]]
                )?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
