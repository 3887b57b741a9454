//! I/O modules for reading elevation grids and writing LEC products

pub mod csv;
pub mod vtk;

pub use csv::{CsvOptions, GridReader, LecWriter};
pub use vtk::{VtkReader, VtkWriter};
