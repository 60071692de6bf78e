//! CSV summary output
//!
//! One `sigma,ber` file per modulation order, consumed downstream by
//! plotting tools.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sim::BerPoint;

/// Buffered writer for a two-column `sigma,ber` summary.
pub struct CsvWriter {
    writer: BufWriter<File>,
}

impl CsvWriter {
    /// Create (truncating) the target file and emit the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "sigma,ber")?;
        Ok(Self { writer })
    }

    /// Append one measurement row.
    pub fn push(&mut self, point: BerPoint) -> io::Result<()> {
        writeln!(self.writer, "{:.2},{:.15}", point.sigma, point.ber)
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write a full sweep result in one call.
pub fn write_sweep<P: AsRef<Path>>(path: P, points: &[BerPoint]) -> io::Result<()> {
    let mut writer = CsvWriter::create(path)?;
    for &point in points {
        writer.push(point)?;
    }
    writer.finish()
}
