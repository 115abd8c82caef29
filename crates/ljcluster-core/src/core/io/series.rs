use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Separator between the columns of the energy time series.
const ENERGY_SEPARATOR: &str = "      ";

pub const ENERGY_FILE_NAME: &str = "Energy.txt";

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
}

impl SeriesError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Significant digits kept when a simulation time is written out.
const TIME_SIGNIFICANT_DIGITS: usize = 12;

/// Rounds `time` to [`TIME_SIGNIFICANT_DIGITS`] so that `3 · 0.1` prints as `0.3`.
pub fn display_time(time: f64) -> f64 {
    if !time.is_finite() || time == 0.0 {
        return time;
    }
    format!("{:.*e}", TIME_SIGNIFICANT_DIGITS - 1, time)
        .parse()
        .unwrap_or(time)
}

/// Formats one row of the energy series: `<t>      <PE>      <KE>`.
pub fn energy_line(time: f64, potential: f64, kinetic: f64) -> String {
    let time = display_time(time);
    format!("{time}{ENERGY_SEPARATOR}{potential}{ENERGY_SEPARATOR}{kinetic}")
}

/// The file name of a radii dump taken at time `t`, e.g. `Radii_0.5.txt`.
pub fn radii_file_name(time: f64) -> String {
    format!("Radii_{}.txt", display_time(time))
}

/// Append-only writer for the per-step energy time series.
pub struct EnergyLog {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
}

impl EnergyLog {
    /// Starts a new series at `path`, discarding any rows from an earlier run.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SeriesError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| SeriesError::io(&path, e))?;
        Ok(Self::from_file(path, file))
    }

    /// Opens `path` for appending, creating it if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SeriesError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SeriesError::io(&path, e))?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            writer: BufWriter::new(file),
            rows: 0,
        }
    }

    pub fn append(&mut self, time: f64, potential: f64, kinetic: f64) -> Result<(), SeriesError> {
        writeln!(self.writer, "{}", energy_line(time, potential, kinetic))
            .map_err(|e| SeriesError::io(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }

    /// The number of rows appended through this handle.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&mut self) -> Result<(), SeriesError> {
        self.writer
            .flush()
            .map_err(|e| SeriesError::io(&self.path, e))
    }
}

/// Writes one radius per line.
pub fn write_radii(radii: &[f64], writer: &mut impl Write) -> io::Result<()> {
    for r in radii {
        writeln!(writer, "{r}")?;
    }
    Ok(())
}

/// Writes one radius per line to `path`, replacing any existing file.
pub fn write_radii_to_path(radii: &[f64], path: &Path) -> Result<(), SeriesError> {
    let file = File::create(path).map_err(|e| SeriesError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_radii(radii, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| SeriesError::io(path, e))
}
