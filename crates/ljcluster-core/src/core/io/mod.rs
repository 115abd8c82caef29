//! Provides input/output for cluster templates and simulation artifacts.
//!
//! Templates are read through the [`template::TemplateStore`] trait. Snapshots use the
//! plain XYZ layout via the [`traits::SnapshotFile`] trait, and the energy and radii
//! time series are simple whitespace-separated text files.

pub mod series;
pub mod template;
pub mod traits;
pub mod xyz;
