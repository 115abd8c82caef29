//! # Core Module
//!
//! The stateless foundation of the simulator: particle data, the Lennard-Jones
//! force field, geometric diagnostics and file formats.
//!
//! ## Architecture
//!
//! - **Particle Representation** ([`models`]) - Particles and the clusters they are built from
//! - **Forces and Energies** ([`forcefield`]) - All-pairs Lennard-Jones evaluation and energy totals
//! - **File I/O** ([`io`]) - Cluster templates, XYZ snapshots, energy and radii series
//! - **Geometry** ([`utils`]) - Center of mass and radial distributions
//!
//! Nothing in this module owns simulation state or advances time; that is the job
//! of the [`crate::engine`] layer.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
