//! # ljcluster Core Library
//!
//! Molecular dynamics of two colliding Lennard-Jones clusters with an
//! energy-feedback velocity correction.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Particle`, `Cluster`),
//!   the pair potential and force evaluator, geometry helpers, and the readers and
//!   writers for cluster templates, XYZ snapshots and time series.
//!
//! - **[`engine`]: The Logic Core.** The stateful `Simulation` driver together with
//!   its configuration, integrator and thermostat.
//!
//! - **[`workflows`]: The Public API.** Complete runs that tie the engine to the
//!   file outputs of an experiment directory.

pub mod core;
pub mod engine;
pub mod workflows;
