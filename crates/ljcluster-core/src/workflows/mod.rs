//! # Workflows Module
//!
//! High-level entry points that run a complete two-cluster collision.
//!
//! ## Overview
//!
//! A workflow ties the [`crate::engine`] driver to the file outputs of an
//! experiment directory: the initial and final XYZ snapshots, the per-step
//! energy series and optional radii dumps. Progress is reported through a
//! [`crate::engine::progress::ProgressReporter`] so that front ends can display
//! it without the library depending on any UI.
//!
//! - **Run Workflow** ([`run`]) - Build, integrate to the configured total time,
//!   and export every artifact.

pub mod run;
