//! Geometric helpers shared by diagnostics and exporters.

pub mod geometry;
