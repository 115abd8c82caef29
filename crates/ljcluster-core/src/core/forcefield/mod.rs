//! # Force Field Module
//!
//! Lennard-Jones force and energy evaluation for unit-mass point particles.
//!
//! ## Overview
//!
//! Every particle interacts with every other particle through the 12-6 Lennard-Jones
//! potential with unit well depth and a shared length scale `sigma`. Forces are
//! accumulated with a naive all-pairs loop; no cutoff, neighbour list or periodic
//! image is applied.
//!
//! ## Key Components
//!
//! - [`evaluator`] - The all-pairs [`evaluator::ForceEvaluator`] and the policy for
//!   coincident particles
//! - [`term`] - Aggregate kinetic/potential energy reporting
//!
//! ## Usage
//!
//! ```ignore
//! use ljcluster::core::forcefield::evaluator::{ForceEvaluator, SingularityPolicy};
//!
//! let evaluator = ForceEvaluator::new(1.0, SingularityPolicy::Fail);
//! evaluator.evaluate(&mut particles)?;
//! ```

pub mod evaluator;
pub(crate) mod potentials;
pub mod term;
