//! # Core Models Module
//!
//! Data structures describing the particles being simulated.
//!
//! ## Key Components
//!
//! - [`particle`] - A single unit-mass particle with position, velocity, acceleration and potential
//! - [`cluster`] - A group of particles instantiated from a coordinate template with a shared
//!   offset and bulk velocity
//!
//! ## Usage
//!
//! ```ignore
//! use ljcluster::core::models::cluster::{Cluster, ClusterSpec};
//!
//! let spec = ClusterSpec::new(13, Vector3::new(5.0, 0.0, 0.0), Vector3::zeros());
//! let cluster = Cluster::build(spec, &store)?;
//! let particles = cluster.into_particles();
//! ```

pub mod cluster;
pub mod particle;
