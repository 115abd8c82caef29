use nalgebra::{Point3, Vector3};

/// Represents a single point particle in the simulation with its kinematic and energy state.
///
/// All particles carry an implicit unit mass, so the force acting on a particle
/// is numerically equal to its acceleration and its kinetic energy depends only
/// on its velocity. The `acceleration` and `potential` fields are transient: they
/// are overwritten by every force evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The world-space position of the particle.
    pub position: Point3<f64>,
    /// The current velocity of the particle.
    pub velocity: Vector3<f64>,
    /// The acceleration from the most recent force evaluation.
    pub acceleration: Vector3<f64>,
    /// The Lennard-Jones potential accumulated against every other particle
    /// during the most recent force evaluation.
    pub potential: f64,
}

impl Particle {
    /// Creates a new `Particle` at rest-state force values.
    ///
    /// The acceleration starts at zero and the potential at `0.0`; both are
    /// filled in by the first force evaluation.
    ///
    /// # Arguments
    ///
    /// * `position` - The initial world-space position.
    /// * `velocity` - The initial velocity.
    pub fn new(position: Point3<f64>, velocity: Vector3<f64>) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3::zeros(),
            potential: 0.0,
        }
    }

    /// Returns the kinetic energy `0.5 * |v|²` of this particle.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.velocity.norm_squared()
    }
}
