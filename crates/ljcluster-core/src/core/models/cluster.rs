use super::particle::Particle;
use crate::core::io::template::{self, TemplateError, TemplateStore};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// The initial conditions of one cluster: how many particles, where, and how fast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSpec {
    /// The number of particles in the cluster.
    pub size: usize,
    /// The offset added to every template coordinate.
    pub offset: Vector3<f64>,
    /// The bulk velocity shared by every particle at creation.
    pub velocity: Vector3<f64>,
}

impl ClusterSpec {
    pub fn new(size: usize, offset: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self {
            size,
            offset,
            velocity,
        }
    }

    /// The template id used for this cluster, which is its particle count.
    pub fn template_id(&self) -> String {
        self.size.to_string()
    }
}

/// A group of particles created together from one template.
///
/// Clusters only exist during construction of a simulation; their particles are
/// moved into the flat particle list afterwards via [`Cluster::into_particles`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    spec: ClusterSpec,
    particles: Vec<Particle>,
}

impl Cluster {
    /// Builds a cluster by loading the template `spec.template_id()` from `store`.
    ///
    /// # Errors
    ///
    /// Propagates any [`TemplateError`] from loading or parsing; no particles are
    /// produced on failure.
    pub fn build(spec: ClusterSpec, store: &dyn TemplateStore) -> Result<Self, TemplateError> {
        let id = spec.template_id();
        Self::build_from_template(spec, &id, store)
    }

    /// Builds a cluster from an explicitly named template.
    pub fn build_from_template(
        spec: ClusterSpec,
        template_id: &str,
        store: &dyn TemplateStore,
    ) -> Result<Self, TemplateError> {
        let text = store.load(template_id)?;
        let coordinates = template::parse_coordinates(template_id, &text, spec.size)?;

        let particles = coordinates
            .into_iter()
            .map(|relative| Particle::new(Point3::from(relative + spec.offset), spec.velocity))
            .collect();

        debug!(
            "Built cluster of {} particle(s) from template '{}'",
            spec.size, template_id
        );
        Ok(Self { spec, particles })
    }

    pub fn spec(&self) -> &ClusterSpec {
        &self.spec
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Moves the whole cluster so that its offset becomes `new_offset`.
    pub fn translate(&mut self, new_offset: Vector3<f64>) {
        let shift = new_offset - self.spec.offset;
        for particle in &mut self.particles {
            particle.position += shift;
        }
        self.spec.offset = new_offset;
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }
}
