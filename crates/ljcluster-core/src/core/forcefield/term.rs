use crate::core::models::particle::Particle;
use std::ops::{Add, AddAssign};

/// Aggregate kinetic and potential energy of a particle set.
///
/// `potential` is the sum of per-particle potentials, so every pair is counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergySummary {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergySummary {
    pub fn new(kinetic: f64, potential: f64) -> Self {
        Self { kinetic, potential }
    }

    pub fn from_particles(particles: &[Particle]) -> Self {
        particles
            .iter()
            .map(|p| Self::new(p.kinetic_energy(), p.potential))
            .fold(Self::default(), |acc, term| acc + term)
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

impl Add for EnergySummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            kinetic: self.kinetic + rhs.kinetic,
            potential: self.potential + rhs.potential,
        }
    }
}

impl AddAssign for EnergySummary {
    fn add_assign(&mut self, rhs: Self) {
        self.kinetic += rhs.kinetic;
        self.potential += rhs.potential;
    }
}
