use super::potentials;
use crate::core::models::particle::Particle;
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForceError {
    #[error("Particles {i} and {j} are at zero separation")]
    SingularPairDistance { i: usize, j: usize },
}

/// How the evaluator treats a pair of particles at zero separation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingularityPolicy {
    /// Abort the evaluation with [`ForceError::SingularPairDistance`].
    #[default]
    Fail,
    /// Ignore the coincident pair entirely.
    Skip,
    /// Evaluate any pair closer than the given distance as if it were at that distance.
    Clamp(f64),
}

/// Per-particle output of one force evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleForce {
    pub acceleration: Vector3<f64>,
    pub potential: f64,
}

/// Evaluates Lennard-Jones forces and potentials with a naive all-pairs loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceEvaluator {
    sigma: f64,
    policy: SingularityPolicy,
}

impl ForceEvaluator {
    pub fn new(sigma: f64, policy: SingularityPolicy) -> Self {
        Self { sigma, policy }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn policy(&self) -> SingularityPolicy {
        self.policy
    }

    /// Recomputes `acceleration` and `potential` for every particle.
    ///
    /// Every particle is evaluated against a snapshot of all positions taken
    /// before the call, so the result does not depend on evaluation order. The
    /// particles are only written once every evaluation has succeeded.
    ///
    /// # Errors
    ///
    /// With [`SingularityPolicy::Fail`], returns the lowest-indexed coincident
    /// pair; the particles are left untouched.
    pub fn evaluate(&self, particles: &mut [Particle]) -> Result<(), ForceError> {
        let positions: Vec<Point3<f64>> = particles.iter().map(|p| p.position).collect();

        let results: Vec<Result<ParticleForce, ForceError>> = (0..positions.len())
            .into_par_iter()
            .map(|i| self.force_on(i, &positions))
            .collect();
        let forces = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        for (particle, force) in particles.iter_mut().zip(forces) {
            particle.acceleration = force.acceleration;
            particle.potential = force.potential;
        }
        Ok(())
    }

    /// Recomputes `acceleration` and `potential` for the particle at `index` only,
    /// using the current positions of all other particles.
    pub fn evaluate_one(&self, particles: &mut [Particle], index: usize) -> Result<(), ForceError> {
        let positions: Vec<Point3<f64>> = particles.iter().map(|p| p.position).collect();
        let force = self.force_on(index, &positions)?;
        let particle = &mut particles[index];
        particle.acceleration = force.acceleration;
        particle.potential = force.potential;
        Ok(())
    }

    /// Sums the pair potential over the ordered neighbours of particle `i`.
    pub fn force_on(&self, i: usize, positions: &[Point3<f64>]) -> Result<ParticleForce, ForceError> {
        let origin = positions[i];
        let mut acceleration = Vector3::zeros();
        let mut potential = 0.0;

        for (j, other) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut displacement = other - origin;
            let mut dist = displacement.norm();

            if dist == 0.0 {
                match self.policy {
                    SingularityPolicy::Fail => {
                        return Err(ForceError::SingularPairDistance {
                            i: i.min(j),
                            j: i.max(j),
                        });
                    }
                    SingularityPolicy::Skip => continue,
                    SingularityPolicy::Clamp(_) => {}
                }
            }
            if let SingularityPolicy::Clamp(min_distance) = self.policy {
                if dist < min_distance {
                    if dist > 0.0 {
                        displacement *= min_distance / dist;
                    }
                    dist = min_distance;
                }
            }

            potential += potentials::lennard_jones_12_6(dist, self.sigma);
            acceleration += potentials::lennard_jones_acceleration(&displacement, dist, self.sigma);
        }

        Ok(ParticleForce {
            acceleration,
            potential,
        })
    }

    /// The potential energy summed once per unordered pair.
    ///
    /// This is exactly half of the per-particle total reported by [`evaluate`](Self::evaluate),
    /// which counts every pair from both sides.
    pub fn unique_pair_potential(&self, particles: &[Particle]) -> f64 {
        particles
            .iter()
            .map(|p| p.position)
            .tuple_combinations()
            .map(|(a, b)| potentials::lennard_jones_12_6((b - a).norm(), self.sigma))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn particle_at(x: f64, y: f64, z: f64) -> Particle {
        Particle::new(Point3::new(x, y, z), Vector3::zeros())
    }

    #[test]
    fn pair_at_twice_sigma_has_equal_potentials_and_opposite_accelerations() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(2.0, 0.0, 0.0)];
        let evaluator = ForceEvaluator::new(1.0, SingularityPolicy::Fail);

        evaluator.evaluate(&mut particles).unwrap();

        let expected = 4.0 * (0.5f64.powi(12) - 0.5f64.powi(6));
        assert!(f64_approx_equal(particles[0].potential, expected));
        assert_eq!(particles[0].potential, particles[1].potential);
        assert!((particles[0].potential + 0.0605).abs() < 1e-3);

        assert!(particles[0].acceleration.x > 0.0);
        assert!(particles[1].acceleration.x < 0.0);
        assert_eq!(particles[0].acceleration, -particles[1].acceleration);
        assert_eq!(particles[0].acceleration.y, 0.0);
        assert_eq!(particles[0].acceleration.z, 0.0);
    }

    #[test]
    fn pairwise_contributions_obey_newtons_third_law() {
        let positions = vec![
            Point3::new(0.1, -0.3, 0.7),
            Point3::new(1.2, 0.4, -0.2),
            Point3::new(-0.8, 1.1, 0.5),
        ];
        let evaluator = ForceEvaluator::new(1.0, SingularityPolicy::Fail);

        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let pair_ij = [positions[i], positions[j]];
            let on_i = evaluator.force_on(0, &pair_ij).unwrap().acceleration;
            let on_j = evaluator.force_on(1, &pair_ij).unwrap().acceleration;
            assert_eq!(on_i, -on_j);
        }
    }

    #[test]
    fn net_acceleration_of_isolated_system_is_zero() {
        let mut particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.1, 0.0, 0.0),
            particle_at(0.0, 1.3, 0.2),
            particle_at(0.7, 0.6, 1.0),
        ];
        ForceEvaluator::new(1.0, SingularityPolicy::Fail)
            .evaluate(&mut particles)
            .unwrap();

        let net: Vector3<f64> = particles.iter().map(|p| p.acceleration).sum();
        assert!(net.norm() < 1e-9);
    }

    #[test]
    fn reported_potential_double_counts_every_pair() {
        let mut particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.2, 0.0, 0.0),
            particle_at(0.0, 1.5, 0.0),
        ];
        let evaluator = ForceEvaluator::new(1.0, SingularityPolicy::Fail);
        evaluator.evaluate(&mut particles).unwrap();

        let reported: f64 = particles.iter().map(|p| p.potential).sum();
        let unique = evaluator.unique_pair_potential(&particles);
        assert!(f64_approx_equal(reported, 2.0 * unique));
    }

    #[test]
    fn single_particle_feels_no_force() {
        let mut particles = vec![particle_at(3.0, 3.0, 3.0)];
        ForceEvaluator::new(1.0, SingularityPolicy::Fail)
            .evaluate(&mut particles)
            .unwrap();
        assert_eq!(particles[0].acceleration, Vector3::zeros());
        assert_eq!(particles[0].potential, 0.0);
    }

    #[test]
    fn evaluate_overwrites_previous_values() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(2.0, 0.0, 0.0)];
        particles[0].potential = 100.0;
        particles[0].acceleration = Vector3::new(9.0, 9.0, 9.0);

        ForceEvaluator::new(1.0, SingularityPolicy::Fail)
            .evaluate(&mut particles)
            .unwrap();
        assert!(particles[0].potential < 0.0);
        assert_eq!(particles[0].acceleration.y, 0.0);
    }

    #[test]
    fn fail_policy_reports_lowest_coincident_pair_and_leaves_state_untouched() {
        let mut particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.0, 0.0, 0.0),
            particle_at(5.0, 5.0, 5.0),
            particle_at(1.0, 0.0, 0.0),
            particle_at(5.0, 5.0, 5.0),
        ];
        let before = particles.clone();
        let result = ForceEvaluator::new(1.0, SingularityPolicy::Fail).evaluate(&mut particles);

        assert_eq!(result, Err(ForceError::SingularPairDistance { i: 1, j: 3 }));
        assert_eq!(particles, before);
    }

    #[test]
    fn skip_policy_ignores_coincident_pairs() {
        let mut particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(0.0, 0.0, 0.0),
            particle_at(2.0, 0.0, 0.0),
        ];
        ForceEvaluator::new(1.0, SingularityPolicy::Skip)
            .evaluate(&mut particles)
            .unwrap();

        let expected = potentials::lennard_jones_12_6(2.0, 1.0);
        assert!(f64_approx_equal(particles[0].potential, expected));
        assert!(particles.iter().all(|p| p.potential.is_finite()));
        assert!(particles.iter().all(|p| p.acceleration.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn clamp_policy_evaluates_close_pairs_at_minimum_distance() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(0.0, 0.0, 0.0)];
        ForceEvaluator::new(1.0, SingularityPolicy::Clamp(0.5))
            .evaluate(&mut particles)
            .unwrap();

        let expected = potentials::lennard_jones_12_6(0.5, 1.0);
        assert!(f64_approx_equal(particles[0].potential, expected));
        assert_eq!(particles[0].acceleration, Vector3::zeros());
    }

    #[test]
    fn clamp_policy_keeps_direction_of_close_pairs() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(0.1, 0.0, 0.0)];
        ForceEvaluator::new(1.0, SingularityPolicy::Clamp(0.5))
            .evaluate(&mut particles)
            .unwrap();

        let expected =
            potentials::lennard_jones_acceleration(&Vector3::new(0.5, 0.0, 0.0), 0.5, 1.0);
        let relative_error = (particles[0].acceleration.x - expected.x).abs() / expected.x.abs();
        assert!(relative_error < 1e-12);
        assert!(particles[0].acceleration.x < 0.0);
    }

    #[test]
    fn evaluate_one_matches_full_evaluation_for_that_particle() {
        let mut full = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.1, 0.2, 0.0),
            particle_at(0.3, 1.4, -0.5),
        ];
        let mut single = full.clone();
        let evaluator = ForceEvaluator::new(1.0, SingularityPolicy::Fail);

        evaluator.evaluate(&mut full).unwrap();
        evaluator.evaluate_one(&mut single, 1).unwrap();

        assert_eq!(single[1].acceleration, full[1].acceleration);
        assert_eq!(single[1].potential, full[1].potential);
        assert_eq!(single[0].potential, 0.0);
    }
}
