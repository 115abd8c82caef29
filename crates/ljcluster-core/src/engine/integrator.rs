use super::observer::PositionObserver;
use crate::core::models::particle::Particle;

/// Advances one particle by `dt` using its current acceleration only:
///
/// ```text
/// x ← x + v·dt + ½·dt²·a
/// v ← v·factor + ½·dt·a
/// ```
///
/// Only the current acceleration is used, so the velocity receives half a kick
/// per step.
#[inline]
pub fn step_particle(particle: &mut Particle, dt: f64, correction_factor: f64) {
    particle.position += particle.velocity * dt + 0.5 * dt.powi(2) * particle.acceleration;
    particle.velocity = particle.velocity * correction_factor + 0.5 * dt * particle.acceleration;
}

/// Advances every particle by `dt`, reporting each new position to `observer`.
pub fn step(
    particles: &mut [Particle],
    dt: f64,
    correction_factor: f64,
    observer: &dyn PositionObserver,
) {
    for (index, particle) in particles.iter_mut().enumerate() {
        step_particle(particle, dt, correction_factor);
        observer.on_position_changed(index, &particle.position);
    }
}
