use nalgebra::Vector3;

/// Prefactor of the Lennard-Jones pair potential, `4ε` with `ε = 1`.
const POTENTIAL_PREFACTOR: f64 = 4.0;
/// Prefactor of the Lennard-Jones force, `24ε` with `ε = 1`.
const FORCE_PREFACTOR: f64 = 24.0;

/// Lennard-Jones 12-6 potential `4((σ/r)^12 − (σ/r)^6)` with unit well depth.
#[inline]
pub fn lennard_jones_12_6(dist: f64, sigma: f64) -> f64 {
    let rho = sigma / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    POTENTIAL_PREFACTOR * (rho12 - rho6)
}

/// Acceleration on a unit-mass particle from a neighbour at `displacement`
/// (neighbour position minus own position) and distance `dist`:
/// `24(2(σ/r)^14 − (σ/r)^8) · (−d)`.
///
/// A positive scalar part pushes the particle away from its neighbour.
#[inline]
pub fn lennard_jones_acceleration(displacement: &Vector3<f64>, dist: f64, sigma: f64) -> Vector3<f64> {
    let rho = sigma / dist;
    let rho2 = rho * rho;
    let rho8 = rho2.powi(4);
    let rho14 = rho8 * rho2.powi(3);
    -FORCE_PREFACTOR * (2.0 * rho14 - rho8) * displacement
}
