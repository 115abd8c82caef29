use serde::Deserialize;
use tracing::warn;

/// When the velocity correction factor is recomputed within a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThermostatSchedule {
    /// Forces for all particles first, then one factor from the resulting total
    /// energy, then every particle integrated with that factor.
    #[default]
    PerStep,
    /// Particles are processed one at a time in list order: evaluate the particle's
    /// forces against the partially advanced system, recompute the factor from the
    /// current total energy, then integrate that particle.
    PerParticle,
}

/// The velocity scale that pulls `current` total energy back towards `initial`:
/// `1 + sign(E) · (√(E₀/E) − 1)`.
///
/// Returns `None` when `current` is exactly zero, in which case the previous factor
/// should be kept.
#[inline]
pub fn correction_factor(current: f64, initial: f64) -> Option<f64> {
    if current == 0.0 {
        return None;
    }
    Some(1.0 + current.signum() * ((initial / current).sqrt() - 1.0))
}

/// Energy-feedback velocity rescaling anchored at the initial total energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Thermostat {
    initial_energy: f64,
    factor: f64,
    reported_non_finite: bool,
}

impl Thermostat {
    /// Creates a thermostat anchored at `initial_energy`, with a starting factor of `1.0`.
    pub fn new(initial_energy: f64) -> Self {
        Self {
            initial_energy,
            factor: 1.0,
            reported_non_finite: false,
        }
    }

    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Recomputes the factor from the `current` total energy and returns it.
    pub fn update(&mut self, current: f64) -> f64 {
        if let Some(factor) = correction_factor(current, self.initial_energy) {
            self.factor = factor;
        }
        if !self.factor.is_finite() && !self.reported_non_finite {
            warn!(
                current_energy = current,
                initial_energy = self.initial_energy,
                "Velocity correction factor is no longer finite."
            );
            self.reported_non_finite = true;
        }
        self.factor
    }
}
