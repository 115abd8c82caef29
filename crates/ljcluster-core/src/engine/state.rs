/// Lifecycle of a [`Simulation`](super::simulation::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No particles exist; the simulation must be initialized before stepping.
    #[default]
    Uninitialized,
    /// Particles are built and the initial energy is fixed; steps may be taken.
    Running,
    /// The clock has reached the configured total time.
    Finished,
}

/// Diagnostics recorded after one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// 1-based index of the step.
    pub step: usize,
    /// Simulation time after the step.
    pub time: f64,
    /// Total (pair double-counted) potential from this step's force evaluation.
    pub potential: f64,
    /// Total kinetic energy after integration.
    pub kinetic: f64,
    /// The velocity correction factor in effect at the end of the step.
    pub correction_factor: f64,
}

impl StepRecord {
    pub fn total_energy(&self) -> f64 {
        self.potential + self.kinetic
    }
}
