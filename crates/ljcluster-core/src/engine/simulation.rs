use super::config::SimulationConfig;
use super::error::EngineError;
use super::integrator;
use super::observer::PositionObserver;
use super::state::{Phase, StepRecord};
use super::thermostat::{Thermostat, ThermostatSchedule};
use crate::core::forcefield::evaluator::ForceEvaluator;
use crate::core::forcefield::term::EnergySummary;
use crate::core::io::template::TemplateStore;
use crate::core::io::xyz::{self, XyzSnapshot};
use crate::core::models::cluster::Cluster;
use crate::core::models::particle::Particle;
use crate::core::utils::geometry;
use nalgebra::Point3;
use tracing::{debug, info, trace};

/// Owns the particles of one two-cluster run and advances them in time.
///
/// Every step runs its phases strictly in order: force evaluation for all
/// particles, one velocity correction factor, integration of every particle, and
/// finally the energy record.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    evaluator: ForceEvaluator,
    particles: Vec<Particle>,
    thermostat: Option<Thermostat>,
    steps_taken: usize,
    phase: Phase,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let evaluator = ForceEvaluator::new(config.sigma, config.singularity);
        Self {
            config,
            evaluator,
            particles: Vec::new(),
            thermostat: None,
            steps_taken: 0,
            phase: Phase::Uninitialized,
        }
    }

    /// Builds both clusters, evaluates the initial forces and fixes `E₀`.
    ///
    /// Any previous state is discarded first. On failure the simulation is left
    /// uninitialized with no particles.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClusterBuild`] if a template is missing, short or
    /// malformed, and [`EngineError::Force`] if the initial configuration contains
    /// coincident particles under the `Fail` policy.
    pub fn initialize(&mut self, store: &dyn TemplateStore) -> Result<(), EngineError> {
        self.reset();

        let mut particles = Vec::new();
        for (idx, spec) in self.config.clusters.iter().enumerate() {
            let cluster = Cluster::build(*spec, store).map_err(|source| EngineError::ClusterBuild {
                cluster: idx + 1,
                source,
            })?;
            particles.extend(cluster.into_particles());
        }

        self.evaluator.evaluate(&mut particles)?;
        let initial_energy = EnergySummary::from_particles(&particles).total();

        info!(
            particles = particles.len(),
            initial_energy,
            total_steps = self.config.total_steps(),
            "Simulation initialized."
        );

        self.particles = particles;
        self.thermostat = Some(Thermostat::new(initial_energy));
        self.phase = if self.config.total_steps() == 0 {
            Phase::Finished
        } else {
            Phase::Running
        };
        Ok(())
    }

    /// Advances the simulation by one time step.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPhase`] unless the simulation is running, and
    /// [`EngineError::Force`] if the force evaluation fails. Under the per-step
    /// schedule a failed evaluation leaves every particle untouched.
    pub fn step(&mut self, observer: &dyn PositionObserver) -> Result<StepRecord, EngineError> {
        if self.phase != Phase::Running {
            return Err(EngineError::InvalidPhase {
                operation: "step",
                phase: self.phase,
            });
        }
        let Some(thermostat) = self.thermostat.as_mut() else {
            return Err(EngineError::InvalidPhase {
                operation: "step",
                phase: Phase::Uninitialized,
            });
        };
        let dt = self.config.delta_t;

        let factor = match self.config.thermostat {
            ThermostatSchedule::PerStep => {
                self.evaluator.evaluate(&mut self.particles)?;
                let energy = EnergySummary::from_particles(&self.particles);
                let factor = thermostat.update(energy.total());
                integrator::step(&mut self.particles, dt, factor, observer);
                factor
            }
            ThermostatSchedule::PerParticle => {
                let mut factor = thermostat.factor();
                for index in 0..self.particles.len() {
                    self.evaluator.evaluate_one(&mut self.particles, index)?;
                    factor = thermostat.update(EnergySummary::from_particles(&self.particles).total());
                    let particle = &mut self.particles[index];
                    integrator::step_particle(particle, dt, factor);
                    observer.on_position_changed(index, &particle.position);
                }
                factor
            }
        };

        self.steps_taken += 1;
        let energy = EnergySummary::from_particles(&self.particles);
        let record = StepRecord {
            step: self.steps_taken,
            time: self.time(),
            potential: energy.potential,
            kinetic: energy.kinetic,
            correction_factor: factor,
        };
        trace!(
            step = record.step,
            time = record.time,
            potential = record.potential,
            kinetic = record.kinetic,
            factor,
            "Step complete."
        );

        if self.steps_taken >= self.config.total_steps() {
            self.phase = Phase::Finished;
            info!(
                steps = self.steps_taken,
                time = record.time,
                total_energy = record.total_energy(),
                "Simulation finished."
            );
        }
        Ok(record)
    }

    /// Takes up to `n_steps` steps, stopping early if the run finishes.
    pub fn advance(
        &mut self,
        n_steps: usize,
        observer: &dyn PositionObserver,
    ) -> Result<Vec<StepRecord>, EngineError> {
        let remaining = self.config.total_steps().saturating_sub(self.steps_taken);
        let mut records = Vec::with_capacity(n_steps.min(remaining));
        while records.len() < n_steps && self.phase == Phase::Running {
            records.push(self.step(observer)?);
        }
        Ok(records)
    }

    /// Steps until the configured total time is reached, handing every record to
    /// `on_step`. Returns the number of steps taken by this call.
    pub fn run_to_completion<F>(
        &mut self,
        observer: &dyn PositionObserver,
        mut on_step: F,
    ) -> Result<usize, EngineError>
    where
        F: FnMut(&Simulation, &StepRecord) -> Result<(), EngineError>,
    {
        if self.phase == Phase::Uninitialized {
            return Err(EngineError::InvalidPhase {
                operation: "run",
                phase: self.phase,
            });
        }
        let mut taken = 0;
        while self.phase == Phase::Running {
            let record = self.step(observer)?;
            on_step(self, &record)?;
            taken += 1;
        }
        Ok(taken)
    }

    /// Discards all particles and returns to the uninitialized state.
    pub fn reset(&mut self) {
        if self.phase != Phase::Uninitialized {
            debug!("Resetting simulation with {} particle(s).", self.particles.len());
        }
        self.particles.clear();
        self.thermostat = None;
        self.steps_taken = 0;
        self.phase = Phase::Uninitialized;
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Current simulation time, `steps_taken · Δt`.
    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.config.delta_t
    }

    /// `E₀`, available once the simulation has been initialized.
    pub fn initial_energy(&self) -> Option<f64> {
        self.thermostat.as_ref().map(Thermostat::initial_energy)
    }

    pub fn correction_factor(&self) -> f64 {
        self.thermostat.as_ref().map_or(1.0, Thermostat::factor)
    }

    pub fn energy(&self) -> EnergySummary {
        EnergySummary::from_particles(&self.particles)
    }

    /// Potential energy counted once per pair at the current positions.
    pub fn unique_pair_potential(&self) -> f64 {
        self.evaluator.unique_pair_potential(&self.particles)
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.particles.iter().map(|p| p.position).collect()
    }

    pub fn center_of_mass(&self) -> Point3<f64> {
        geometry::center_of_mass(&self.positions())
    }

    /// Distance of every particle from the current center of mass, in particle order.
    pub fn radii(&self) -> Vec<f64> {
        let positions = self.positions();
        let com = geometry::center_of_mass(&positions);
        geometry::radii(&positions, &com)
    }

    /// A snapshot of all positions, labelled with the cluster sizes and the
    /// initial relative velocity of cluster 1 with respect to cluster 2.
    pub fn snapshot(&self, name: &str) -> XyzSnapshot {
        let [first, second] = &self.config.clusters;
        let relative_velocity = first.velocity - second.velocity;
        let comment = xyz::run_comment(name, self.config.cluster_sizes(), &relative_velocity);
        XyzSnapshot::from_particles(comment, &self.particles)
    }
}
