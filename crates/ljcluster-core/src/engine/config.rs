use super::thermostat::ThermostatSchedule;
use crate::core::forcefield::evaluator::SingularityPolicy;
use crate::core::models::cluster::ClusterSpec;
use thiserror::Error;

/// Allowance for floating-point noise when converting `total_t / delta_t` to a step count.
const STEP_COUNT_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Immutable parameters of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Lennard-Jones equilibrium-distance parameter shared by all pairs.
    pub sigma: f64,
    /// Integration time step.
    pub delta_t: f64,
    /// Total simulated time.
    pub total_t: f64,
    /// The two clusters, in output order.
    pub clusters: [ClusterSpec; 2],
    pub singularity: SingularityPolicy,
    pub thermostat: ThermostatSchedule,
    /// Write a radii dump every this many steps; `0` disables periodic dumps.
    pub radii_interval: usize,
}

impl SimulationConfig {
    /// The number of steps needed for the clock to reach `total_t`.
    pub fn total_steps(&self) -> usize {
        let steps = (self.total_t / self.delta_t - STEP_COUNT_EPSILON).ceil();
        if steps > 0.0 { steps as usize } else { 0 }
    }

    pub fn cluster_sizes(&self) -> [usize; 2] {
        [self.clusters[0].size, self.clusters[1].size]
    }

    /// Total particle count, saturating at `usize::MAX` for absurd sizes.
    pub fn particle_count(&self) -> usize {
        self.clusters
            .iter()
            .fold(0usize, |total, c| total.saturating_add(c.size))
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    sigma: Option<f64>,
    delta_t: Option<f64>,
    total_t: Option<f64>,
    cluster1: Option<ClusterSpec>,
    cluster2: Option<ClusterSpec>,
    singularity: Option<SingularityPolicy>,
    thermostat: Option<ThermostatSchedule>,
    radii_interval: Option<usize>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
    pub fn delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = Some(delta_t);
        self
    }
    pub fn total_t(mut self, total_t: f64) -> Self {
        self.total_t = Some(total_t);
        self
    }
    pub fn cluster1(mut self, spec: ClusterSpec) -> Self {
        self.cluster1 = Some(spec);
        self
    }
    pub fn cluster2(mut self, spec: ClusterSpec) -> Self {
        self.cluster2 = Some(spec);
        self
    }
    pub fn singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.singularity = Some(policy);
        self
    }
    pub fn thermostat_schedule(mut self, schedule: ThermostatSchedule) -> Self {
        self.thermostat = Some(schedule);
        self
    }
    pub fn radii_interval(mut self, interval: usize) -> Self {
        self.radii_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            sigma: self.sigma.ok_or(ConfigError::MissingParameter("sigma"))?,
            delta_t: self.delta_t.ok_or(ConfigError::MissingParameter("delta_t"))?,
            total_t: self.total_t.ok_or(ConfigError::MissingParameter("total_t"))?,
            clusters: [
                self.cluster1
                    .ok_or(ConfigError::MissingParameter("cluster1"))?,
                self.cluster2
                    .ok_or(ConfigError::MissingParameter("cluster2"))?,
            ],
            singularity: self.singularity.unwrap_or_default(),
            thermostat: self.thermostat.unwrap_or_default(),
            radii_interval: self.radii_interval.unwrap_or(0),
        };
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &SimulationConfig) -> Result<(), ConfigError> {
    require_positive("sigma", config.sigma)?;
    require_positive("delta_t", config.delta_t)?;
    if !config.total_t.is_finite() || config.total_t < 0.0 {
        return Err(ConfigError::InvalidParameter {
            name: "total_t",
            reason: format!("must be a finite, non-negative number (got {})", config.total_t),
        });
    }
    if let SingularityPolicy::Clamp(min_distance) = config.singularity {
        require_positive("singularity.clamp", min_distance)?;
    }
    for (idx, spec) in config.clusters.iter().enumerate() {
        let finite = spec.offset.iter().chain(spec.velocity.iter()).all(|c| c.is_finite());
        if !finite {
            return Err(ConfigError::InvalidParameter {
                name: if idx == 0 { "cluster1" } else { "cluster2" },
                reason: "offset and velocity must be finite".to_string(),
            });
        }
    }
    Ok(())
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a finite, positive number (got {value})"),
        })
    }
}
