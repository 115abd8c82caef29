use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use ljcluster::core::forcefield::evaluator::SingularityPolicy;
use ljcluster::core::models::cluster::ClusterSpec;
use ljcluster::engine::config as core_config;
use ljcluster::engine::error::EngineError;
use ljcluster::engine::thermostat::ThermostatSchedule;
use nalgebra::Vector3;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Values used for anything neither the config file nor the command line sets.
pub struct DefaultsConfig {
    pub sigma: f64,
    pub delta_t: f64,
    pub total_t: f64,
    pub radii_interval: usize,
    pub cluster_sizes: [usize; 2],
    pub cluster_offsets: [[f64; 3]; 2],
    pub cluster_velocities: [[f64; 3]; 2],
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            delta_t: 0.01,
            total_t: 3.0,
            radii_interval: 0,
            cluster_sizes: [75, 23],
            cluster_offsets: [[5.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            cluster_velocities: [[0.0; 3], [0.0; 3]],
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulationSection {
    sigma: Option<f64>,
    delta_t: Option<f64>,
    total_t: Option<f64>,
    radii_interval: Option<usize>,
    singularity: Option<SingularityPolicy>,
    thermostat: Option<ThermostatSchedule>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialClusterConfig {
    size: Option<usize>,
    offset: Option<[f64; 3]>,
    velocity: Option<[f64; 3]>,
}

impl PartialClusterConfig {
    fn resolve(&self, idx: usize, defaults: &DefaultsConfig) -> ClusterSpec {
        let offset = self.offset.unwrap_or(defaults.cluster_offsets[idx]);
        let velocity = self.velocity.unwrap_or(defaults.cluster_velocities[idx]);
        ClusterSpec::new(
            self.size.unwrap_or(defaults.cluster_sizes[idx]),
            Vector3::from(offset),
            Vector3::from(velocity),
        )
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialSimulationConfig {
    simulation: Option<PartialSimulationSection>,
    #[serde(default)]
    clusters: Vec<PartialClusterConfig>,
}

impl PartialSimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the final configuration: file values, then command-line flags,
    /// then `--set` overrides, with [`DefaultsConfig`] filling the gaps.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<core_config::SimulationConfig> {
        if self.clusters.len() > 2 {
            return Err(CliError::Config(format!(
                "Exactly two clusters are simulated, but {} `[[clusters]]` entries were given.",
                self.clusters.len()
            )));
        }
        self.clusters.resize_with(2, Default::default);

        let sim = self.simulation.get_or_insert_with(Default::default);
        if args.sigma.is_some() {
            sim.sigma = args.sigma;
        }
        if args.delta_t.is_some() {
            sim.delta_t = args.delta_t;
        }
        if args.total_t.is_some() {
            sim.total_t = args.total_t;
        }
        if args.radii_interval.is_some() {
            sim.radii_interval = args.radii_interval;
        }

        self.apply_set_values(&args.set_values)?;
        self.into_config(&DefaultsConfig::default())
    }

    fn into_config(self, defaults: &DefaultsConfig) -> Result<core_config::SimulationConfig> {
        let sim = self.simulation.unwrap_or_default();
        let mut builder = core_config::SimulationConfigBuilder::new()
            .sigma(sim.sigma.unwrap_or(defaults.sigma))
            .delta_t(sim.delta_t.unwrap_or(defaults.delta_t))
            .total_t(sim.total_t.unwrap_or(defaults.total_t))
            .radii_interval(sim.radii_interval.unwrap_or(defaults.radii_interval))
            .cluster1(self.clusters[0].resolve(0, defaults))
            .cluster2(self.clusters[1].resolve(1, defaults));

        if let Some(policy) = sim.singularity {
            builder = builder.singularity_policy(policy);
        }
        if let Some(schedule) = sim.thermostat {
            builder = builder.thermostat_schedule(schedule);
        }

        Ok(builder.build().map_err(EngineError::from)?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "simulation.sigma" => {
                    self.simulation_mut().sigma = Some(parse_value(key, value_str)?);
                }
                "simulation.delta-t" => {
                    self.simulation_mut().delta_t = Some(parse_value(key, value_str)?);
                }
                "simulation.total-t" => {
                    self.simulation_mut().total_t = Some(parse_value(key, value_str)?);
                }
                "simulation.radii-interval" => {
                    self.simulation_mut().radii_interval = Some(parse_value(key, value_str)?);
                }
                "cluster1.size" => {
                    self.clusters[0].size = Some(parse_value(key, value_str)?);
                }
                "cluster2.size" => {
                    self.clusters[1].size = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn simulation_mut(&mut self) -> &mut PartialSimulationSection {
        self.simulation.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn parse_run_args(config_path: Option<&Path>, extra: &[&str]) -> RunArgs {
        let mut args = vec!["ljcluster", "run", "-t", "templates", "-o", "out"];
        let config_str;
        if let Some(path) = config_path {
            config_str = path.to_str().unwrap().to_string();
            args.extend_from_slice(&["-c", config_str.as_str()]);
        }
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Run(run_args) => run_args,
            _ => panic!("Expected 'run' subcommand"),
        }
    }

    fn resolve(config_path: Option<&Path>, extra: &[&str]) -> Result<core_config::SimulationConfig> {
        let args = parse_run_args(config_path, extra);
        let partial = match &args.config {
            Some(path) => PartialSimulationConfig::from_file(path)?,
            None => PartialSimulationConfig::default(),
        };
        partial.merge_with_cli(&args)
    }

    #[test]
    fn test_defaults_apply_without_config_file() {
        let config = resolve(None, &[]).unwrap();

        assert_eq!(config.sigma, 1.0);
        assert_eq!(config.delta_t, 0.01);
        assert_eq!(config.total_t, 3.0);
        assert_eq!(config.cluster_sizes(), [75, 23]);
        assert_eq!(config.clusters[0].offset, Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(config.clusters[1].offset, Vector3::zeros());
        assert_eq!(config.singularity, SingularityPolicy::Fail);
        assert_eq!(config.thermostat, ThermostatSchedule::PerStep);
    }

    #[test]
    fn test_load_from_file_and_merge_with_defaults() {
        let config_path = write_config_file(
            "config_file.toml",
            r#"
        [simulation]
        sigma = 1.5
        total-t = 0.5
        singularity = { clamp = 0.01 }
        thermostat = "per-particle"

        [[clusters]]
        size = 13
        velocity = [-0.5, 0.0, 0.0]

        [[clusters]]
        size = 7
        offset = [0.0, 4.0, 0.0]
        "#,
        );

        let config = resolve(Some(&config_path), &[]).unwrap();

        assert_eq!(config.sigma, 1.5);
        assert_eq!(config.delta_t, 0.01);
        assert_eq!(config.total_t, 0.5);
        assert_eq!(config.singularity, SingularityPolicy::Clamp(0.01));
        assert_eq!(config.thermostat, ThermostatSchedule::PerParticle);
        assert_eq!(config.cluster_sizes(), [13, 7]);
        assert_eq!(config.clusters[0].offset, Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(config.clusters[0].velocity, Vector3::new(-0.5, 0.0, 0.0));
        assert_eq!(config.clusters[1].offset, Vector3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_cli_args_override_file_values() {
        let config_path = write_config_file(
            "config_override.toml",
            r#"
        [simulation]
        sigma = 1.5 # Will be overridden
        delta-t = 0.05 # Will be overridden
        radii-interval = 10
        "#,
        );

        let config = resolve(
            Some(&config_path),
            &["--sigma", "0.9", "--delta-t", "0.001"],
        )
        .unwrap();

        assert_eq!(config.sigma, 0.9);
        assert_eq!(config.delta_t, 0.001);
        assert_eq!(config.radii_interval, 10);
    }

    #[test]
    fn test_set_value_overrides_file_and_cli_flags() {
        let config_path = write_config_file(
            "config_set.toml",
            r#"
        [simulation]
        total-t = 1.0

        [[clusters]]
        size = 13
        "#,
        );

        let config = resolve(
            Some(&config_path),
            &[
                "--total-t",
                "2.0",
                "-S",
                "simulation.total-t=0.25",
                "-S",
                "cluster1.size=19",
                "-S",
                "cluster2.size=3",
            ],
        )
        .unwrap();

        assert_eq!(config.total_t, 0.25);
        assert_eq!(config.cluster_sizes(), [19, 3]);
    }

    #[test]
    fn test_invalid_set_values_are_rejected() {
        assert!(matches!(
            resolve(None, &["-S", "simulation.sigma"]),
            Err(CliError::Config(msg)) if msg.contains("KEY=VALUE")
        ));
        assert!(matches!(
            resolve(None, &["-S", "simulation.unknown=1"]),
            Err(CliError::Config(msg)) if msg.contains("Unsupported")
        ));
        assert!(matches!(
            resolve(None, &["-S", "cluster1.size=many"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_values_are_reported_by_the_builder() {
        let result = resolve(None, &["--delta-t", "0"]);
        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::Config(
                core_config::ConfigError::InvalidParameter { name: "delta_t", .. }
            )))
        ));
    }

    #[test]
    fn test_unknown_keys_and_extra_clusters_are_rejected() {
        let unknown = write_config_file(
            "config_unknown.toml",
            r#"
        [simulation]
        epsilon = 2.0
        "#,
        );
        assert!(matches!(
            resolve(Some(&unknown), &[]),
            Err(CliError::FileParsing { .. })
        ));

        let three = write_config_file(
            "config_three.toml",
            r#"
        [[clusters]]
        size = 1
        [[clusters]]
        size = 2
        [[clusters]]
        size = 3
        "#,
        );
        assert!(matches!(
            resolve(Some(&three), &[]),
            Err(CliError::Config(msg)) if msg.contains("two clusters")
        ));
    }
}
