use thiserror::Error;

use super::config::ConfigError;
use super::state::Phase;
use crate::core::forcefield::evaluator::ForceError;
use crate::core::io::series::SeriesError;
use crate::core::io::template::TemplateError;
use crate::core::io::xyz::XyzError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build cluster {cluster}: {source}")]
    ClusterBuild {
        cluster: usize,
        #[source]
        source: TemplateError,
    },

    #[error("Force evaluation failed: {source}")]
    Force {
        #[from]
        source: ForceError,
    },

    #[error("Snapshot export failed: {source}")]
    Snapshot {
        #[from]
        source: XyzError,
    },

    #[error("Time series export failed: {source}")]
    Series {
        #[from]
        source: SeriesError,
    },

    #[error("Cannot {operation} while the simulation is {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
}
