use crate::core::io::series::{self, ENERGY_FILE_NAME, EnergyLog};
use crate::core::io::template::TemplateStore;
use crate::core::io::traits::SnapshotFile;
use crate::core::io::xyz::XyzFile;
use crate::core::utils::geometry;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::observer::PositionObserver;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulation::Simulation;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const INITIAL_SNAPSHOT_NAME: &str = "Initial";
pub const FINAL_SNAPSHOT_NAME: &str = "Final";

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub final_time: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    /// Radius of gyration of the final configuration, `None` for an empty system.
    pub radius_of_gyration: Option<f64>,
    pub radii_files: Vec<PathBuf>,
}

/// Runs one two-cluster collision from start to finish and writes its artifacts
/// into `output_dir`, which must already exist.
#[instrument(skip_all, name = "cluster_run_workflow")]
pub fn run(
    config: &SimulationConfig,
    store: &dyn TemplateStore,
    output_dir: &Path,
    observer: &dyn PositionObserver,
    reporter: &ProgressReporter,
) -> Result<RunSummary, EngineError> {
    // === Phase 1: Building ===
    reporter.report(Progress::PhaseStart { name: "Building" });
    info!(
        cluster1 = config.clusters[0].size,
        cluster2 = config.clusters[1].size,
        "Building clusters."
    );

    let mut simulation = Simulation::new(config.clone());
    simulation.initialize(store)?;
    let initial_energy = simulation.initial_energy().unwrap_or_default();

    write_snapshot(&simulation, INITIAL_SNAPSHOT_NAME, output_dir)?;
    let mut energy_log = EnergyLog::create(output_dir.join(ENERGY_FILE_NAME))?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Integration ===
    reporter.report(Progress::PhaseStart { name: "Integrating" });
    reporter.report(Progress::TaskStart {
        total_steps: config.total_steps() as u64,
        total_time: config.total_t,
        initial_energy,
    });

    let mut radii_files = Vec::new();
    let steps = simulation.run_to_completion(observer, |sim, record| {
        energy_log.append(record.time, record.potential, record.kinetic)?;
        if config.radii_interval > 0 && record.step % config.radii_interval == 0 {
            radii_files.push(save_radii(sim, output_dir)?);
        }
        reporter.report(Progress::StepFinished {
            step: record.step as u64,
            time: record.time,
            total_energy: record.total_energy(),
        });
        Ok(())
    })?;
    energy_log.flush()?;

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Finalization ===
    reporter.report(Progress::PhaseStart { name: "Finalizing" });
    write_snapshot(&simulation, FINAL_SNAPSHOT_NAME, output_dir)?;

    let summary = RunSummary {
        steps,
        final_time: simulation.time(),
        initial_energy,
        final_energy: simulation.energy().total(),
        radius_of_gyration: geometry::radius_of_gyration(&simulation.positions()),
        radii_files,
    };
    reporter.report(Progress::Message(format!(
        "Run finished after {} steps (t = {}): E₀ = {:.6}, E = {:.6}",
        summary.steps, summary.final_time, summary.initial_energy, summary.final_energy
    )));
    reporter.report(Progress::PhaseFinish);

    info!(
        steps = summary.steps,
        final_energy = summary.final_energy,
        energy_rows = energy_log.rows(),
        "Run workflow complete."
    );
    Ok(summary)
}

/// Writes the distance of every particle from the center of mass to
/// `Radii_<t>.txt` in `dir` and returns the path written.
pub fn save_radii(simulation: &Simulation, dir: &Path) -> Result<PathBuf, EngineError> {
    let path = dir.join(series::radii_file_name(simulation.time()));
    series::write_radii_to_path(&simulation.radii(), &path)?;
    debug!("Wrote radii to '{}'.", path.display());
    Ok(path)
}

fn write_snapshot(simulation: &Simulation, name: &str, dir: &Path) -> Result<(), EngineError> {
    let path = dir.join(format!("{name}.xyz"));
    XyzFile::write_to_path(&simulation.snapshot(name), &path)?;
    debug!("Wrote snapshot '{}'.", path.display());
    Ok(())
}
