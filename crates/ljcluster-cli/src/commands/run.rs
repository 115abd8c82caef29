use crate::cli::RunArgs;
use crate::config::PartialSimulationConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ljcluster::{
    core::io::template::DirectoryTemplateStore,
    engine::{observer::NullObserver, progress::ProgressReporter},
    workflows,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialSimulationConfig::from_file(path)?,
        None => {
            info!("No configuration file given, using built-in defaults.");
            PartialSimulationConfig::default()
        }
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    debug!("Final simulation configuration: {:?}", config);

    prepare_experiment_dir(&args.output, args.clean)?;
    let store = DirectoryTemplateStore::new(&args.template_dir);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting collision of clusters {}:{} ({} steps)...",
        config.clusters[0].size,
        config.clusters[1].size,
        config.total_steps()
    );
    info!("Invoking the cluster run workflow...");

    let summary =
        workflows::run::run(&config, &store, &args.output, &NullObserver, &reporter)?;

    println!(
        "✓ Run complete after {} steps (t = {}). E₀ = {:.6}, final E = {:.6}.",
        summary.steps, summary.final_time, summary.initial_energy, summary.final_energy
    );
    if let Some(rg) = summary.radius_of_gyration {
        println!("  Final radius of gyration: {:.4}", rg);
    }
    if !summary.radii_files.is_empty() {
        println!("  Wrote {} radii dump(s).", summary.radii_files.len());
    }
    println!("  Outputs written to: {}", args.output.display());

    Ok(())
}

/// Creates the experiment directory, or empties it of files when `clean` is set.
///
/// Existing files are otherwise kept; the workflow starts a fresh `Energy.txt`.
fn prepare_experiment_dir(dir: &Path, clean: bool) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Experiment path '{}' exists and is not a directory.",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;

    if clean {
        let mut removed = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        info!("Cleaned {} file(s) from {:?}.", removed, dir);
    }
    Ok(())
}
