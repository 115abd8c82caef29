use crate::cli::RadiiArgs;
use crate::error::{CliError, Result};
use ljcluster::core::io::series;
use ljcluster::core::io::traits::SnapshotFile;
use ljcluster::core::io::xyz::XyzFile;
use ljcluster::core::utils::geometry;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: RadiiArgs) -> Result<()> {
    info!("Loading snapshot from {:?}", &args.input);
    let snapshot = XyzFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let com = geometry::center_of_mass(&snapshot.positions);
    let radii = geometry::radii(&snapshot.positions, &com);
    info!(
        particles = radii.len(),
        "Computed radii about center of mass ({}, {}, {}).",
        com.x,
        com.y,
        com.z
    );

    match &args.output {
        Some(path) => {
            series::write_radii_to_path(&radii, path).map_err(|e| CliError::Other(e.into()))?;
            println!("✓ Radii for {} particle(s) written to: {}", radii.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            series::write_radii(&radii, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
