use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "ljcluster developers",
    version,
    about = "ljcluster - Molecular dynamics of two colliding Lennard-Jones clusters.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel force evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build two clusters, integrate them to the configured total time and write all outputs.
    Run(RunArgs),
    /// Compute the distance of every particle in an XYZ snapshot from its center of mass.
    Radii(RadiiArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to a configuration file in TOML format. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the cluster templates, one file per cluster size (e.g. `75.txt`).
    #[arg(short = 't', long, required = true, value_name = "DIR")]
    pub template_dir: PathBuf,

    /// Experiment directory receiving the snapshots, energy series and radii dumps.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Delete the files already present in the experiment directory before running.
    #[arg(long)]
    pub clean: bool,

    // --- Simulation Overrides ---
    /// Override the Lennard-Jones sigma from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub sigma: Option<f64>,

    /// Override the integration time step.
    #[arg(long, value_name = "FLOAT")]
    pub delta_t: Option<f64>,

    /// Override the total simulated time.
    #[arg(long, value_name = "FLOAT")]
    pub total_t: Option<f64>,

    /// Override how often (in steps) a radii dump is written; 0 disables it.
    #[arg(long, value_name = "INT")]
    pub radii_interval: Option<usize>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S cluster1.size=13
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `radii` subcommand.
#[derive(Args, Debug)]
pub struct RadiiArgs {
    /// Path to the input XYZ snapshot.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output radii file. Radii are printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
