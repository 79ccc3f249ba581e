//! CLI for the plugget installer.

use clap::Parser;
use plugget_core::config::{self, RunConfig, StdioPrompter};
use plugget_core::error::FatalError;
use plugget_core::pipeline;
use plugget_core::report::{Reporter, Verbosity};

/// Fetch, verify, and install the latest Linux release of the Halcyon
/// audio plugin.
#[derive(Debug, Parser)]
#[command(name = "plugget")]
#[command(about = "Installs the latest Linux release of the Halcyon audio plugin", long_about = None)]
pub struct Cli {
    /// Only print errors; requires the install directory from the
    /// environment.
    #[arg(short, long)]
    pub quiet: bool,

    /// Show the download and extraction tools' own progress output.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Parse the process arguments and run one install.
pub fn run_from_args() -> Result<(), FatalError> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let report = Reporter::new(verbosity);

    // Resolve the target directory before any network activity.
    let env_dir = std::env::var(config::INSTALL_DIR_ENV).ok();
    let target_dir = config::resolve_target_dir(env_dir.as_deref(), &report, &mut StdioPrompter)?;
    tracing::debug!("install target {}", target_dir.display());

    let run_config = RunConfig {
        target_dir,
        verbosity,
    };
    let installed = pipeline::run(&run_config, &report)?;
    report.success(&format!(
        "installed {} plugin file(s) into {}",
        installed,
        run_config.target_dir.display()
    ));
    Ok(())
}
