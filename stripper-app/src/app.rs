//! Application entry point.

use anyhow::Result;
use clap::Parser;

use crate::config::{AppConfig, Command};
use crate::logging::init_logger;
use crate::output::print_summary;
use crate::setup::execution::{run_merge, run_strip};

/// Parses the command line, sets up logging and runs the selected command.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    init_logger(&config);

    log::info!("Shader Stripper starting");
    log::debug!("Loaded Config: {:?}", config);

    match &config.command {
        Command::Strip(args) => {
            let summary = run_strip(&config, args)?;
            print_summary(&summary);
        }
        Command::Merge(args) => {
            let variants = run_merge(args)?;
            log::info!(
                "Merged {} catalogs into {:?} ({} variants)",
                args.inputs.len(),
                args.output,
                variants
            );
            println!("Merged catalog: {} variants", variants);
        }
    }

    Ok(())
}
