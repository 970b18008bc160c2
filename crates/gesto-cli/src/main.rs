//! Gesto CLI: replay user-interaction scenarios
//!
//! ## Usage
//!
//! ```bash
//! gesto run upload.yaml                     # Print the event log and files
//! gesto run upload.yaml --format json       # Machine-readable report
//! gesto accept "image/*,.pdf" a.png b.txt   # Check files against accept
//! ```

use clap::Parser;
use gesto_cli::{
    handlers, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(config.verbosity);
    match config.color {
        ColorChoice::Always => console::set_colors_enabled(true),
        ColorChoice::Never => console::set_colors_enabled(false),
        ColorChoice::Auto => {}
    }

    let rendered = match &cli.command {
        Commands::Run(args) => handlers::execute_run(&config, args)?,
        Commands::Accept(args) => handlers::execute_accept(&config, args)?,
    };
    Reporter::new(config.color.should_color(), config.verbosity.is_quiet()).emit(&rendered);
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
