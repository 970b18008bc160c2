//! Run command handler

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use crate::RunArgs;
use gesto::Scenario;
use tracing::info;

/// Load the scenario, run it and render the report
pub fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<String> {
    let scenario = Scenario::from_path(&args.scenario)?;
    info!(path = %args.scenario.display(), name = %scenario.name, "running scenario");
    let report = scenario.run()?;
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.render_report(&report, args.format.into())
}
