pub mod report;
pub mod sample;

use anyhow::Result;
use districtwalk::{Config, Plan, Tolerance, init};

use crate::cli::InputArgs;

/// Load the starting plan (from `--graph`, or Toylandia) and the configuration.
pub fn load_inputs(input: &InputArgs) -> Result<(Plan, Config)> {
    let plan = match &input.graph {
        Some(path) => Plan::read_from_graph_json(path)?,
        None => init::toylandia()?,
    };

    let mut config = match &input.config {
        Some(path) => Config::read_from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(tolerance) = input.tolerance {
        config.filter.tolerance = Tolerance::Relative(tolerance);
    }
    config.validate()?;

    Ok((plan, config))
}
