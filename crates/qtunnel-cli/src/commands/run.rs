//! Run command implementation.

use anyhow::Result;
use serde::Serialize;

use qtunnel_sim::{Distribution, Evolution, Particle, SimConfig};

use super::common::{SimArgs, load_config, print_distribution, print_header};
use crate::OutputFormat;

/// Machine-readable run report.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    config: &'a SimConfig,
    coupling: f64,
    distribution: &'a Distribution,
    marginal_1: Vec<f64>,
    marginal_2: Vec<f64>,
    coincidence_probability: f64,
    drift: f64,
}

/// Execute the run command.
pub fn execute(
    config_path: Option<&str>,
    args: &SimArgs,
    format: OutputFormat,
    top: usize,
) -> Result<()> {
    let config = load_config(config_path, args)?;
    let mut evolution = Evolution::from_config(&config)?;

    if format == OutputFormat::Table {
        print_header("Evolving", &config);
    }

    let dist = evolution.run(config.steps);

    match format {
        OutputFormat::Table => print_distribution(&dist, top),
        OutputFormat::Json => {
            let report = RunReport {
                config: &config,
                coupling: config.effective_coupling(),
                distribution: &dist,
                marginal_1: dist.marginal(Particle::First),
                marginal_2: dist.marginal(Particle::Second),
                coincidence_probability: dist.coincidence_probability(),
                drift: dist.drift(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
