//! Config command implementation.

use anyhow::Result;

use super::common::{SimArgs, load_config};

/// Print the effective configuration after file, environment and flags.
pub fn execute(config_path: Option<&str>, args: &SimArgs) -> Result<()> {
    let config = load_config(config_path, args)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
