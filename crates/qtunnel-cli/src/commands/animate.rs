//! Animate command implementation.
//!
//! Frame `t` evolves the initial configuration through `t` Trotter steps and
//! measures both particles once. The loop stops at the first frame where the
//! particles share a site.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use console::style;
use tracing::info;

use qtunnel_sim::Evolution;

use super::common::{SimArgs, lattice_row, load_config, make_rng, print_header};

/// Execute the animate command.
pub fn execute(config_path: Option<&str>, args: &SimArgs, delay_ms: u64) -> Result<()> {
    let config = load_config(config_path, args)?;
    let mut evolution = Evolution::from_config(&config)?;
    let sites = evolution.layout().register_dim();
    let mut rng = make_rng(config.seed);

    print_header("Animating", &config);
    println!();

    let mut met_at = None;
    for dist in evolution.trajectory(config.steps) {
        let sample = dist.sample_with_rng(&mut rng)?;
        let frame = dist.steps();

        if sample.tunnelled {
            println!(
                "  t={:<4} {}",
                frame,
                style(lattice_row(sites, sample.x1, '◆')).magenta().bold()
            );
            met_at = Some(frame);
            break;
        }

        println!(
            "  t={:<4} {}",
            frame,
            style(lattice_row(sites, sample.x1, '●')).cyan()
        );
        println!(
            "  {:<6} {}",
            "",
            style(lattice_row(sites, sample.x2, '○')).yellow()
        );

        if delay_ms > 0 {
            thread::sleep(Duration::from_millis(delay_ms));
        }
    }

    println!();
    match met_at {
        Some(frame) => {
            info!(frame, "particles met");
            println!(
                "{} Particles tunnelled to the same site at frame {}",
                style("✓").green().bold(),
                style(frame).yellow()
            );
        }
        None => println!(
            "{} No tunnelling observed in {} frames",
            style("•").dim(),
            config.steps
        ),
    }

    Ok(())
}
