//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use qtunnel_sim::{Distribution, EvolutionMode, Particle, SimConfig, TrotterOrder};

/// Simulation flags shared by every command that evolves a state.
#[derive(Args, Debug, Clone, Default)]
pub struct SimArgs {
    /// Qubits per particle register (lattice of 2^N sites)
    #[arg(short = 'n', long)]
    pub width: Option<usize>,

    /// Time increment per Trotter step
    #[arg(long)]
    pub dt: Option<f64>,

    /// Number of Trotter steps (frames for `animate`)
    #[arg(short = 't', long)]
    pub steps: Option<usize>,

    /// Potential coupling constant (default 50·2N)
    #[arg(long)]
    pub coupling: Option<f64>,

    /// Product-formula order (first, second)
    #[arg(long)]
    pub order: Option<TrotterOrder>,

    /// Evolution mode (full, incremental)
    #[arg(long)]
    pub mode: Option<EvolutionMode>,

    /// Renormalize the state when numeric drift is detected
    #[arg(long)]
    pub renormalize: bool,

    /// Seed for sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SimArgs {
    /// Layer the flags on top of `config`.
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(width) = self.width {
            config.register_width = width;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(coupling) = self.coupling {
            config.coupling = Some(coupling);
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.renormalize {
            config.renormalize = true;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

/// Build the effective configuration: file, then environment, then flags.
pub fn load_config(path: Option<&str>, args: &SimArgs) -> Result<SimConfig> {
    let mut config = match path {
        Some(path) => {
            if !Path::new(path).exists() {
                anyhow::bail!("Config file not found: {path}");
            }
            SimConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {path}"))?
        }
        None => SimConfig::default(),
    };
    config.apply_env();
    args.apply(&mut config);
    config.validate().context("Invalid simulation parameters")?;
    Ok(config)
}

/// Seeded RNG if the configuration has a seed, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Print the header line describing a simulation.
pub fn print_header(action: &str, config: &SimConfig) {
    println!(
        "{} {} N={} ({} sites), dt={}, T={}, C={}, {:?}/{:?}",
        style("→").cyan().bold(),
        action,
        style(config.register_width).yellow(),
        1usize << config.register_width,
        config.dt,
        style(config.steps).yellow(),
        config.effective_coupling(),
        config.order,
        config.mode,
    );
}

/// Horizontal bar for a probability in [0, 1].
pub fn bar(p: f64, scale: f64) -> String {
    "█".repeat((p * scale).round().max(0.0) as usize)
}

/// Print the most probable joint outcomes, both marginals and the
/// coincidence probability.
pub fn print_distribution(dist: &Distribution, top: usize) {
    println!(
        "\n{} Joint distribution after {} steps:",
        style("✓").green().bold(),
        dist.steps()
    );
    for (sample, p) in dist.ranked().into_iter().take(top) {
        let label = format!("({}, {})", sample.x1, sample.x2);
        let label = if sample.tunnelled {
            style(label).magenta()
        } else {
            style(label).cyan()
        };
        println!(
            "  {:>10}: {:>7.3}% {}",
            label,
            p * 100.0,
            style(bar(p, 50.0)).green()
        );
    }

    for (name, particle) in [("particle 1", Particle::First), ("particle 2", Particle::Second)] {
        println!("\n  Marginal {}:", style(name).bold());
        for (x, p) in dist.marginal(particle).iter().enumerate() {
            println!("    x={x:<3} {:>7.3}% {}", p * 100.0, style(bar(*p, 40.0)).blue());
        }
    }

    println!(
        "\n  Coincidence probability: {}",
        style(format!("{:.4}%", dist.coincidence_probability() * 100.0)).yellow()
    );
    println!("  Probability drift:       {:.2e}", dist.drift());
}

/// One lattice row with a particle marker at `position`.
pub fn lattice_row(sites: usize, position: usize, marker: char) -> String {
    (0..sites)
        .map(|x| if x == position { marker } else { '·' })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}
