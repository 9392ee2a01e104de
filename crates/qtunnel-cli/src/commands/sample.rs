//! Sample command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qtunnel_sim::{Counts, Evolution, Sample};

use super::common::{SimArgs, bar, load_config, make_rng, print_header};

/// Execute the sample command.
pub fn execute(config_path: Option<&str>, args: &SimArgs, shots: u64) -> Result<()> {
    let config = load_config(config_path, args)?;
    if shots == 0 {
        anyhow::bail!("--shots must be at least 1");
    }
    let mut evolution = Evolution::from_config(&config)?;

    print_header("Sampling", &config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Applying {} Trotter steps...", config.steps));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let dist = evolution.run(config.steps);
    spinner.finish_and_clear();

    let mut rng = make_rng(config.seed);
    let progress = ProgressBar::new(shots);
    progress.set_style(
        ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} shots")?,
    );
    let mut counts = Counts::default();
    for _ in 0..shots {
        counts.record(&dist.sample_with_rng(&mut rng)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.shots
    );
    for (index, count) in counts.sorted() {
        let sample = Sample::from_index(dist.layout(), index);
        let fraction = count as f64 / counts.shots as f64;
        let label = format!("({}, {})", sample.x1, sample.x2);
        let label = if sample.tunnelled {
            style(label).magenta()
        } else {
            style(label).cyan()
        };
        println!(
            "  {:>10}: {:>6} ({:>5.1}%) {}",
            label,
            count,
            fraction * 100.0,
            style(bar(fraction, 40.0)).green()
        );
    }

    println!(
        "\n  Tunnelled: {} of {} shots ({})",
        style(counts.tunnelled).magenta().bold(),
        counts.shots,
        style(format!("{:.2}%", counts.tunnelled_fraction() * 100.0)).yellow()
    );
    println!(
        "  Expected:  {:.2}%",
        dist.coincidence_probability() * 100.0
    );

    Ok(())
}
