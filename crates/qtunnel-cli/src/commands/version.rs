//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - two-particle quantum tunnelling simulator",
        style("qtunnel").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qtunnel-sim  State vector, QFT, controlled phases, Trotter evolution");
    println!("  qtunnel-cli  Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
