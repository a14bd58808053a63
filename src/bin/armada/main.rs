//! Armada CLI - brute-force build-matrix testing for C and C++ libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use armada::util::Shell;
use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("armada=debug")
    } else {
        EnvFilter::new("armada=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(cli.verbose, cli.no_color);
    let config = cli.into_run_config();

    let report = armada::ops::run_matrix(&config, &shell)?;
    println!("{}", report);

    Ok(())
}
