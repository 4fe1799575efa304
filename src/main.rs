//! itunes-search - command-line front end for the iTunes Search API.

use clap::Parser;
use itunes_search::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays clean for --json output
    let default_level = if args.global.verbose {
        "itunes_search=debug"
    } else {
        "itunes_search=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    cli::run_command(&args)
}
