use anyhow::Result;
use clap::Parser;

use vipsgen::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so listings and reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().execute()
}
