// Entrypoint for the batch client.
// - Keeps `main` small: parse flags into a run configuration and hand it
//   to the batch loop.
// - Returns `anyhow::Result` so the first failed file exits non-zero.

use clap::Parser;

use birdnet_cli::batch;
use birdnet_cli::config::{Args, RunConfig};

fn main() -> anyhow::Result<()> {
    // Log filtering is driven by RUST_LOG; progress output for the batch
    // itself goes to stdout regardless.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = RunConfig::from_args(Args::parse());
    batch::run(&config)
}
