use anyhow::Context;
use clap::Parser;
use weather_aligner::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("weather-aligner failed")
}
