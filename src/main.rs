mod auth;
mod cli;
mod config;
mod error;
mod normalize;
mod output;
mod providers;
mod synthesis;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting jenkins-dash");
    cli.execute().await?;

    Ok(())
}
