#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod commands;

use args::Args;
use clap::Parser;
use switchboard_config::Config;
use switchboard_host::HostBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    switchboard_telemetry::init(&config.telemetry, args.log.as_deref())?;

    tracing::debug!(
        config_path = ?args.config.as_deref().map(std::path::Path::display),
        "starting switchboard"
    );

    let host = HostBuilder::from_config(&config)?.build();

    commands::run(&host, args.command).await
}
