use anyhow::{Context, Result};
use clap::Parser;
use mx_clabe::cli::{self, Cli};
use mx_clabe::Config;
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries results, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,mx_clabe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let registry = config.registry().context("Failed to load bank catalogue")?;
    if let Some(path) = &config.catalogue_path {
        tracing::info!(path = %path.display(), banks = registry.len(), "loaded custom bank catalogue");
    }

    let mut stdout = std::io::stdout().lock();
    let ok = cli::run(&cli.command, &registry, &mut stdout)?;
    stdout.flush()?;

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
