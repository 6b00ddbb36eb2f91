use anyhow::{Context, Result};
use clap::Parser;
use envlayer::Fillable;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::Cli;
use config::AppConfig;

/// Initialize tracing on stderr, keeping stdout for the printed config
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let prefix = cli.settings.env_prefix.clone();
    envlayer::install(cli.settings);

    debug!(
        "Environment variables read:\n{}",
        AppConfig::schema().usage(&prefix, &envlayer::UpperSnake)
    );

    let mut config = AppConfig::default();
    let report = envlayer::fill(&mut config).context("Failed to load configuration")?;

    for status in report.env_files.iter().filter(|status| !status.loaded) {
        debug!(
            path = %status.path.display(),
            error = status.error.as_deref().unwrap_or_default(),
            "Env file skipped"
        );
    }
    info!(
        host = %config.server.host,
        port = config.server.port,
        debug = config.debug,
        "Configuration loaded"
    );

    let rendered = serde_yaml::to_string(&config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
