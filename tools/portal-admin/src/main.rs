//! Portal-Admin entry point.

use anyhow::{Context, Result};
use clap::Parser;
use portal_admin::{execute, Cli};
use portal_runtime::{PortalConfig, PortalContainer, StoreBackend};
use portal_telemetry::{init_telemetry, TelemetryConfig};

fn load_config(cli: &Cli) -> Result<PortalConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = PortalConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => PortalConfig::load()?,
    };
    if let Some(store) = &cli.store {
        config.records.backend = StoreBackend::JsonFile;
        config.records.path = store.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::for_binary("portal-admin");
    if std::env::var("PORTAL_LOG_LEVEL").is_err() && std::env::var("RUST_LOG").is_err() {
        telemetry.log_level = "warn".to_string();
    }
    let _telemetry = init_telemetry(telemetry).context("failed to initialize telemetry")?;

    let config = load_config(&cli).context("failed to load portal configuration")?;
    if config.records.backend == StoreBackend::Memory {
        eprintln!("Warning: no record store configured, changes will not be saved");
    }
    let portal = PortalContainer::new(config).context("failed to build portal services")?;

    let output = execute(&portal.admin(), cli.command).await?;
    println!("{output}");
    Ok(())
}
