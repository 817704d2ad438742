//! # Signing Portal Runtime
//!
//! Startup sequence:
//!
//! 1. Initialize telemetry (`PORTAL_LOG_LEVEL`, `PORTAL_JSON_LOGS`)
//! 2. Load configuration (`PORTAL_CONFIG` file, then `PORTAL_*` overrides)
//! 3. Build the service container
//! 4. Read every client record once and report the portal's state
//!
//! A record that cannot be read stops startup; nothing is written.

use anyhow::{Context, Result};
use portal_runtime::{PortalConfig, PortalContainer};
use portal_telemetry::{init_telemetry, log_client_event, log_event, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_binary("portal-runtime"))
        .context("failed to initialize telemetry")?;

    let config = PortalConfig::load().context("failed to load portal configuration")?;
    info!(
        domain = %config.identity.portal_domain,
        backend = ?config.records.backend,
        "Configuration loaded"
    );

    let portal = PortalContainer::new(config).context("failed to build portal services")?;

    let clients = portal
        .admin()
        .list_clients(None)
        .await
        .context("failed to read client records")?;

    let pending: usize = clients.iter().map(|c| c.pending.len()).sum();
    let signatures: usize = clients.iter().map(|c| c.history.len()).sum();
    for client in &clients {
        if client.signature_needed && client.quote_folder_id.is_none() {
            log_client_event!(
                warn,
                "runtime",
                "Legacy signature flag set without a quote folder",
                client.id
            );
        }
    }

    log_event!(
        info,
        "runtime",
        "Portal ready",
        clients = clients.len(),
        pending_requests = pending,
        signatures = signatures
    );
    Ok(())
}
