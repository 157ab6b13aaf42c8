//! parlord - the parlor chat relay.
//!
//! Usage: `parlord [config.toml]`

use parlor::config::Config;
use parlor::network::Relay;
use parlor::telemetry;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info", true);

    // Load configuration
    let explicit = std::env::args().nth(1);
    let config = match &explicit {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG_PATH),
    }
    .map_err(|e| {
        error!(
            path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH),
            error = %e,
            "Failed to load config"
        );
        e
    })?;

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting parlord"
    );

    if config.admin.is_default_password() {
        warn!("admin password is the built-in default; set [admin] password in the config");
    }

    let relay = Relay::start(&config).await?;
    info!(address = %relay.local_addr(), "relay listening");

    let hub = std::sync::Arc::clone(relay.hub());
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutdown requested");
            hub.shutdown.cancel();
        }
        _ = hub.shutdown.cancelled() => {}
    }

    relay.wait().await?;
    info!("parlord stopped");
    Ok(())
}
