use anyhow::Result;
use tracing::{error, info};

use config_reloader::{Daemon, WatchConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging; VERBOSE also widens the log level
    let verbose = std::env::var(config_reloader::config::ENV_VERBOSE)
        .map(|v| v == "true")
        .unwrap_or(false);
    let log_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("config_reloader={log_level}"))
        .with_target(false)
        .init();

    info!("🦀 Starting config-reloader v{}", env!("CARGO_PKG_VERSION"));

    let config = match WatchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {e:#}");
            std::process::exit(1);
        }
    };

    info!(
        "starting with CONFIG_DIR={:?}, PROCESS_NAME={}, RELOAD_SIGNAL={:?}",
        config.directories, config.process_name, config.reload_signal
    );

    let mut daemon = Daemon::new(config);
    if let Err(e) = daemon.run().await {
        error!("❌ Daemon error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
