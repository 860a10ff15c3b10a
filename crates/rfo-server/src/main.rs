//! `rfo-server` binary.
//!
//! Takes no CLI arguments (configuration is environment-only, per §6 of the
//! design) and exits with a nonzero status on bind, listen, or accept
//! failure.

use rfo_core::ServerConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = ServerConfig::from_env();
    tracing::info!(target: "rfo", port = config.port, "rfo-server starting");

    if let Err(err) = rfo_server::accept::run(config.port) {
        tracing::error!(target: "rfo", error = %err, "server failed to start");
        std::process::exit(1);
    }
}
