pub mod context;
pub mod http;
pub mod server_state;

use context::FrontendContext;
use std::sync::Arc;
use tracing::{error, info};

use crate::shared::config::Settings;

/// Serves HTTP until Ctrl-C, then drains open connections and returns.
pub async fn start_all(settings: &Settings) -> anyhow::Result<()> {
    let ctx = FrontendContext::from_settings(settings)?;

    let state = Arc::clone(&ctx.server_state);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(target: "marquee::server", "Shutdown signal received");
                state.signal_shutdown();
            }
            Err(e) => {
                error!(target: "marquee::server", error = %e, "Failed to listen for shutdown signal");
            }
        }
    });

    http::listener::run_http_server(Arc::clone(&ctx), &settings.server).await
}
