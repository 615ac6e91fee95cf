use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::frontend::context::FrontendContext;
use crate::shared::config::ServerConfig;

use super::handler::handle_request;

pub async fn run_http_server(ctx: Arc<FrontendContext>, cfg: &ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg.http_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!(target: "marquee::http", "HTTP server running at http://{addr}/");

    let keep_alive = cfg.keep_alive;
    // 0 or unset means unlimited
    let connection_semaphore = cfg
        .max_connections
        .filter(|max| *max > 0)
        .map(|max| Arc::new(Semaphore::new(max)));

    loop {
        if ctx.server_state.is_shutting_down() {
            info!(target: "marquee::http", "HTTP server shutting down, not accepting new connections");
            break;
        }

        let permit = match &connection_semaphore {
            Some(semaphore) => match Arc::clone(semaphore).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => break,
            },
            None => None,
        };

        let accept_result = tokio::select! {
            result = listener.accept() => result,
            _ = wait_for_shutdown(&ctx) => {
                info!(target: "marquee::http", "HTTP server shutting down, stopping accept loop");
                break;
            }
        };

        let (stream, peer_addr) = match accept_result {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(target: "marquee::http", "Failed to accept HTTP connection: {}", e);
                continue;
            }
        };
        debug!(target: "marquee::http", peer = %peer_addr, "Accepted connection");
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&ctx);

        tokio::spawn(async move {
            let mut builder = hyper::server::conn::http1::Builder::new();
            builder.keep_alive(keep_alive);

            if let Err(err) = builder
                .serve_connection(
                    io,
                    service_fn(move |req| handle_request(req, Arc::clone(&ctx))),
                )
                .await
            {
                let text = err.to_string();
                if !text.contains("connection closed")
                    && !text.contains("broken pipe")
                    && !text.contains("Connection reset")
                {
                    warn!(target: "marquee::http", error = ?err, "Error serving connection");
                }
            }
            // Released when the connection closes
            drop(permit);
        });
    }

    if ctx.server_state.is_shutting_down() {
        info!(target: "marquee::http", "HTTP server waiting for active connections to complete...");
        tokio::time::sleep(Duration::from_millis(cfg.shutdown_grace_ms)).await;
    }

    info!(target: "marquee::http", "HTTP server shutdown complete");
    Ok(())
}

async fn wait_for_shutdown(ctx: &FrontendContext) {
    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if ctx.server_state.is_shutting_down() {
            return;
        }
    }
}
