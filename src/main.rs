use marquee::frontend::start_all;
use marquee::logging;
use marquee::shared::config::CONFIG;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(&CONFIG.logging)?;

    info!(
        seed = %CONFIG.store.seed_path,
        addr = %CONFIG.server.http_addr,
        "Marquee is starting..."
    );
    start_all(&CONFIG).await?;

    info!("Marquee stopped");
    Ok(())
}
