use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use map_relay::config::Config;
use map_relay::{app, AppState};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let config = Config::load()?;
    let thread_count = config.thread_count.unwrap_or_else(num_cpus::get);

    info!("starting relay with {} threads", thread_count);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(thread_count)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> anyhow::Result<()> {
    let addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    info!("listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
