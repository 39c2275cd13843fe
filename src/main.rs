use detran_counter::{
    AppState, Config, CounterState, FileStore, dates::today_in_tz, router, spawn_rollover_watcher,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store = FileStore::new(config.data_dir.clone());
    tokio::fs::create_dir_all(store.dir()).await?;
    info!(data_dir = %store.dir().display(), "using data directory");

    let state = AppState::new(CounterState::open(Box::new(store), today_in_tz()));
    let watcher = spawn_rollover_watcher(state.clone(), config.rollover_poll);
    let app = router(state);

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    watcher.abort();
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
