use std::process::ExitCode;
use std::sync::Arc;

use deck_server::{telemetry, AppState, ServerConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "deck server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    info!(?config, "starting deck server");

    let builder = config.service_builder();
    let service = tokio::task::spawn_blocking(move || builder.build()).await??;
    info!(%service, "deck service opened");

    let state = Arc::new(AppState {
        service,
        static_dir: config.static_dir.clone(),
    });
    let app = deck_server::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(state) {
        Ok(state) => state.service.close().await?,
        Err(_) => warn!("deck service still in use at shutdown; skipping clean close"),
    }
    info!("deck server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
