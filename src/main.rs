use account_service::{
    app,
    error::StartupError,
    logging,
    service::config::{ConfigService, ConfigServiceImpl},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    let config = ConfigServiceImpl::new().values().clone();
    logging::init(config.log_json);

    let state = AppState::new(config.clone()).await.map_err(|err| {
        tracing::error!(error = %err, "database initialization failed");
        StartupError::Database(err)
    })?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    tracing::info!(addr = %bind_addr, port = state.config().port(), "account service listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("account service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
