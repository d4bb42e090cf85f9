use app::{Config, StartupError, build_services, create_app, logging};
use clap::Parser;
use services::Clock;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    logging::init_tracing(&config.log_level);

    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let services = build_services(&config, Clock::default()).await?;
    let app = create_app(services);

    let addr = config.bind_address;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "assess-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
