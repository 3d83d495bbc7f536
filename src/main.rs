use cvmaker_notifier::{
    config::Config,
    services::broker_service::{connect_with_retry, BrokerService},
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    info!(rabbitmq = ?config.rabbitmq, telegram = ?config.telegram, "Configuration loaded");

    let state = AppState::new(config)?;

    let connection = connect_with_retry(&state.config.rabbitmq).await?;
    let broker = BrokerService::open(connection, &state.config.rabbitmq.queue).await?;

    let result = broker.consume(&state.handler, shutdown_signal()).await;

    if let Err(e) = broker.close().await {
        tracing::warn!(error = %e, "Failed to close RabbitMQ connection");
    }

    result?;
    info!("cvmaker notifier stopped.");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
}
