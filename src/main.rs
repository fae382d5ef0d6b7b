use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinema_tickets::{
    app,
    config::{Config, LogFormat},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let filter = EnvFilter::new(&config.app.rust_log);
    match config.app.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    info!(
        environment = %config.app.environment,
        production = config.is_production(),
        "Starting Cinema Tickets API"
    );

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .with_context(|| {
            format!("invalid listen address {}:{}", config.app.host, config.app.port)
        })?;

    let state = AppState::new(config).await?;
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
