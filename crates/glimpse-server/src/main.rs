use glimpse_server::{build_app, configuration::Settings, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the environment may already be set
    dotenv::dotenv().ok();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Refuse to start without the generation key
    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;

    let server = settings.server.clone();
    let state = AppState::from_settings(settings)?;
    info!(vision = state.orchestrator.vision_enabled(), "backends configured");

    let app = build_app(state, &server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
