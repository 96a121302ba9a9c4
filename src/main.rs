use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use househunt_backend::config::Config;
use househunt_backend::db::{self, Repository};
use househunt_backend::media::HttpMediaHost;
use househunt_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HouseHunt Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Share links point at {}", config.public_base_url);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (HOUSEHUNT_API_PSK). Authentication is disabled!");
    }
    if config.media.delete_url.is_none() {
        tracing::warn!(
            "No media deletion backend configured (HOUSEHUNT_MEDIA_DELETE_URL). Hosted files will be orphaned on delete"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let media = Arc::new(HttpMediaHost::new(config.media.clone())?);

    let bind_addr = config.bind_addr;
    let app = create_router(AppState::new(repo, media, config));

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
