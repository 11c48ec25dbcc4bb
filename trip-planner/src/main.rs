use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_planner::config::PlannerConfig;
use trip_planner::routing::{MockRoutingProvider, RoutingClient};
use trip_planner::secrets::{ApiKeyCache, EnvSecretStore};
use trip_planner::web::{AppState, RoutingBackend, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log level comes from RUST_LOG, defaulting to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = PlannerConfig::from_env();
    info!(?config, "Loaded configuration");

    let routing = match &config.mock_routes_dir {
        Some(dir) => {
            let mock = MockRoutingProvider::new(dir)?;
            info!(
                dir = %dir.display(),
                destinations = mock.available_destinations().await.len(),
                "Using mock routing data"
            );
            RoutingBackend::Mock(mock)
        }
        None => {
            if config.api_key_secret_name.is_none() && config.env_api_key.is_none() {
                warn!("Neither INRIX_SECRET_ARN nor INRIX_API_KEY is set. Routing will use fallback estimates.");
            }
            let keys = ApiKeyCache::new(
                EnvSecretStore,
                config.api_key_secret_name.clone(),
                config.env_api_key.clone(),
            );
            RoutingBackend::Live(RoutingClient::new(config.routing(), keys)?)
        }
    };

    let addr = config.bind_addr;
    let app = create_router(AppState::new(routing, config));

    info!(%addr, "Trip planner listening");
    info!("  GET  /health                - Health check");
    info!("  POST /trip/eta              - Build trip ETA matrix");
    info!("  POST /trip/itinerary/check  - Validate an itinerary");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
