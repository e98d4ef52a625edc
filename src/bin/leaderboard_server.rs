use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use wordle_backend::config::LeaderboardConfig;
use wordle_backend::leaderboard::AppState;
use wordle_backend::notify::handshake;
use wordle_backend::routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordle_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting leaderboard server...");

    // Load configuration
    let config = LeaderboardConfig::from_env()?;
    tracing::info!("Configuration loaded");

    // Tell the game server where to push results. Runs alongside the server
    // and keeps retrying until registration lands, even when the game server
    // boots after us.
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let handshake = tokio::spawn(handshake::register_with_game_server(
        http_client,
        config.register_url(),
        config.results_url(),
    ));

    let state = Arc::new(AppState::new());

    let app = routes::leaderboard_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Leaderboard listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    // The handshake never outlives the server.
    handshake.abort();

    Ok(())
}
