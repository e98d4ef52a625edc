use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use wordle_backend::config::GameServerConfig;
use wordle_backend::dictionary::Dictionary;
use wordle_backend::game::AppState;
use wordle_backend::notify::Notifier;
use wordle_backend::{db, routes};

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

    tracing::info!("Starting game server...");

    // Load configuration
    let config = GameServerConfig::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect to database
    let db = db::create_pool(config.database_url(), config.database.max_connections).await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database migrations completed");

    // Load word lists; without answers there is nothing to play
    let dictionary =
        Dictionary::load(&config.words.answers_path, &config.words.valid_guesses_path).await?;
    tracing::info!(
        "Loaded {} answers and {} valid guesses",
        dictionary.answer_count(),
        dictionary.valid_guess_count()
    );

    // Shared HTTP client for pushing completion events
    let http_client = reqwest::Client::builder()
        .timeout(config.notify.delivery_timeout())
        .build()?;

    // Delivery worker picks events off a queue so request handlers never wait
    // on callback endpoints
    let notifier = Notifier::spawn(db.clone(), http_client, config.notify.clone());

    let state = Arc::new(AppState::new(db, dictionary, notifier));

    let app = routes::game_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Game server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
