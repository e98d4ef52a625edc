use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint for the game server
pub async fn game_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "game-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Health check endpoint for the leaderboard server
pub async fn leaderboard_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "leaderboard-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
