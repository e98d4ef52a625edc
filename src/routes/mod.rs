pub mod games;
pub mod health;
pub mod results;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::{game, leaderboard};

pub fn game_routes() -> Router<Arc<game::AppState>> {
    Router::new()
        .route("/", get(games::index))
        .route("/games", post(games::create_game).get(games::in_progress_games))
        .route("/games/statistics", get(games::statistics))
        .route(
            "/games/{game_id}",
            post(games::play_game).get(games::check_progress),
        )
        .route("/client_register", post(games::register_callback))
        .route("/health", get(health::game_health))
}

pub fn leaderboard_routes() -> Router<Arc<leaderboard::AppState>> {
    Router::new()
        .route("/results", post(results::post_result))
        .route("/leaderboard", get(results::leaderboard))
        .route("/health", get(health::leaderboard_health))
}
