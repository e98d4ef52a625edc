pub mod score;
pub mod store;

use store::ScoreStore;

/// Shared state for the leaderboard server. Scores live in memory; the
/// store starts empty on every boot and fills from pushed results.
pub struct AppState {
    pub scores: ScoreStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            scores: ScoreStore::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
