use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tokio::sync::RwLock;

use super::score::{score, ScoreError};
use crate::models::Decision;

/// Running totals for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRecord {
    pub total_score: i64,
    pub game_count: i64,
}

impl ScoreRecord {
    pub fn average(&self) -> f64 {
        self.total_score as f64 / self.game_count as f64
    }
}

/// Ranking entry ordered by average score, best first. Averages compare as
/// exact rationals so 1/3 and 2/6 really tie, and ties fall back to the
/// username ascending.
#[derive(Debug, Clone)]
struct RankKey {
    record: ScoreRecord,
    user: String,
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // a/b > c/d  <=>  a*d > c*b  while game counts stay positive
        let left = i128::from(self.record.total_score) * i128::from(other.record.game_count);
        let right = i128::from(other.record.total_score) * i128::from(self.record.game_count);
        right
            .cmp(&left)
            .then_with(|| self.user.cmp(&other.user))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

#[derive(Debug, Default)]
struct ScoreBoard {
    records: HashMap<String, ScoreRecord>,
    ranking: BTreeSet<RankKey>,
}

/// One row of the leaderboard as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub average: f64,
}

/// In-memory score aggregate keyed by username. Totals and the ranking move
/// together under one write lock, so readers never see a half-applied result.
#[derive(Debug, Default)]
pub struct ScoreStore {
    board: RwLock<ScoreBoard>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one game result into the user's running record. A result that
    /// fails the scoring rules changes nothing.
    pub async fn record_result(
        &self,
        user: &str,
        decision: Decision,
        guesses_used: i16,
    ) -> Result<ScoreRecord, ScoreError> {
        let points = score(decision, guesses_used)?;

        let mut board = self.board.write().await;

        let previous = board.records.get(user).copied();
        if let Some(prev) = previous {
            board.ranking.remove(&RankKey {
                record: prev,
                user: user.to_string(),
            });
        }

        let updated = ScoreRecord {
            total_score: previous.map_or(0, |p| p.total_score) + points,
            game_count: previous.map_or(0, |p| p.game_count) + 1,
        };
        board.records.insert(user.to_string(), updated);
        board.ranking.insert(RankKey {
            record: updated,
            user: user.to_string(),
        });

        Ok(updated)
    }

    /// Best `limit` users by average score.
    pub async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let board = self.board.read().await;
        board
            .ranking
            .iter()
            .take(limit)
            .map(|key| LeaderboardEntry {
                user: key.user.clone(),
                average: key.record.average(),
            })
            .collect()
    }
}
