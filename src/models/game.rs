use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::MAX_GUESSES;

/// Lifecycle of a single game. Stored as snake_case in Postgres, rendered
/// with the wire labels clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum GameStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "win")]
    Won,
    #[serde(rename = "loss")]
    Lost,
}

impl GameStatus {
    /// Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }

    pub fn decision(&self) -> Option<Decision> {
        match self {
            GameStatus::Won => Some(Decision::Win),
            GameStatus::Lost => Some(Decision::Loss),
            GameStatus::InProgress => None,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Win,
    Loss,
}

/// One row of the `games` table. Never serialized to clients as-is since it
/// carries the secret word.
#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub game_id: Uuid,
    pub username: String,
    pub secret_word: String,
    pub guesses_remaining: i16,
    pub state: GameStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn guesses_used(&self) -> i16 {
        MAX_GUESSES - self.guesses_remaining
    }
}

/// One row of the `guesses` table.
#[derive(Debug, Clone, FromRow)]
pub struct Guess {
    pub game_id: Uuid,
    pub guess_number: i16,
    pub word: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_status_uses_wire_labels() {
        assert_eq!(
            serde_json::to_string(&GameStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(serde_json::to_string(&GameStatus::Won).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&GameStatus::Lost).unwrap(), "\"loss\"");
    }

    #[test]
    fn decision_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Decision::Win).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&Decision::Loss).unwrap(), "\"loss\"");
        assert_eq!(
            serde_json::from_str::<Decision>("\"loss\"").unwrap(),
            Decision::Loss
        );
    }

    #[test]
    fn terminal_states_map_to_decisions() {
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
        assert!(!GameStatus::InProgress.is_terminal());
        assert_eq!(GameStatus::Won.decision(), Some(Decision::Win));
        assert_eq!(GameStatus::Lost.decision(), Some(Decision::Loss));
        assert_eq!(GameStatus::InProgress.decision(), None);
    }

    #[test]
    fn guesses_used_counts_down_from_the_allowance() {
        let game = Game {
            game_id: Uuid::new_v4(),
            username: "tester".to_string(),
            secret_word: "crane".to_string(),
            guesses_remaining: 4,
            state: GameStatus::InProgress,
            created_at: Utc::now(),
            finished_at: None,
        };
        assert_eq!(game.guesses_used(), 2);
    }
}
