use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db;
use crate::game::evaluator::{self, EvaluateError, LetterMatch};
use crate::game::AppState;
use crate::models::{Decision, Game, GameStatus};
use crate::notify::CompletionEvent;
use crate::{MAX_GUESSES, WORD_LENGTH};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Bad Request: Word length should be 5")]
    InvalidGuessLength,
    #[error("No game with this identifier for your username")]
    UnknownGame,
    #[error("Bad Request: Not a valid guess")]
    NotAValidGuess,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

/// What one accepted guess does to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnDecision {
    pub guess_number: i16,
    pub guesses_remaining: i16,
    pub next_status: GameStatus,
}

/// Decide the effect of a guess without touching storage.
///
/// Guessing the secret wins even when the word list does not contain it;
/// vocabulary only gates words that are not the answer. A winning last guess
/// is a win, not a loss, even though it spends the final attempt.
pub fn decide_turn(
    game: &Game,
    word: &str,
    word_in_vocabulary: bool,
) -> Result<TurnDecision, SessionError> {
    if word.chars().count() != WORD_LENGTH {
        return Err(SessionError::InvalidGuessLength);
    }

    let won = word == game.secret_word;
    if !won && !word_in_vocabulary {
        return Err(SessionError::NotAValidGuess);
    }

    let guesses_remaining = game.guesses_remaining - 1;
    let next_status = if won {
        GameStatus::Won
    } else if guesses_remaining == 0 {
        GameStatus::Lost
    } else {
        GameStatus::InProgress
    };

    Ok(TurnDecision {
        guess_number: MAX_GUESSES - guesses_remaining,
        guesses_remaining,
        next_status,
    })
}

/// How a finished game reads back, no matter how often it is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TerminalSummary {
    pub game_id: Uuid,
    pub decision: Decision,
    pub guesses_used: i16,
}

impl TerminalSummary {
    fn of(game: &Game) -> Option<Self> {
        game.state.decision().map(|decision| Self {
            game_id: game.game_id,
            decision,
            guesses_used: game.guesses_used(),
        })
    }
}

/// One played guess with its feedback, as shown to the client.
#[derive(Debug, Clone, Serialize)]
pub struct GuessReport {
    pub word: String,
    pub guess_number: i16,
    pub exact: Vec<LetterMatch>,
    pub present: Vec<LetterMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub game_id: Uuid,
    pub state: GameStatus,
    pub guesses_remaining: i16,
    pub guesses: Vec<GuessReport>,
}

/// Response body for both playing a guess and checking on a game.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PlayOutcome {
    InProgress(ProgressReport),
    Finished(TerminalSummary),
}

pub async fn start_game(state: &AppState, username: &str) -> Result<Uuid, SessionError> {
    let secret = state.dictionary.random_answer().to_string();
    let game_id = Uuid::new_v4();

    db::queries::create_game(&state.db, game_id, username, &secret).await?;
    tracing::info!("Created game {} for {}", game_id, username);

    Ok(game_id)
}

/// Play one guess. Everything from loading the game to committing the turn
/// runs under that game's lock, so concurrent submissions serialize and each
/// attempt is spent exactly once.
pub async fn submit_guess(
    state: &AppState,
    username: &str,
    game_id: Uuid,
    word: &str,
) -> Result<PlayOutcome, SessionError> {
    let word = word.trim().to_lowercase();
    if word.chars().count() != WORD_LENGTH {
        return Err(SessionError::InvalidGuessLength);
    }

    let lock = state.game_lock(game_id);
    let _guard = lock.lock().await;

    let game = db::queries::get_game(&state.db, game_id, username)
        .await?
        .ok_or(SessionError::UnknownGame)?;

    // A finished game absorbs further submissions without changing.
    if let Some(summary) = TerminalSummary::of(&game) {
        state.forget_game_lock(game_id);
        return Ok(PlayOutcome::Finished(summary));
    }

    let turn = decide_turn(&game, &word, state.dictionary.is_valid_guess(&word))?;
    db::queries::persist_turn(
        &state.db,
        game_id,
        turn.guesses_remaining,
        turn.next_status,
        turn.guess_number,
        &word,
    )
    .await?;

    if let Some(decision) = turn.next_status.decision() {
        // The terminal state is durable before anyone hears about it.
        state.notifier.dispatch(CompletionEvent {
            user: username.to_string(),
            decision,
            guesses_used: turn.guess_number,
        });
        state.forget_game_lock(game_id);
        tracing::info!(
            "Game {} finished for {}: {:?} after {} guesses",
            game_id,
            username,
            decision,
            turn.guess_number
        );
        return Ok(PlayOutcome::Finished(TerminalSummary {
            game_id,
            decision,
            guesses_used: turn.guess_number,
        }));
    }

    let guesses = guess_history(state, &game).await?;
    Ok(PlayOutcome::InProgress(ProgressReport {
        game_id,
        state: GameStatus::InProgress,
        guesses_remaining: turn.guesses_remaining,
        guesses,
    }))
}

/// Read a game without taking its lock. Finished games come back as the same
/// terminal summary every time.
pub async fn check_progress(
    state: &AppState,
    username: &str,
    game_id: Uuid,
) -> Result<PlayOutcome, SessionError> {
    let game = db::queries::get_game(&state.db, game_id, username)
        .await?
        .ok_or(SessionError::UnknownGame)?;

    if let Some(summary) = TerminalSummary::of(&game) {
        return Ok(PlayOutcome::Finished(summary));
    }

    let guesses = guess_history(state, &game).await?;
    Ok(PlayOutcome::InProgress(ProgressReport {
        game_id,
        state: game.state,
        guesses_remaining: game.guesses_remaining,
        guesses,
    }))
}

/// Re-evaluate every stored guess against the secret. Feedback is derived,
/// never stored, so the rows stay small and the evaluator stays the single
/// source of truth.
async fn guess_history(state: &AppState, game: &Game) -> Result<Vec<GuessReport>, SessionError> {
    let rows = db::queries::list_guesses(&state.db, game.game_id).await?;

    let mut guesses = Vec::with_capacity(rows.len());
    for row in rows {
        let feedback = evaluator::evaluate(&game.secret_word, &row.word)?;
        guesses.push(GuessReport {
            word: row.word,
            guess_number: row.guess_number,
            exact: feedback.exact,
            present: feedback.present,
        });
    }

    Ok(guesses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn game_with(guesses_remaining: i16, state: GameStatus) -> Game {
        Game {
            game_id: Uuid::new_v4(),
            username: "tester".to_string(),
            secret_word: "crane".to_string(),
            guesses_remaining,
            state,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    #[test]
    fn first_correct_guess_wins() {
        let game = game_with(6, GameStatus::InProgress);
        let turn = decide_turn(&game, "crane", true).unwrap();
        assert_eq!(turn.next_status, GameStatus::Won);
        assert_eq!(turn.guess_number, 1);
        assert_eq!(turn.guesses_remaining, 5);
    }

    #[test]
    fn guessing_the_secret_ignores_the_vocabulary() {
        let game = game_with(6, GameStatus::InProgress);
        let turn = decide_turn(&game, "crane", false).unwrap();
        assert_eq!(turn.next_status, GameStatus::Won);
    }

    #[test]
    fn unknown_words_are_rejected() {
        let game = game_with(6, GameStatus::InProgress);
        let err = decide_turn(&game, "zzzzz", false).unwrap_err();
        assert!(matches!(err, SessionError::NotAValidGuess));
    }

    #[test]
    fn wrong_length_is_rejected_before_anything_else() {
        let game = game_with(6, GameStatus::InProgress);
        let err = decide_turn(&game, "cran", true).unwrap_err();
        assert!(matches!(err, SessionError::InvalidGuessLength));
        let err = decide_turn(&game, "cranes", false).unwrap_err();
        assert!(matches!(err, SessionError::InvalidGuessLength));
    }

    #[test]
    fn six_wrong_guesses_lose_the_game() {
        let mut game = game_with(6, GameStatus::InProgress);
        for expected_number in 1..=6 {
            let turn = decide_turn(&game, "slate", true).unwrap();
            assert_eq!(turn.guess_number, expected_number);
            if expected_number < 6 {
                assert_eq!(turn.next_status, GameStatus::InProgress);
            } else {
                assert_eq!(turn.next_status, GameStatus::Lost);
                assert_eq!(turn.guesses_remaining, 0);
            }
            game.guesses_remaining = turn.guesses_remaining;
            game.state = turn.next_status;
        }
    }

    #[test]
    fn winning_on_the_last_guess_is_a_win_not_a_loss() {
        let game = game_with(1, GameStatus::InProgress);
        let turn = decide_turn(&game, "crane", true).unwrap();
        assert_eq!(turn.next_status, GameStatus::Won);
        assert_eq!(turn.guesses_remaining, 0);
        assert_eq!(turn.guess_number, 6);
    }

    #[test]
    fn repeating_a_guess_still_spends_an_attempt() {
        let game = game_with(4, GameStatus::InProgress);
        let turn = decide_turn(&game, "slate", true).unwrap();
        assert_eq!(turn.guesses_remaining, 3);
        assert_eq!(turn.next_status, GameStatus::InProgress);
    }

    #[test]
    fn terminal_summary_is_stable_across_reads() {
        let game = game_with(3, GameStatus::Won);
        let first = TerminalSummary::of(&game).unwrap();
        let second = TerminalSummary::of(&game).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.decision, Decision::Win);
        assert_eq!(first.guesses_used, 3);
    }

    #[test]
    fn in_progress_games_have_no_terminal_summary() {
        let game = game_with(4, GameStatus::InProgress);
        assert!(TerminalSummary::of(&game).is_none());
    }

    #[test]
    fn lost_games_summarize_with_all_guesses_spent() {
        let game = game_with(0, GameStatus::Lost);
        let summary = TerminalSummary::of(&game).unwrap();
        assert_eq!(summary.decision, Decision::Loss);
        assert_eq!(summary.guesses_used, 6);
    }
}
