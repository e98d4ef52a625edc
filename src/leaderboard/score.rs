use thiserror::Error;

use crate::models::Decision;
use crate::MAX_GUESSES;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Loss always requires 6 guesses")]
    InconsistentLossGuessCount,
    #[error("Please enter the guess number between 1 and 6 if game status is win")]
    GuessCountOutOfRange,
}

/// Points for one finished game.
///
/// A loss is worth nothing and must report all six guesses spent; anything
/// else means the two services disagree about how games end. A win pays out
/// by speed: 6 points for nailing it first try down to 1 for the sixth.
pub fn score(decision: Decision, guesses_used: i16) -> Result<i64, ScoreError> {
    match decision {
        Decision::Loss => {
            if guesses_used != MAX_GUESSES {
                return Err(ScoreError::InconsistentLossGuessCount);
            }
            Ok(0)
        }
        Decision::Win => {
            if !(1..=MAX_GUESSES).contains(&guesses_used) {
                return Err(ScoreError::GuessCountOutOfRange);
            }
            Ok(i64::from(MAX_GUESSES - guesses_used + 1))
        }
    }
}
