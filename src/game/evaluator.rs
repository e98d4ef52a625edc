use serde::Serialize;
use thiserror::Error;

use crate::WORD_LENGTH;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluateError {
    #[error("words must be exactly {WORD_LENGTH} letters, got secret {secret_len} and guess {guess_len}")]
    InvalidLength { secret_len: usize, guess_len: usize },
}

/// One matched letter and where it sat in the guess (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterMatch {
    pub position: usize,
    pub letter: char,
}

/// Positional feedback for a single guess against a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// Right letter in the right position.
    pub exact: Vec<LetterMatch>,
    /// Right letter in the wrong position, after exact matches have consumed
    /// their secret letters.
    pub present: Vec<LetterMatch>,
}

/// Score a guess against a secret in two passes.
///
/// Pass one fixes every exact positional match and consumes those secret
/// letters. Pass two walks the remaining guess letters left to right and
/// pairs each with the first unconsumed occurrence in the secret, so a
/// letter the guess repeats more often than the secret holds it is only
/// credited as often as the secret can pay for it.
pub fn evaluate(secret: &str, guess: &str) -> Result<Feedback, EvaluateError> {
    let secret_chars: Vec<char> = secret.chars().collect();
    let guess_chars: Vec<char> = guess.chars().collect();

    if secret_chars.len() != WORD_LENGTH || guess_chars.len() != WORD_LENGTH {
        return Err(EvaluateError::InvalidLength {
            secret_len: secret_chars.len(),
            guess_len: guess_chars.len(),
        });
    }

    let mut secret_used = [false; WORD_LENGTH];
    let mut guess_used = [false; WORD_LENGTH];

    let mut exact = Vec::new();
    for i in 0..WORD_LENGTH {
        if guess_chars[i] == secret_chars[i] {
            secret_used[i] = true;
            guess_used[i] = true;
            exact.push(LetterMatch {
                position: i + 1,
                letter: guess_chars[i],
            });
        }
    }

    let mut present = Vec::new();
    for i in 0..WORD_LENGTH {
        if guess_used[i] {
            continue;
        }
        for j in 0..WORD_LENGTH {
            if !secret_used[j] && secret_chars[j] == guess_chars[i] {
                secret_used[j] = true;
                present.push(LetterMatch {
                    position: i + 1,
                    letter: guess_chars[i],
                });
                break;
            }
        }
    }

    Ok(Feedback { exact, present })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pairs: &[(usize, char)]) -> Vec<LetterMatch> {
        pairs
            .iter()
            .map(|&(position, letter)| LetterMatch { position, letter })
            .collect()
    }

    #[test]
    fn test_exact_and_displaced_letters() {
        // crane vs trace: r, a, e sit in place; c is displaced; t is absent
        let feedback = evaluate("crane", "trace").unwrap();
        assert_eq!(feedback.exact, matches(&[(2, 'r'), (3, 'a'), (5, 'e')]));
        assert_eq!(feedback.present, matches(&[(4, 'c')]));
    }

    #[test]
    fn test_identical_words_are_all_exact() {
        let feedback = evaluate("crane", "crane").unwrap();
        assert_eq!(
            feedback.exact,
            matches(&[(1, 'c'), (2, 'r'), (3, 'a'), (4, 'n'), (5, 'e')])
        );
        assert!(feedback.present.is_empty());
    }

    #[test]
    fn test_no_letters_in_common() {
        let feedback = evaluate("crane", "lusty").unwrap();
        assert!(feedback.exact.is_empty());
        assert!(feedback.present.is_empty());
    }

    #[test]
    fn test_repeated_guess_letter_credited_once_per_secret_letter() {
        // paper has two p's; puppy plays three. Both exact p's consume the
        // secret's supply, so the third p earns nothing.
        let feedback = evaluate("paper", "puppy").unwrap();
        assert_eq!(feedback.exact, matches(&[(1, 'p'), (3, 'p')]));
        assert!(feedback.present.is_empty());
    }

    #[test]
    fn test_exact_match_consumes_before_displaced() {
        // abbey vs babes: the exact b at position 3 claims its secret letter
        // first, then b and a pair up with what is left
        let feedback = evaluate("abbey", "babes").unwrap();
        assert_eq!(feedback.exact, matches(&[(3, 'b'), (4, 'e')]));
        assert_eq!(feedback.present, matches(&[(1, 'b'), (2, 'a')]));
    }

    #[test]
    fn test_displaced_letters_pair_with_first_free_occurrence() {
        let feedback = evaluate("robot", "troll").unwrap();
        assert!(feedback.exact.is_empty());
        // t, r, o each find a free secret letter; the second l finds none
        assert_eq!(feedback.present, matches(&[(1, 't'), (2, 'r'), (3, 'o')]));
    }

    #[test]
    fn test_total_matches_never_exceed_word_length() {
        // geese vs eerie: three e's on both sides, every one accounted for
        let feedback = evaluate("geese", "eerie").unwrap();
        assert_eq!(feedback.exact, matches(&[(2, 'e'), (5, 'e')]));
        assert_eq!(feedback.present, matches(&[(1, 'e')]));
        assert!(feedback.exact.len() + feedback.present.len() <= WORD_LENGTH);
    }

    #[test]
    fn test_rejects_wrong_length_input() {
        assert_eq!(
            evaluate("crane", "cran"),
            Err(EvaluateError::InvalidLength {
                secret_len: 5,
                guess_len: 4
            })
        );
        assert!(evaluate("cranes", "trace").is_err());
    }
}
