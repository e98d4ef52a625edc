use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use tokio::fs;

use crate::WORD_LENGTH;

/// Word lists backing the game: the pool secrets are drawn from, and the set
/// of words accepted as guesses. Every answer is accepted as a guess too.
pub struct Dictionary {
    answers: Vec<String>,
    valid_guesses: HashSet<String>,
}

impl Dictionary {
    /// Load both word lists from disk. Fails if the answer list ends up empty,
    /// since the server could never start a game.
    pub async fn load<P: AsRef<Path>>(answers_path: P, valid_guesses_path: P) -> Result<Self> {
        let answers = read_words(answers_path.as_ref()).await?;
        anyhow::ensure!(
            !answers.is_empty(),
            "answer list {} contains no usable words",
            answers_path.as_ref().display()
        );

        let mut valid_guesses: HashSet<String> =
            read_words(valid_guesses_path.as_ref()).await?.into_iter().collect();
        valid_guesses.extend(answers.iter().cloned());

        Ok(Self {
            answers,
            valid_guesses,
        })
    }

    /// Build a dictionary from in-memory word lists (for testing)
    pub fn from_words(answers: &[&str], valid_guesses: &[&str]) -> Self {
        let answers: Vec<String> = answers.iter().map(|w| w.to_lowercase()).collect();
        let mut valid: HashSet<String> = valid_guesses.iter().map(|w| w.to_lowercase()).collect();
        valid.extend(answers.iter().cloned());
        Self {
            answers,
            valid_guesses: valid,
        }
    }

    /// Pick a secret word for a new game.
    pub fn random_answer(&self) -> &str {
        let idx = rand::rng().random_range(0..self.answers.len());
        &self.answers[idx]
    }

    /// Check whether a word may be played as a guess.
    pub fn is_valid_guess(&self, word: &str) -> bool {
        self.valid_guesses.contains(&word.to_lowercase())
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    pub fn valid_guess_count(&self) -> usize {
        self.valid_guesses.len()
    }
}

/// Read a word list: one word per line, lowercased, anything that is not
/// exactly five letters dropped, duplicates removed.
async fn read_words(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read word list {}", path.display()))?;

    let mut seen = HashSet::new();
    let words = content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| word.chars().count() == WORD_LENGTH)
        .filter(|word| word.chars().all(|c| c.is_ascii_alphabetic()))
        .filter(|word| seen.insert(word.clone()))
        .collect();

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_always_valid_guesses() {
        let dict = Dictionary::from_words(&["crane"], &["trace"]);
        assert!(dict.is_valid_guess("crane"));
        assert!(dict.is_valid_guess("trace"));
        assert!(!dict.is_valid_guess("zzzzz"));
    }

    #[test]
    fn validity_check_ignores_case() {
        let dict = Dictionary::from_words(&["crane"], &[]);
        assert!(dict.is_valid_guess("CRANE"));
        assert!(dict.is_valid_guess("CrAnE"));
    }

    #[test]
    fn random_answer_comes_from_the_answer_pool() {
        let dict = Dictionary::from_words(&["crane", "slate"], &["trace"]);
        for _ in 0..20 {
            let answer = dict.random_answer();
            assert!(answer == "crane" || answer == "slate");
        }
    }
}
