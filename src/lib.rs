pub mod auth;
pub mod config;
pub mod db;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod models;
pub mod notify;
pub mod routes;

/// Number of letters in every secret word and every guess
pub const WORD_LENGTH: usize = 5;

/// Guesses a player gets before the game is lost
pub const MAX_GUESSES: i16 = 6;
